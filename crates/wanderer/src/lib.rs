//! Wanderer - virtual filesystem and terminal core of the ZutiOS desktop
//!
//! Wanderer keeps an in-memory file tree, a table of built-in binaries that
//! operate on it, and an interactive shell with completion and history.
//! Everything runs synchronously: each command reads and mutates the shared
//! state and returns before the next one starts.
//!
//! # Example
//!
//! ```rust
//! use wanderer::{Kernel, Shell};
//!
//! # fn main() -> wanderer::Result<()> {
//! let mut kernel = Kernel::builder().build()?;
//! let mut shell = Shell::new(&kernel);
//!
//! shell.execute_line(&mut kernel, "mkdir Documents")?;
//! shell.execute_line(&mut kernel, "cd Documents")?;
//! assert_eq!(shell.execute_line(&mut kernel, "pwd")?, "/home/user/Documents");
//! # Ok(())
//! # }
//! ```
//!
//! # Structured operations
//!
//! Every binary is also available as a plain function over a
//! [`FileSystem`], for callers that already hold resolved paths:
//!
//! ```rust
//! use wanderer::builtins::{ls, mkdir, LsOptions};
//! use wanderer::Kernel;
//!
//! # fn main() -> wanderer::Result<()> {
//! let mut kernel = Kernel::builder().build()?;
//! let home = vec!["home".to_string(), "user".to_string()];
//!
//! mkdir(kernel.fs_mut(), &home, "Docs", "user")?;
//! assert_eq!(mkdir(kernel.fs_mut(), &home, "Docs", "user")?, "Docs (1)");
//! assert_eq!(ls(kernel.fs(), &home, LsOptions::default())?, "Docs Docs (1)");
//! # Ok(())
//! # }
//! ```

pub mod builtins;
mod error;
pub mod fs;
mod logging_impl;
pub mod process;
pub mod shell;
pub mod storage;

pub use builtins::{Builtin, Context as BuiltinContext, Registry, SystemInfo};
pub use error::{Error, Result};
pub use fs::{FileSystem, FsError};
pub use logging_impl::LogConfig;
pub use process::{Process, ProcessManager, ProcessTable};
pub use shell::{CompletionOutcome, HistoryLine, Shell};
pub use storage::{ComputerStatus, HostState, HostStorage, JsonFileStorage, MemoryStorage};

use std::collections::BTreeMap;

use fs::{File, Folder, Node, ROOT_OWNER, USER_OWNER};

/// Environment defaults written at boot when absent.
const DEFAULT_ENV: [(&str, &str); 3] = [("PATH", "/bin"), ("HOME", "/home/user"), ("USER", USER_OWNER)];

/// Main entry point for Wanderer.
///
/// Owns the filesystem, the persisted host state, the process manager and
/// the binary registry. Shell sessions borrow it per command.
pub struct Kernel {
    fs: FileSystem,
    host: HostState,
    processes: Box<dyn ProcessManager>,
    registry: Registry,
    system: SystemInfo,
    log_config: LogConfig,
}

impl Kernel {
    /// Create a new KernelBuilder for customized configuration.
    pub fn builder() -> KernelBuilder {
        KernelBuilder::default()
    }

    /// Mark the computer as booting, rebuild the standard tree, then mark
    /// it as on.
    pub fn boot(&mut self) -> Result<()> {
        self.host.set_computer_status(ComputerStatus::Booting)?;
        self.fs = standard_layout(&self.registry, &self.system);
        self.host.set_computer_status(ComputerStatus::On)?;

        #[cfg(feature = "logging")]
        tracing::info!(binaries = self.registry.names().count(), "kernel booted");

        Ok(())
    }

    /// Mark the computer as off. The environment is kept.
    pub fn shutdown(&mut self) -> Result<()> {
        self.host.set_computer_status(ComputerStatus::Off)?;

        #[cfg(feature = "logging")]
        tracing::info!("kernel shut down");

        Ok(())
    }

    pub fn status(&self) -> ComputerStatus {
        self.host.computer_status()
    }

    pub fn fs(&self) -> &FileSystem {
        &self.fs
    }

    pub fn fs_mut(&mut self) -> &mut FileSystem {
        &mut self.fs
    }

    pub fn env(&self, name: &str) -> Option<&str> {
        self.host.env(name)
    }

    pub fn envs(&self) -> &BTreeMap<String, String> {
        self.host.envs()
    }

    /// Set and persist an environment variable.
    pub fn set_env(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let (name, value) = (name.into(), value.into());

        #[cfg(feature = "logging")]
        tracing::debug!(
            name = %name,
            value = %self.log_config.env_value(&name, &value),
            "environment updated"
        );

        self.host.set_env(name, value)
    }

    pub fn processes(&self) -> &dyn ProcessManager {
        self.processes.as_ref()
    }

    pub fn processes_mut(&mut self) -> &mut dyn ProcessManager {
        self.processes.as_mut()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn system(&self) -> &SystemInfo {
        &self.system
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log_config
    }

    /// Folder on `PATH` holding an executable named `name`.
    ///
    /// `PATH` entries are searched in order; entries that do not resolve to
    /// a folder are skipped.
    pub fn find_executable(&self, name: &str) -> Option<Vec<String>> {
        let path_var = self.env("PATH")?;
        path_var
            .split(':')
            .filter(|dir| !dir.is_empty())
            .filter_map(|dir| fs::resolve_absolute(&[], dir).ok())
            .find(|dir| {
                self.fs.find_folder(dir).is_some_and(|folder| {
                    matches!(folder.child(name), Some(Node::File(file)) if file.is_executable())
                })
            })
    }

    /// Run the executable `file_name` in folder `path` as the regular user.
    ///
    /// `current_path` is the working directory relative paths resolve
    /// against; `args` are the raw words after the command name.
    pub fn execute(
        &mut self,
        path: &[String],
        file_name: &str,
        current_path: &[String],
        args: &[String],
    ) -> Result<String> {
        self.execute_as(USER_OWNER, path, file_name, current_path, args)
    }

    /// Run an executable on behalf of `user`.
    pub fn execute_as(
        &mut self,
        user: &str,
        path: &[String],
        file_name: &str,
        current_path: &[String],
        args: &[String],
    ) -> Result<String> {
        let command = self
            .fs
            .find_folder(path)
            .and_then(|folder| match folder.child(file_name) {
                Some(Node::File(file)) => file.command.clone(),
                _ => None,
            })
            .ok_or_else(|| Error::CommandNotFound(file_name.to_string()))?;

        let builtin = self
            .registry
            .get(&command)
            .ok_or_else(|| Error::CommandNotFound(file_name.to_string()))?;

        #[cfg(feature = "logging")]
        tracing::debug!(command = %command, user = %user, "executing binary");

        builtin.execute(BuiltinContext {
            name: file_name,
            args,
            cwd: current_path,
            user,
            fs: &mut self.fs,
            processes: self.processes.as_mut(),
            system: &self.system,
        })
    }
}

/// Builder for customized Kernel configuration.
#[derive(Default)]
pub struct KernelBuilder {
    env: BTreeMap<String, String>,
    storage: Option<Box<dyn HostStorage>>,
    processes: Option<Box<dyn ProcessManager>>,
    system: Option<SystemInfo>,
    builtins: Vec<(String, Box<dyn Builtin>)>,
    log_config: Option<LogConfig>,
}

impl KernelBuilder {
    /// Set an environment variable, overriding any persisted value.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the store persisting the computer status and environment.
    pub fn storage(mut self, storage: Box<dyn HostStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the process manager consulted by `ps` and `kill`.
    pub fn processes(mut self, processes: Box<dyn ProcessManager>) -> Self {
        self.processes = Some(processes);
        self
    }

    /// Set the values reported by `uname`.
    pub fn system_info(mut self, system: SystemInfo) -> Self {
        self.system = Some(system);
        self
    }

    /// Register an extra binary. It gets an executable in `/bin`.
    pub fn builtin(mut self, name: impl Into<String>, builtin: Box<dyn Builtin>) -> Self {
        self.builtins.push((name.into(), builtin));
        self
    }

    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = Some(config);
        self
    }

    /// Build the Kernel with the standard tree.
    ///
    /// Fails only when the host store cannot be written.
    pub fn build(self) -> Result<Kernel> {
        let mut registry = Registry::standard();
        for (name, builtin) in self.builtins {
            registry.register(name, builtin);
        }

        let system = self.system.unwrap_or_default();
        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(MemoryStorage::new()));
        let mut host = HostState::load(storage);

        for (name, value) in DEFAULT_ENV {
            if host.env(name).is_none() {
                host.set_env(name, value)?;
            }
        }
        for (name, value) in self.env {
            host.set_env(name, value)?;
        }

        Ok(Kernel {
            fs: standard_layout(&registry, &system),
            host,
            processes: self
                .processes
                .unwrap_or_else(|| Box::new(ProcessTable::new())),
            registry,
            system,
            log_config: self.log_config.unwrap_or_default(),
        })
    }
}

/// The tree every boot starts from: `/bin` with one executable per
/// registered binary, `/etc`, `/home/user` and `/tmp`.
fn standard_layout(registry: &Registry, system: &SystemInfo) -> FileSystem {
    let mut bin = Folder::new("bin", ROOT_OWNER);
    bin.files = registry
        .names()
        .map(|name| Node::File(File::executable(name, name, ROOT_OWNER)))
        .collect();

    let mut etc = Folder::new("etc", ROOT_OWNER);
    etc.files = vec![
        Node::File(File::new("hostname", system.nodename.as_str(), ROOT_OWNER)),
        Node::File(File::new(
            "os-release",
            format!("NAME={}\nVERSION={}\n", system.sysname, system.release),
            ROOT_OWNER,
        )),
    ];

    let mut home = Folder::new("home", ROOT_OWNER);
    home.files = vec![Node::Folder(Folder::new("user", USER_OWNER))];

    let mut root = Folder::new("/", ROOT_OWNER);
    root.files = vec![
        Node::Folder(bin),
        Node::Folder(etc),
        Node::Folder(home),
        Node::Folder(Folder::new("tmp", ROOT_OWNER)),
    ];
    FileSystem::from_root(root)
}
