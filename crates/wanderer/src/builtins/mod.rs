//! Built-in binaries
//!
//! This module provides the [`Builtin`] trait, the [`Context`] every binary
//! runs in, and the [`Registry`] mapping binary names to implementations.
//!
//! Binaries receive raw words from the shell and normalize them in a single
//! argument-parsing step (flags + positionals) before calling a structured
//! operation such as [`cp`] or [`rm`]. The structured operations are public
//! so callers without a command line, like a file explorer, use them
//! directly.
//!
//! # Custom Builtins
//!
//! ```rust
//! use wanderer::{Builtin, BuiltinContext, Kernel};
//!
//! struct Hello;
//!
//! impl Builtin for Hello {
//!     fn execute(&self, ctx: BuiltinContext<'_>) -> wanderer::Result<String> {
//!         Ok(format!("hello, {}", ctx.user))
//!     }
//! }
//!
//! # fn main() -> wanderer::Result<()> {
//! let mut kernel = Kernel::builder().builtin("hello", Box::new(Hello)).build()?;
//! let out = kernel.execute(&["bin".to_string()], "hello", &[], &[])?;
//! assert_eq!(out, "hello, user");
//! # Ok(())
//! # }
//! ```

mod cat;
mod date;
mod echo;
mod fileops;
mod ls;
mod navigation;
mod process;
mod system;

pub use cat::{cat, Cat};
pub use date::{format_date, Date, DEFAULT_DATE_FORMAT};
pub use echo::{interpret_escape_sequences, Echo};
pub use fileops::{cp, mkdir, mv, rm, touch, CopyOptions, Cp, Mkdir, Mv, Rm, RmOptions, Touch};
pub use ls::{ls, Ls, LsOptions};
pub use navigation::{Pwd, Sh};
pub use process::{ps, Kill, Ps, PsOptions};
pub use system::{SystemInfo, Uname};

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::fs::{resolve_absolute, FileSystem};
use crate::process::ProcessManager;

/// Execution context for builtin commands.
pub struct Context<'a> {
    /// Name the binary was invoked as, used to prefix diagnostics.
    pub name: &'a str,

    /// Raw words after the command name.
    pub args: &'a [String],

    /// Working directory as root-relative segments.
    pub cwd: &'a [String],

    /// Invoking user (`root` while elevated).
    pub user: &'a str,

    /// Virtual filesystem.
    pub fs: &'a mut FileSystem,

    /// Process manager collaborator.
    pub processes: &'a mut dyn ProcessManager,

    /// Values reported by `uname`.
    pub system: &'a SystemInfo,
}

impl Context<'_> {
    /// Resolve a typed path against the working directory.
    pub fn resolve(&self, input: &str) -> Result<Vec<String>> {
        resolve_absolute(self.cwd, input).map_err(|e| Error::fs(self.name, e))
    }

    /// Split the arguments into flags and positionals.
    pub fn parse_args(&self, allowed: &str) -> Result<ParsedArgs> {
        parse_args(self.name, self.args, allowed)
    }
}

/// Trait for implementing builtin commands.
///
/// A binary returns its output text on success or one of the typed
/// [`Error`]s on failure; the shell renders either.
pub trait Builtin: Send + Sync {
    fn execute(&self, ctx: Context<'_>) -> Result<String>;
}

/// Arguments split into single-character flags and positionals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub flags: BTreeSet<char>,
    pub positional: Vec<String>,
}

impl ParsedArgs {
    pub fn has(&self, flag: char) -> bool {
        self.flags.contains(&flag)
    }
}

/// Split `args` into flags and positionals.
///
/// A word starting with `-` (other than `-` itself) is a cluster of
/// single-character flags; any character outside `allowed` fails with
/// [`Error::InvalidOption`].
pub fn parse_args(cmd: &str, args: &[String], allowed: &str) -> Result<ParsedArgs> {
    let mut parsed = ParsedArgs::default();

    for arg in args {
        match arg.strip_prefix('-') {
            Some(cluster) if !cluster.is_empty() => {
                for c in cluster.chars() {
                    if !allowed.contains(c) {
                        return Err(Error::InvalidOption {
                            cmd: cmd.to_string(),
                            option: c,
                        });
                    }
                    parsed.flags.insert(c);
                }
            }
            _ => parsed.positional.push(arg.clone()),
        }
    }

    Ok(parsed)
}

/// Binary names mapped to implementations.
#[derive(Default)]
pub struct Registry {
    builtins: BTreeMap<String, Box<dyn Builtin>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every standard binary.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("ls", Box::new(Ls));
        registry.register("cp", Box::new(Cp));
        registry.register("mv", Box::new(Mv));
        registry.register("rm", Box::new(Rm));
        registry.register("mkdir", Box::new(Mkdir));
        registry.register("touch", Box::new(Touch));
        registry.register("cat", Box::new(Cat));
        registry.register("ps", Box::new(Ps));
        registry.register("kill", Box::new(Kill));
        registry.register("pwd", Box::new(Pwd));
        registry.register("uname", Box::new(Uname));
        registry.register("echo", Box::new(Echo));
        registry.register("date", Box::new(Date));
        registry.register("sh", Box::new(Sh));
        registry
    }

    /// Register a binary, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, builtin: Box<dyn Builtin>) {
        self.builtins.insert(name.into(), builtin);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Builtin> {
        self.builtins.get(name).map(|b| b.as_ref())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builtins.keys().map(String::as_str)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the builtin unit tests.

    use super::*;
    use crate::fs::{NodeKind, ROOT_OWNER, USER_OWNER};
    use crate::process::ProcessTable;

    pub fn segs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    /// `/home/user` plus an empty `/tmp`.
    pub fn test_fs() -> FileSystem {
        let mut fs = FileSystem::new();
        let folder = || NodeKind::Folder { files: Vec::new() };
        fs.create_node(&[], "home", folder(), ROOT_OWNER).unwrap();
        fs.create_node(&segs(&["home"]), "user", folder(), USER_OWNER).unwrap();
        fs.create_node(&[], "tmp", folder(), ROOT_OWNER).unwrap();
        fs
    }

    pub fn write_file(fs: &mut FileSystem, path: &[&str], content: &str) {
        let path = segs(path);
        let (name, parent) = path.split_last().unwrap();
        let kind = NodeKind::File {
            content: content.to_string(),
            command: None,
        };
        fs.create_node(parent, name, kind, USER_OWNER).unwrap();
    }

    pub fn make_dir(fs: &mut FileSystem, path: &[&str]) {
        let path = segs(path);
        let (name, parent) = path.split_last().unwrap();
        fs.create_node(parent, name, NodeKind::Folder { files: Vec::new() }, USER_OWNER)
            .unwrap();
    }

    /// Run a builtin from `/home/user` as `user`.
    pub fn run<B: Builtin>(
        builtin: &B,
        name: &str,
        fs: &mut FileSystem,
        processes: &mut ProcessTable,
        args: &[&str],
    ) -> Result<String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let cwd = segs(&["home", "user"]);
        let system = SystemInfo::default();
        let ctx = Context {
            name,
            args: &args,
            cwd: &cwd,
            user: USER_OWNER,
            fs,
            processes,
            system: &system,
        };
        builtin.execute(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_splits_clusters() {
        let parsed = parse_args("rm", &words(&["-rf", "a", "-", "b"]), "rf").unwrap();
        assert!(parsed.has('r'));
        assert!(parsed.has('f'));
        assert_eq!(parsed.positional, words(&["a", "-", "b"]));
    }

    #[test]
    fn test_parse_args_rejects_unknown_flag() {
        let err = parse_args("ls", &words(&["-lz"]), "al").unwrap_err();
        assert!(matches!(err, Error::InvalidOption { option: 'z', .. }));
        assert_eq!(err.to_string(), "ls: invalid option -- 'z'");
    }

    #[test]
    fn test_standard_registry_names() {
        let registry = Registry::standard();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "cat", "cp", "date", "echo", "kill", "ls", "mkdir", "mv", "ps", "pwd", "rm", "sh",
                "touch", "uname"
            ]
        );
        assert!(registry.get("ls").is_some());
        assert!(registry.get("bash").is_none());
    }
}
