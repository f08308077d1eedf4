//! Terminal shell session
//!
//! A [`Shell`] turns typed lines into binary invocations on a [`Kernel`].
//! It owns the per-session state: working directory, privilege level, the
//! two command histories and the rendered terminal lines. The filesystem,
//! environment and process list live on the kernel and are shared by every
//! session.

mod complete;
mod history;
mod lexer;

pub use complete::{autocomplete, Completion, CompletionOutcome, NBSP, SHELL_BUILTINS};
pub use history::CommandHistory;
pub use lexer::{expand_env, tokenize, Lexer};

use crate::error::{Error, Result};
use crate::fs::{path_to_string, resolve_absolute, split_parent, NodeRef, ROOT_OWNER, USER_OWNER};
use crate::Kernel;

/// One rendered line of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLine {
    /// The prompt followed by what was typed.
    Input { prompt: String, line: String },
    Output(String),
    Error(String),
    /// Candidates from an ambiguous tab completion.
    Suggestions(String),
}

/// An interactive shell session.
#[derive(Debug, Clone)]
pub struct Shell {
    cwd: Vec<String>,
    home: Vec<String>,
    hostname: String,
    elevated: bool,
    user_history: CommandHistory,
    root_history: CommandHistory,
    lines: Vec<HistoryLine>,
    process_id: Option<String>,
    alive: bool,
}

impl Shell {
    /// Start a session in the user's home folder (`$HOME`).
    pub fn new(kernel: &Kernel) -> Self {
        let home = kernel
            .env("HOME")
            .and_then(|home| resolve_absolute(&[], home).ok())
            .unwrap_or_else(|| vec!["home".to_string(), USER_OWNER.to_string()]);

        #[cfg(feature = "logging")]
        tracing::info!(home = %path_to_string(&home), "shell session started");

        Self {
            cwd: home.clone(),
            home,
            hostname: kernel.system().nodename.clone(),
            elevated: false,
            user_history: CommandHistory::new(),
            root_history: CommandHistory::new(),
            lines: Vec::new(),
            process_id: None,
            alive: true,
        }
    }

    /// Bind the session to the process that `exit` terminates.
    pub fn with_process(mut self, id: impl Into<String>) -> Self {
        self.process_id = Some(id.into());
        self
    }

    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    pub fn is_elevated(&self) -> bool {
        self.elevated
    }

    /// Whether the session has exited.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Rendered terminal lines since the last `clear`.
    pub fn lines(&self) -> &[HistoryLine] {
        &self.lines
    }

    /// Drop every rendered line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Name new nodes are owned by.
    pub fn user(&self) -> &'static str {
        if self.elevated {
            ROOT_OWNER
        } else {
            USER_OWNER
        }
    }

    /// `user@host:~$` or `root@host:/path#`.
    pub fn prompt(&self) -> String {
        let path = match self.cwd.strip_prefix(self.home.as_slice()) {
            Some(rest) if !self.elevated => {
                let mut shown = "~".to_string();
                for segment in rest {
                    shown.push('/');
                    shown.push_str(segment);
                }
                shown
            }
            _ => path_to_string(&self.cwd),
        };
        let sigil = if self.elevated { '#' } else { '$' };
        format!("{}@{}:{}{}", self.user(), self.hostname, path, sigil)
    }

    /// History for the current privilege level.
    pub fn history(&self) -> &CommandHistory {
        if self.elevated {
            &self.root_history
        } else {
            &self.user_history
        }
    }

    fn history_mut(&mut self) -> &mut CommandHistory {
        if self.elevated {
            &mut self.root_history
        } else {
            &mut self.user_history
        }
    }

    /// Recall the previous line (arrow up).
    pub fn history_up(&mut self) -> String {
        self.history_mut().up().to_string()
    }

    /// Recall the next line (arrow down).
    pub fn history_down(&mut self) -> String {
        self.history_mut().down().to_string()
    }

    /// Run a typed line and record it in the terminal.
    ///
    /// Failures are rendered as error lines; this never fails.
    pub fn submit(&mut self, kernel: &mut Kernel, line: &str) {
        let prompt = self.prompt();
        self.lines.push(HistoryLine::Input {
            prompt,
            line: line.to_string(),
        });

        if !line.trim().is_empty() {
            self.history_mut().push(line);
        }
        self.history_mut().reset_cursor();

        match self.execute_line(kernel, line) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => self.lines.push(HistoryLine::Output(output)),
            Err(err) => {
                #[cfg(feature = "logging")]
                tracing::warn!(error = %err, "command failed");

                self.lines.push(HistoryLine::Error(err.to_string()));
            }
        }
    }

    /// Run a typed line and return its output.
    pub fn execute_line(&mut self, kernel: &mut Kernel, line: &str) -> Result<String> {
        let words: Vec<String> = {
            let env: &Kernel = kernel;
            tokenize(line)
                .iter()
                .map(|word| expand_env(word, |name| env.env(name)))
                .collect()
        };

        let Some((command, args)) = words.split_first() else {
            return Ok(String::new());
        };

        #[cfg(feature = "logging")]
        tracing::debug!(command = %command, args = args.len(), "dispatch");

        match command.as_str() {
            "cd" => self.cd(kernel, args),
            "clear" => {
                self.clear();
                Ok(String::new())
            }
            "exit" => {
                self.exit(kernel);
                Ok(String::new())
            }
            "sudo" => self.sudo(args),
            "export" => export(kernel, args),
            _ => {
                let output = self.run_binary(kernel, command, args);
                if self.process_id.as_ref().is_some_and(|id| {
                    kernel.processes().list().iter().all(|p| &p.id != id)
                }) {
                    self.alive = false;
                }
                output
            }
        }
    }

    fn cd(&mut self, kernel: &Kernel, args: &[String]) -> Result<String> {
        let Some(target) = args.first() else {
            self.cwd = self.home.clone();
            return Ok(String::new());
        };

        let path = resolve_absolute(&self.cwd, target).map_err(|e| Error::fs("cd", e))?;
        match kernel.fs().find_node(&path) {
            Some(NodeRef::Folder(_)) => {
                self.cwd = path;
                Ok(String::new())
            }
            Some(NodeRef::File(_)) => Err(Error::NotADirectory {
                cmd: "cd".to_string(),
                path: target.clone(),
            }),
            None => Err(Error::NoSuchDirectory {
                cmd: "cd".to_string(),
                path: target.clone(),
            }),
        }
    }

    fn exit(&mut self, kernel: &mut Kernel) {
        if self.elevated {
            self.elevated = false;
            return;
        }

        self.alive = false;
        if let Some(id) = &self.process_id {
            kernel.processes_mut().terminate(id);
        }

        #[cfg(feature = "logging")]
        tracing::info!("shell session ended");
    }

    fn sudo(&mut self, args: &[String]) -> Result<String> {
        match args {
            [su] if su == "su" => {
                self.elevated = true;
                Ok(String::new())
            }
            [] => Err(Error::missing_operand("sudo")),
            _ => Err(Error::Refused {
                cmd: "sudo".to_string(),
                reason: "only 'sudo su' is supported".to_string(),
            }),
        }
    }

    fn run_binary(&mut self, kernel: &mut Kernel, command: &str, args: &[String]) -> Result<String> {
        let (dir, file_name) = if command.contains('/') {
            let path =
                resolve_absolute(&self.cwd, command).map_err(|e| Error::fs(command, e))?;
            match split_parent(&path) {
                Some((dir, name)) => (dir.to_vec(), name.to_string()),
                None => return Err(Error::CommandNotFound(command.to_string())),
            }
        } else {
            let dir = kernel
                .find_executable(command)
                .ok_or_else(|| Error::CommandNotFound(command.to_string()))?;
            (dir, command.to_string())
        };

        kernel.execute_as(self.user(), &dir, &file_name, &self.cwd, args)
    }

    /// Complete the word under `cursor`.
    ///
    /// Ambiguous completions are rendered as a suggestions line.
    pub fn tab(&mut self, kernel: &Kernel, line: &str, cursor: usize) -> CompletionOutcome {
        let path_var = kernel.env("PATH").unwrap_or_default();
        let outcome = autocomplete(kernel.fs(), path_var, line, &self.cwd, cursor).apply(line);

        if let CompletionOutcome::Candidates(candidates) = &outcome {
            let prompt = self.prompt();
            self.lines.push(HistoryLine::Input {
                prompt,
                line: line.to_string(),
            });
            self.lines
                .push(HistoryLine::Suggestions(candidates.join(" ")));
        }
        outcome
    }
}

/// `export` with no arguments lists the environment; otherwise each
/// `NAME=VALUE` word sets a variable.
fn export(kernel: &mut Kernel, args: &[String]) -> Result<String> {
    if args.is_empty() {
        let listing: Vec<String> = kernel
            .envs()
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        return Ok(listing.join("\n"));
    }

    for arg in args {
        let (name, value) = match arg.split_once('=') {
            Some((name, value)) => (name, value),
            None => (arg.as_str(), kernel.env(arg).unwrap_or_default()),
        };
        if !is_valid_var_name(name) {
            return Err(Error::InvalidIdentifier {
                cmd: "export".to_string(),
                name: name.to_string(),
            });
        }
        let (name, value) = (name.to_string(), value.to_string());
        kernel.set_env(name, value)?;
    }
    Ok(String::new())
}

fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::process::ProcessTable;
    use pretty_assertions::assert_eq;

    fn setup() -> (Kernel, Shell) {
        let kernel = Kernel::builder().build().unwrap();
        let shell = Shell::new(&kernel);
        (kernel, shell)
    }

    #[test]
    fn test_prompt_shows_home_as_tilde() {
        let (mut kernel, mut shell) = setup();
        assert_eq!(shell.prompt(), "user@zutiOS:~$");

        shell.execute_line(&mut kernel, "cd /etc").unwrap();
        assert_eq!(shell.prompt(), "user@zutiOS:/etc$");

        shell.execute_line(&mut kernel, "sudo su").unwrap();
        assert_eq!(shell.prompt(), "root@zutiOS:/etc#");
    }

    #[test]
    fn test_cd_errors() {
        let (mut kernel, mut shell) = setup();
        shell.execute_line(&mut kernel, "touch notes").unwrap();

        let err = shell.execute_line(&mut kernel, "cd notes").unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));

        let err = shell.execute_line(&mut kernel, "cd nowhere").unwrap_err();
        assert_eq!(err.to_string(), "cd: The directory nowhere does not exist");
        assert_eq!(shell.cwd(), ["home", "user"]);
    }

    #[test]
    fn test_cd_relative_and_home() {
        let (mut kernel, mut shell) = setup();
        shell.execute_line(&mut kernel, "cd ../..").unwrap();
        assert!(shell.cwd().is_empty());
        shell.execute_line(&mut kernel, "cd").unwrap();
        assert_eq!(shell.cwd(), ["home", "user"]);
    }

    #[test]
    fn test_dispatch_through_path() {
        let (mut kernel, mut shell) = setup();
        assert_eq!(shell.execute_line(&mut kernel, "pwd").unwrap(), "/home/user");
        assert_eq!(shell.execute_line(&mut kernel, "/bin/pwd").unwrap(), "/home/user");

        let err = shell.execute_line(&mut kernel, "frobnicate").unwrap_err();
        assert_eq!(err.to_string(), "frobnicate: command not found");

        kernel.set_env("PATH", "/nowhere").unwrap();
        let err = shell.execute_line(&mut kernel, "pwd").unwrap_err();
        assert!(matches!(err, Error::CommandNotFound(_)));
    }

    #[test]
    fn test_env_expansion_and_export() {
        let (mut kernel, mut shell) = setup();
        shell.execute_line(&mut kernel, "export GREETING=hi").unwrap();
        assert_eq!(kernel.env("GREETING"), Some("hi"));

        let out = shell.execute_line(&mut kernel, "echo $GREETING $UNSET there").unwrap();
        assert_eq!(out, "hi  there\n");

        let err = shell.execute_line(&mut kernel, "export 1BAD=x").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }));

        let listing = shell.execute_line(&mut kernel, "export").unwrap();
        assert!(listing.lines().any(|l| l == "GREETING=hi"));
    }

    #[test]
    fn test_export_value_keeps_later_equals() {
        let (mut kernel, mut shell) = setup();
        shell.execute_line(&mut kernel, "export OPTS=a=b").unwrap();
        assert_eq!(kernel.env("OPTS"), Some("a=b"));
    }

    #[test]
    fn test_sudo_only_su() {
        let (mut kernel, mut shell) = setup();
        let err = shell.execute_line(&mut kernel, "sudo ls").unwrap_err();
        assert!(matches!(err, Error::Refused { .. }));
        assert!(!shell.is_elevated());
    }

    #[test]
    fn test_elevated_nodes_owned_by_root() {
        let (mut kernel, mut shell) = setup();
        shell.execute_line(&mut kernel, "sudo su").unwrap();
        shell.execute_line(&mut kernel, "mkdir secret").unwrap();

        let path: Vec<String> = ["home", "user", "secret"].iter().map(|s| s.to_string()).collect();
        assert_eq!(kernel.fs().find_node(&path).unwrap().owner(), ROOT_OWNER);
    }

    #[test]
    fn test_exit_pops_privilege_then_kills_process() {
        let mut table = ProcessTable::new();
        let id = table.spawn("Terminal", false);
        let mut kernel = Kernel::builder().processes(Box::new(table)).build().unwrap();
        let mut shell = Shell::new(&kernel).with_process(id.clone());

        shell.execute_line(&mut kernel, "sudo su").unwrap();
        shell.execute_line(&mut kernel, "exit").unwrap();
        assert!(!shell.is_elevated());
        assert!(shell.is_alive());

        shell.execute_line(&mut kernel, "exit").unwrap();
        assert!(!shell.is_alive());
        assert!(kernel.processes().list().iter().all(|p| p.id != id));
    }

    #[test]
    fn test_killing_own_process_ends_session() {
        let mut table = ProcessTable::new();
        let id = table.spawn("Terminal", false);
        let mut kernel = Kernel::builder().processes(Box::new(table)).build().unwrap();
        let mut shell = Shell::new(&kernel).with_process(id.clone());

        let err = shell.execute_line(&mut kernel, "kill nope").unwrap_err();
        assert!(matches!(err, Error::NoSuchProcess { .. }));
        assert!(shell.is_alive());

        shell.execute_line(&mut kernel, &format!("kill {}", id)).unwrap();
        assert!(!shell.is_alive());
    }

    #[test]
    fn test_histories_are_per_privilege() {
        let (mut kernel, mut shell) = setup();
        shell.submit(&mut kernel, "pwd");
        shell.submit(&mut kernel, "sudo su");
        shell.submit(&mut kernel, "ls");

        assert_eq!(shell.history_up(), "ls");
        assert_eq!(shell.history_up(), "ls");

        shell.submit(&mut kernel, "exit");
        assert_eq!(shell.history_up(), "sudo su");
        assert_eq!(shell.history_up(), "pwd");
        assert_eq!(shell.history_down(), "sudo su");
        assert_eq!(shell.history_down(), "");
    }

    #[test]
    fn test_submit_renders_output_errors_and_clear() {
        let (mut kernel, mut shell) = setup();
        shell.submit(&mut kernel, "pwd");
        shell.submit(&mut kernel, "cat missing");

        assert_eq!(
            shell.lines(),
            [
                HistoryLine::Input {
                    prompt: "user@zutiOS:~$".to_string(),
                    line: "pwd".to_string()
                },
                HistoryLine::Output("/home/user".to_string()),
                HistoryLine::Input {
                    prompt: "user@zutiOS:~$".to_string(),
                    line: "cat missing".to_string()
                },
                HistoryLine::Error("cat: /home/user/missing: No such file or directory".to_string()),
            ]
        );

        shell.submit(&mut kernel, "clear");
        assert!(shell.lines().is_empty());
        assert!(shell.is_alive());
    }

    #[test]
    fn test_tab_single_and_many() {
        let (mut kernel, mut shell) = setup();
        shell.execute_line(&mut kernel, "mkdir Documents").unwrap();
        shell.execute_line(&mut kernel, "mkdir Downloads").unwrap();

        let outcome = shell.tab(&kernel, "cd Doc", 6);
        assert_eq!(
            outcome,
            CompletionOutcome::Replaced {
                line: "cd Documents/".to_string(),
                cursor: 13
            }
        );
        assert!(shell.lines().is_empty());

        let outcome = shell.tab(&kernel, "cd Do", 5);
        assert_eq!(
            outcome,
            CompletionOutcome::Candidates(vec!["Documents/".to_string(), "Downloads/".to_string()])
        );
        assert_eq!(
            shell.lines().last(),
            Some(&HistoryLine::Suggestions("Documents/ Downloads/".to_string()))
        );
    }

    #[test]
    fn test_valid_var_names() {
        assert!(is_valid_var_name("PATH"));
        assert!(is_valid_var_name("_x1"));
        assert!(!is_valid_var_name("1x"));
        assert!(!is_valid_var_name("A-B"));
        assert!(!is_valid_var_name(""));
    }
}
