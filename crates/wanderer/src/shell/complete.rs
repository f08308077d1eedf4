//! Tab completion over the filesystem tree and the command search path

use std::ops::Range;

use crate::fs::{FileSystem, Node};

/// Pseudo-commands the shell handles itself, offered next to binaries.
pub const SHELL_BUILTINS: [&str; 4] = ["cd", "clear", "export", "sudo"];

/// Inserted after a completed command name so the next word starts fresh.
pub const NBSP: char = '\u{a0}';

/// Candidates for the word under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Sorted, deduplicated completions for the word.
    pub suggestions: Vec<String>,
    /// The word being completed.
    pub current_arg: String,
    /// Whether the word is the command name.
    pub is_command: bool,
    /// Byte range of `current_arg` in the completed line.
    pub span: Range<usize>,
}

/// What a completion does to the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// A single match replaced the word in place.
    Replaced { line: String, cursor: usize },
    /// Several matches, to be shown rather than inserted.
    Candidates(Vec<String>),
    NoMatch,
}

impl Completion {
    /// Apply the completion to `line`, which must be the line it was
    /// computed from.
    pub fn apply(&self, line: &str) -> CompletionOutcome {
        match self.suggestions.as_slice() {
            [] => CompletionOutcome::NoMatch,
            [only] => {
                let rest = &line[self.span.end..];
                let mut completed = String::with_capacity(line.len() + only.len() + 2);
                completed.push_str(&line[..self.span.start]);
                completed.push_str(only);
                if self.is_command && !rest.starts_with(char::is_whitespace) {
                    completed.push(NBSP);
                }
                let cursor = completed.len();
                completed.push_str(rest);
                CompletionOutcome::Replaced {
                    line: completed,
                    cursor,
                }
            }
            many => CompletionOutcome::Candidates(many.to_vec()),
        }
    }
}

/// Complete the word of `line` under `cursor` (a byte offset).
///
/// The command name completes against executables in each `PATH`
/// directory plus [`SHELL_BUILTINS`], unless it starts with `.` or
/// contains `/`;
/// every other word completes against the folder its directory part
/// names. Prefix matching ignores case.
pub fn autocomplete(
    fs: &FileSystem,
    path_var: &str,
    line: &str,
    cwd: &[String],
    cursor: usize,
) -> Completion {
    let cursor = floor_char_boundary(line, cursor.min(line.len()));
    let command_end = line.find(char::is_whitespace).unwrap_or(line.len());
    let command = &line[..command_end];
    let is_command = cursor <= command_end;

    let span = word_span(line, cursor);
    let current_arg = &line[span.clone()];
    let folders_only = command == "cd";

    let names_a_path = command.starts_with('.') || command.contains('/');
    let mut suggestions = if is_command && !names_a_path {
        let mut found: Vec<String> = path_var
            .split(':')
            .filter(|dir| !dir.is_empty())
            .flat_map(|dir| {
                let dir: Vec<String> = dir
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                complete_path(fs, current_arg, &dir, Filter::Executables)
            })
            .collect();
        found.extend(
            SHELL_BUILTINS
                .iter()
                .filter(|name| starts_with_ignore_case(name, current_arg))
                .map(|name| name.to_string()),
        );
        found
    } else {
        let filter = if folders_only {
            Filter::Folders
        } else {
            Filter::Any
        };
        complete_path(fs, current_arg, cwd, filter)
    };

    suggestions.sort();
    suggestions.dedup();

    #[cfg(feature = "logging")]
    tracing::trace!(word = %current_arg, candidates = suggestions.len(), "completion");

    Completion {
        suggestions,
        current_arg: current_arg.to_string(),
        is_command,
        span,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Any,
    Folders,
    Executables,
}

impl Filter {
    fn accepts(self, node: &Node) -> bool {
        match (self, node) {
            (Filter::Any, _) => true,
            (Filter::Folders, node) => node.is_folder(),
            (Filter::Executables, Node::File(file)) => file.is_executable(),
            (Filter::Executables, Node::Folder(_)) => false,
        }
    }
}

/// Entries of the folder named by the directory part of `partial`, spelled
/// the way they would be typed after it.
fn complete_path(fs: &FileSystem, partial: &str, cwd: &[String], filter: Filter) -> Vec<String> {
    let partial = partial.strip_prefix(['"', '\'', '`']).unwrap_or(partial);
    let absolute = partial.starts_with('/');

    let mut folder: Vec<String> = if absolute { Vec::new() } else { cwd.to_vec() };
    let mut parts: Vec<&str> = partial.split('/').filter(|p| !p.is_empty()).collect();
    if partial.ends_with('/') {
        parts.push("");
    }
    let prefix = parts.pop().unwrap_or("");
    for part in parts {
        match part {
            ".." => {
                folder.pop();
            }
            "." => {}
            name => folder.push(name.to_string()),
        }
    }

    let typed_dir = partial.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    let lead = if absolute && typed_dir.is_empty() { "/" } else { "" };
    let sep = if typed_dir.is_empty() { "" } else { "/" };

    let entries = fs
        .find_folder(&folder)
        .map(|f| f.files.as_slice())
        .unwrap_or_default();

    let mut names: Vec<String> = entries
        .iter()
        .filter(|node| filter.accepts(node) && starts_with_ignore_case(node.name(), prefix))
        .map(|node| {
            let quote = if node.name().contains(' ') { "\"" } else { "" };
            let slash = if node.is_folder() { "/" } else { "" };
            format!(
                "{quote}{lead}{typed_dir}{sep}{}{slash}{quote}",
                node.name()
            )
        })
        .collect();

    if filter != Filter::Executables && matches!(prefix, "." | "..") {
        names.push(format!("{}/", partial));
    }

    names
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Byte range of the whitespace-delimited word around `cursor`.
fn word_span(line: &str, cursor: usize) -> Range<usize> {
    let start = line[..cursor]
        .rfind(char::is_whitespace)
        .map(|i| i + line[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let end = line[cursor..]
        .find(char::is_whitespace)
        .map(|i| cursor + i)
        .unwrap_or(line.len());
    start..end
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
