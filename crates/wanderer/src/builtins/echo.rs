//! echo builtin command

use super::{Builtin, Context};
use crate::error::Result;

/// The echo builtin command.
///
/// Usage: echo [-n] [ARG...]
///
/// Arguments are joined by single spaces and `\n` / `\t` escapes are always
/// expanded. Any word other than a leading `-n` is printed as-is.
pub struct Echo;

impl Builtin for Echo {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let mut add_newline = true;
        let mut words = Vec::new();

        for arg in ctx.args {
            if arg == "-n" && words.is_empty() {
                add_newline = false;
            } else {
                words.push(interpret_escape_sequences(arg));
            }
        }

        let mut output = words.join(" ");
        if add_newline {
            output.push('\n');
        }
        Ok(output)
    }
}

/// Expand `\n`, `\t` and `\\`. Other backslashes are kept.
pub fn interpret_escape_sequences(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            _ => {
                result.push('\\');
                continue;
            }
        }
        chars.next();
    }

    result
}
