//! Command line tokenizer
//!
//! Splits a typed line into words. Quoted spans (`"..."`, `'...'`,
//! `` `...` ``) form a single word with the quotes removed. There are no
//! escapes, pipes or redirections.

use std::iter::Peekable;
use std::str::CharIndices;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\$([a-zA-Z_][a-zA-Z0-9_]*)").unwrap()
});

fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '`')
}

/// Word splitter over a single command line.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Next word, or `None` at the end of the line.
    pub fn next_token(&mut self) -> Option<String> {
        self.skip_whitespace();
        let (start, ch) = self.chars.next()?;

        if is_quote(ch) {
            let body_start = start + ch.len_utf8();
            if let Some(len) = self.input[body_start..].find(ch) {
                let body_end = body_start + len;
                while self.chars.next_if(|&(i, _)| i <= body_end).is_some() {}
                return Some(self.input[body_start..body_end].to_string());
            }
        }

        let mut end = self.input.len();
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_whitespace() {
                end = i;
                break;
            }
            self.chars.next();
        }

        Some(strip_outer_quotes(&self.input[start..end]).to_string())
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }
}

impl Iterator for Lexer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_token()
    }
}

/// Drop one leading and one trailing quote from an unbalanced word.
fn strip_outer_quotes(word: &str) -> &str {
    let word = word.strip_prefix(is_quote).unwrap_or(word);
    word.strip_suffix(is_quote).unwrap_or(word)
}

/// Split a line into words, honouring quotes.
pub fn tokenize(line: &str) -> Vec<String> {
    Lexer::new(line).collect()
}

/// Replace `$NAME` references with the variable's value, or nothing when
/// the variable is unset.
pub fn expand_env<'a, F>(word: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    ENV_REFERENCE
        .replace_all(word, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}
