//! Interactive terminal on top of rustyline
//!
//! Tab completion is served by the shell's completion engine; line editing
//! and arrow-key recall are rustyline's.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use wanderer::shell::autocomplete;
use wanderer::{Kernel, Shell};

use crate::render;

struct ShellHelper {
    kernel: Rc<RefCell<Kernel>>,
    shell: Rc<RefCell<Shell>>,
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let kernel = self.kernel.borrow();
        let shell = self.shell.borrow();
        let path_var = kernel.env("PATH").unwrap_or_default();
        let completion = autocomplete(kernel.fs(), path_var, line, shell.cwd(), pos);
        Ok((completion.span.start, completion.suggestions))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Every submitted line renders at least its input line, so a terminal
/// that did not grow was cleared, even if it was empty before.
fn was_cleared(before: usize, after: usize) -> bool {
    after <= before
}

pub fn run(kernel: Kernel, shell: Shell) -> Result<()> {
    let kernel = Rc::new(RefCell::new(kernel));
    let shell = Rc::new(RefCell::new(shell));

    let mut rl: Editor<ShellHelper, DefaultHistory> =
        Editor::new().context("Failed to initialize line editor")?;
    rl.set_helper(Some(ShellHelper {
        kernel: Rc::clone(&kernel),
        shell: Rc::clone(&shell),
    }));

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    loop {
        let prompt = format!("{} ", shell.borrow().prompt());
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    rl.add_history_entry(line.as_str())
                        .context("Failed to record history")?;
                }

                let mut session = shell.borrow_mut();
                let before = session.lines().len();
                session.submit(&mut kernel.borrow_mut(), &line);

                if was_cleared(before, session.lines().len()) {
                    print!("\x1b[2J\x1b[H");
                } else {
                    render(&session.lines()[before..], &mut stdout, &mut stderr)?;
                }
                if !session.is_alive() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("Failed to read line"),
        }
    }

    kernel
        .borrow_mut()
        .shutdown()
        .context("Failed to save state")?;
    Ok(())
}
