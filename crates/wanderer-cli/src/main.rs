//! Wanderer CLI - run the ZutiOS terminal from a real terminal
//!
//! Usage:
//!   wanderer -c 'ls /bin'             # Run one line and exit
//!   wanderer --state state.json       # Persist environment and power state
//!   wanderer < commands.txt           # Run lines from stdin
//!   wanderer                          # Interactive terminal

#[cfg(feature = "interactive")]
mod interactive;

#[cfg(feature = "interactive")]
use std::io::IsTerminal;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use wanderer::{HistoryLine, JsonFileStorage, Kernel, ProcessTable, Shell};

/// Wanderer - the ZutiOS terminal
#[derive(Parser, Debug)]
#[command(name = "wanderer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Execute the given command line and exit
    #[arg(short = 'c')]
    command: Option<String>,

    /// JSON file holding the environment and computer status across runs
    #[arg(long)]
    state: Option<PathBuf>,

    /// Read lines from stdin even when it is a terminal
    #[arg(long)]
    no_interactive: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    let (mut kernel, mut shell) = start(args.state.as_deref())?;

    if let Some(line) = args.command {
        let result = shell.execute_line(&mut kernel, &line);
        kernel.shutdown().context("Failed to save state")?;
        match result {
            Ok(output) => print_output(&output),
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    #[cfg(feature = "interactive")]
    if !args.no_interactive && std::io::stdin().is_terminal() {
        return interactive::run(kernel, shell);
    }

    let stdin = std::io::stdin();
    run_lines(
        &mut kernel,
        &mut shell,
        stdin.lock(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )?;
    kernel.shutdown().context("Failed to save state")?;
    Ok(())
}

/// Boot a kernel with a terminal process and open a shell bound to it.
fn start(state: Option<&std::path::Path>) -> Result<(Kernel, Shell)> {
    let mut processes = ProcessTable::new();
    processes.spawn("Kernel", true);
    processes.spawn("Desktop", true);
    let terminal = processes.spawn("Terminal", false);

    let mut builder = Kernel::builder().processes(Box::new(processes));
    if let Some(path) = state {
        let storage = JsonFileStorage::open(path)
            .with_context(|| format!("Failed to open state file: {}", path.display()))?;
        builder = builder.storage(Box::new(storage));
    }

    let mut kernel = builder.build().context("Failed to start kernel")?;
    kernel.boot().context("Failed to boot")?;

    tracing::info!(status = ?kernel.status(), "kernel ready");

    let shell = Shell::new(&kernel).with_process(terminal);
    Ok((kernel, shell))
}

/// Submit each input line until the input ends or the shell exits.
fn run_lines<R: BufRead, O: Write, E: Write>(
    kernel: &mut Kernel,
    shell: &mut Shell,
    input: R,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let before = shell.lines().len();
        shell.submit(kernel, &line);
        render(&shell.lines()[before.min(shell.lines().len())..], out, err)?;
        if !shell.is_alive() {
            break;
        }
    }
    Ok(())
}

/// Write rendered lines; typed input is not echoed.
fn render<O: Write, E: Write>(lines: &[HistoryLine], out: &mut O, err: &mut E) -> Result<()> {
    for line in lines {
        match line {
            HistoryLine::Input { .. } => {}
            HistoryLine::Output(text) | HistoryLine::Suggestions(text) => {
                writeln!(out, "{}", text.trim_end_matches('\n'))?;
            }
            HistoryLine::Error(text) => writeln!(err, "{}", text)?,
        }
    }
    Ok(())
}

fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn run(input: &str, state: Option<&std::path::Path>) -> (String, String) {
        let (mut kernel, mut shell) = start(state).unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        run_lines(&mut kernel, &mut shell, input.as_bytes(), &mut out, &mut err).unwrap();
        kernel.shutdown().unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_lines_render_output_and_errors() {
        let (out, err) = run("mkdir docs\ncd docs\npwd\ncat nope\n", None);
        assert_eq!(out, "/home/user/docs\n");
        assert_eq!(err, "cat: /home/user/docs/nope: No such file or directory\n");
    }

    #[test]
    fn test_exit_stops_reading() {
        let (out, _) = run("echo one\nexit\necho two\n", None);
        assert_eq!(out, "one\n");
    }

    #[test]
    fn test_ps_lists_terminal_only() {
        let (out, _) = run("ps\n", None);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(" Terminal"));
    }

    #[test]
    fn test_state_file_keeps_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        run("export EDITOR=nano\n", Some(&path));
        let (out, _) = run("echo $EDITOR\n", Some(&path));
        assert_eq!(out, "nano\n");
    }
}
