//! Process builtins - ps, kill

use rand::Rng;

use super::{Builtin, Context};
use crate::error::{Error, Result};
use crate::process::ProcessManager;

const STATES: [&str; 3] = ["R", "S", "I"];

/// Options for [`ps`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PsOptions {
    /// Include system-owned processes.
    pub everyone: bool,
    /// Add memory, CPU and state columns.
    pub long: bool,
}

/// Render the process list, one process per line under a header.
///
/// The long columns are random display filler.
pub fn ps(processes: &dyn ProcessManager, options: PsOptions) -> String {
    let mut rng = rand::rng();
    let mut lines = vec![if options.long {
        "ID NAME MEM CPU STATE".to_string()
    } else {
        "ID NAME".to_string()
    }];

    for process in processes
        .list()
        .into_iter()
        .filter(|p| options.everyone || !p.is_system_owned)
    {
        if options.long {
            let mem: f64 = rng.random_range(0.5..512.0);
            let cpu: f64 = rng.random_range(0.0..25.0);
            let state = STATES[rng.random_range(0..STATES.len())];
            lines.push(format!(
                "{} {} {:.1}MB {:.1}% {}",
                process.id, process.name, mem, cpu, state
            ));
        } else {
            lines.push(format!("{} {}", process.id, process.name));
        }
    }

    lines.join("\n")
}

/// The ps builtin - list processes.
///
/// Usage: ps [-el]
///
/// Options:
///   -e   Include system processes
///   -l   Long format
pub struct Ps;

impl Builtin for Ps {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let args = ctx.parse_args("el")?;
        let options = PsOptions {
            everyone: args.has('e'),
            long: args.has('l'),
        };
        Ok(ps(&*ctx.processes, options))
    }
}

/// The kill builtin - terminate processes by id.
///
/// Usage: kill [-SIGNAL] ID...
///
/// Signal arguments are accepted and ignored; every kill terminates.
pub struct Kill;

impl Builtin for Kill {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let ids: Vec<&String> = ctx.args.iter().filter(|a| !a.starts_with('-')).collect();
        if ids.is_empty() {
            return Err(Error::missing_operand(ctx.name));
        }

        for id in ids {
            if !ctx.processes.terminate(id) {
                return Err(Error::NoSuchProcess {
                    cmd: ctx.name.to_string(),
                    pid: id.clone(),
                });
            }
        }
        Ok(String::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builtins::testing::{run, test_fs};
    use crate::process::ProcessTable;
    use pretty_assertions::assert_eq;

    fn table() -> (ProcessTable, String, String) {
        let mut procs = ProcessTable::new();
        let kernel = procs.spawn("Kernel", true);
        let terminal = procs.spawn("Terminal", false);
        (procs, kernel, terminal)
    }

    #[test]
    fn test_ps_hides_system_processes() {
        let (procs, _, terminal) = table();
        let out = ps(&procs, PsOptions::default());
        assert_eq!(out, format!("ID NAME\n{} Terminal", terminal));
    }

    #[test]
    fn test_ps_everyone() {
        let (procs, kernel, _) = table();
        let options = PsOptions {
            everyone: true,
            long: false,
        };
        let out = ps(&procs, options);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains(&format!("{} Kernel", kernel)));
    }

    #[test]
    fn test_ps_long_columns() {
        let (procs, _, _) = table();
        let options = PsOptions {
            everyone: false,
            long: true,
        };
        let out = ps(&procs, options);
        let row: Vec<&str> = out.lines().nth(1).unwrap().split(' ').collect();
        assert_eq!(row.len(), 5);
        assert!(row[2].ends_with("MB"));
        assert!(row[3].ends_with('%'));
        assert!(STATES.contains(&row[4]));
    }

    #[test]
    fn test_kill_terminates() {
        let mut fs = test_fs();
        let (mut procs, _, terminal) = table();

        run(&Kill, "kill", &mut fs, &mut procs, &["-9", &terminal]).unwrap();
        assert!(!procs.contains(&terminal));
    }

    #[test]
    fn test_kill_errors() {
        let mut fs = test_fs();
        let (mut procs, _, _) = table();

        let err = run(&Kill, "kill", &mut fs, &mut procs, &[]).unwrap_err();
        assert!(matches!(err, Error::MissingOperand { .. }));

        let err = run(&Kill, "kill", &mut fs, &mut procs, &["nope"]).unwrap_err();
        assert_eq!(err.to_string(), "kill: (nope) - No such process");
    }
}
