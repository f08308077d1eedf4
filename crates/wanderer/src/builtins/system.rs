//! System information builtins - uname

use serde::{Deserialize, Serialize};

use super::{Builtin, Context};
use crate::error::Result;

/// Values reported by `uname`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub machine: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            sysname: "ZutiOS".to_string(),
            nodename: "zutiOS".to_string(),
            release: "98".to_string(),
            machine: "x86_64".to_string(),
        }
    }
}

/// The uname builtin - print system information.
///
/// Usage: uname [-snrma]
///
/// Options:
///   -s   system name (default)
///   -n   host name
///   -r   kernel release
///   -m   machine architecture
///   -a   all of the above
///
/// Fields are always printed in the order above, whatever the flag order.
pub struct Uname;

impl Builtin for Uname {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let args = ctx.parse_args("snrma")?;
        let all = args.has('a');
        let info = ctx.system;

        let fields = [
            ('s', &info.sysname),
            ('n', &info.nodename),
            ('r', &info.release),
            ('m', &info.machine),
        ];

        let mut parts: Vec<&str> = fields
            .iter()
            .filter(|(flag, _)| all || args.has(*flag))
            .map(|(_, value)| value.as_str())
            .collect();

        if parts.is_empty() {
            parts.push(&info.sysname);
        }

        Ok(parts.join(" "))
    }
}
