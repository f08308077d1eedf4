//! Working directory builtins - pwd, sh

use super::{Builtin, Context};
use crate::error::Result;
use crate::fs::path_to_string;

/// The pwd builtin - print working directory.
pub struct Pwd;

impl Builtin for Pwd {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        ctx.parse_args("")?;
        Ok(path_to_string(ctx.cwd))
    }
}

/// The sh builtin. Scripts are not supported, so it does nothing.
pub struct Sh;

impl Builtin for Sh {
    fn execute(&self, _ctx: Context<'_>) -> Result<String> {
        Ok(String::new())
    }
}
