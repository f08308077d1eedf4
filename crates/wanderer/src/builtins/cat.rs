//! cat builtin - print file contents

use super::{Builtin, Context};
use crate::error::{Error, Result};
use crate::fs::{path_to_string, FileSystem, NodeRef};

/// Content of the file at `path`.
pub fn cat(fs: &FileSystem, path: &[String]) -> Result<String> {
    match fs.find_node(path) {
        Some(NodeRef::File(file)) => Ok(file.content.clone()),
        Some(NodeRef::Folder(_)) => Err(Error::IsADirectory {
            cmd: "cat".to_string(),
            path: path_to_string(path),
        }),
        None => Err(Error::no_such_file("cat", path_to_string(path))),
    }
}

/// The cat builtin - concatenate files.
///
/// Usage: cat FILE...
pub struct Cat;

impl Builtin for Cat {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let args = ctx.parse_args("")?;
        if args.positional.is_empty() {
            return Err(Error::missing_operand(ctx.name));
        }

        let mut output = String::new();
        for arg in &args.positional {
            let path = ctx.resolve(arg)?;
            output.push_str(&cat(ctx.fs, &path)?);
        }
        Ok(output)
    }
}
