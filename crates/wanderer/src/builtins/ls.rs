//! ls builtin - list folder contents

use super::{Builtin, Context};
use crate::error::{Error, Result};
use crate::fs::{path_to_string, FileSystem, NodeRef};

/// Options for [`ls`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LsOptions {
    /// Include entries whose names start with `.`.
    pub all: bool,
    /// One `type owner size name` line per entry.
    pub long: bool,
}

/// List the node at `path`.
///
/// Entries keep their insertion order. An empty folder lists as a single
/// space so the output line is never blank.
pub fn ls(fs: &FileSystem, path: &[String], options: LsOptions) -> Result<String> {
    let node = fs
        .find_node(path)
        .ok_or_else(|| Error::no_such_file("ls", path_to_string(path)))?;

    let folder = match node {
        NodeRef::Folder(folder) => folder,
        NodeRef::File(_) => return Ok(format_entry(node, options.long)),
    };

    let entries: Vec<String> = folder
        .files
        .iter()
        .map(|child| child.as_node_ref())
        .filter(|child| options.all || !child.name().starts_with('.'))
        .map(|child| format_entry(child, options.long))
        .collect();

    if entries.is_empty() {
        return Ok(" ".to_string());
    }

    let separator = if options.long { "\n" } else { " " };
    Ok(entries.join(separator))
}

fn format_entry(node: NodeRef<'_>, long: bool) -> String {
    if long {
        format!(
            "{} {} {} {}",
            node.type_name(),
            node.owner(),
            node.size(),
            node.name()
        )
    } else {
        node.name().to_string()
    }
}

/// The ls builtin.
///
/// Usage: ls [-al] [PATH...]
///
/// Options:
///   -a   Show entries starting with `.`
///   -l   Long listing: type, owner, size, name
pub struct Ls;

impl Builtin for Ls {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let args = ctx.parse_args("al")?;
        let options = LsOptions {
            all: args.has('a'),
            long: args.has('l'),
        };

        if args.positional.is_empty() {
            return ls(ctx.fs, ctx.cwd, options);
        }

        if args.positional.len() == 1 {
            let path = ctx.resolve(&args.positional[0])?;
            return ls(ctx.fs, &path, options);
        }

        let mut sections = Vec::new();
        for arg in &args.positional {
            let path = ctx.resolve(arg)?;
            sections.push(format!("{}:\n{}", arg, ls(ctx.fs, &path, options)?));
        }
        Ok(sections.join("\n\n"))
    }
}
