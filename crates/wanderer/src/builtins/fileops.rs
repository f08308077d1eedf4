//! File operation builtins - mkdir, touch, rm, cp, mv

use super::{Builtin, Context};
use crate::error::{Error, Result};
use crate::fs::{is_within, path_to_string, split_parent, FileSystem, NodeKind, NodeRef};

/// Create a folder named `name` under `parent`.
///
/// Returns the name actually used, which differs from `name` when a
/// sibling already had it.
pub fn mkdir(fs: &mut FileSystem, parent: &[String], name: &str, owner: &str) -> Result<String> {
    create("mkdir", fs, parent, name, NodeKind::Folder { files: Vec::new() }, owner)
}

/// Create an empty file named `name` under `parent`.
///
/// Returns the name actually used.
pub fn touch(fs: &mut FileSystem, parent: &[String], name: &str, owner: &str) -> Result<String> {
    let kind = NodeKind::File {
        content: String::new(),
        command: None,
    };
    create("touch", fs, parent, name, kind, owner)
}

fn create(
    cmd: &str,
    fs: &mut FileSystem,
    parent: &[String],
    name: &str,
    kind: NodeKind,
    owner: &str,
) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::missing_operand(cmd));
    }
    if name.contains('/') {
        return Err(Error::Refused {
            cmd: cmd.to_string(),
            reason: format!("invalid name '{}'", name),
        });
    }
    require_folder(cmd, fs, parent)?;
    fs.create_node(parent, name, kind, owner)
        .map_err(|e| Error::fs(cmd, e))
}

fn require_folder(cmd: &str, fs: &FileSystem, path: &[String]) -> Result<()> {
    match fs.find_node(path) {
        Some(NodeRef::Folder(_)) => Ok(()),
        Some(NodeRef::File(_)) => Err(Error::NotADirectory {
            cmd: cmd.to_string(),
            path: path_to_string(path),
        }),
        None => Err(Error::no_such_file(cmd, path_to_string(path))),
    }
}

/// Options for [`rm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RmOptions {
    /// Allow removing folders with everything beneath them.
    pub recursive: bool,
    /// Skip targets that do not exist.
    pub force: bool,
}

/// Remove every target.
///
/// All targets are validated before anything is deleted, so a failing
/// target leaves the tree untouched.
pub fn rm(fs: &mut FileSystem, targets: &[Vec<String>], options: RmOptions) -> Result<()> {
    if targets.is_empty() {
        return Err(Error::missing_operand("rm"));
    }

    for target in targets {
        if target.is_empty() {
            return Err(Error::Refused {
                cmd: "rm".to_string(),
                reason: "refusing to remove '/'".to_string(),
            });
        }
        match fs.find_node(target) {
            None if options.force => {}
            None => return Err(Error::no_such_file("rm", path_to_string(target))),
            Some(node) if node.is_folder() && !options.recursive => {
                return Err(Error::DirectoryNeedsRecursive {
                    cmd: "rm".to_string(),
                    path: path_to_string(target),
                });
            }
            Some(_) => {}
        }
    }

    for target in targets {
        fs.delete_node(target);
    }
    Ok(())
}

/// Options for [`cp`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Allow copying folders.
    pub recursive: bool,
    /// Replace an existing destination.
    pub force: bool,
}

/// Copy `source` to `dest`.
///
/// When `dest` is an existing folder the copy is placed inside it under the
/// source's name. Returns the path of the copy.
pub fn cp(
    fs: &mut FileSystem,
    source: &[String],
    dest: &[String],
    options: CopyOptions,
) -> Result<Vec<String>> {
    let node = fs
        .find_node(source)
        .ok_or_else(|| Error::no_such_file("cp", path_to_string(source)))?;

    if node.is_folder() && !options.recursive {
        return Err(Error::DirectoryNeedsRecursive {
            cmd: "cp".to_string(),
            path: path_to_string(source),
        });
    }

    let target = match fs.find_node(dest) {
        Some(NodeRef::Folder(_)) if !source.is_empty() => {
            let mut target = dest.to_vec();
            target.push(node.name().to_string());
            target
        }
        _ => dest.to_vec(),
    };

    if target == source {
        return Err(Error::SameFile {
            cmd: "cp".to_string(),
            path: path_to_string(source),
        });
    }
    if node.is_folder() && is_within(source, &target) {
        return Err(Error::IntoItself {
            cmd: "cp".to_string(),
            from: path_to_string(source),
            to: path_to_string(&target),
        });
    }

    if is_within(&target, source) {
        return Err(Error::Refused {
            cmd: "cp".to_string(),
            reason: format!(
                "cannot overwrite '{}' with its own content '{}'",
                path_to_string(&target),
                path_to_string(source)
            ),
        });
    }

    let (parent, name) = split_parent(&target).ok_or_else(|| Error::Refused {
        cmd: "cp".to_string(),
        reason: "cannot overwrite '/'".to_string(),
    })?;
    require_folder("cp", fs, parent)?;

    let mut copy = node.to_owned_node();
    copy.set_name(name.to_string());

    if fs.exists(&target) {
        if !options.force {
            return Err(Error::AlreadyExists {
                cmd: "cp".to_string(),
                path: path_to_string(&target),
            });
        }
        fs.delete_node(&target);
    }

    fs.attach_node(parent, copy)
        .map_err(|e| Error::fs("cp", e))?;
    Ok(target)
}

/// Move `source` to `dest`: a recursive copy followed by removal of the
/// source. Any failure is reported as [`Error::MoveFailed`].
///
/// A failure in the removal phase leaves the copy in place.
pub fn mv(fs: &mut FileSystem, source: &[String], dest: &[String], force: bool) -> Result<Vec<String>> {
    let failed = |cause: Error| Error::MoveFailed {
        from: path_to_string(source),
        to: path_to_string(dest),
        cause: Box::new(cause),
    };

    if source.is_empty() {
        return Err(failed(Error::Refused {
            cmd: "mv".to_string(),
            reason: "cannot move '/'".to_string(),
        }));
    }

    let options = CopyOptions {
        recursive: true,
        force,
    };
    let target = cp(fs, source, dest, options).map_err(failed)?;

    let remove = RmOptions {
        recursive: true,
        force: false,
    };
    rm(fs, &[source.to_vec()], remove).map_err(failed)?;

    Ok(target)
}

/// The mkdir builtin - create folders.
///
/// Usage: mkdir DIRECTORY...
///
/// A taken name is replaced by the next free `name (n)`, which is reported.
pub struct Mkdir;

impl Builtin for Mkdir {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        create_each(ctx, mkdir)
    }
}

/// The touch builtin - create empty files.
///
/// Usage: touch FILE...
pub struct Touch;

impl Builtin for Touch {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        create_each(ctx, touch)
    }
}

type CreateFn = fn(&mut FileSystem, &[String], &str, &str) -> Result<String>;

fn create_each(ctx: Context<'_>, create: CreateFn) -> Result<String> {
    let args = ctx.parse_args("")?;
    if args.positional.is_empty() {
        return Err(Error::missing_operand(ctx.name));
    }

    let mut notices = Vec::new();
    for arg in &args.positional {
        let path = ctx.resolve(arg)?;
        let (parent, name) = split_parent(&path).ok_or_else(|| Error::Refused {
            cmd: ctx.name.to_string(),
            reason: "'/' already exists".to_string(),
        })?;
        let created = create(ctx.fs, parent, name, ctx.user)?;
        if created != name.trim() {
            notices.push(format!(
                "{}: '{}' already exists, created '{}'",
                ctx.name, name, created
            ));
        }
    }

    Ok(notices.join("\n"))
}

/// The rm builtin - remove files or folders.
///
/// Usage: rm [-rf] FILE...
///
/// Options:
///   -r, -R   Remove folders and their contents
///   -f       Ignore nonexistent files
pub struct Rm;

impl Builtin for Rm {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let args = ctx.parse_args("rRf")?;
        if args.positional.is_empty() {
            return Err(Error::missing_operand(ctx.name));
        }

        let targets = args
            .positional
            .iter()
            .map(|arg| ctx.resolve(arg))
            .collect::<Result<Vec<_>>>()?;

        let options = RmOptions {
            recursive: args.has('r') || args.has('R'),
            force: args.has('f'),
        };
        rm(ctx.fs, &targets, options)?;
        Ok(String::new())
    }
}

/// Resolve `SOURCE... DEST`; several sources require a folder destination.
fn sources_and_dest(ctx: &Context<'_>, positional: &[String]) -> Result<(Vec<Vec<String>>, Vec<String>)> {
    let (dest, sources) = match positional.split_last() {
        Some((dest, sources)) if !sources.is_empty() => (dest, sources),
        _ => return Err(Error::missing_operand(ctx.name)),
    };

    let dest = ctx.resolve(dest)?;
    if sources.len() > 1 && !matches!(ctx.fs.find_node(&dest), Some(NodeRef::Folder(_))) {
        return Err(Error::NotADirectory {
            cmd: ctx.name.to_string(),
            path: path_to_string(&dest),
        });
    }

    let sources = sources
        .iter()
        .map(|arg| ctx.resolve(arg))
        .collect::<Result<Vec<_>>>()?;
    Ok((sources, dest))
}

/// The cp builtin - copy files and folders.
///
/// Usage: cp [-rf] SOURCE... DEST
///
/// Options:
///   -r, -R   Copy folders recursively
///   -f       Overwrite an existing destination
pub struct Cp;

impl Builtin for Cp {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let args = ctx.parse_args("rRf")?;
        let (sources, dest) = sources_and_dest(&ctx, &args.positional)?;
        let options = CopyOptions {
            recursive: args.has('r') || args.has('R'),
            force: args.has('f'),
        };

        for source in &sources {
            cp(ctx.fs, source, &dest, options)?;
        }
        Ok(String::new())
    }
}

/// The mv builtin - move or rename files and folders.
///
/// Usage: mv [-f] SOURCE... DEST
pub struct Mv;

impl Builtin for Mv {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let args = ctx.parse_args("f")?;
        let (sources, dest) = sources_and_dest(&ctx, &args.positional)?;

        for source in &sources {
            mv(ctx.fs, source, &dest, args.has('f'))?;
        }
        Ok(String::new())
    }
}
