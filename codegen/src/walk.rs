//! Ordered traversal of the command tree.

use optionapi_core::{CommandSchema, LIKELY_MAX_NESTING_DEPTH, NamedCommands};

/// Visits every command depth-first, pre-order, siblings in lexicographic
/// name order. The callback receives the path from the root to the
/// command, the command's own name last.
///
/// The first callback error stops the walk and is returned.
///
/// # Examples
///
/// ```
/// use optionapi_codegen::walk_commands;
/// use optionapi_core::{CommandSchema, NamedCommands};
///
/// let mut commands = NamedCommands::default();
/// commands.insert("foo", CommandSchema::new());
/// commands.insert("bar", CommandSchema::new().with_command("baz", CommandSchema::new()));
///
/// let mut seen = Vec::new();
/// walk_commands(&commands, &mut |path, _| {
///     seen.push(path.join(" "));
///     Ok::<_, ()>(())
/// })
/// .unwrap();
/// assert_eq!(seen, vec!["bar", "bar baz", "foo"]);
/// ```
pub fn walk_commands<'a, E, F>(commands: &'a NamedCommands, callback: &mut F) -> Result<(), E>
where
    F: FnMut(&[&'a str], &'a CommandSchema) -> Result<(), E>,
{
    let mut path = Vec::with_capacity(LIKELY_MAX_NESTING_DEPTH);
    walk_recursive(commands, &mut path, callback)
}

fn walk_recursive<'a, E, F>(
    commands: &'a NamedCommands,
    path: &mut Vec<&'a str>,
    callback: &mut F,
) -> Result<(), E>
where
    F: FnMut(&[&'a str], &'a CommandSchema) -> Result<(), E>,
{
    for (name, command) in commands {
        path.push(name.as_str());
        callback(path, command)?;
        if command.is_branch() {
            walk_recursive(&command.commands, path, callback)?;
        }
        path.pop();
    }
    Ok(())
}
