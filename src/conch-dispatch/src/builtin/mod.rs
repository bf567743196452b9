//! Built-in commands.
//!
//! Built-ins are registered once at host startup, before any user
//! commands, so the first-registration-wins policy of the registry keeps
//! them from being shadowed. Registration is best-effort: a command that
//! fails to build is left unregistered and logged, never fatal.

pub mod help;

use tracing::warn;

use crate::registry::CommandRegistry;

/// Names of all built-in commands.
pub fn command_names() -> &'static [&'static str] {
    &[help::NAME]
}

/// Whether `name` is a built-in command name.
pub fn is_builtin(name: &str) -> bool {
    command_names()
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}

/// Register every built-in command into `registry`.
///
/// Returns the number of commands registered.
pub fn register_builtins(registry: &mut CommandRegistry) -> usize {
    let factories = [help::command];

    let mut registered = 0;
    for factory in factories {
        match factory() {
            Ok(command) => {
                if registry.register(command) {
                    registered += 1;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to build a builtin command; leaving it unregistered");
            }
        }
    }
    registered
}
