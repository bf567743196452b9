//! Command registry.
//!
//! The registry is an explicit value owned by the host application; there
//! is no process-wide singleton. Hosts populate it during a single
//! initialization phase before any parsing begins — the parse pipeline is
//! synchronous and the registry is not synchronized for concurrent
//! registration.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::Command;

/// Registry of known commands, built-in and user-registered.
///
/// Registration is first-wins: a later command with a colliding name is
/// silently ignored, so built-ins registered at startup can never be
/// shadowed. Lookup is case-insensitive. Commands are never mutated or
/// removed.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command.
    ///
    /// Returns `true` if the command was added, `false` if a command of
    /// that name already existed and the registration was ignored.
    pub fn register(&mut self, command: Command) -> bool {
        let key = command.name().to_lowercase();
        if self.commands.contains_key(&key) {
            warn!(command = %command.name(), "ignoring registration: name already taken");
            return false;
        }
        debug!(command = %command.name(), "registered command");
        self.commands.insert(key, Arc::new(command));
        true
    }

    /// Look up a command by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    /// Whether a command of this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    /// All registered commands, sorted by name.
    pub fn list(&self) -> Vec<Arc<Command>> {
        let mut commands: Vec<Arc<Command>> = self.commands.values().cloned().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// All command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.values().map(|c| c.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
