//! The `history` default command.

use std::sync::{Arc, Mutex};

use conch_dispatch::prelude::*;

/// Shared session history. Lines are recorded by the input loop; commands
/// built with `conceal_input` are dropped again after they run.
pub type History = Arc<Mutex<Vec<String>>>;

/// Build the `history` command over the shared session history.
pub fn command(history: History) -> Result<Command, CommandError> {
    Command::builder("history", "Show the lines entered this session.")
        .action(move |_, _, sink| {
            let Ok(lines) = history.lock() else {
                sink.write_line("history unavailable");
                return false;
            };
            for (i, line) in lines.iter().enumerate() {
                sink.write_line(&format!("{:>4}  {line}", i + 1));
            }
            true
        })
        .build()
}
