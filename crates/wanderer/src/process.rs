//! Process manager seam
//!
//! Windows of the desktop are tracked as processes by the windowing layer.
//! The command core only needs to list them (`ps`) and terminate one
//! (`kill`), so it talks to the manager through the [`ProcessManager`] trait.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entry of the process list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Opaque id used by `kill`.
    pub id: String,
    pub name: String,
    /// System processes are hidden from `ps` unless `-e` is given.
    pub is_system_owned: bool,
}

/// Operations the command core needs from the process manager.
pub trait ProcessManager: Send + Sync {
    /// Active processes in start order.
    fn list(&self) -> Vec<Process>;

    /// Terminate a process. Returns `false` when no process has this id.
    fn terminate(&mut self, id: &str) -> bool;
}

/// Process list held in memory.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: Vec<Process>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process and return its id.
    pub fn spawn(&mut self, name: impl Into<String>, is_system_owned: bool) -> String {
        let id = Uuid::new_v4().to_string();
        self.processes.push(Process {
            id: id.clone(),
            name: name.into(),
            is_system_owned,
        });
        id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.processes.iter().any(|p| p.id == id)
    }
}

impl ProcessManager for ProcessTable {
    fn list(&self) -> Vec<Process> {
        self.processes.clone()
    }

    fn terminate(&mut self, id: &str) -> bool {
        let before = self.processes.len();
        self.processes.retain(|p| p.id != id);
        self.processes.len() != before
    }
}
