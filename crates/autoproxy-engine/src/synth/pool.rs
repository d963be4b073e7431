//! Shell Pool
//!
//! In-progress type shells keyed by target name. The pool belongs to one
//! synthesis context; there is no process-wide default pool.

use rustc_hash::FxHashMap;
use tracing::trace;

use super::shell::TypeShell;

/// Lifecycle state of a pooled shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    /// Open for mutation
    Building,
    /// Sealed by a successful pass; reopened on the next checkout
    Frozen,
}

#[derive(Debug, Clone)]
struct PoolEntry {
    shell: TypeShell,
    state: ShellState,
}

/// Type shells under construction
#[derive(Debug, Default)]
pub struct ShellPool {
    entries: FxHashMap<String, PoolEntry>,
}

impl ShellPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&TypeShell> {
        self.entries.get(name).map(|e| &e.shell)
    }

    pub fn state(&self, name: &str) -> Option<ShellState> {
        self.entries.get(name).map(|e| e.state)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the shell for `name` for in-place edits, creating it if absent
    /// and reopening it if frozen
    pub fn get_or_create(&mut self, name: &str) -> &mut TypeShell {
        let entry = self.entries.entry(name.to_string()).or_insert_with(|| PoolEntry {
            shell: TypeShell::new(name),
            state: ShellState::Building,
        });
        if entry.state == ShellState::Frozen {
            trace!(shell = name, "thawing shell");
            entry.state = ShellState::Building;
        }
        &mut entry.shell
    }

    /// Copy of the shell for `name`, or a new empty shell.
    ///
    /// The pool itself is left untouched; a pass edits the copy and hands
    /// it back through [`ShellPool::commit`].
    pub fn checkout(&self, name: &str) -> TypeShell {
        match self.entries.get(name) {
            Some(entry) => {
                if entry.state == ShellState::Frozen {
                    trace!(shell = name, "reopening frozen shell");
                }
                entry.shell.clone()
            }
            None => TypeShell::new(name),
        }
    }

    /// Store a finished shell as frozen, replacing any previous entry
    pub fn commit(&mut self, shell: TypeShell) {
        let name = shell.name().to_string();
        self.entries.insert(
            name,
            PoolEntry {
                shell,
                state: ShellState::Frozen,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
