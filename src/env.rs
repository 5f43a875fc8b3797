use std::env as stdenv;
use std::path::{Path, PathBuf};

/// The interpreter's view of its own process state.
///
/// Variables are not cached: lookups go straight to the process environment,
/// so children see exactly what the interpreter sees.
///
/// The working directory is not cached either: `cd` changes the process
/// directory, which children inherit when they are spawned.
///
/// - `should_exit`: set by `exit`; the read loop stops once it is true.
#[derive(Debug, Clone)]
pub struct Environment {
    pub should_exit: bool,
}

impl Environment {
    pub fn new() -> Self {
        Self { should_exit: false }
    }

    /// Get the value of a process environment variable.
    pub fn get_var(&self, key: &str) -> Option<String> {
        stdenv::var(key).ok()
    }

    /// Target of a bare `cd`.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.get_var("HOME").map(PathBuf::from)
    }

    /// Change the process working directory. On failure nothing changes.
    pub fn change_dir(&self, target: &Path) -> std::io::Result<()> {
        stdenv::set_current_dir(target)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
