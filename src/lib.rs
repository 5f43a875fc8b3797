//! A small interactive command interpreter.
//!
//! Each input line is split into arguments plus at most one input and one
//! output redirection, then either handled in-process (`cd`, `exit`) or run
//! as an external program in a child process. The interpreter waits for that
//! child before reading the next line, so there is never more than one child
//! outstanding.
//!
//! The main entry point is [`Interpreter`]. The [`parser`] module is usable on
//! its own, and [`batch`] holds the fire-all-then-wait demonstration used by
//! the `process_simulator` binary.

pub mod batch;
mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod external;
mod interpreter;
pub mod parser;

#[cfg(test)]
mod test_support;

/// Re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
