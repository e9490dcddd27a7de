use std::ops::{Deref, DerefMut};

use anyhow::Result;

use crate::error::FlowError;

/// Command engine that owns the workload and runs named operations on it.
pub trait Interpreter {
    /// Executes one command line against the workload.
    fn execute(&mut self, command: &str) -> Result<()>;

    /// True when the whole workload, not a subset, is the target of commands.
    fn is_fully_selected(&self) -> bool;

    /// Applies the interpreter's own selection syntax to leftover pass arguments.
    fn extend_selection(&mut self, tokens: &[String]) -> Result<(), FlowError>;

    fn push_log(&mut self, header: &str);

    fn pop_log(&mut self);
}

/// Holds the interpreter's log context open; popped exactly once on drop.
pub struct LogScope<'a, I: Interpreter + ?Sized> {
    interpreter: &'a mut I,
}

impl<'a, I: Interpreter + ?Sized> LogScope<'a, I> {
    pub fn enter(interpreter: &'a mut I, header: &str) -> Self {
        interpreter.push_log(header);
        Self { interpreter }
    }
}

impl<I: Interpreter + ?Sized> Deref for LogScope<'_, I> {
    type Target = I;

    fn deref(&self) -> &I {
        self.interpreter
    }
}

impl<I: Interpreter + ?Sized> DerefMut for LogScope<'_, I> {
    fn deref_mut(&mut self) -> &mut I {
        self.interpreter
    }
}

impl<I: Interpreter + ?Sized> Drop for LogScope<'_, I> {
    fn drop(&mut self) {
        self.interpreter.pop_log();
    }
}
