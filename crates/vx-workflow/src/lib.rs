//! Workflow tasks.
//!
//! A task is a pipeline stage with one capability: take a list of elements
//! and return a list of the same length. Tasks are created by kind label
//! through [`TaskFactory`], so new kinds plug in without touching callers.
//!
//! Built-in kinds:
//! - `task`: applies an action to every selected element
//! - `file`: like `task`, but only for elements naming an existing local file
//! - `workflow`: runs a nested [`Workflow`] over the selected elements

pub mod error;
pub mod factory;
pub mod file;
pub mod task;
pub mod workflow;

pub use error::{Result, WorkflowError};
pub use factory::{TaskConstructor, TaskFactory};
pub use file::FileTask;
pub use task::{Action, ActionTask, Task};
pub use workflow::{Workflow, WorkflowTask};

#[cfg(test)]
mod tests;
