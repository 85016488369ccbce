//! Task kind registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use vx_core::TaskConfig;

use crate::error::{Result, WorkflowError};
use crate::file::FileTask;
use crate::task::{Action, ActionTask, Task};
use crate::workflow::{Workflow, WorkflowTask};

/// Builds a task of one kind from its configuration.
pub type TaskConstructor =
    Arc<dyn Fn(&TaskFactory, &TaskConfig) -> Result<Box<dyn Task>> + Send + Sync>;

/// Kind assumed when a task config names none.
pub const DEFAULT_KIND: &str = "task";

/// Maps kind labels to task constructors, and action names to actions.
#[derive(Default, Clone)]
pub struct TaskFactory {
    constructors: HashMap<String, TaskConstructor>,
    actions: HashMap<String, Action>,
}

impl TaskFactory {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `task`, `file` and `workflow` kinds.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register("task", |f, config| {
            Ok(Box::new(f.action_task(config)?) as Box<dyn Task>)
        });
        factory.register("file", |f, config| {
            Ok(Box::new(FileTask::new(f.action_task(config)?)) as Box<dyn Task>)
        });
        factory.register("workflow", |f, config| {
            let nested = config.workflow.as_ref().ok_or_else(|| {
                WorkflowError::InvalidConfig("workflow task needs a 'workflow' section".into())
            })?;
            let mut task = WorkflowTask::new(Workflow::from_config("nested", nested, f)?);
            if let Some(pattern) = &config.select {
                task = task.with_select(pattern)?;
            }
            Ok(Box::new(task) as Box<dyn Task>)
        });
        factory
    }

    /// Register (or replace) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&TaskFactory, &TaskConfig) -> Result<Box<dyn Task>> + Send + Sync + 'static,
    {
        self.constructors.insert(kind.into(), Arc::new(constructor));
        self
    }

    /// Register a named action that task configs can refer to.
    pub fn register_action<F>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<Vec<Value>> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    pub fn action(&self, name: &str) -> Result<Action> {
        self.actions
            .get(name)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownAction(name.to_string()))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Create the task described by `config`.
    pub fn create(&self, config: &TaskConfig) -> Result<Box<dyn Task>> {
        let kind = config.task.as_deref().unwrap_or(DEFAULT_KIND);
        let constructor = self
            .constructors
            .get(kind)
            .ok_or_else(|| WorkflowError::UnknownTask(kind.to_string()))?;
        constructor(self, config)
    }

    /// Base action task from the `action` and `select` fields of `config`.
    pub fn action_task(&self, config: &TaskConfig) -> Result<ActionTask> {
        let mut task = match &config.action {
            Some(name) => ActionTask::new(self.action(name)?),
            None => ActionTask::passthrough(),
        };
        if let Some(pattern) = &config.select {
            task = task.with_select(pattern)?;
        }
        Ok(task)
    }
}
