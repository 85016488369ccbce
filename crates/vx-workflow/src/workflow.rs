//! Workflow runner and the nested-workflow task.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};
use vx_core::WorkflowConfig;

use crate::error::{Result, WorkflowError};
use crate::factory::TaskFactory;
use crate::task::{merge, partition, Task};

/// Elements per task run when not configured.
pub const DEFAULT_BATCH: usize = 100;

/// An ordered list of tasks. Elements go through every task in chunks of
/// `batch`, and come out in input order.
pub struct Workflow {
    name: String,
    batch: usize,
    tasks: Vec<Box<dyn Task>>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, tasks: Vec<Box<dyn Task>>) -> Self {
        Self {
            name: name.into(),
            batch: DEFAULT_BATCH,
            tasks,
        }
    }

    pub fn with_batch(mut self, batch: usize) -> Result<Self> {
        if batch == 0 {
            return Err(WorkflowError::InvalidConfig("workflow batch must be > 0".into()));
        }
        self.batch = batch;
        Ok(self)
    }

    pub fn from_config(
        name: impl Into<String>,
        config: &WorkflowConfig,
        factory: &TaskFactory,
    ) -> Result<Self> {
        config.validate()?;
        let tasks = config
            .tasks
            .iter()
            .map(|t| factory.create(t))
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, tasks).with_batch(config.batch)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub async fn run(&self, elements: Vec<Value>) -> Result<Vec<Value>> {
        let total = elements.len();
        let mut results = Vec::with_capacity(total);
        let mut pending = elements.into_iter();
        loop {
            let mut chunk: Vec<Value> = pending.by_ref().take(self.batch).collect();
            if chunk.is_empty() {
                break;
            }
            for task in &self.tasks {
                chunk = task.run(chunk).await?;
                debug!(workflow = %self.name, task = task.kind(), size = chunk.len(), "task finished");
            }
            results.extend(chunk);
        }
        info!(workflow = %self.name, elements = total, tasks = self.tasks.len(), "workflow finished");
        Ok(results)
    }
}

/// Runs a nested workflow over the elements it accepts.
pub struct WorkflowTask {
    workflow: Workflow,
    select: Option<Regex>,
}

impl WorkflowTask {
    pub fn new(workflow: Workflow) -> Self {
        Self {
            workflow,
            select: None,
        }
    }

    pub fn with_select(mut self, pattern: &str) -> Result<Self> {
        self.select = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }
}

#[async_trait]
impl Task for WorkflowTask {
    fn kind(&self) -> &str {
        "workflow"
    }

    fn accept(&self, element: &Value) -> bool {
        match &self.select {
            None => true,
            Some(re) => element.as_str().map(|s| re.is_match(s)).unwrap_or(false),
        }
    }

    async fn run(&self, elements: Vec<Value>) -> Result<Vec<Value>> {
        let (slots, selected) = partition(elements, |e| self.accept(e));
        let outputs = self.workflow.run(selected).await?;
        merge(self.kind(), slots, outputs)
    }
}
