//! Task trait and the base action task.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, WorkflowError};

/// Transformation applied by a task to its selected elements.
/// Must return exactly one output per input.
pub type Action = Arc<dyn Fn(Vec<Value>) -> anyhow::Result<Vec<Value>> + Send + Sync>;

/// A pipeline stage with a single execution capability.
#[async_trait]
pub trait Task: Send + Sync {
    /// Kind label this task was registered under.
    fn kind(&self) -> &str;

    /// Whether this task processes `element`. Rejected elements pass
    /// through unchanged.
    fn accept(&self, _element: &Value) -> bool {
        true
    }

    /// Run over `elements`, returning outputs in input order.
    async fn run(&self, elements: Vec<Value>) -> Result<Vec<Value>>;
}

/// Base task: applies an optional action to accepted elements.
/// Without an action, elements are returned as-is.
pub struct ActionTask {
    kind: String,
    action: Option<Action>,
    select: Option<Regex>,
}

impl ActionTask {
    pub fn new(action: Action) -> Self {
        Self {
            kind: "task".into(),
            action: Some(action),
            select: None,
        }
    }

    pub fn passthrough() -> Self {
        Self {
            kind: "task".into(),
            action: None,
            select: None,
        }
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<Vec<Value>> + Send + Sync + 'static,
    {
        Self::new(Arc::new(f))
    }

    /// Only process string elements matching `pattern`.
    pub fn with_select(mut self, pattern: &str) -> Result<Self> {
        self.select = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Select filter check, shared by tasks built on top of this one.
    pub(crate) fn selects(&self, element: &Value) -> bool {
        match &self.select {
            None => true,
            Some(re) => element.as_str().map(|s| re.is_match(s)).unwrap_or(false),
        }
    }

    pub(crate) fn apply(&self, elements: Vec<Value>) -> Result<Vec<Value>> {
        match &self.action {
            _ if elements.is_empty() => Ok(elements),
            None => Ok(elements),
            Some(action) => action(elements).map_err(|e| WorkflowError::Action {
                kind: self.kind.clone(),
                message: format!("{e:#}"),
            }),
        }
    }
}

#[async_trait]
impl Task for ActionTask {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn accept(&self, element: &Value) -> bool {
        self.selects(element)
    }

    async fn run(&self, elements: Vec<Value>) -> Result<Vec<Value>> {
        let (slots, selected) = partition(elements, |e| self.accept(e));
        debug!(kind = %self.kind, selected = selected.len(), total = slots.len(), "running task");
        let outputs = self.apply(selected)?;
        merge(&self.kind, slots, outputs)
    }
}

/// Split elements into pass-through slots and the ones a task processes.
/// A `None` slot marks where the next processed output goes.
pub(crate) fn partition(
    elements: Vec<Value>,
    accept: impl Fn(&Value) -> bool,
) -> (Vec<Option<Value>>, Vec<Value>) {
    let mut slots = Vec::with_capacity(elements.len());
    let mut selected = Vec::new();
    for element in elements {
        if accept(&element) {
            selected.push(element);
            slots.push(None);
        } else {
            slots.push(Some(element));
        }
    }
    (slots, selected)
}

/// Put processed outputs back into their original positions.
pub(crate) fn merge(
    kind: &str,
    slots: Vec<Option<Value>>,
    outputs: Vec<Value>,
) -> Result<Vec<Value>> {
    let expected = slots.iter().filter(|s| s.is_none()).count();
    if outputs.len() != expected {
        return Err(WorkflowError::ActionOutputMismatch {
            kind: kind.to_string(),
            expected,
            got: outputs.len(),
        });
    }
    let mut outputs = outputs.into_iter();
    Ok(slots
        .into_iter()
        .map(|slot| slot.or_else(|| outputs.next()).unwrap_or(Value::Null))
        .collect())
}
