use crate::error::{Result, VxError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Vector methods that can be built without loading a model.
pub const SUPPORTED_METHODS: &[&str] = &["external"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VxConfig {
    #[serde(default)]
    pub vectors: VectorsConfig,
    #[serde(default)]
    pub workflow: HashMap<String, WorkflowConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorsConfig {
    #[serde(default = "default_method")]
    pub method: String,
    /// Records per flushed batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// L2-normalize every vector before it is staged.
    #[serde(default)]
    pub normalize: bool,
    /// Directory for staging files. `None` uses the system temp dir.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Elements handed to each task per run.
    #[serde(default = "default_workflow_batch")]
    pub batch: usize,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Task kind label. `None` means the base action task.
    #[serde(default)]
    pub task: Option<String>,
    /// Name of a registered action.
    #[serde(default)]
    pub action: Option<String>,
    /// Regex a string element must match to be processed.
    #[serde(default)]
    pub select: Option<String>,
    /// Nested workflow, used by the `workflow` kind.
    #[serde(default)]
    pub workflow: Option<WorkflowConfig>,
    #[serde(default)]
    pub args: serde_json::Value,
}

fn default_method() -> String {
    "external".into()
}

fn default_batch_size() -> usize {
    500
}

fn default_workflow_batch() -> usize {
    100
}

impl Default for VectorsConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            batch_size: default_batch_size(),
            normalize: false,
            staging_dir: None,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            batch: default_workflow_batch(),
            tasks: Vec::new(),
        }
    }
}

impl VxConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.vectors.validate()?;
        for (name, wf) in &self.workflow {
            wf.validate().map_err(|e| match e {
                VxError::InvalidConfig(msg) => {
                    VxError::InvalidConfig(format!("workflow '{name}': {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl VectorsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(VxError::InvalidConfig("vectors.batch_size must be > 0".into()));
        }
        if !SUPPORTED_METHODS.contains(&self.method.as_str()) {
            return Err(VxError::InvalidConfig(format!(
                "unsupported vectors method: {}",
                self.method
            )));
        }
        Ok(())
    }
}

impl WorkflowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch == 0 {
            return Err(VxError::InvalidConfig("batch must be > 0".into()));
        }
        for task in &self.tasks {
            if let Some(nested) = &task.workflow {
                nested.validate()?;
            }
        }
        Ok(())
    }
}
