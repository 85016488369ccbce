use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::task::{merge, partition, ActionTask, Task};

const FILE_PREFIX: &str = "file://";

/// Processes elements that name an existing local file. The `file://`
/// prefix is stripped before the action sees the path.
pub struct FileTask {
    base: ActionTask,
}

impl FileTask {
    pub fn new(base: ActionTask) -> Self {
        Self {
            base: base.with_kind("file"),
        }
    }

    fn local_path(element: &Value) -> Option<&str> {
        let s = element.as_str()?;
        let path = s.strip_prefix(FILE_PREFIX).unwrap_or(s);
        Path::new(path).is_file().then_some(path)
    }
}

#[async_trait]
impl Task for FileTask {
    fn kind(&self) -> &str {
        self.base.kind()
    }

    fn accept(&self, element: &Value) -> bool {
        Self::local_path(element).is_some() && self.base.selects(element)
    }

    async fn run(&self, elements: Vec<Value>) -> Result<Vec<Value>> {
        let (slots, selected) = partition(elements, |e| self.accept(e));
        debug!(selected = selected.len(), total = slots.len(), "running file task");
        let paths = selected
            .into_iter()
            .map(|e| {
                let path = Self::local_path(&e).map(str::to_string);
                path.map(Value::String).unwrap_or(e)
            })
            .collect();
        let outputs = self.base.apply(paths)?;
        merge(self.kind(), slots, outputs)
    }
}
