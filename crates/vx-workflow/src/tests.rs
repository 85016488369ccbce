use crate::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use vx_core::{TaskConfig, VxConfig, WorkflowConfig};

fn upper(elements: Vec<Value>) -> anyhow::Result<Vec<Value>> {
    Ok(elements
        .into_iter()
        .map(|e| match e {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        })
        .collect())
}

fn factory() -> TaskFactory {
    let mut f = TaskFactory::with_builtins();
    f.register_action("upper", upper);
    f.register_action("suffix", |elements: Vec<Value>| {
        Ok(elements
            .into_iter()
            .map(|e| json!(format!("{}!", e.as_str().unwrap_or_default())))
            .collect())
    });
    f
}

fn task_config(kind: Option<&str>, action: Option<&str>) -> TaskConfig {
    TaskConfig {
        task: kind.map(String::from),
        action: action.map(String::from),
        ..Default::default()
    }
}

// ========== ActionTask ==========

#[tokio::test]
async fn test_action_task_applies_action() {
    let task = ActionTask::from_fn(upper);
    let out = task.run(vec![json!("a"), json!("b")]).await.unwrap();
    assert_eq!(out, vec![json!("A"), json!("B")]);
    assert_eq!(task.kind(), "task");
}

#[tokio::test]
async fn test_action_task_select_passes_others_through() {
    let task = ActionTask::from_fn(upper).with_select("^x").unwrap();
    let input = vec![json!("xa"), json!("b"), json!(3), json!("xc")];
    let out = task.run(input).await.unwrap();
    assert_eq!(out, vec![json!("XA"), json!("b"), json!(3), json!("XC")]);
}

#[tokio::test]
async fn test_passthrough_task() {
    let task = ActionTask::passthrough();
    let input = vec![json!({"k": 1}), json!(null)];
    assert_eq!(task.run(input.clone()).await.unwrap(), input);
}

#[tokio::test]
async fn test_action_output_mismatch() {
    let task = ActionTask::from_fn(|_| Ok(vec![]));
    let err = task.run(vec![json!(1), json!(2)]).await.unwrap_err();
    match err {
        WorkflowError::ActionOutputMismatch { expected, got, .. } => {
            assert_eq!(expected, 2);
            assert_eq!(got, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_action_error_carries_kind() {
    let task = ActionTask::from_fn(|_| Err(anyhow::anyhow!("boom"))).with_kind("custom");
    let err = task.run(vec![json!(1)]).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Action { ref kind, .. } if kind == "custom"));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn test_invalid_select_pattern() {
    assert!(matches!(
        ActionTask::passthrough().with_select("("),
        Err(WorkflowError::InvalidSelect(_))
    ));
}

// ========== FileTask ==========

#[tokio::test]
async fn test_file_task_only_existing_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "hello").unwrap();
    let path_str = path.to_str().unwrap().to_string();

    let task = FileTask::new(ActionTask::from_fn(|elements| {
        Ok(elements.into_iter().map(|p| json!({ "file": p })).collect())
    }));
    assert_eq!(task.kind(), "file");

    let input = vec![
        json!(path_str.clone()),
        json!("not/a/real/file.txt"),
        json!(format!("file://{path_str}")),
        json!(42),
    ];
    let out = task.run(input).await.unwrap();
    assert_eq!(out[0], json!({ "file": path_str.clone() }));
    assert_eq!(out[1], json!("not/a/real/file.txt"));
    assert_eq!(out[2], json!({ "file": path_str }));
    assert_eq!(out[3], json!(42));
}

#[tokio::test]
async fn test_file_task_rejects_directories() {
    let dir = tempfile::TempDir::new().unwrap();
    let task = FileTask::new(ActionTask::from_fn(|_| Err(anyhow::anyhow!("should not run"))));
    let input = vec![json!(dir.path().to_str().unwrap())];
    assert_eq!(task.run(input.clone()).await.unwrap(), input);
}

// ========== Workflow ==========

#[tokio::test]
async fn test_workflow_runs_tasks_in_order() {
    let wf = Workflow::new(
        "chain",
        vec![
            Box::new(ActionTask::from_fn(upper)) as Box<dyn Task>,
            Box::new(ActionTask::from_fn(|e: Vec<Value>| {
                Ok(e.into_iter().map(|v| json!(format!("{}-1", v.as_str().unwrap()))).collect())
            })),
        ],
    );
    let out = wf.run(vec![json!("a"), json!("b")]).await.unwrap();
    assert_eq!(out, vec![json!("A-1"), json!("B-1")]);
    assert_eq!(wf.len(), 2);
    assert_eq!(wf.name(), "chain");
}

#[tokio::test]
async fn test_workflow_batches_elements() {
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let seen = sizes.clone();
    let task = ActionTask::from_fn(move |e: Vec<Value>| {
        seen.lock().unwrap().push(e.len());
        Ok(e)
    });
    let wf = Workflow::new("batched", vec![Box::new(task) as Box<dyn Task>])
        .with_batch(2)
        .unwrap();
    let input: Vec<Value> = (0..5).map(|i| json!(i)).collect();
    let out = wf.run(input.clone()).await.unwrap();
    assert_eq!(out, input);
    assert_eq!(*sizes.lock().unwrap(), vec![2, 2, 1]);
}

#[tokio::test]
async fn test_workflow_empty_input() {
    let wf = Workflow::new("empty", vec![Box::new(ActionTask::from_fn(upper)) as Box<dyn Task>]);
    assert!(wf.run(vec![]).await.unwrap().is_empty());
}

#[test]
fn test_workflow_zero_batch() {
    assert!(Workflow::new("w", vec![]).with_batch(0).is_err());
}

#[tokio::test]
async fn test_nested_workflow_task() {
    let inner = Workflow::new("inner", vec![Box::new(ActionTask::from_fn(upper)) as Box<dyn Task>]);
    let task = WorkflowTask::new(inner).with_select("^n").unwrap();
    assert_eq!(task.kind(), "workflow");
    let out = task.run(vec![json!("nest"), json!("skip")]).await.unwrap();
    assert_eq!(out, vec![json!("NEST"), json!("skip")]);
}

// ========== TaskFactory ==========

#[test]
fn test_factory_builtin_kinds() {
    let f = TaskFactory::with_builtins();
    assert_eq!(f.kinds(), vec!["file", "task", "workflow"]);
    assert!(TaskFactory::new().kinds().is_empty());
}

#[tokio::test]
async fn test_factory_default_kind_is_task() {
    let task = factory().create(&task_config(None, Some("upper"))).unwrap();
    assert_eq!(task.kind(), "task");
    assert_eq!(task.run(vec![json!("q")]).await.unwrap(), vec![json!("Q")]);
}

#[test]
fn test_factory_unknown_kind() {
    let err = factory().create(&task_config(Some("image"), None)).err().unwrap();
    assert!(matches!(err, WorkflowError::UnknownTask(ref k) if k == "image"));
}

#[test]
fn test_factory_unknown_action() {
    let err = factory().create(&task_config(None, Some("missing"))).err().unwrap();
    assert!(matches!(err, WorkflowError::UnknownAction(_)));
}

#[test]
fn test_factory_workflow_needs_section() {
    let err = factory().create(&task_config(Some("workflow"), None)).err().unwrap();
    assert!(matches!(err, WorkflowError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_factory_register_custom_kind() {
    struct Count;

    #[async_trait::async_trait]
    impl Task for Count {
        fn kind(&self) -> &str {
            "count"
        }

        async fn run(&self, elements: Vec<Value>) -> Result<Vec<Value>> {
            Ok(elements
                .into_iter()
                .map(|e| json!(e.as_str().map(str::len).unwrap_or(0)))
                .collect())
        }
    }

    let mut f = factory();
    f.register("count", |_, _| Ok(Box::new(Count) as Box<dyn Task>));
    assert!(f.contains("count"));
    let task = f.create(&task_config(Some("count"), None)).unwrap();
    assert_eq!(task.run(vec![json!("abc")]).await.unwrap(), vec![json!(3)]);
}

#[tokio::test]
async fn test_workflow_from_config() {
    let text = r#"{
        "workflow": {
            "shout": {
                "batch": 2,
                "tasks": [
                    {"action": "upper"},
                    {"task": "workflow", "select": "^A", "workflow": {"tasks": [{"action": "suffix"}]}}
                ]
            }
        }
    }"#;
    let config = VxConfig::from_json_str(text).unwrap();
    let wf = Workflow::from_config("shout", &config.workflow["shout"], &factory()).unwrap();
    assert_eq!(wf.batch(), 2);
    let out = wf.run(vec![json!("abc"), json!("xyz"), json!("ant")]).await.unwrap();
    assert_eq!(out, vec![json!("ABC!"), json!("XYZ"), json!("ANT!")]);
}

#[test]
fn test_workflow_from_config_zero_batch() {
    let config = WorkflowConfig { batch: 0, tasks: vec![] };
    assert!(matches!(
        Workflow::from_config("bad", &config, &factory()),
        Err(WorkflowError::Config(_))
    ));
}
