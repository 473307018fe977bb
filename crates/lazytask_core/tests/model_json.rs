use lazytask_core::{Project, Task};
use serde_json::{json, Value};

#[test]
fn project_serializes_with_camel_case_and_millisecond_timestamp() {
    let project = Project::new("My Project").unwrap();
    let value = serde_json::to_value(&project).unwrap();

    assert_eq!(value["id"], "my-project");
    assert_eq!(value["name"], "My Project");
    let created_at = value["createdAt"].as_str().unwrap();
    assert!(created_at.ends_with('Z'));
    assert_eq!(created_at.len(), "2025-01-01T00:00:00.000Z".len());
}

#[test]
fn open_task_serializes_null_completed_at() {
    let task = Task::new("my-project", "Write report").unwrap();
    let value = serde_json::to_value(&task).unwrap();

    let keys = value
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    for key in ["id", "projectId", "title", "done", "createdAt", "completedAt"] {
        assert!(keys.iter().any(|k| k == key), "missing {key}");
    }
    assert_eq!(value["done"], false);
    assert_eq!(value["completedAt"], Value::Null);
}

#[test]
fn task_deserializes_from_wire_shape() {
    let task: Task = serde_json::from_value(json!({
        "id": "write-report",
        "projectId": "my-project",
        "title": "Write report",
        "done": true,
        "createdAt": "2025-01-01T10:00:00.000Z",
        "completedAt": "2025-01-01T11:30:00.000Z"
    }))
    .unwrap();

    assert!(task.done);
    assert!(task.validate().is_ok());
    assert!(task.completed_at.unwrap() > task.created_at);
}

#[test]
fn completing_task_clamps_to_created_at() {
    let mut task = Task::new("p", "Early").unwrap();
    let earlier = task.created_at - chrono::Duration::seconds(30);
    task.complete(earlier);

    assert!(task.done);
    assert_eq!(task.completed_at, Some(task.created_at));
    assert!(task.validate().is_ok());
}
