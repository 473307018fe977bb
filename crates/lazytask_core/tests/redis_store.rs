//! Runs against a live Redis when `LAZYTASK_TEST_REDIS_URL` is set, e.g.
//! `LAZYTASK_TEST_REDIS_URL=redis://127.0.0.1:6379/15`. The database is
//! flushed before every test, so point it at a scratch database.

use lazytask_core::{
    ProjectRepository, RecordKind, RepoError, StoreClient, StoreProjectRepository,
    StoreTaskRepository, TaskRepository,
};
use std::sync::{Mutex, MutexGuard};

const REDIS_URL_ENV: &str = "LAZYTASK_TEST_REDIS_URL";

static REDIS_LOCK: Mutex<()> = Mutex::new(());

struct RedisFixture {
    store: StoreClient,
    _guard: MutexGuard<'static, ()>,
}

fn redis_store() -> Option<RedisFixture> {
    let url = std::env::var(REDIS_URL_ENV).ok()?;
    let guard = REDIS_LOCK.lock().unwrap_or_else(|err| err.into_inner());

    let client = redis::Client::open(url.as_str()).unwrap();
    let mut conn = client.get_connection().unwrap();
    redis::cmd("FLUSHDB").query::<()>(&mut conn).unwrap();

    let store = StoreClient::new(&url).unwrap();
    store.connect().unwrap();
    Some(RedisFixture {
        store,
        _guard: guard,
    })
}

#[test]
fn redis_my_project_scenario_end_to_end() {
    let Some(fixture) = redis_store() else {
        return;
    };
    let store = &fixture.store;
    let projects = StoreProjectRepository::new(store);
    let tasks = StoreTaskRepository::new(store);

    let project = projects.create_project("My Project").unwrap();
    assert_eq!(project.id, "my-project");
    assert_eq!(projects.get_project("my-project").unwrap(), project);
    assert_eq!(projects.list_projects().unwrap(), vec![project]);

    let task = tasks.add_task("my-project", "Write report").unwrap();
    assert_eq!(task.id, "write-report");

    let completed = tasks.complete_task("my-project", "write-report").unwrap();
    assert!(completed.done);
    assert_eq!(completed.created_at, task.created_at);

    let listed = tasks.list_tasks("my-project").unwrap();
    assert_eq!(listed, vec![completed]);

    let fields = store.hgetall("task:write-report").unwrap();
    assert_eq!(fields["done"], "true");
    assert_eq!(fields["projectId"], "my-project");
}

#[test]
fn redis_same_title_in_two_projects_collides() {
    let Some(fixture) = redis_store() else {
        return;
    };
    let store = &fixture.store;
    let projects = StoreProjectRepository::new(store);
    projects.create_project("Alpha").unwrap();
    projects.create_project("Beta").unwrap();
    let tasks = StoreTaskRepository::new(store);

    tasks.add_task("alpha", "Setup").unwrap();
    tasks.add_task("beta", "Setup").unwrap();

    assert_eq!(store.hgetall("task:setup").unwrap()["projectId"], "beta");
    let err = tasks.complete_task("alpha", "setup").unwrap_err();
    assert!(matches!(err, RepoError::Conflict { .. }));
}

#[test]
fn redis_list_tasks_keeps_insertion_order() {
    let Some(fixture) = redis_store() else {
        return;
    };
    let store = &fixture.store;
    StoreProjectRepository::new(store)
        .create_project("Ordered")
        .unwrap();
    let tasks = StoreTaskRepository::new(store);
    for title in ["A", "B", "C", "D"] {
        tasks.add_task("ordered", title).unwrap();
    }
    tasks.complete_task("ordered", "c").unwrap();

    let titles = tasks
        .list_tasks("ordered")
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["A", "B", "C", "D"]);
}

#[test]
fn redis_pipelined_hash_reads_follow_key_order() {
    let Some(fixture) = redis_store() else {
        return;
    };
    let store = &fixture.store;
    store.hset("h:one", &[("id", "1")]).unwrap();
    store.hset("h:two", &[("id", "2"), ("name", "two")]).unwrap();

    let keys = vec![
        "h:two".to_string(),
        "h:missing".to_string(),
        "h:one".to_string(),
    ];
    let rows = store.hgetall_many(&keys).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "two");
    assert!(rows[1].is_empty());
    assert_eq!(rows[2]["id"], "1");
}

#[test]
fn redis_add_task_ignores_index_set_and_task_lists() {
    let Some(fixture) = redis_store() else {
        return;
    };
    let store = &fixture.store;
    StoreProjectRepository::new(store)
        .create_project("Alpha")
        .unwrap();
    let tasks = StoreTaskRepository::new(store);
    tasks.add_task("alpha", "One").unwrap();
    store.sadd("set:members", "id").unwrap();

    for project_id in ["index", "alpha:tasks"] {
        let err = tasks.add_task(project_id, "Two").unwrap_err();
        assert!(matches!(
            err,
            RepoError::NotFound { kind: RecordKind::Project, .. }
        ));
    }
    assert!(!store.hexists("set:members", "id").unwrap());
    assert!(!store.exists("task:two").unwrap());
}
