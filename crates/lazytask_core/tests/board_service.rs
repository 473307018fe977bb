use lazytask_core::{BoardService, RepoError, StoreClient};

#[test]
fn plan_next_steps_lists_pending_and_done_tasks() {
    let store = StoreClient::new("sqlite::memory:").unwrap();
    let service = BoardService::for_store(&store);

    service.create_project("Garden").unwrap();
    service.add_task("garden", "Buy seeds").unwrap();
    service.add_task("garden", "Dig beds").unwrap();
    service.complete_task("garden", "buy-seeds").unwrap();

    let prompt = service.plan_next_steps("garden").unwrap();
    assert_eq!(
        prompt,
        "Help plan next steps for the following project: Garden\n\n\
         Pending tasks:\n- Dig beds (dig-beds)\n\n\
         Done tasks:\n- Buy seeds\n\n\
         Suggest next 3 steps."
    );
}

#[test]
fn plan_next_steps_for_missing_project_is_not_found() {
    let store = StoreClient::new("sqlite::memory:").unwrap();
    let service = BoardService::for_store(&store);

    let err = service.plan_next_steps("ghost").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn task_resource_lines_render_completion_state_in_order() {
    let store = StoreClient::new("sqlite::memory:").unwrap();
    let service = BoardService::for_store(&store);

    service.create_project("Trip").unwrap();
    service.add_task("trip", "Book flights").unwrap();
    service.add_task("trip", "Pack").unwrap();
    service.complete_task("trip", "pack").unwrap();

    assert_eq!(
        service.task_resource_lines("trip").unwrap(),
        vec!["Task: Book flights - Not Done", "Task: Pack - Done"]
    );
    assert!(service.task_resource_lines("unknown").unwrap().is_empty());
}

#[test]
fn service_passes_repository_results_through() {
    let store = StoreClient::new("sqlite::memory:").unwrap();
    let service = BoardService::for_store(&store);

    let project = service.create_project("Reading List").unwrap();
    assert_eq!(service.get_project("reading-list").unwrap(), project);
    assert_eq!(service.list_projects().unwrap(), vec![project]);

    let task = service.add_task("reading-list", "Dune").unwrap();
    assert_eq!(service.list_tasks("reading-list").unwrap(), vec![task]);
}
