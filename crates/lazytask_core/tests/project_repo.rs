use lazytask_core::model::timestamp::now;
use lazytask_core::{
    slugify, ModelValidationError, ProjectRepository, RecordKind, RepoError, StoreClient,
    StoreProjectRepository,
};

fn memory_store() -> StoreClient {
    StoreClient::new("sqlite::memory:").unwrap()
}

#[test]
fn create_project_derives_slug_id_and_stamps_created_at() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    let before = now();
    let project = repo.create_project("My Project").unwrap();

    assert_eq!(project.id, "my-project");
    assert_eq!(project.id, slugify("My Project"));
    assert_eq!(project.name, "My Project");
    assert!(project.created_at >= before);
}

#[test]
fn create_project_persists_hash_and_index_layout() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    let project = repo.create_project("Home Renovation").unwrap();

    let fields = store.hgetall("project:home-renovation").unwrap();
    assert_eq!(fields["id"], "home-renovation");
    assert_eq!(fields["name"], "Home Renovation");
    assert!(fields["createdAt"].ends_with('Z'));
    assert_eq!(
        store.smembers("project:index").unwrap(),
        vec![project.id.clone()]
    );
}

#[test]
fn create_project_rejects_empty_and_symbol_only_names() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    let err = repo.create_project("").unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidInput(ModelValidationError::EmptyField("name"))
    ));
    let err = repo.create_project("   ").unwrap_err();
    assert!(matches!(err, RepoError::InvalidInput(_)));
    let err = repo.create_project("!!!").unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidInput(ModelValidationError::EmptySlug { .. })
    ));

    assert!(store.smembers("project:index").unwrap().is_empty());
}

#[test]
fn get_project_returns_stored_record() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    let created = repo.create_project("Launch Plan").unwrap();
    let loaded = repo.get_project("launch-plan").unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn get_project_missing_returns_not_found() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    let err = repo.get_project("nonexistent").unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { kind: RecordKind::Project, ref id } if id == "nonexistent"
    ));
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn get_project_without_id_field_is_not_found() {
    let store = memory_store();
    store
        .hset("project:ghost", &[("name", "Ghost")])
        .unwrap();
    let repo = StoreProjectRepository::new(&store);

    let err = repo.get_project("ghost").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn recreating_project_overwrites_without_duplicating_index() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    repo.create_project("Side Quest").unwrap();
    let second = repo.create_project("side   quest!").unwrap();

    let loaded = repo.get_project("side-quest").unwrap();
    assert_eq!(loaded.name, "side   quest!");
    assert_eq!(loaded.created_at, second.created_at);
    assert_eq!(repo.list_projects().unwrap().len(), 1);
}

#[test]
fn list_projects_returns_every_indexed_project() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    repo.create_project("Alpha").unwrap();
    repo.create_project("Beta").unwrap();
    repo.create_project("Gamma").unwrap();

    let mut ids = repo
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.id)
        .collect::<Vec<_>>();
    ids.sort();
    assert_eq!(ids, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn list_projects_drops_index_entries_without_hash() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);

    repo.create_project("Kept").unwrap();
    store.sadd("project:index", "orphan").unwrap();

    let projects = repo.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "kept");
}

#[test]
fn list_projects_on_empty_store_is_empty() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);
    assert!(repo.list_projects().unwrap().is_empty());
}

#[test]
fn corrupt_project_hash_surfaces_invalid_data() {
    let store = memory_store();
    store
        .hset(
            "project:broken",
            &[("id", "broken"), ("name", "Broken"), ("createdAt", "later")],
        )
        .unwrap();
    let repo = StoreProjectRepository::new(&store);

    let err = repo.get_project("broken").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(err.code(), "INVALID_DATA");
}

#[test]
fn create_project_rejects_reserved_index_slug() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);
    repo.create_project("Alpha").unwrap();

    let err = repo.create_project("Index").unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidInput(ModelValidationError::ReservedId { .. })
    ));
    assert_eq!(store.smembers("project:index").unwrap(), vec!["alpha"]);
    assert!(store.hgetall("project:index").unwrap().is_empty());
}

#[test]
fn get_project_with_non_slug_id_is_not_found() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);
    repo.create_project("Alpha").unwrap();

    for id in ["index", "alpha:tasks", "Alpha", ""] {
        let err = repo.get_project(id).unwrap_err();
        assert!(matches!(err, RepoError::NotFound { .. }), "{id}: {err}");
    }
}

#[test]
fn list_projects_skips_partial_hash_and_keeps_valid_projects() {
    let store = memory_store();
    let repo = StoreProjectRepository::new(&store);
    repo.create_project("Kept").unwrap();
    store
        .hset("project:partial", &[("id", "partial"), ("name", "Partial")])
        .unwrap();
    store.sadd("project:index", "partial").unwrap();

    let projects = repo.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "kept");

    let err = repo.get_project("partial").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
