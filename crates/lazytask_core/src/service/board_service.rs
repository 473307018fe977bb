//! Project/task board use-case service.
//!
//! # Responsibility
//! - Delegate CRUD operations to the project and task repositories.
//! - Render text views built from several reads (planning prompt, task
//!   resource lines).
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Errors from repositories are returned unchanged.

use crate::model::project::Project;
use crate::model::task::Task;
use crate::repo::project_repo::{ProjectRepository, StoreProjectRepository};
use crate::repo::task_repo::{StoreTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use crate::store::StoreClient;

/// Use-case service wrapping project and task repositories.
pub struct BoardService<P: ProjectRepository, T: TaskRepository> {
    projects: P,
    tasks: T,
}

impl<'store> BoardService<StoreProjectRepository<'store>, StoreTaskRepository<'store>> {
    /// Builds a service whose repositories share `store`.
    pub fn for_store(store: &'store StoreClient) -> Self {
        Self::new(
            StoreProjectRepository::new(store),
            StoreTaskRepository::new(store),
        )
    }
}

impl<P: ProjectRepository, T: TaskRepository> BoardService<P, T> {
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    pub fn create_project(&self, name: &str) -> RepoResult<Project> {
        self.projects.create_project(name)
    }

    pub fn get_project(&self, id: &str) -> RepoResult<Project> {
        self.projects.get_project(id)
    }

    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.projects.list_projects()
    }

    pub fn add_task(&self, project_id: &str, title: &str) -> RepoResult<Task> {
        self.tasks.add_task(project_id, title)
    }

    pub fn list_tasks(&self, project_id: &str) -> RepoResult<Vec<Task>> {
        self.tasks.list_tasks(project_id)
    }

    pub fn complete_task(&self, project_id: &str, task_id: &str) -> RepoResult<Task> {
        self.tasks.complete_task(project_id, task_id)
    }

    /// Builds the planning prompt for a project's next steps.
    ///
    /// # Contract
    /// - Fails with `NotFound` when the project does not exist.
    /// - Pending tasks list `title (id)` so the reader can complete them;
    ///   done tasks list titles only.
    pub fn plan_next_steps(&self, project_id: &str) -> RepoResult<String> {
        let project = self.projects.get_project(project_id)?;
        let tasks = self.tasks.list_tasks(project_id)?;
        Ok(render_next_steps(&project, &tasks))
    }

    /// Renders one `Task: <title> - Done|Not Done` line per task.
    pub fn task_resource_lines(&self, project_id: &str) -> RepoResult<Vec<String>> {
        let tasks = self.tasks.list_tasks(project_id)?;
        Ok(tasks
            .iter()
            .map(|task| {
                let state = if task.done { "Done" } else { "Not Done" };
                format!("Task: {} - {state}", task.title)
            })
            .collect())
    }
}

fn render_next_steps(project: &Project, tasks: &[Task]) -> String {
    let (done, pending): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|task| task.done);
    let pending_lines = pending
        .iter()
        .map(|task| format!("- {} ({})", task.title, task.id))
        .collect::<Vec<_>>()
        .join("\n");
    let done_lines = done
        .iter()
        .map(|task| format!("- {}", task.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Help plan next steps for the following project: {}\n\nPending tasks:\n{pending_lines}\n\nDone tasks:\n{done_lines}\n\nSuggest next 3 steps.",
        project.name
    )
}
