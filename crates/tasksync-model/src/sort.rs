//! Display ordering
//!
//! `sortIdx` values may repeat or skip; creation time and then id break ties
//! so every ordering is total and deterministic.

use crate::ids::ProjectId;
use crate::project::Project;
use crate::task::Task;

/// Order projects by `(sortIdx, createdAt, id)`
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| {
        a.sort_idx
            .cmp(&b.sort_idx)
            .then(a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Order tasks by `(projectId, sortIdx, createdAt, id)`
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.project_id
            .cmp(&b.project_id)
            .then(a.sort_idx.cmp(&b.sort_idx))
            .then(a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Tasks of one project in display order
#[must_use]
pub fn tasks_in_project<'a>(tasks: &'a [Task], project_id: &ProjectId) -> Vec<&'a Task> {
    let mut selected: Vec<&Task> = tasks
        .iter()
        .filter(|task| &task.project_id == project_id)
        .collect();
    selected.sort_by(|a, b| {
        a.sort_idx
            .cmp(&b.sort_idx)
            .then(a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    selected
}
