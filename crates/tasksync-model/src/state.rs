//! Whole-state document

use crate::error::ValidationError;
use crate::ids::TaskId;
use crate::project::Project;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The complete authoritative state: `{projectList, todoList}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StoreState {
    /// All projects
    pub project_list: Vec<Project>,
    /// All tasks
    pub todo_list: Vec<Task>,
}

impl StoreState {
    /// Create a state document
    #[inline]
    #[must_use]
    pub fn new(project_list: Vec<Project>, todo_list: Vec<Task>) -> Self {
        Self {
            project_list,
            todo_list,
        }
    }

    /// Check collection invariants
    ///
    /// # Errors
    /// The first duplicated project or task id.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut projects = HashSet::with_capacity(self.project_list.len());
        for project in &self.project_list {
            if !projects.insert(&project.id) {
                return Err(ValidationError::DuplicateProjectId(project.id.clone()));
            }
        }

        let mut tasks = HashSet::with_capacity(self.todo_list.len());
        for task in &self.todo_list {
            if !tasks.insert(&task.id) {
                return Err(ValidationError::DuplicateTaskId(task.id.clone()));
            }
        }

        Ok(())
    }

    /// Find a task by id
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.todo_list.iter().find(|task| &task.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProjectId;
    use crate::timestamp::Timestamp;

    fn task(id: &str) -> Task {
        Task {
            id: TaskId::from(id),
            title: id.to_string(),
            project_id: ProjectId::from(""),
            sort_idx: 0,
            is_done: false,
            created_at: Timestamp::from_millis(0),
            modified_at: Timestamp::from_millis(0),
        }
    }

    #[test]
    fn duplicate_task_ids_are_invalid() {
        let state = StoreState::new(vec![], vec![task("a"), task("b"), task("a")]);
        assert_eq!(
            state.validate(),
            Err(ValidationError::DuplicateTaskId(TaskId::from("a")))
        );
    }

    #[test]
    fn dangling_project_reference_is_valid() {
        let mut orphan = task("a");
        orphan.project_id = ProjectId::from("missing");
        let state = StoreState::new(vec![], vec![orphan]);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn decodes_wire_document() {
        let raw = r#"{"projectList":[],"todoList":[{"id":"t1","title":"a","projectId":"","sortIdx":0,"isDone":false,"createdAt":100,"modifiedAt":100}]}"#;
        let state: StoreState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.todo_list.len(), 1);
        assert!(state.task(&TaskId::from("t1")).is_some());
    }

    #[test]
    fn missing_collection_is_malformed() {
        assert!(serde_json::from_str::<StoreState>(r#"{"projectList":[]}"#).is_err());
    }
}
