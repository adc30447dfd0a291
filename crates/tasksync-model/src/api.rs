//! Request/response bodies of the HTTP surface
//!
//! `GET /db` and `POST /db` exchange a bare [`StoreState`]; `POST /sync`
//! takes a `Vec<Patch>` and answers with [`SyncResponse`].

use crate::project::Project;
use crate::rejection::PatchRejection;
use crate::state::StoreState;
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Payload echoed by the liveness probe when none is given
pub const DEFAULT_ECHO_PAYLOAD: &str = "payload";

/// Merged state returned by `POST /sync`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// Unchanged project list
    pub project_list: Vec<Project>,
    /// Task list after the merge
    pub todo_list: Vec<Task>,
    /// Skipped patches, omitted when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PatchRejection>,
}

impl SyncResponse {
    /// Build a response from a committed state and the rejections of its merge
    #[must_use]
    pub fn new(state: StoreState, warnings: Vec<PatchRejection>) -> Self {
        Self {
            project_list: state.project_list,
            todo_list: state.todo_list,
            warnings,
        }
    }

    /// Split back into the state document and the warnings
    #[must_use]
    pub fn into_parts(self) -> (StoreState, Vec<PatchRejection>) {
        (
            StoreState::new(self.project_list, self.todo_list),
            self.warnings,
        )
    }
}

/// Body of `GET /` and `GET /hello`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoResponse {
    /// Always `"ECHO"`
    pub msg: String,
    /// Echoed payload
    pub payload: String,
}

impl EchoResponse {
    /// Echo `payload` back
    #[must_use]
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            msg: "ECHO".to_string(),
            payload: payload.into(),
        }
    }
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error class, e.g. `ValidationError`
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TaskId;
    use serde_json::json;

    #[test]
    fn warnings_are_omitted_when_empty() {
        let response = SyncResponse::new(StoreState::default(), vec![]);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"projectList": [], "todoList": []})
        );
    }

    #[test]
    fn warnings_default_when_absent() {
        let response: SyncResponse =
            serde_json::from_value(json!({"projectList": [], "todoList": []})).unwrap();
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn warnings_serialize_alongside_state() {
        let response = SyncResponse::new(
            StoreState::default(),
            vec![PatchRejection::unknown_task(0, TaskId::from("x"))],
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["warnings"][0]["todoId"], "x");
    }

    #[test]
    fn echo_defaults() {
        let echo = EchoResponse::new(DEFAULT_ECHO_PAYLOAD);
        assert_eq!(
            serde_json::to_value(&echo).unwrap(),
            json!({"msg": "ECHO", "payload": "payload"})
        );
    }
}
