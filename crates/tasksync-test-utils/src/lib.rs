//! Testing utilities for the tasksync workspace
//!
//! Shared builders, fixtures and proptest strategies.

#![allow(missing_docs)]

use proptest::prelude::*;
use tasksync_model::{
    FieldChange, Patch, Project, ProjectId, StoreState, Task, TaskId, Timestamp,
};

/// Builder for a [`Task`] with predictable defaults
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            task: Task {
                id: TaskId::from(id),
                title: id.to_string(),
                project_id: ProjectId::from(""),
                sort_idx: 0,
                is_done: false,
                created_at: Timestamp::from_millis(100),
                modified_at: Timestamp::from_millis(100),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn project(mut self, project_id: &str) -> Self {
        self.task.project_id = ProjectId::from(project_id);
        self
    }

    pub fn sort_idx(mut self, sort_idx: i64) -> Self {
        self.task.sort_idx = sort_idx;
        self
    }

    pub fn done(mut self, is_done: bool) -> Self {
        self.task.is_done = is_done;
        self
    }

    pub fn created_at(mut self, millis: i64) -> Self {
        self.task.created_at = Timestamp::from_millis(millis);
        self
    }

    pub fn modified_at(mut self, millis: i64) -> Self {
        self.task.modified_at = Timestamp::from_millis(millis);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

pub fn project(id: &str, title: &str, sort_idx: i64) -> Project {
    Project {
        id: ProjectId::from(id),
        title: title.to_string(),
        sort_idx,
        created_at: Timestamp::from_millis(100),
        modified_at: Timestamp::from_millis(100),
    }
}

pub fn patch(todo_id: &str, change: FieldChange, modified_at: i64) -> Patch {
    Patch::new(
        TaskId::from(todo_id),
        change,
        Timestamp::from_millis(modified_at),
    )
}

/// Two projects, three tasks; `t1` matches the `{id:"t1", title:"a"}` example
pub fn sample_state() -> StoreState {
    StoreState::new(
        vec![project("p1", "hack the port", 0), project("p2", "parse the feed", 1)],
        vec![
            TaskBuilder::new("t1").title("a").build(),
            TaskBuilder::new("t2").title("b").project("p1").sort_idx(1).build(),
            TaskBuilder::new("t3").title("c").project("p2").done(true).build(),
        ],
    )
}

/// Collection of `count` tasks with ids `t0..t{count}`
pub fn numbered_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| TaskBuilder::new(&format!("t{i}")).build())
        .collect()
}

pub fn arb_change() -> impl Strategy<Value = FieldChange> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(FieldChange::Title),
        prop_oneof![Just(""), Just("p1"), Just("p2")]
            .prop_map(|id| FieldChange::ProjectId(ProjectId::from(id))),
        (-5i64..50).prop_map(FieldChange::SortIdx),
        any::<bool>().prop_map(FieldChange::IsDone),
    ]
}

/// Patches over `t0..t{task_count}` plus an occasional unknown target
pub fn arb_patch(task_count: usize) -> impl Strategy<Value = Patch> {
    (0..=task_count, arb_change(), 0i64..1_000).prop_map(move |(target, change, ts)| {
        let id = if target == task_count {
            "missing".to_string()
        } else {
            format!("t{target}")
        };
        Patch::new(TaskId::from(id), change, Timestamp::from_millis(ts))
    })
}
