//! Algebraic properties of the patch merger.
//!
//! - Replaying a batch changes nothing.
//! - Patches on different tasks commute.
//! - The last patch on a `(task, field)` pair decides the value and timestamp.
//! - A patch on a missing task neither aborts nor leaks into other tasks.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tasksync_merge::{PatchMerger, PolicyKind};
use tasksync_model::{FieldChange, Task, TaskId, Timestamp};
use tasksync_test_utils::{arb_patch, numbered_tasks, patch, sample_state, TaskBuilder};

fn by_id(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| a.id.cmp(&b.id));
    tasks
}

#[test]
fn example_scenario_marks_done() {
    let tasks = vec![TaskBuilder::new("t1").title("a").modified_at(100).build()];
    let outcome = PatchMerger::default().merge(tasks, &[patch("t1", FieldChange::IsDone(true), 200)]);

    assert_eq!(
        outcome.tasks,
        vec![TaskBuilder::new("t1").title("a").done(true).modified_at(200).build()]
    );
}

#[test]
fn empty_batch_returns_collection_unchanged() {
    let state = sample_state();
    let outcome = PatchMerger::default().merge(state.todo_list.clone(), &[]);
    assert_eq!(outcome.tasks, state.todo_list);
}

#[test]
fn unknown_task_does_not_abort_batch() {
    let outcome = PatchMerger::default().merge(
        numbered_tasks(2),
        &[
            patch("t0", FieldChange::Title("x".into()), 5),
            patch("nope", FieldChange::Title("y".into()), 6),
            patch("t1", FieldChange::Title("z".into()), 7),
        ],
    );

    let titles: Vec<_> = outcome.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["x", "z"]);
    assert_eq!(outcome.report.rejected.len(), 1);
    assert_eq!(outcome.report.rejected[0].todo_id, TaskId::from("nope"));
    assert_eq!(outcome.report.total(), 3);
}

proptest! {
    #[test]
    fn prop_replay_is_idempotent(
        patches in prop::collection::vec(arb_patch(4), 1..20),
        policy in prop_oneof![Just(PolicyKind::LastWriteWins), Just(PolicyKind::RejectStale)],
    ) {
        let merger = PatchMerger::from_kind(policy);
        let once = merger.merge(numbered_tasks(4), &patches).tasks;
        let twice = merger.merge(once.clone(), &patches).tasks;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_different_tasks_commute(
        a in arb_patch(3),
        b in arb_patch(3),
    ) {
        prop_assume!(a.todo_id != b.todo_id);
        let merger = PatchMerger::default();

        let ab = merger.merge(numbered_tasks(3), &[a.clone(), b.clone()]).tasks;
        let ba = merger.merge(numbered_tasks(3), &[b, a]).tasks;
        prop_assert_eq!(by_id(ab), by_id(ba));
    }

    #[test]
    fn prop_last_write_wins_per_field(
        first in "[a-z]{1,6}",
        second in "[a-z]{1,6}",
        t1 in 0i64..1_000,
        t2 in 0i64..1_000,
    ) {
        let outcome = PatchMerger::default().merge(
            numbered_tasks(1),
            &[
                patch("t0", FieldChange::Title(first), t1),
                patch("t0", FieldChange::Title(second.clone()), t2),
            ],
        );
        prop_assert_eq!(&outcome.tasks[0].title, &second);
        prop_assert_eq!(outcome.tasks[0].modified_at, Timestamp::from_millis(t2));
    }

    #[test]
    fn prop_unknown_targets_touch_nothing(
        patches in prop::collection::vec(arb_patch(3), 0..10),
    ) {
        let merger = PatchMerger::default();
        let with_ghost: Vec<_> = patches
            .iter()
            .cloned()
            .chain(std::iter::once(patch("ghost", FieldChange::IsDone(true), 1)))
            .collect();

        let plain = merger.merge(numbered_tasks(3), &patches).tasks;
        let ghosted = merger.merge(numbered_tasks(3), &with_ghost);
        prop_assert_eq!(plain, ghosted.tasks);
        prop_assert!(ghosted.report.rejected.iter().any(|r| r.todo_id.as_str() == "ghost"));
    }

    #[test]
    fn prop_collection_size_is_preserved(
        patches in prop::collection::vec(arb_patch(5), 0..30),
    ) {
        let outcome = PatchMerger::default().merge(numbered_tasks(5), &patches);
        prop_assert_eq!(outcome.tasks.len(), 5);
        prop_assert_eq!(outcome.report.total(), patches.len());
    }
}
