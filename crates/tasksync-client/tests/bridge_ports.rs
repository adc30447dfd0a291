//! Port attachment and event flow through the cache bridge.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tasksync_client::{
    keys, CacheBridge, LocalCache, LocalStorage, MemoryStorage, OutboundPort, Port, PortListener,
    UiRuntime,
};
use tasksync_model::{FieldChange, TaskId};
use tasksync_test_utils::{patch, sample_state};

#[derive(Default)]
struct FakePort {
    listeners: Mutex<Vec<PortListener>>,
}

impl OutboundPort for FakePort {
    fn subscribe(&self, listener: PortListener) {
        self.listeners.lock().push(listener);
    }
}

#[derive(Default)]
struct FakeRuntime {
    ports: HashMap<&'static str, FakePort>,
}

impl FakeRuntime {
    fn with_ports(names: &[&'static str]) -> Self {
        Self {
            ports: names.iter().map(|n| (*n, FakePort::default())).collect(),
        }
    }

    fn emit(&self, name: &str, payload: Value) {
        for listener in self.ports[name].listeners.lock().iter() {
            listener.notify(payload.clone());
        }
    }
}

impl UiRuntime for FakeRuntime {
    fn port(&self, name: &str) -> Option<&dyn OutboundPort> {
        self.ports.get(name).map(|p| p as &dyn OutboundPort)
    }
}

fn setup() -> (Arc<MemoryStorage>, CacheBridge) {
    let storage = Arc::new(MemoryStorage::new());
    let bridge = CacheBridge::new(LocalCache::new(storage.clone()));
    (storage, bridge)
}

#[test]
fn missing_ports_are_skipped() {
    let (_, bridge) = setup();
    let runtime = FakeRuntime::with_ports(&["cacheTaskList", "somethingElse"]);

    assert_eq!(bridge.attach(&runtime), vec![Port::CacheTaskList]);
    assert_eq!(runtime.ports["somethingElse"].listeners.lock().len(), 0);
}

#[test]
fn runtime_without_ports_attaches_nothing() {
    let (_, bridge) = setup();
    assert!(bridge.attach(&FakeRuntime::default()).is_empty());
}

#[test]
fn task_snapshot_replaces_map() {
    let (storage, mut bridge) = setup();
    let runtime = FakeRuntime::with_ports(&["cacheTaskList"]);
    bridge.attach(&runtime);

    let tasks = sample_state().todo_list;
    runtime.emit("cacheTaskList", serde_json::to_value(&tasks).unwrap());
    runtime.emit("cacheTaskList", serde_json::to_value(&tasks[..1]).unwrap());
    assert_eq!(bridge.drain(), 2);

    let raw: Value = serde_json::from_str(&storage.get_item(keys::TASK_MAP).unwrap().unwrap()).unwrap();
    assert_eq!(raw.as_object().unwrap().len(), 1);
    assert_eq!(bridge.load_flags().task_list, tasks[..1].to_vec());
}

#[test]
fn flags_round_trip_through_storage() {
    let (_, mut bridge) = setup();
    let runtime = FakeRuntime::with_ports(&["cacheTaskList", "cacheKeyValue"]);
    bridge.attach(&runtime);

    let state = sample_state();
    runtime.emit("cacheTaskList", serde_json::to_value(&state.todo_list).unwrap());
    runtime.emit(
        "cacheKeyValue",
        json!(["projectList", serde_json::to_value(&state.project_list).unwrap()]),
    );
    runtime.emit("cacheKeyValue", json!(["edit", {"id": "t2", "title": "b?"}]));
    bridge.drain();

    let flags = bridge.load_flags();
    assert_eq!(flags.task_list, state.todo_list);
    assert_eq!(flags.project_list, state.project_list);
    assert_eq!(flags.edit["id"], "t2");
    assert_eq!(flags.model_cache, Value::Null);
}

#[test]
fn queued_patches_accumulate_in_order() {
    let (_, mut bridge) = setup();
    let runtime = FakeRuntime::with_ports(&["queuePatch"]);
    bridge.attach(&runtime);

    runtime.emit(
        "queuePatch",
        json!({"todoId": "t1", "key": "isDone", "value": true, "modifiedAt": 200}),
    );
    runtime.emit(
        "queuePatch",
        json!({"todoId": "t1", "key": "sortIdx", "value": 4, "modifiedAt": 201}),
    );
    runtime.emit(
        "queuePatch",
        json!({"todoId": "t1", "key": "isDone", "value": "yes", "modifiedAt": 202}),
    );
    assert_eq!(bridge.drain(), 2);

    assert_eq!(
        bridge.cache().pending(),
        vec![
            patch("t1", FieldChange::IsDone(true), 200),
            patch("t1", FieldChange::SortIdx(4), 201),
        ]
    );
    assert_eq!(bridge.cache().pending()[0].todo_id, TaskId::from("t1"));
}
