//! Tests for the watch module

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::tempdir;

use super::*;
use crate::application::build::BuildInput;
use crate::application::hot::{HotSignal, UpdateKind};
use crate::domain::entities::RawEntry;
use crate::domain::value_objects::{Environment, LayerId};
use crate::infrastructure::{FsModuleSource, NodeResolver};

// === WatchEvent tests ===

#[test]
fn test_watch_event_to_json_started() {
    let event = WatchEvent::WatchStarted {
        context: "/app".to_string(),
        debounce_ms: 100,
    };
    let json = event.to_json();
    assert!(json.contains("\"event\":\"watch_started\""));
    assert!(json.contains("\"command\":\"watch\""));
    assert!(json.contains("\"debounce_ms\":100"));
}

#[test]
fn test_watch_event_to_json_hot_update() {
    let event = WatchEvent::HotUpdate {
        layer: LayerId::ServerComponents,
        kind: UpdateKind::Accepted,
        modules: vec!["/app/src/App.tsx".to_string()],
    };
    let json = event.to_json();
    assert!(json.contains("\"event\":\"hot_update\""));
    assert!(json.contains("\"layer\":\"rsc\""));
    assert!(json.contains("\"kind\":\"accepted\""));
    assert!(event.is_server_components_update());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["marker"], "[stratum] server components updated");
}

#[test]
fn test_client_update_json_has_no_marker() {
    let event = WatchEvent::HotUpdate {
        layer: LayerId::Client,
        kind: UpdateKind::Accepted,
        modules: vec!["/app/src/Counter.tsx".to_string()],
    };
    let value: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
    assert!(value.get("marker").is_none());
    assert!(!event.is_server_components_update());
}

#[test]
fn test_watch_event_from_full_reload() {
    let signal = HotSignal::FullReload {
        reason: "entries changed".to_string(),
    };
    assert_eq!(
        WatchEvent::from(&signal),
        WatchEvent::FullReload {
            reason: "entries changed".to_string()
        }
    );
}

// === WatcherState tests ===

#[test]
fn test_watcher_state_debounces() {
    let mut state = WatcherState::new(Duration::from_millis(20));
    assert!(!state.should_rebuild());

    state.add_change(PathBuf::from("b.tsx"));
    state.add_change(PathBuf::from("a.tsx"));
    state.add_change(PathBuf::from("a.tsx"));
    assert!(state.has_pending());
    assert!(!state.should_rebuild());

    std::thread::sleep(Duration::from_millis(30));
    assert!(state.should_rebuild());
    assert_eq!(
        state.take_changes(),
        vec![PathBuf::from("a.tsx"), PathBuf::from("b.tsx")]
    );
    assert!(!state.has_pending());
}

// === ContentHashes tests ===

#[test]
fn test_content_hashes_filter_identical_saves() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("App.tsx");
    fs::write(&file, "export default 1;").unwrap();

    let mut hashes = ContentHashes::new();
    assert_eq!(hashes.observe(&file), ContentChange::Modified);
    assert_eq!(hashes.observe(&file), ContentChange::Unchanged);

    fs::write(&file, "export default 2;").unwrap();
    assert_eq!(hashes.observe(&file), ContentChange::Modified);

    fs::remove_file(&file).unwrap();
    assert_eq!(hashes.observe(&file), ContentChange::Removed);
    assert_eq!(hashes.observe(&file), ContentChange::Unchanged);
}

// === DevWatchUseCase tests ===

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    write(&root.join("src/entry.rsc.tsx"), "import { App } from './App';\n");
    write(
        &root.join("src/App.tsx"),
        "\"use server-entry\";\nimport { Counter } from './Counter';\nexport function App() { return 1; }\n",
    );
    write(
        &root.join("src/Counter.tsx"),
        "\"use client\";\nexport function Counter() { return 0; }\n",
    );
    write(&root.join("src/entry.client.tsx"), "export {};\n");
    (dir, root)
}

fn use_case(root: &Path) -> DevWatchUseCase<NodeResolver, FsModuleSource> {
    let input = BuildInput::new(root)
        .with_entry(RawEntry::new("index", Environment::Server, "./src/entry.rsc.tsx"))
        .with_entry(RawEntry::new("index", Environment::Client, "./src/entry.client.tsx"));
    DevWatchUseCase::new(WatchOptions::new(input), NodeResolver::new(), FsModuleSource::new())
}

#[test]
fn test_server_component_edit_is_accepted() {
    let (_dir, root) = project();
    let use_case = use_case(&root);
    let events = Mutex::new(Vec::new());
    let on_event = |event: WatchEvent| events.lock().unwrap().push(event);

    let mut channel = use_case.initial_build(&on_event).unwrap();
    let mut session = channel.session();

    let app = root.join("src/App.tsx");
    write(
        &app,
        "\"use server-entry\";\nimport { Counter } from './Counter';\nexport function App() { return 2; }\n",
    );
    use_case.process_changes(&[app], &mut channel, &on_event);

    let events = events.lock().unwrap();
    assert!(events.iter().any(WatchEvent::is_server_components_update));
    assert!(!events
        .iter()
        .any(|event| matches!(event, WatchEvent::FullReload { .. })));
    assert!(!session.try_next_signal().unwrap().is_full_reload());
}

#[test]
fn test_client_component_edit_keeps_state() {
    let (_dir, root) = project();
    let use_case = use_case(&root);
    let events = Mutex::new(Vec::new());
    let on_event = |event: WatchEvent| events.lock().unwrap().push(event);

    let mut channel = use_case.initial_build(&on_event).unwrap();
    let mut session = channel.session();

    let counter = root.join("src/Counter.tsx");
    write(&counter, "\"use client\";\nexport function Counter() { return 5; }\n");
    use_case.process_changes(&[counter], &mut channel, &on_event);

    let mut layers = Vec::new();
    while let Some(signal) = session.try_next_signal() {
        assert!(!signal.is_full_reload());
        layers.extend(signal.layer());
    }
    assert!(layers.contains(&LayerId::Client));
    assert!(!layers.contains(&LayerId::ServerComponents));
    assert_eq!(session.full_reloads(), 0);
}

#[test]
fn test_removing_server_entry_directive_reloads() {
    let (_dir, root) = project();
    let use_case = use_case(&root);
    let events = Mutex::new(Vec::new());
    let on_event = |event: WatchEvent| events.lock().unwrap().push(event);

    let mut channel = use_case.initial_build(&on_event).unwrap();
    assert_eq!(
        channel
            .manifest()
            .environment(Environment::Server)
            .unwrap()
            .server_entries
            .len(),
        1
    );

    let app = root.join("src/App.tsx");
    write(
        &app,
        "import { Counter } from './Counter';\nexport function App() { return 1; }\n",
    );
    use_case.process_changes(&[app], &mut channel, &on_event);

    assert!(channel
        .manifest()
        .environment(Environment::Server)
        .unwrap()
        .server_entries
        .is_empty());
    assert!(events
        .lock()
        .unwrap()
        .iter()
        .any(|event| matches!(event, WatchEvent::FullReload { .. })));
}

#[test]
fn test_rebuild_failure_keeps_watching() {
    let (_dir, root) = project();
    let use_case = use_case(&root);
    let events = Mutex::new(Vec::new());
    let on_event = |event: WatchEvent| events.lock().unwrap().push(event);

    let mut channel = use_case.initial_build(&on_event).unwrap();
    let shape = channel.manifest().shape.clone();

    let entry = root.join("src/entry.client.tsx");
    fs::remove_file(&entry).unwrap();
    use_case.process_changes(&[entry], &mut channel, &on_event);

    assert_eq!(channel.manifest().shape, shape);
    let events = events.lock().unwrap();
    let last = events.last().unwrap();
    assert!(matches!(last, WatchEvent::Error { message } if message.contains("entry.client.tsx")));
}
