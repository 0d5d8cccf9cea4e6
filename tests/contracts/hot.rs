//! Hot update isolation contracts.

use stratum::application::hot::{HotSignal, UpdateKind};
use stratum::config::Config;
use stratum::domain::value_objects::LayerId;
use stratum::{
    BuildDriver, BuildInput, BuildManifest, FsModuleSource, HotUpdateChannel, NodeResolver,
};

use crate::common::{todo_app, TestProject};

fn plan(project: &TestProject) -> BuildManifest {
    let config = Config::load(&project.path("stratum.toml")).unwrap();
    BuildDriver::new(
        NodeResolver::new(),
        FsModuleSource::new(),
        BuildInput::from_config(&config, project.root()),
    )
    .run()
    .unwrap()
}

/// CONTRACT: A server-components edit is accepted without a full reload.
#[test]
fn contract_server_component_edit_is_isolated() {
    let project = todo_app();
    let mut channel = HotUpdateChannel::new(plan(&project));
    let mut session = channel.session();

    project.write(
        "src/routes/Todos.tsx",
        "\"use server-entry\";\nimport { Counter } from '../components/Counter';\nimport { addTodo } from '../actions';\nexport function Todos() { return 'edited'; }\n",
    );
    let signals = channel.apply(&[project.path("src/routes/Todos.tsx")], plan(&project));

    assert_eq!(signals.len(), 1);
    match &signals[0] {
        HotSignal::Update(event) => {
            assert_eq!(event.affected_layer, LayerId::ServerComponents);
            assert_eq!(event.kind, UpdateKind::Accepted);
        }
        other => panic!("expected update, got {:?}", other),
    }
    assert_eq!(session.try_next_signal(), Some(signals[0].clone()));
    assert_eq!(session.full_reloads(), 0);
}

/// CONTRACT: Toggling the server-entry directive forces a full reload.
#[test]
fn contract_server_entry_toggle_reloads() {
    let project = todo_app();
    let mut channel = HotUpdateChannel::new(plan(&project));
    let mut session = channel.session();

    project.write(
        "src/routes/Todos.tsx",
        "import { Counter } from '../components/Counter';\nimport { addTodo } from '../actions';\nexport function Todos() { return null; }\n",
    );
    let signals = channel.apply(&[project.path("src/routes/Todos.tsx")], plan(&project));

    assert_eq!(signals.len(), 1);
    assert!(signals[0].is_full_reload());
    assert!(session.try_next_signal().unwrap().is_full_reload());
    assert_eq!(session.full_reloads(), 1);
}

/// CONTRACT: Files outside the module graph produce no signal.
#[test]
fn contract_unrelated_files_are_ignored() {
    let project = todo_app();
    let mut channel = HotUpdateChannel::new(plan(&project));

    project.write("README.md", "# todo\n");
    let signals = channel.apply(&[project.path("README.md")], plan(&project));
    assert!(signals.is_empty());
}
