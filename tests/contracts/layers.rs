//! Layer classification and resolution override contracts.

use std::collections::BTreeSet;

use stratum::config::Config;
use stratum::domain::value_objects::{Environment, LayerId};
use stratum::{BuildDriver, BuildInput, BuildManifest, FsModuleSource, NodeResolver};

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

/// CONTRACT: Each layer resolves packages with its own conditions.
#[test]
fn contract_layers_resolve_with_their_conditions() {
    let project = todo_app();
    let manifest = plan(&project);
    let server = manifest.environment(Environment::Server).unwrap();
    let client = manifest.environment(Environment::Client).unwrap();

    let package = |file: &str| project.module(&format!("node_modules/react-server-dom/{}", file));
    assert!(server.module(&package("server.js"), LayerId::ServerComponents).is_some());
    assert!(server.module(&package("node.js"), LayerId::ServerSideRendering).is_some());
    assert!(client.module(&package("browser.js"), LayerId::Client).is_some());
    assert_eq!(
        manifest.layers_of(&package("browser.js")),
        BTreeSet::from([LayerId::Client])
    );
}

/// CONTRACT: Directives decide boundaries between server and client code.
#[test]
fn contract_directives_record_references() {
    let project = todo_app();
    let manifest = plan(&project);
    let server = manifest.environment(Environment::Server).unwrap();
    let client = manifest.environment(Environment::Client).unwrap();

    assert!(server
        .client_references
        .contains(&project.module("src/components/Counter.tsx")));
    assert!(client
        .server_references
        .contains(&project.module("src/actions.ts")));
    assert!(server
        .server_entries
        .contains(&project.module("src/routes/Todos.tsx")));

    let counter = manifest.layers_of(&project.module("src/components/Counter.tsx"));
    assert!(!counter.contains(&LayerId::ServerComponents));
    assert!(counter.contains(&LayerId::Client));
}

/// CONTRACT: A module pinned to a layer compiles in no other layer.
#[test]
fn contract_pinned_modules_are_exclusive() {
    let project = todo_app();
    let manifest = plan(&project);

    assert_eq!(
        manifest.layers_of(&project.module("src/framework/entry.ssr.tsx")),
        BTreeSet::from([LayerId::ServerSideRendering])
    );
}

/// CONTRACT: Planning the same project twice yields the same manifest.
#[test]
fn contract_plan_is_deterministic() {
    let project = todo_app();
    assert_eq!(plan(&project), plan(&project));
}
