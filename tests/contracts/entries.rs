//! Entry resolution contracts.

use stratum::config::Config;
use stratum::domain::value_objects::{Environment, LayerId};
use stratum::{BuildDriver, BuildInput, FsModuleSource, NodeResolver, RawEntry, StratumError};

use crate::common::{todo_app, TestProject};

fn driver(input: BuildInput) -> BuildDriver<NodeResolver, FsModuleSource> {
    BuildDriver::new(NodeResolver::new(), FsModuleSource::new(), input)
}

/// CONTRACT: Relative entry specifiers resolve from the build context.
#[test]
fn contract_relative_entries_resolve_from_context() {
    let project = todo_app();
    let config = Config::load(&project.path("stratum.toml")).unwrap();
    let synthesis = driver(BuildInput::from_config(&config, project.root()))
        .synthesize()
        .unwrap();

    let server = synthesis.entries_for(Environment::Server);
    assert_eq!(server.len(), 1);
    assert_eq!(server[0].name, "index");
    assert_eq!(server[0].import, project.module("src/framework/entry.rsc.tsx"));
    assert_eq!(server[0].layer, LayerId::ServerComponents);
    assert_eq!(
        synthesis.rules.designated_layer(&project.module("src/framework/entry.ssr.tsx")),
        Some(LayerId::ServerSideRendering)
    );

    let client = synthesis.entries_for(Environment::Client);
    assert_eq!(client[0].name, "index");
    assert_eq!(client[0].layer, LayerId::Client);
}

/// CONTRACT: Absolute entry paths are used unchanged, even if missing.
#[test]
fn contract_absolute_entries_pass_through() {
    let project = TestProject::new();
    let absolute = project.path("not/yet/built.tsx");
    let input = BuildInput::new(project.root()).with_entry(RawEntry::new(
        "index",
        Environment::Client,
        absolute.to_str().unwrap(),
    ));

    let synthesis = driver(input).synthesize().unwrap();
    assert_eq!(
        synthesis.entries_for(Environment::Client)[0].import.as_path(),
        absolute.as_path()
    );
}

/// CONTRACT: A missing relative entry is fatal and names the specifier.
#[test]
fn contract_missing_entry_names_specifier() {
    let project = TestProject::new();
    let input = BuildInput::new(project.root()).with_entry(RawEntry::new(
        "index",
        Environment::Server,
        "./src/missing.tsx",
    ));

    let err = driver(input).run().unwrap_err();
    assert!(matches!(err, StratumError::Synthesize(_)));
    assert!(err.to_string().contains("Can't resolve './src/missing.tsx'"));
}
