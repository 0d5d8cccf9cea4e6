use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use stratum::application::hot::SERVER_COMPONENTS_UPDATED_MARKER;
use stratum::{BuildInput, DevWatchUseCase, FsModuleSource, NodeResolver, WatchEvent, WatchOptions};

pub fn cmd_watch(context: &Path, json: bool) -> Result<()> {
    let (config, dir) = super::load_config(context)?;
    if !config.mode.is_development() {
        anyhow::bail!("watch requires development mode (mode is {})", config.mode);
    }

    let input = BuildInput::from_config(&config, &dir);
    let options =
        WatchOptions::new(input).with_debounce(Duration::from_millis(config.dev.debounce_ms));
    let use_case = DevWatchUseCase::new(options, NodeResolver::new(), FsModuleSource::new());

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if !json {
        println!("Stratum Watch");
        println!("Context: {}", dir.display());
        println!("Press Ctrl+C to stop\n");
    }

    use_case.start(running, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        print_event(&event);
    })?;

    Ok(())
}

fn print_event(event: &WatchEvent) {
    match event {
        WatchEvent::WatchStarted { context, .. } => println!("Watching: {}", context),
        WatchEvent::FileChanged { path } => println!("Changed: {}", path),
        WatchEvent::BuildStarted => println!("Building..."),
        WatchEvent::BuildComplete {
            modules, warnings, ..
        } => {
            if *warnings > 0 {
                println!("⚠ Built {} modules, {} warnings", modules, warnings);
            } else {
                println!("✓ Built {} modules", modules);
            }
        }
        WatchEvent::HotUpdate {
            layer,
            kind,
            modules,
        } => {
            println!("↻ {} {:?}: {} modules", layer.short_name(), kind, modules.len());
            if event.is_server_components_update() {
                println!("{}", SERVER_COMPONENTS_UPDATED_MARKER);
            }
        }
        WatchEvent::FullReload { reason } => println!("⟳ Full reload: {}", reason),
        WatchEvent::Error { message } => eprintln!("✗ Error: {}", message),
        WatchEvent::Shutdown => println!("\nShutting down..."),
    }
}
