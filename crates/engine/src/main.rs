//! Aurora editor entry point.
//
// Startup order matters: app-data paths first (logs live there), then
// logging, then preferences and the session.

mod appdata;
mod args;
mod consts;
mod event_loop;
mod logging;

use anchor::{create_system, Backend};
use anyhow::Context as _;
use engine_state::{Globals, Main};
use window_manager::ops::register_window_operators;
use window_manager::{MsgBus, OperatorRegistry, Session};

use crate::appdata::AppDataPaths;
use crate::args::ParsedArgs;
use crate::consts::{APP_DESCRIPTION, APP_NAME, APP_VERSION};

fn main() {
    let args = args::parse_args();
    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("{APP_NAME}: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

/// Everything between argument parsing and process exit.
///
/// The log guard is dropped before returning so the file log is flushed.
fn run(args: &ParsedArgs) -> anyhow::Result<i32> {
    let paths = AppDataPaths::resolve()?;
    let _log_guard = logging::init(&paths.logs_dir, args.verbose)?;

    tracing::info!("{APP_NAME} {APP_VERSION}");
    tracing::info!("{APP_DESCRIPTION}");
    tracing::debug!("App data directory: {}", paths.appdata_dir.display());

    let prefs = appdata::load_preferences(&paths, args)?;
    let keymap = appdata::load_keymap(&paths, args);
    let globals = Globals::new()
        .with_background(args.background)
        .with_factory_startup(args.factory_startup)
        .with_debug_events(args.debug_events);

    let system = create_system(backend_for(args)).context("Failed to start the platform backend")?;

    let mut registry = OperatorRegistry::new();
    register_window_operators(&mut registry)?;

    let stage = appdata::open_document(&paths, args)?;
    let (main, layout) = Main::with_default_layout(stage);
    let mut session = Session::new(system, main, prefs, globals, registry, MsgBus::new())
        .with_keymap(keymap);

    event_loop::run(&mut session, &layout)
}

fn backend_for(args: &ParsedArgs) -> Backend {
    if args.background {
        return Backend::Headless;
    }

    #[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
    {
        Backend::Winit
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        tracing::warn!("No native backend on this platform, running headless");
        Backend::Headless
    }
}
