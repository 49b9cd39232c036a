//! talent-tui - Terminal dashboard for Talentgrid
//!
//! Browse the jobs, applications, interviews and offers lists. Pages load
//! as the end of a list scrolls into view; `n` loads more explicitly.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use libtalentgrid::config::resolve_data_path;
use libtalentgrid::logging::{LogSink, LoggingConfig};
use libtalentgrid::{Config, Dashboard, Identity, IdentityStore, NoticeBus, Role};
use talent_tui::{
    app::{event::EventHandler, reduce, Action, AppState},
    services::ServiceHandle,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui::{self, table::TableReport},
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "talent-tui")]
#[command(version, about = "Terminal dashboard for Talentgrid")]
#[command(long_about = "Terminal dashboard for Talentgrid

Browse jobs (F2), applications (F3), interviews (F4) and offers (F5).
Pages are fetched as you scroll to the end of a list.

Logs are written to talent-tui.log in the Talentgrid data directory,
or to --log-file.

ENVIRONMENT:
    TALENTGRID_CONFIG        Config file path
    TALENTGRID_LOG_LEVEL     Log level (default: info)
    TALENT_TUI_TICK_MS       Event poll interval in ms (default: 100)
    TALENT_TUI_NO_AUTOLOAD   Only load pages with the n key
    NO_COLOR                 Disable colors")]
struct Cli {
    /// Browse generated sample data instead of the API
    #[arg(long)]
    demo: bool,

    /// Config file (defaults to ~/.config/talentgrid/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs here instead of the data directory
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Simulated server latency in demo mode, so loading rows are visible
const DEMO_LATENCY: Duration = Duration::from_millis(400);

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => resolve_data_path()?.join("talent-tui.log"),
    };
    LoggingConfig::from_env()
        .install(LogSink::File(log_path.clone()))
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let notices = NoticeBus::default();
    let dashboard = if cli.demo {
        Dashboard::demo(&config, notices, DEMO_LATENCY)
    } else {
        Dashboard::http(&config, notices)?
    };

    let identity = if cli.demo {
        Some(Identity {
            user_id: "demo".to_string(),
            user_name: "Demo Recruiter".to_string(),
            user_role: Role::Recruiter,
            user_image: None,
        })
    } else {
        let store = IdentityStore::new(config.storage.identity_path());
        store.load().unwrap_or_else(|e| {
            warn!("Could not read identity: {}", e);
            None
        })
    };

    let services = ServiceHandle::new(dashboard)?;
    let state = reduce(
        AppState::with_paging(Some(config.paging.page_size), config.paging.sentinel_threshold),
        Action::IdentityLoaded(identity),
    );

    info!("Starting dashboard (demo: {})", cli.demo);

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &services, state);
    restore_terminal(&mut terminal)?;

    result
}

fn run_app(terminal: &mut Tui, services: &ServiceHandle, mut state: AppState) -> Result<()> {
    let updates = services.subscribe();
    let events = EventHandler::new(state.config.tick_rate_ms);

    loop {
        let view = state.current_view;
        let mut report = TableReport::default();
        terminal.draw(|frame| {
            report = ui::render(frame, &state);
        })?;

        // The sentinel is observed after every frame
        state = reduce(
            state,
            Action::Viewport {
                view,
                offset: report.offset,
                sentinel_visibility: report.sentinel_visibility,
            },
        );
        run_effects(&mut state, services);

        let action: Action = events.next()?.into();
        state = reduce(state, action);

        while let Ok(update) = updates.try_recv() {
            state = reduce(state, update);
        }
        run_effects(&mut state, services);

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn run_effects(state: &mut AppState, services: &ServiceHandle) {
    for effect in state.take_effects() {
        services.execute(effect);
    }
}
