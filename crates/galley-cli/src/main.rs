mod highlight;
mod keymap;
mod ui;
mod view;

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use galley_core::router::Tab;
use galley_core::router::UserMode;
use galley_core::state::AppState;
use galley_core::state::KeymapPreset;
use galley_core::state::StoreOptions;
use galley_core::AppAction;
use galley_core::GalleyConfig;
use galley_core::PreferenceStore;
use galley_core::UserAction;
use galley_exec::SimTiming;

#[derive(Debug, Parser)]
#[command(name = "galley", version, about = "A terminal cockpit for building software with AI assistants")]
struct Args {
    /// Config file (defaults to the platform config dir, galley/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in `simple` or `advanced` mode, overriding the config
    #[arg(long, value_parser = parse_mode)]
    mode: Option<UserMode>,

    /// Tab to open first, e.g. `plans` or `chat`
    #[arg(long, value_parser = parse_tab)]
    tab: Option<Tab>,

    /// Show the onboarding tour again
    #[arg(long)]
    reset_onboarding: bool,

    /// Append logs here instead of the data dir's galley.log
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_mode(value: &str) -> Result<UserMode, String> {
    UserMode::parse(value).ok_or_else(|| format!("unknown mode '{value}' (simple, advanced)"))
}

fn parse_tab(value: &str) -> Result<Tab, String> {
    Tab::parse(value).ok_or_else(|| {
        let known: Vec<&str> = Tab::ALL.iter().map(|tab| tab.id()).collect();
        format!("unknown tab '{value}' ({})", known.join(", "))
    })
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => dirs::config_dir()
            .context("no config directory on this platform; pass --config")?
            .join("galley")
            .join("config.toml"),
    };
    let config = GalleyConfig::load(&config_path)?;

    let data_dir = match config.paths.data_dir.clone() {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("no data directory on this platform; set paths.data_dir")?
            .join("galley"),
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir '{}'", data_dir.display()))?;

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("galley.log"));
    init_file_logging(&log_path)?;
    tracing::info!(config = %config_path.display(), data_dir = %data_dir.display(), "starting galley");

    let prefs = PreferenceStore::in_dir(&data_dir);
    if args.reset_onboarding {
        prefs
            .set_onboarding_complete(false)
            .context("resetting onboarding")?;
    }
    let preferences = prefs.load();

    let state = build_state(&args, &config, preferences.onboarding_complete)?;
    let timing = SimTiming::from_config(&config.simulation);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .thread_name("galley-sim")
        .build()
        .context("starting the simulation runtime")?;
    let result = ui::run(state, runtime.handle().clone(), timing, prefs);
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

fn build_state(
    args: &Args,
    config: &GalleyConfig,
    onboarding_complete: bool,
) -> anyhow::Result<AppState> {
    let project_name = config
        .ui
        .project_name
        .clone()
        .or_else(current_dir_name)
        .unwrap_or_else(|| "galley".to_string());
    let toast_ttl_ms = i64::try_from(config.simulation.toast_ttl_ms)
        .context("simulation.toast_ttl_ms is too large")?;

    let mut state = AppState::new(StoreOptions {
        project_name,
        mode: args.mode.unwrap_or(config.ui.mode),
        theme: config.ui.theme,
        keymap_preset: config.ui.keymap.unwrap_or_else(KeymapPreset::platform_default),
        onboarding_complete,
        toast_ttl_ms,
        seed: true,
    });
    if let Some(tab) = args.tab {
        galley_core::reduce(&mut state, AppAction::User(UserAction::SetActiveTab(tab)));
    }
    Ok(state)
}

fn current_dir_name() -> Option<String> {
    let dir = std::env::current_dir().ok()?;
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn init_file_logging(log_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory '{}'", parent.display()))?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("GALLEY_LOG")
                .unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn mode_and_tab_flags_parse() {
        let args = Args::try_parse_from(["galley", "--mode", "simple", "--tab", "plans"])
            .expect("valid args");
        assert_eq!(args.mode, Some(UserMode::Simple));
        assert_eq!(args.tab, Some(Tab::Plans));
        assert!(Args::try_parse_from(["galley", "--tab", "nowhere"]).is_err());
    }

    #[test]
    fn cli_flags_override_the_config() {
        let args = Args::try_parse_from(["galley", "--mode", "simple", "--tab", "chat"])
            .expect("valid args");
        let mut config = GalleyConfig::default();
        config.ui.project_name = Some("atlas".to_string());

        let state = build_state(&args, &config, true).expect("state");
        assert_eq!(state.nav.mode, UserMode::Simple);
        assert_eq!(state.nav.tab, Tab::Chat);
        assert_eq!(
            state.active_project().map(|project| project.name.as_str()),
            Some("atlas")
        );
    }
}
