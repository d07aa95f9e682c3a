//! Headless host binary for the Digivice life simulation.
//!
//! Stands in for the app shell: it resumes the saved character the way the
//! app does when it returns to the foreground, then drives it frame by frame
//! until told to stop.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `digivice-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Resolve the tunable profile and evolution table
//! 4. Resume the saved character through the background reconciler
//! 5. Run the live frame loop until the run limit, Ctrl-C, or death
//! 6. Persist and log the final state

mod error;
mod listener;
mod session;

use std::path::Path;
use std::time::Duration;

use digivice_sim::clock::{Clock, SystemClock};
use digivice_sim::config::GameConfig;
use digivice_sim::live::LiveDriver;
use digivice_sim::reconciler::BackgroundReconciler;
use digivice_sim::store::JsonFileStore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::listener::TracingListener;
use crate::session::TokioClock;

/// Path of the optional configuration file, relative to the working directory.
const CONFIG_PATH: &str = "digivice-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the final save fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember where it came from.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("digivice-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }

    // 3. Resolve rules.
    let rules = config.rules().map_err(EngineError::from)?;
    info!(
        profile = ?config.profile,
        egg_species = %rules.egg_species,
        save_path = %config.save.path.display(),
        frame_interval_ms = config.live.frame_interval_ms,
        run_seconds = config.live.run_seconds,
        seed = config.live.seed,
        "Configuration loaded"
    );

    let mut rng = config
        .live
        .seed
        .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);

    // 4. Resume from the last checkpoint.
    let mut store = JsonFileStore::new(&config.save.path);
    let now = SystemClock.now_ms();
    let resumed = BackgroundReconciler::new(&mut store, &rules)
        .resume_from_checkpoint(now, &mut rng)
        .map_err(EngineError::from)?;
    if resumed.started_fresh {
        info!(character_id = %resumed.save.record.snapshot.id, "New egg laid");
    }
    if resumed.catch_up.hit_neglect_ceiling() {
        warn!("Away too long: the character died of neglect");
    }

    // 5. Live frame loop.
    let clock = TokioClock::anchored_at(now);
    let driver = LiveDriver::new(&rules, resumed.save, store, TracingListener::default(), rng);
    let run_limit =
        (config.live.run_seconds > 0).then_some(Duration::from_secs(config.live.run_seconds));
    let result = session::run_live(
        driver,
        &clock,
        Duration::from_millis(config.live.frame_interval_ms),
        run_limit,
        shutdown_signal(),
    )
    .await?;

    // 6. Log results.
    session::log_session_end(&result);
    info!("digivice-engine shutdown complete");

    Ok(())
}

/// Load configuration from `digivice-config.yaml` in the working directory.
///
/// Returns the configuration and whether it was read from the file.
fn load_config() -> Result<(GameConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((GameConfig::from_file(config_path)?, true))
    } else {
        let mut config = GameConfig::default();
        config.apply_env_overrides()?;
        Ok((config, false))
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
