//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `agenda_core` linkage, configuration and database bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use agenda_core::db::migrations::current_user_version;
use agenda_core::{CoreConfig, Scheduler, SqliteStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("agenda_core ping={}", agenda_core::ping());
    println!("agenda_core version={}", agenda_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("agenda_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env()?;
    let logging_active = config.init_logging()?;
    println!("logging active={logging_active} level={}", config.log_level);

    let conn = config
        .open_db()
        .map_err(|err| format!("database open failed: {err}"))?;
    let schema_version =
        current_user_version(&conn).map_err(|err| format!("schema probe failed: {err}"))?;
    let store = SqliteStore::try_new(&conn).map_err(|err| format!("store init failed: {err}"))?;
    let meetings = Scheduler::new(store)
        .list_meetings()
        .map_err(|err| format!("meeting listing failed: {err}"))?;

    println!(
        "database path={} schema_version={} meetings={}",
        config.db_path.display(),
        schema_version,
        meetings.len()
    );
    log::info!(
        "event=cli_probe module=cli status=ok schema_version={} meetings={}",
        schema_version,
        meetings.len()
    );
    Ok(())
}
