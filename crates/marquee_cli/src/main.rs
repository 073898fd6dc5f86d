//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `marquee_core` linkage without the Flutter host.
//! - Report the stored session status and, when signed in, the catalog size.
//!
//! Reads `MARQUEE_*` settings from the environment or a local `.env` file;
//! `MARQUEE_DATA_DIR` picks the session database location; `MARQUEE_LOG_DIR`
//! enables rolling file logs at `MARQUEE_LOG_LEVEL` (build default if unset).

use marquee_core::{AppContext, AuthStatus, ClientConfig, RequestState};
use std::path::PathBuf;
use std::process::ExitCode;

const SESSION_DB_FILE_NAME: &str = "marquee_session.sqlite3";

#[tokio::main]
async fn main() -> ExitCode {
    println!("marquee_core ping={}", marquee_core::ping());
    println!("marquee_core version={}", marquee_core::core_version());

    // A missing .env file is fine; settings may come from the shell.
    let _ = dotenvy::dotenv();

    if let Ok(log_dir) = std::env::var("MARQUEE_LOG_DIR") {
        let level = std::env::var("MARQUEE_LOG_LEVEL")
            .unwrap_or_else(|_| marquee_core::default_log_level().to_string());
        match marquee_core::init_logging(&level, &log_dir) {
            Ok(()) => {
                if let Some((level, dir)) = marquee_core::logging_status() {
                    println!("logging={level} dir={}", dir.display());
                }
            }
            Err(err) => println!("logging=disabled reason={err}"),
        }
    }

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            println!("config=unavailable reason={err}");
            return ExitCode::SUCCESS;
        }
    };
    let data_dir = std::env::var("MARQUEE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir());

    let context = match AppContext::init(config, data_dir.join(SESSION_DB_FILE_NAME)) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("init failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let status = AuthStatus::of(&context.session_store().snapshot());
    println!("session={}", status.as_str());
    if status == AuthStatus::Unauthenticated {
        return ExitCode::SUCCESS;
    }

    let catalog = context.catalog_controller();
    let mut states = catalog.subscribe_movie_state();
    if states.wait_for(|state| !state.is_loading()).await.is_err() {
        return ExitCode::FAILURE;
    }
    match catalog.movie_state() {
        RequestState::Success(movies) => {
            println!("movies={}", movies.len());
            ExitCode::SUCCESS
        }
        RequestState::Error(message) => {
            eprintln!("movies=error message={message}");
            ExitCode::FAILURE
        }
        RequestState::Idle | RequestState::Loading => ExitCode::FAILURE,
    }
}
