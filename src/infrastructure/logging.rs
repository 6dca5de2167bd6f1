use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    config::{env::LogRotation, AppConfig},
    infrastructure::directories::ResolvedPaths,
};

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let logging = &config.logging;
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&logging.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation(logging.rotation))
            .filename_prefix(&logging.file_name)
            .build(&paths.logs_dir)
            .with_context(|| format!("cannot open log file in {}", paths.logs_dir.display()))?;
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        // colour only when a person is watching; piped output stays plain
        let console_layer = fmt::layer()
            .with_writer(io::stdout)
            .with_target(true)
            .with_ansi(io::stdout().is_terminal());

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        tracing::info!(
            target: "startup",
            logs = %paths.logs_dir.display(),
            file = %logging.file_name,
            rotation = ?logging.rotation,
            level = %logging.level,
            "tracing initialized"
        );
        Ok(())
    })?;
    Ok(())
}

fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}
