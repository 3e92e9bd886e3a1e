// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Transdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Transdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tracing subscriber setup for embedding applications.
//!
//! Console output honors `RUST_LOG`, falling back to the configured filter. When a log
//! directory is configured, plain-text events are also written to daily-rotated files through
//! a non-blocking writer.

use std::fmt;

use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "transdesk";
const MAX_LOG_FILES: usize = 7;

/// Installs the global subscriber. Keep the returned guard alive to flush file output.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };
    let console_layer = tracing_fmt::layer()
        .with_target(true)
        .compact()
        .with_filter(console_filter);

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(MAX_LOG_FILES)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(directory)?;
            let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(appender);
            let layer = tracing_fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(EnvFilter::try_new(&config.filter)?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(
        filter = %config.filter,
        directory = ?config.directory,
        "logging initialized"
    );
    Ok(guard)
}

#[derive(Debug)]
pub enum LoggingError {
    Filter(ParseError),
    Appender(InitError),
    AlreadyInitialized(TryInitError),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(err) => write!(f, "invalid log filter: {err}"),
            Self::Appender(err) => write!(f, "cannot open log directory: {err}"),
            Self::AlreadyInitialized(err) => write!(f, "logging already initialized: {err}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(err) => Some(err),
            Self::Appender(err) => Some(err),
            Self::AlreadyInitialized(err) => Some(err),
        }
    }
}

impl From<ParseError> for LoggingError {
    fn from(err: ParseError) -> Self {
        Self::Filter(err)
    }
}

impl From<InitError> for LoggingError {
    fn from(err: InitError) -> Self {
        Self::Appender(err)
    }
}

impl From<TryInitError> for LoggingError {
    fn from(err: TryInitError) -> Self {
        Self::AlreadyInitialized(err)
    }
}
