use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Build the filter and the output layer for `cfg` and install them globally.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let registry = tracing_subscriber::registry().with(filter(&cfg.level)?);

    let installed = match cfg.format {
        LoggerFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(local_rfc3339()),
            )
            .try_init(),
        LoggerFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_timer(local_rfc3339()),
            )
            .try_init(),
        LoggerFormat::Journald => {
            #[cfg(all(target_os = "linux", feature = "journald"))]
            {
                let journald = tracing_journald::layer()
                    .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?;
                registry.with(journald).try_init()
            }

            #[cfg(not(all(target_os = "linux", feature = "journald")))]
            {
                drop(registry);
                return Err(LoggerError::JournaldNotSupported);
            }
        }
    };
    installed.map_err(classify)
}

pub(crate) fn filter(directives: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(directives).map_err(|_| LoggerError::InvalidFilter(directives.to_string()))
}

fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn classify(e: TryInitError) -> LoggerError {
    let s = e.to_string();
    if s.contains("SetGlobalDefaultError") || s.contains("global default") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_filter() {
        assert!(matches!(
            filter("qload=verbose"),
            Err(LoggerError::InvalidFilter(_))
        ));
        assert!(filter("qload_exec=debug,info").is_ok());
    }

    #[test]
    fn second_install_fails() {
        let cfg = LoggerConfig::default();
        let _ = install(&cfg);
        let json = LoggerConfig {
            format: LoggerFormat::Json,
            ..LoggerConfig::default()
        };
        assert!(install(&json).is_err());
    }

    #[test]
    fn local_timer_writes_rfc3339() {
        use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

        let mut out = String::new();
        local_rfc3339().format_time(&mut Writer::new(&mut out)).unwrap();
        assert!(out.contains('T'), "not rfc3339: {out}");
    }
}
