use std::fmt;
use std::io;
use std::mem;

use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::Layer as FmtLayer;
use tracing_subscriber::{prelude::*, registry::Registry, reload, EnvFilter};

mod combined;

use super::app_config::config;
use super::error::Result;

pub mod prelude {
    pub use tracing::{debug, error, info, trace, warn};
    pub use tracing::{debug_span, error_span, info_span, trace_span, warn_span};
    pub use tracing::{event, field::Empty, instrument, span};
}

pub fn setup() -> Result<GlobalLoggingContext> {
    GlobalLoggingContext::new()
}

/// Owns the non-blocking writer guards, so it must be held in main until exit
pub struct GlobalLoggingContext {
    worker_guards: Vec<WorkerGuard>,
    reload_handle: reload::Handle<combined::Fanout<Registry>, Registry>,
}

impl GlobalLoggingContext {
    /// Install the global subscriber with the built-in default outputs
    pub fn new() -> Result<Self> {
        let (layer, handle) = reload::Layer::new(combined::Fanout::empty());
        Registry::default().with(layer).try_init()?;

        let mut ctx = GlobalLoggingContext {
            worker_guards: vec![],
            reload_handle: handle,
        };
        ctx.reconfigure_with(LoggingConfig::default(), true)?;

        Ok(ctx)
    }

    /// Rebuild all outputs from the `logging` section of the loaded config.
    ///
    /// `report_on_stdout` moves auto-switching stdout outputs to stderr.
    pub fn reconfigure(&mut self, report_on_stdout: bool) -> Result<()> {
        let cfg: LoggingConfig = config().get("logging")?;
        self.reconfigure_with(cfg, report_on_stdout)
    }

    fn reconfigure_with(&mut self, cfg: LoggingConfig, report_on_stdout: bool) -> Result<()> {
        // guards of the writers currently installed, released once they are swapped out
        let stale = mem::take(&mut self.worker_guards);

        let mut layers = Vec::with_capacity(cfg.outputs.len());
        for output in cfg.outputs.iter().filter(|o| o.enabled) {
            let (writer, guard) = output.writer(report_on_stdout);
            self.worker_guards.push(guard);

            let filter = output.filter.as_ref().unwrap_or(&cfg.filter).to_env_filter();
            let fmt = FmtLayer::default()
                .with_ansi(output.ansi)
                .with_target(false)
                .with_timer(LocalTime)
                .with_writer(writer);
            layers.push(filter.and_then(fmt));
        }

        self.reload_handle.reload(combined::Fanout::new(layers))?;
        drop(stale);

        Ok(())
    }
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

// ====== Logging Config ======

#[derive(Debug, serde::Deserialize)]
struct LoggingConfig {
    #[serde(default)]
    filter: FilterConfig,
    #[serde(default)]
    outputs: Vec<LoggingOutput>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
struct FilterConfig {
    /// comma separated `EnvFilter` directives
    #[serde(default)]
    directives: Option<String>,
    /// env variable that replaces `directives` when set and non-empty
    #[serde(default)]
    from_env: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct LoggingOutput {
    #[serde(default = "enabled")]
    enabled: bool,
    /// replaces the global filter for this output
    #[serde(default)]
    filter: Option<FilterConfig>,
    stream: Stream,
    /// a stdout output moves to stderr while stdout carries the report
    #[serde(default)]
    auto_switch: bool,
    #[serde(default)]
    ansi: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum Stream {
    Stdout,
    Stderr,
}

fn enabled() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            directives: Some("warn".into()),
            from_env: Some("RUST_LOG".into()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: Default::default(),
            outputs: vec![LoggingOutput {
                enabled: true,
                filter: None,
                stream: Stream::Stdout,
                auto_switch: true,
                ansi: false,
            }],
        }
    }
}

// ====== Config to Layer ======

impl FilterConfig {
    /// Picks the env variable if set, else the directives. Bad directives are skipped.
    fn directives(&self) -> Option<String> {
        self.from_env
            .as_ref()
            .and_then(|env| std::env::var(env).ok())
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.directives.clone())
    }

    fn to_env_filter(&self) -> EnvFilter {
        match self.directives() {
            Some(dirs) => dirs
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .filter_map(|s| match s.trim().parse() {
                    Ok(d) => Some(d),
                    Err(err) => {
                        eprintln!("ignoring log directive `{}`: {}", s, err);
                        None
                    }
                })
                .fold(EnvFilter::default(), |f, dir| f.add_directive(dir)),
            None => EnvFilter::default(),
        }
    }
}

impl LoggingOutput {
    fn stream(&self, report_on_stdout: bool) -> Stream {
        match self.stream {
            Stream::Stdout if self.auto_switch && report_on_stdout => Stream::Stderr,
            s => s,
        }
    }

    fn writer(&self, report_on_stdout: bool) -> (NonBlocking, WorkerGuard) {
        let builder = NonBlockingBuilder::default().lossy(false);
        match self.stream(report_on_stdout) {
            Stream::Stdout => builder.finish(io::stdout()),
            Stream::Stderr => builder.finish(io::stderr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stream: Stream, auto_switch: bool) -> LoggingOutput {
        LoggingOutput {
            enabled: true,
            filter: None,
            stream,
            auto_switch,
            ansi: false,
        }
    }

    #[test]
    fn auto_switch_only_moves_stdout_while_reporting() {
        assert_eq!(output(Stream::Stdout, true).stream(true), Stream::Stderr);
        assert_eq!(output(Stream::Stdout, true).stream(false), Stream::Stdout);
        assert_eq!(output(Stream::Stdout, false).stream(true), Stream::Stdout);
        assert_eq!(output(Stream::Stderr, true).stream(false), Stream::Stderr);
    }

    #[test]
    fn directives_fall_back_when_env_is_unset() {
        let filter = FilterConfig {
            directives: Some("info,schedsim=debug".into()),
            from_env: Some("SCHEDSIM_TEST_SURELY_UNSET_LOG".into()),
        };
        assert_eq!(filter.directives().as_deref(), Some("info,schedsim=debug"));

        let filter = FilterConfig {
            directives: None,
            from_env: None,
        };
        assert_eq!(filter.directives(), None);
    }

    #[test]
    fn built_in_config_matches_default() {
        let mut cfg = crate::utils::app_config::AppConfig::new();
        cfg.setup().unwrap();
        let logging: LoggingConfig = cfg.get("logging").unwrap();

        assert_eq!(logging.filter, FilterConfig::default());
        assert_eq!(logging.outputs.len(), 1);
        let out = &logging.outputs[0];
        assert!(out.enabled && out.auto_switch);
        assert_eq!(out.stream, Stream::Stdout);
        assert!(out.filter.is_none());
    }
}
