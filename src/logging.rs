use std::collections::HashMap;
use std::io::stdout;
use std::path::Path;
use std::result::Result as DefaultResult;

use tracing::dispatcher::Dispatch;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::Layer as TraceLayer;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::{Layer as LayerIntf, Registry};

use crate::config::{AppBasepathCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg};
use crate::constant::logging::{Destination, Level as AppLogLevelInner};
use crate::error::{AppError, AppErrorCode};
use crate::AppLogAlias;

pub type AppLogLevel = AppLogLevelInner;

macro_rules! to_3rdparty_level {
    ($lvlin:expr) => {
        match $lvlin {
            $crate::logging::AppLogLevel::FATAL | $crate::logging::AppLogLevel::ERROR => {
                tracing::Level::ERROR
            }
            $crate::logging::AppLogLevel::WARNING => tracing::Level::WARN,
            $crate::logging::AppLogLevel::INFO => tracing::Level::INFO,
            $crate::logging::AppLogLevel::DEBUG => tracing::Level::DEBUG,
            $crate::logging::AppLogLevel::TRACE => tracing::Level::TRACE,
        } // `tracing` orders its levels as TRACE > DEBUG > INFO > WARN > ERROR
    };
}

// one configured write destination, shared by every dispatcher routed
// to it, the worker guard has to stay alive or buffered lines are
// dropped before reaching the I/O thread
struct LogSink {
    writer: NonBlocking,
    min_level: tracing::Level,
    _flush_guard: WorkerGuard,
}

fn build_sink(basepath: &AppBasepathCfg, cfg: &AppLogHandlerCfg) -> DefaultResult<LogSink, AppError> {
    let (writer, guard) = match &cfg.destination {
        Destination::CONSOLE => tracing_appender::non_blocking(stdout()),
        Destination::LOCALFS => {
            let rel = cfg.path.as_ref().ok_or_else(|| AppError {
                code: AppErrorCode::InvalidHandlerLoggerCfg,
                detail: Some(format!("log-handler-path-missing:{}", cfg.alias)),
            })?;
            let sep = if basepath.system.ends_with('/') || rel.starts_with('/') {
                ""
            } else {
                "/"
            };
            let fullpath = format!("{}{}{}", basepath.system, sep, rel);
            let p = Path::new(fullpath.as_str());
            let (dir, fname_prefix) = p.parent().zip(p.file_name()).ok_or_else(|| AppError {
                code: AppErrorCode::InvalidHandlerLoggerCfg,
                detail: Some(format!("log-handler-path:{fullpath}")),
            })?;
            let appender = RollingFileAppender::new(Rotation::NEVER, dir, fname_prefix);
            tracing_appender::non_blocking(appender)
        }
    };
    Ok(LogSink {
        writer,
        min_level: to_3rdparty_level!(&cfg.min_level),
        _flush_guard: guard,
    })
} // end of fn build_sink

fn build_dispatcher(cfg: &AppLoggerCfg, sinks: &HashMap<AppLogAlias, LogSink>) -> Dispatch {
    let layers = cfg
        .handlers
        .iter()
        .filter_map(|alias| sinks.get(alias))
        .map(|sink| {
            // a logger without its own level inherits the sink default
            let lvl = match cfg.level.as_ref() {
                Some(l) => to_3rdparty_level!(l),
                None => sink.min_level,
            };
            TraceLayer::new()
                .with_writer(sink.writer.clone())
                .with_file(false) // full build paths stay out of the records
                .with_line_number(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(LevelFilter::from_level(lvl))
        })
        .collect::<Vec<_>>();
    Dispatch::new(Registry::default().with(layers))
}

// routes each module path named in config to its own `tracing`
// dispatcher, module paths absent from config fall back to stdout in
// the `app_log_event` macro below
pub struct AppLogContext {
    _sinks: Vec<LogSink>,
    dispatchers: HashMap<AppLogAlias, Dispatch>,
}

impl AppLogContext {
    pub fn new(basepath: &AppBasepathCfg, cfg: &AppLoggingCfg) -> DefaultResult<Self, AppError> {
        let mut sinks = HashMap::new();
        for item in cfg.handlers.iter() {
            sinks.insert(item.alias.clone(), build_sink(basepath, item)?);
        }
        let dispatchers = cfg
            .loggers
            .iter()
            .map(|item| (item.alias.clone(), build_dispatcher(item, &sinks)))
            .collect::<HashMap<_, _>>();
        Ok(Self {
            dispatchers,
            _sinks: sinks.into_values().collect(),
        })
    }

    pub fn get_assigner(&self, key: &str) -> Option<&Dispatch> {
        self.dispatchers.get(&key.to_string())
    }
} // end of impl AppLogContext

macro_rules! app_log_event {
    ( $ctx:ident, $lvl:expr, $($arg:tt)+ ) => {{
        const MOD_PATH: &str = module_path!();
        if let Some(assigner) = $ctx.get_assigner(MOD_PATH) {
            const LVL_INNER: tracing::Level = $crate::logging::to_3rdparty_level!($lvl);
            tracing::dispatcher::with_default(assigner, || {
                tracing::event!(LVL_INNER, $($arg)+);
            });
        } else {
            println!("[WARN] no dispatcher routed for module path: {}", MOD_PATH);
            println!($($arg)+);
        }
    }};
}

pub(crate) use app_log_event;
pub(crate) use to_3rdparty_level;
