use crate::conf;
use crate::erx::{Erx, Layouted, PreL4, ResultE};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber: EnvFilter from `log.level`, an ansi console
/// layer when `log.console`, and a daily rolling `{dirs}/{name}_admin.log`
/// when `log.dirs` is set.
///
/// The returned guards flush the non-blocking writers on drop, keep them for
/// the life of the process.
pub async fn logging_initialize(name: &str, log: &conf::Log) -> ResultE<Vec<WorkerGuard>> {
    let mut guards: Vec<WorkerGuard> = vec![];

    let console = if log.console {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        Some(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(true))
    } else {
        None
    };

    let logs_dir = log.dirs.trim();
    let persist = if !logs_dir.is_empty() {
        let is_dir = tokio::fs::metadata(logs_dir).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(log_erx("0001", &format!("log dir is not a directory: {}", logs_dir)));
        }

        let prefix = format!("{}_admin.log", name);
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, prefix));
        guards.push(guard);
        Some(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
    } else {
        None
    };

    let filter = tracing_subscriber::EnvFilter::try_new(log.level.as_str())
        .map_err(|e| log_erx("0002", &format!("bad log level `{}`: {}", log.level, e)))?;

    tracing_subscriber::registry()
        .with(console)
        .with(persist)
        .with(filter)
        .try_init()
        .map_err(|e| log_erx("0003", &format!("subscriber already set: {}", e)))?;

    Ok(guards)
}

fn log_erx(detail: &str, message: &str) -> Erx {
    Erx::with_code(Layouted::common(PreL4::CONF.four(), detail), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_log_dir_fails() {
        let log = conf::Log { level: "info".into(), console: false, dirs: "/definitely/not/here".into() };
        let err = logging_initialize("test", &log).await.unwrap_err();
        assert_eq!(err.code().get_detail(), "0001");
    }
}
