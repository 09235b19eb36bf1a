use std::ffi::OsString;
use std::process;

use cypress_cli::cli::run_with;
use cypress_cli::infrastructure::di::ServiceContainer;
use cypress_cli::infrastructure::traits::StdConsole;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    setup_logging();

    let args: Vec<OsString> = std::env::args_os().collect();
    let console = StdConsole;
    let code = run_with(&args, &console, || {
        let container = ServiceContainer::from_process()?;
        colored::control::set_override(container.probe.supports_color());
        Ok(container)
    });
    process::exit(code);
}

/// Logging is controlled by `RUST_LOG` (default: warn); output goes to stderr.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
    tracing::debug!("INIT: logger ready");
}
