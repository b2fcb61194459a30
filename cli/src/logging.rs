//! Log output for the command line.
//!
//! The library logs through the `log` facade; this installs a
//! `tracing-subscriber` formatter that also captures those records. Output
//! goes to stderr so stdout stays clean for generated code.
//!
//! `ANGL_LOG` takes precedence over `RUST_LOG`; both use the usual filter
//! syntax (`debug`, `angl_core::scope=trace`). With neither set, `--verbose`
//! turns on `debug` and otherwise nothing is installed.

use tracing_subscriber::EnvFilter;

fn build_filter(verbose: bool) -> Option<EnvFilter> {
    if let Ok(val) = std::env::var("ANGL_LOG") {
        return Some(EnvFilter::builder().parse_lossy(val));
    }
    if std::env::var("RUST_LOG").is_ok() {
        return Some(EnvFilter::from_default_env());
    }
    if verbose {
        return Some(EnvFilter::new("debug"));
    }
    None
}

pub fn init_logging(verbose: bool) {
    let Some(filter) = build_filter(verbose) else {
        return;
    };
    // try_init: a second call (tests) must not panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
