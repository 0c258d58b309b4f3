use std::sync::Mutex;

use tracing_subscriber::{
    fmt::format::FmtSpan, prelude::*, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

lazy_static! {
    static ref LOGGING_INITIALIZED: Mutex<bool> = Mutex::new(false);
}

/// Initialize logging.  Nothing is emitted unless the environment variable
/// `RUST_LOG` is set to a non-empty value, in which case it is interpreted as
/// an `EnvFilter` directive.  Calling this more than once is harmless.
pub fn init_logging() {
    let mut initialized = match LOGGING_INITIALIZED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *initialized {
        return;
    }
    *initialized = true;

    let mut layers = Vec::new();
    // Our test scripts frequently set RUST_LOG unconditionally but with an
    // empty value, and that shouldn't turn logging on.
    if let Ok(rustlog) = std::env::var("RUST_LOG") {
        if !rustlog.is_empty() {
            if let Ok(env_filter) = EnvFilter::try_from_default_env() {
                let layer = tracing_subscriber::fmt::layer()
                    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
                    .compact()
                    // Output ends up in log files, where ANSI is just noise.
                    .with_ansi(false)
                    .without_time()
                    .with_writer(std::io::stderr)
                    .with_filter(env_filter)
                    .boxed();
                layers.push(layer);
            }
        }
    }

    // Another subscriber may already be installed (e.g. by a test harness).
    if Registry::default().with(layers).try_init().is_err() {
        debug!("A global tracing subscriber was already installed");
    }
}

#[test]
fn test_init_logging_twice() {
    init_logging();
    init_logging();
    assert!(*LOGGING_INITIALIZED.lock().unwrap());
}
