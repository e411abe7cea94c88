use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes test logging. Safe to call from every test; only the first
/// call installs the subscriber.
pub fn setup_tracing(filter: Option<&str>) {
    let default = "abide=INFO"
        .parse()
        .expect("hard-coded default directive should be valid");
    let builder = EnvFilter::builder().with_default_directive(default);

    // A bare level like "DEBUG" scopes to this crate, anything else is taken
    // as a full filter directive.
    let filter = match filter {
        Some(filter) => match Level::from_str(filter) {
            Ok(level) => builder.parse_lossy(format!("abide={level}")),
            Err(_) => builder.parse_lossy(filter),
        },
        None => builder.parse_lossy(""),
    };

    tracing_subscriber::registry()
        .with(fmt::Layer::default())
        .with(filter)
        .try_init()
        .ok();
}
