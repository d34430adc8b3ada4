//! Crate configuration.
//!
//! Settings are merged from `signalhound/config.toml` in the user's config
//! directory, a `SignalHound.toml` in the working directory, and
//! `SIGNALHOUND_*` environment variables, in that order of precedence.
//!
//! The block builders consult this for per-family device serial numbers when
//! none is given explicitly, so flowgraphs on multi-instrument hosts can be
//! pinned to specific hardware without code changes:
//!
//! ```toml
//! [sm]
//! serial = 20230042
//! ```
//!
//! or equivalently `SIGNALHOUND_SM_SERIAL=20230042`.

use std::str::FromStr;

use config::Config;
use config::Environment;
use config::File;
use once_cell::sync::Lazy;

static SETTINGS: Lazy<Config> = Lazy::new(|| {
    let mut settings = Config::builder();

    if let Some(mut path) = dirs::config_dir() {
        path.push("signalhound");
        path.push("config.toml");
        settings = settings.add_source(File::from(path).required(false));
    }

    settings = settings.add_source(File::with_name("SignalHound").required(false));
    settings = settings.add_source(Environment::with_prefix("SIGNALHOUND").separator("_"));

    match settings.build() {
        Ok(config) => config,
        Err(e) => {
            warn!("invalid configuration ignored ({e})");
            Config::default()
        }
    }
});

/// Try to parse a value from its configured string form.
pub fn get<T: FromStr>(name: &str) -> Option<T> {
    SETTINGS
        .get_string(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
}
