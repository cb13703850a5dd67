//! Build-time client configuration.
use clicker_core::ClientConfig;

/// Configuration baked into the bundle.
///
/// `static/config.json` provides the defaults, `CLICKER_API_URL` (read at
/// compile time) overrides the service URL, and debug builds always enable
/// development mode.
#[must_use]
pub fn client_config() -> ClientConfig {
    resolve_config(
        include_str!("../static/config.json"),
        option_env!("CLICKER_API_URL"),
        cfg!(debug_assertions),
    )
}

fn resolve_config(json: &str, api_override: Option<&str>, debug_build: bool) -> ClientConfig {
    let config = ClientConfig::from_json(json).unwrap_or_else(|err| {
        log::warn!("Invalid bundled config, using defaults: {err}");
        ClientConfig::default()
    });
    let dev_mode = config.dev_mode || debug_build;
    config.with_api_override(api_override).with_dev_mode(dev_mode)
}
