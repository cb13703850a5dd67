//! Deployment base path handling.
//!
//! `PUBLIC_URL` is read at compile time (e.g. `/clicker` when the app is served
//! from a sub-directory of a bot's web host). Without it everything is rooted at `/`.

fn public_url() -> &'static str {
    option_env!("PUBLIC_URL").unwrap_or("")
}

fn normalized_base(base: &str) -> &str {
    base.trim().trim_end_matches('/')
}

/// URL of a bundled static asset.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    join_base(public_url(), relative)
}

/// Base path for the router, `None` when hosted at the root.
#[must_use]
pub fn router_base() -> Option<String> {
    let base = normalized_base(public_url());
    (!base.is_empty()).then(|| base.to_string())
}

fn join_base(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        normalized_base(base),
        relative.trim_start_matches('/')
    )
}
