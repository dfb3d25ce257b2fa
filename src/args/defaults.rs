pub(crate) const DEFAULT_USER_AGENT: &str = concat!("barrage-loadtest/", env!("CARGO_PKG_VERSION"));

/// Config files picked up from the working directory when `--config` is not
/// given, in lookup order.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["barrage.toml", "barrage.json"];
