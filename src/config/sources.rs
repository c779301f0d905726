//! Settings sources, lowest precedence first: global file, local file, environment.

use super::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;

pub const LOCAL_CONFIG_FILE: &str = "repledger.toml";

/// `$XDG_CONFIG_HOME/repledger/config.toml`, optional
pub fn add_global_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match paths::global_config_file() {
        Some(path) => builder.add_source(File::from(path).required(false)),
        None => builder,
    }
}

/// `<dir>/repledger.toml`, optional
pub fn add_local_file(builder: ConfigBuilder<DefaultState>, dir: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(dir.join(LOCAL_CONFIG_FILE)).required(false))
}

/// An explicit file the operator asked for; must exist
pub fn add_explicit_file(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(true))
}

/// REPLEDGER__SECTION__KEY variables, e.g. `REPLEDGER__STORAGE__PATH` or
/// `REPLEDGER__LOGGING__OUTPUT`
pub fn environment() -> Environment {
    Environment::with_prefix("REPLEDGER")
        .separator("__")
        .try_parsing(true)
}

pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(environment())
}
