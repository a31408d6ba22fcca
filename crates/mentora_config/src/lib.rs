use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;

pub mod models;
pub use models::*;

#[cfg(test)]
mod models_test;

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the dotenv file is loaded into the environment exactly once.
///
/// The path can be overridden with `DOTENV_OVERRIDE` or by passing a
/// filename starting with `.env` as the first command line argument.
/// Returns the path that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

/// Loads the application configuration.
///
/// Sources are layered in order: `config/default`, then the optional
/// `config/{RUN_ENV}` file (`RUN_ENV` defaults to `development`), then
/// environment variables prefixed with `MENTORA` using `__` as section
/// separator, e.g. `MENTORA__SERVER__PORT=9000`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("MENTORA").separator("__"))
        .build()?
        .try_deserialize()
}
