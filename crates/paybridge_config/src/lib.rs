use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Prefix for non-secret overrides, e.g. `PAYBRIDGE__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "PAYBRIDGE";

/// Loads the layered application configuration.
///
/// Sources, later ones winning:
/// 1. `<CONFIG_DIR>/default.*`
/// 2. `<CONFIG_DIR>/<RUN_ENV>.*`
/// 3. `PAYBRIDGE__*` environment variables
///
/// Secrets are resolved afterwards by [`apply_secret_overrides`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut config: AppConfig = builder.build()?.try_deserialize()?;
    apply_secret_overrides(&mut config);
    Ok(config)
}

/// Fills the Stripe secrets from the environment.
///
/// An environment value always wins. A configured value is kept unless it is
/// empty or the `secret_from_env` marker. When Stripe is enabled but has no
/// config section, a default section is created so env-only setups work.
pub fn apply_secret_overrides(config: &mut AppConfig) {
    if config.use_stripe && config.stripe.is_none() {
        config.stripe = Some(StripeConfig::default());
    }

    if let Some(stripe) = config.stripe.as_mut() {
        resolve_secret(&mut stripe.secret_key, "stripe.secret_key");
        resolve_secret(&mut stripe.webhook_secret, "stripe.webhook_secret");
    }
}

fn resolve_secret(slot: &mut Option<String>, path: &str) {
    if let Some(value) = env_vars::get_secret_env_var(path) {
        *slot = Some(value);
        return;
    }

    if matches!(slot.as_deref(), Some("") | Some(SECRET_FROM_ENV)) {
        warn!(
            "Secret {} not found in environment ({} or {})",
            path,
            env_vars::secret_path_to_env_var(path),
            env_vars::legacy_secret_path_to_env_var(path)
        );
        *slot = None;
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The path is taken from `DOTENV_OVERRIDE`, then from the first command line
/// argument if it starts with `.env`, and defaults to `.env`. Loading happens
/// at most once per process; a missing file is not an error.
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
