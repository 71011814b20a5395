//! Environment variable handling for secrets.
//!
//! Secrets are looked up under a namespaced name first
//! (`PAYBRIDGE_SECRET_STRIPE_SECRET_KEY`) and then under the provider's
//! conventional name (`STRIPE_SECRET_KEY`).

use std::env;

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "PAYBRIDGE_SECRET";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Convert a secret path to an environment variable name
///
/// # Arguments
///
/// * `path` - The secret path (e.g., "stripe.secret_key")
///
/// # Returns
///
/// The environment variable name (e.g., "PAYBRIDGE_SECRET_STRIPE_SECRET_KEY")
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to the provider's conventional variable name
///
/// # Arguments
///
/// * `path` - The secret path (e.g., "stripe.webhook_secret")
///
/// # Returns
///
/// The environment variable name (e.g., "STRIPE_WEBHOOK_SECRET")
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a secret path
///
/// Tries the namespaced name first and falls back to the conventional one.
/// Empty values count as unset.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    let non_empty = |name: String| env::var(name).ok().filter(|v| !v.is_empty());

    non_empty(secret_path_to_env_var(path))
        .or_else(|| non_empty(legacy_secret_path_to_env_var(path)))
}
