//! Environment variable naming for the Expo configuration.
//!
//! Plain settings follow `EXPO__SECTION__KEY`, secrets follow
//! `EXPO_SECRET_SECTION_KEY` with a fallback to the short `SECTION_KEY` form
//! (e.g. `FIREBASE_API_KEY`).

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "EXPO";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "EXPO_SECRET";

pub const CONFIG_SEPARATOR: &str = "__";
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// `"server.host"` → `"EXPO__SERVER__HOST"`
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// `"firebase.api_key"` → `"EXPO_SECRET_FIREBASE_API_KEY"`
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// `"firebase.api_key"` → `"FIREBASE_API_KEY"`
pub fn short_secret_path_to_env_var(path: &str) -> String {
    path.replace('.', SECRET_SEPARATOR).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    env::var(config_path_to_env_var(path)).ok()
}

/// Get an environment variable for a secret path, trying the prefixed name
/// first and the short name second.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }
    env::var(short_secret_path_to_env_var(path)).ok()
}
