//! Environment variable parsing helpers.

use std::env;

/// Error type for environment variable parsing.
pub type EnvError = Box<dyn std::error::Error + Send + Sync>;

/// Read an environment variable as a string, with a default value.
///
/// # Errors
///
/// Returns an error if the value contains invalid Unicode.
pub fn env_str(name: &str, default: &str) -> Result<String, EnvError> {
    match env::var(name) {
        Ok(v) => Ok(v),
        Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(format!("{name}: {e}").into()),
    }
}

/// Parse an environment variable as a u32, with a default value.
///
/// # Errors
///
/// Returns an error if the environment variable is set to an invalid value,
/// or if the value contains invalid Unicode.
pub fn env_u32(name: &str, default: u32) -> Result<u32, EnvError> {
    let value = match env::var(name) {
        Ok(v) => v,
        Err(env::VarError::NotPresent) => return Ok(default),
        Err(e) => return Err(format!("{name}: {e}").into()),
    };

    value.parse().map_err(|e| format!("{name}: {e}").into())
}

/// Parse an environment variable as a boolean, with a default value.
///
/// Valid values (case-insensitive): "true", "1", "false", "0".
/// Returns an error for any other value to prevent misconfiguration.
///
/// # Errors
///
/// Returns an error if the environment variable is set to an invalid value,
/// or if the value contains invalid Unicode.
pub fn env_bool(name: &str, default: bool) -> Result<bool, EnvError> {
    let value = match env::var(name) {
        Ok(v) => v,
        Err(env::VarError::NotPresent) => return Ok(default),
        Err(e) => return Err(format!("{name}: {e}").into()),
    };

    match value.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(format!(
            "{name}: invalid value '{value}' (expected 'true', 'false', '1', or '0')"
        )
        .into()),
    }
}
