//! Environment lookup helpers shared by the config sections.

use std::str::FromStr;

use crate::error::ConfigError;

/// Read an environment variable, treating empty values as unset.
pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "value is not valid UTF-8".to_string(),
        }),
    }
}

/// Parse an optional environment variable, falling back to `default`.
pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
        .map(|v| v.unwrap_or(default))
}

/// Whether a raw value reads as "on": `true`, `1` or `yes`, case-insensitive.
///
/// Anything else, including typos, reads as off.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// Read a boolean-ish feature flag. Unset or unreadable means off.
pub(crate) fn parse_flag_env(key: &str) -> bool {
    std::env::var(key).map(|v| is_truthy(&v)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy_accepts_common_spellings() {
        for value in ["true", "TRUE", "True", "1", "yes", "YES", " yes "] {
            assert!(is_truthy(value), "{value:?} should be truthy");
        }
    }

    #[test]
    fn test_is_truthy_rejects_everything_else() {
        for value in ["", "false", "0", "no", "on", "y", "truthy"] {
            assert!(!is_truthy(value), "{value:?} should not be truthy");
        }
    }
}
