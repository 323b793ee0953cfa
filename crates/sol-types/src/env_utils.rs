//! Environment variable parsing utilities.
//!
//! Configuration overrides come from `SOL_SANDBOX_*` variables. Blank values
//! count as unset; a value that is set but does not parse is an error rather
//! than a silent fallback.
//!
//! # Example
//!
//! ```
//! use sol_sandbox_types::env_utils::{env_nonempty, env_parse};
//!
//! let timeout: Option<u64> = env_parse("SOL_SANDBOX_TEST_TIMEOUT_MS").unwrap();
//! let network = env_nonempty("SOL_SANDBOX_NETWORK");
//! ```

use anyhow::{anyhow, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// `Ok(None)` if the variable is unset or blank.
pub fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    env_nonempty(key)
        .map(|raw| {
            raw.parse()
                .map_err(|err| anyhow!("Invalid {}=\"{}\": {}", key, raw, err))
        })
        .transpose()
}

/// Get a string environment variable, treating blank values as unset.
pub fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse() {
        std::env::set_var("SOL_TYPES_TEST_U64", " 42 ");
        let val: Option<u64> = env_parse("SOL_TYPES_TEST_U64").unwrap();
        assert_eq!(val, Some(42));

        let missing: Option<u64> = env_parse("SOL_TYPES_NONEXISTENT_1").unwrap();
        assert_eq!(missing, None);

        std::env::remove_var("SOL_TYPES_TEST_U64");
    }

    #[test]
    fn test_env_parse_reports_bad_value() {
        std::env::set_var("SOL_TYPES_TEST_BAD_U64", "forty");
        let err = env_parse::<u64>("SOL_TYPES_TEST_BAD_U64").unwrap_err();
        assert!(
            err.to_string().starts_with("Invalid SOL_TYPES_TEST_BAD_U64=\"forty\""),
            "{err}"
        );
        std::env::remove_var("SOL_TYPES_TEST_BAD_U64");
    }

    #[test]
    fn test_env_nonempty() {
        std::env::set_var("SOL_TYPES_TEST_BLANK", "   ");
        std::env::set_var("SOL_TYPES_TEST_NAME", "localhost");
        assert_eq!(env_nonempty("SOL_TYPES_TEST_BLANK"), None);
        assert_eq!(env_nonempty("SOL_TYPES_TEST_NAME").as_deref(), Some("localhost"));
        std::env::remove_var("SOL_TYPES_TEST_BLANK");
        std::env::remove_var("SOL_TYPES_TEST_NAME");
    }
}
