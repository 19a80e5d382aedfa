//! The host framework's configuration capability set.

use crate::core::ListenerRef;
use crate::error::{ConfigError, Result};
use std::time::Duration;

/// Timeout passed by the typed accessors to [`Configuration::get_latest_config`].
pub const DEFAULT_CONFIG_TIMEOUT: Duration = Duration::from_millis(5 * 1000);

/// A named provider of key-value configuration data.
///
/// Implementors supply raw lookup, write operations, and listener management.
/// Typed accessors are provided on top of [`get_latest_config`].
///
/// [`get_latest_config`]: Configuration::get_latest_config
pub trait Configuration: Send + Sync {
    /// Identifier of this configuration kind (e.g. `"file"`, `"servicecomb"`).
    fn type_name(&self) -> &str;

    /// Latest value for `data_id`, or `default_value` when absent.
    fn get_latest_config(
        &self,
        data_id: &str,
        default_value: Option<&str>,
        timeout: Duration,
    ) -> Option<String>;

    /// Store `content` under `data_id`.
    fn put_config(&self, data_id: &str, content: &str, timeout: Duration) -> Result<bool>;

    /// Store `content` under `data_id` only if no value exists yet.
    fn put_config_if_absent(&self, data_id: &str, content: &str, timeout: Duration)
    -> Result<bool>;

    /// Remove the value stored under `data_id`.
    fn remove_config(&self, data_id: &str, timeout: Duration) -> Result<bool>;

    /// Register `listener` for changes of `data_id`.
    fn add_config_listener(&self, data_id: &str, listener: ListenerRef);

    /// Unregister `listener` from `data_id`. Unknown listeners are ignored.
    fn remove_config_listener(&self, data_id: &str, listener: &ListenerRef);

    /// Listeners registered for `data_id`, or `None` when there are none.
    fn get_config_listeners(&self, data_id: &str) -> Option<Vec<ListenerRef>>;

    /// Value for `data_id`, if present.
    fn get_config(&self, data_id: &str) -> Option<String> {
        self.get_latest_config(data_id, None, DEFAULT_CONFIG_TIMEOUT)
    }

    /// Value for `data_id`, or `default_value` when absent.
    fn get_config_or(&self, data_id: &str, default_value: &str) -> String {
        self.get_latest_config(data_id, Some(default_value), DEFAULT_CONFIG_TIMEOUT)
            .unwrap_or_else(|| default_value.to_string())
    }

    /// Boolean value for `data_id`.
    ///
    /// A present value is `true` only if it equals `"true"` ignoring case.
    fn get_bool(&self, data_id: &str, default_value: bool) -> bool {
        match self.get_config(data_id) {
            Some(value) => parse_bool(&value),
            None => default_value,
        }
    }

    /// 32-bit integer value for `data_id`.
    fn get_int(&self, data_id: &str, default_value: i32) -> Result<i32> {
        match self.get_config(data_id) {
            Some(value) => value.trim().parse().map_err(|e| {
                ConfigError::ParseError(format!("'{}' is not an integer ({}): {}", data_id, value, e))
            }),
            None => Ok(default_value),
        }
    }

    /// 64-bit integer value for `data_id`.
    fn get_long(&self, data_id: &str, default_value: i64) -> Result<i64> {
        match self.get_config(data_id) {
            Some(value) => value.trim().parse().map_err(|e| {
                ConfigError::ParseError(format!("'{}' is not an integer ({}): {}", data_id, value, e))
            }),
            None => Ok(default_value),
        }
    }

    /// Duration value for `data_id`. See [`parse_duration`] for the format.
    fn get_duration(&self, data_id: &str, default_value: Duration) -> Result<Duration> {
        match self.get_config(data_id) {
            Some(value) => parse_duration(&value),
            None => Ok(default_value),
        }
    }
}

/// Parse a boolean: exactly `"true"`, in any case, is `true`; anything else,
/// including surrounding whitespace, is `false`.
pub fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Parse a duration such as `"1500"`, `"500ms"`, `"10s"`, `"5m"`, `"2h"`, `"1d"`.
///
/// A bare number is interpreted as milliseconds.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] for empty input, a missing number, or
/// an unknown unit.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);

    let amount: u64 = number
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("invalid duration: '{}'", value)))?;

    let scale: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "ms" => 1,
        "s" => 1000,
        "m" => 60 * 1000,
        "h" => 60 * 60 * 1000,
        "d" => 24 * 60 * 60 * 1000,
        other => {
            return Err(ConfigError::ParseError(format!(
                "unknown duration unit '{}' in '{}'",
                other, value
            )));
        }
    };
    let millis = amount
        .checked_mul(scale)
        .ok_or_else(|| ConfigError::ParseError(format!("duration out of range: '{}'", value)))?;
    Ok(Duration::from_millis(millis))
}
