use core::fmt;

use serde::{de, Deserialize, Deserializer};

use crate::{calibrate::Calibration, gesture::MAX_TAP_DURATION_MS};

pub const DEFAULT_SLEEP_TIMEOUT_MS: u32 = 30_000;
pub const DEFAULT_DEBOUNCE_THRESHOLD_MS: u32 = 20;

/// When calibrated points reach the output sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Forward every admitted sample on the tick it arrives. A release clears the
    /// sink's current contact but cannot recall points it already received.
    #[default]
    Immediate,
    /// Hold a contact's points until it has lasted `debounce_threshold`, so
    /// ghost touches never reach the sink.
    Debounced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentioConfig {
    pub display_width: u16,
    pub display_height: u16,
    #[serde(
        rename = "sleep_timeout",
        default = "default_sleep_timeout_ms",
        deserialize_with = "deserialize_duration_ms"
    )]
    pub sleep_timeout_ms: u32,
    #[serde(default = "default_true")]
    pub suppress_wake_click: bool,
    #[serde(default)]
    pub swap_xy: bool,
    #[serde(default)]
    pub invert_x: bool,
    #[serde(default)]
    pub invert_y: bool,
    #[serde(
        rename = "debounce_threshold",
        default = "default_debounce_threshold_ms",
        deserialize_with = "deserialize_duration_ms"
    )]
    pub debounce_threshold_ms: u32,
    #[serde(default)]
    pub debug_raw_touch: bool,
    #[serde(default)]
    pub output_policy: OutputPolicy,
}

impl SentioConfig {
    pub const fn new(display_width: u16, display_height: u16) -> Self {
        Self {
            display_width,
            display_height,
            sleep_timeout_ms: DEFAULT_SLEEP_TIMEOUT_MS,
            suppress_wake_click: true,
            swap_xy: false,
            invert_x: false,
            invert_y: false,
            debounce_threshold_ms: DEFAULT_DEBOUNCE_THRESHOLD_MS,
            debug_raw_touch: false,
            output_policy: OutputPolicy::Immediate,
        }
    }

    pub const fn calibration(&self) -> Calibration {
        Calibration {
            display_width: self.display_width,
            display_height: self.display_height,
            swap_xy: self.swap_xy,
            invert_x: self.invert_x,
            invert_y: self.invert_y,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_width == 0 {
            return Err(ConfigError::ZeroDisplayWidth);
        }
        if self.display_height == 0 {
            return Err(ConfigError::ZeroDisplayHeight);
        }
        if self.debounce_threshold_ms >= MAX_TAP_DURATION_MS {
            log::warn!(
                "debounce_threshold {}ms >= tap window {}ms; taps can never fire",
                self.debounce_threshold_ms,
                MAX_TAP_DURATION_MS
            );
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    ZeroDisplayWidth,
    ZeroDisplayHeight,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDisplayWidth => f.write_str("display_width must be positive"),
            Self::ZeroDisplayHeight => f.write_str("display_height must be positive"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationParseError {
    Empty,
    Negative,
    InvalidNumber,
    UnknownUnit,
    Overflow,
}

impl fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "empty duration",
            Self::Negative => "duration must not be negative",
            Self::InvalidNumber => "duration must start with an integer",
            Self::UnknownUnit => "unknown duration unit (expected ms, s, min or h)",
            Self::Overflow => "duration does not fit in 32-bit milliseconds",
        };
        f.write_str(msg)
    }
}

/// Parses `"20ms"`, `"30s"`, `"5min"`, `"1h"` or a bare integer of milliseconds.
pub fn parse_duration_ms(text: &str) -> Result<u32, DurationParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if text.starts_with('-') {
        return Err(DurationParseError::Negative);
    }

    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, unit) = text.split_at(digits_end);
    if digits.is_empty() {
        return Err(DurationParseError::InvalidNumber);
    }
    let value: u32 = digits.parse().map_err(|_| DurationParseError::Overflow)?;

    let scale: u32 = match unit.trim() {
        "" | "ms" => 1,
        "s" => 1_000,
        "min" => 60_000,
        "h" => 3_600_000,
        _ => return Err(DurationParseError::UnknownUnit),
    };
    value
        .checked_mul(scale)
        .ok_or(DurationParseError::Overflow)
}

fn default_true() -> bool {
    true
}

fn default_sleep_timeout_ms() -> u32 {
    DEFAULT_SLEEP_TIMEOUT_MS
}

fn default_debounce_threshold_ms() -> u32 {
    DEFAULT_DEBOUNCE_THRESHOLD_MS
}

fn deserialize_duration_ms<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl de::Visitor<'_> for DurationVisitor {
    type Value = u32;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("milliseconds as an integer or a string like \"30s\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u32, E> {
        u32::try_from(value).map_err(|_| E::custom(DurationParseError::Overflow))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u32, E> {
        if value < 0 {
            return Err(E::custom(DurationParseError::Negative));
        }
        u32::try_from(value).map_err(|_| E::custom(DurationParseError::Overflow))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u32, E> {
        parse_duration_ms(value).map_err(E::custom)
    }
}
