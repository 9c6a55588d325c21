//! Human-readable durations (`1h30m`, `1.5s`, `300ms`).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::reflect::ScalarCodec;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// One `<number><unit>` component of a duration string.
const COMPONENT_PATTERN: &str = r"(\d+)(?:\.(\d*))?(ns|us|µs|μs|ms|s|m|h)|\.(\d+)(ns|us|µs|μs|ms|s|m|h)";

static COMPONENT: OnceLock<Result<Regex, String>> = OnceLock::new();

fn component_regex() -> Result<&'static Regex, String> {
    COMPONENT
        .get_or_init(|| Regex::new(COMPONENT_PATTERN).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

/// A duration configured as text.
///
/// Accepts a bare integer (seconds) or a sequence of decimal numbers with
/// units `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. Formats the way Go's
/// `time.Duration` prints, so every formatted value parses back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(pub std::time::Duration);

impl Duration {
    /// Creates a duration of whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(std::time::Duration::from_secs(secs))
    }

    /// Creates a duration of whole milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(std::time::Duration::from_millis(millis))
    }

    /// Returns the standard library duration.
    #[must_use]
    pub const fn as_std(&self) -> std::time::Duration {
        self.0
    }
}

impl From<std::time::Duration> for Duration {
    fn from(value: std::time::Duration) -> Self {
        Self(value)
    }
}

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0.as_nanos()))
    }
}

impl ScalarCodec for Duration {
    const NAME: &'static str = "duration";

    fn parse_from_str(text: &str) -> Result<Self, String> {
        if text.is_empty() {
            return Err("empty duration".to_string());
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            let secs = text.parse::<u64>().map_err(|e| e.to_string())?;
            return Ok(Self::from_secs(secs));
        }
        parse_components(text).map(Self)
    }

    fn format_to_string(&self) -> String {
        self.to_string()
    }
}

crate::custom_scalar!(Duration);

fn parse_components(text: &str) -> Result<std::time::Duration, String> {
    let invalid = || format!("invalid duration {text:?}");
    let regex = component_regex()?;

    let mut total: u128 = 0;
    let mut consumed = 0;
    for caps in regex.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() != consumed {
            return Err(invalid());
        }
        consumed = whole.end();

        let integer = caps.get(1).map_or("", |m| m.as_str());
        let fraction = caps.get(2).or_else(|| caps.get(4)).map_or("", |m| m.as_str());
        let unit = caps
            .get(3)
            .or_else(|| caps.get(5))
            .map(|m| unit_nanos(m.as_str()))
            .ok_or_else(invalid)?;

        let integer: u128 = if integer.is_empty() {
            0
        } else {
            integer.parse().map_err(|_| invalid())?
        };
        total = integer
            .checked_mul(unit)
            .and_then(|n| n.checked_add(total))
            .and_then(|n| n.checked_add(fraction_nanos(fraction, unit)))
            .ok_or_else(invalid)?;
    }

    if consumed == 0 || consumed != text.len() {
        return Err(invalid());
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid())?;
    let subsec = u32::try_from(total % NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(std::time::Duration::new(secs, subsec))
}

fn unit_nanos(unit: &str) -> u128 {
    match unit {
        "ns" => 1,
        "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SEC,
        "m" => NANOS_PER_MIN,
        "h" => NANOS_PER_HOUR,
        _ => NANOS_PER_MICRO,
    }
}

/// Scales a decimal fraction (`"5"` for `.5`) by `unit`, truncating below
/// one nanosecond. Digits past the 18th are ignored.
fn fraction_nanos(digits: &str, unit: u128) -> u128 {
    let mut scale: u128 = 1;
    let mut value: u128 = 0;
    for digit in digits.bytes().take(18) {
        value = value * 10 + u128::from(digit - b'0');
        scale *= 10;
    }
    value * unit / scale
}

fn format_duration(nanos: u128) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", decimal(nanos, NANOS_PER_MICRO));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, NANOS_PER_MILLI));
    }

    let hours = nanos / NANOS_PER_HOUR;
    let minutes = nanos % NANOS_PER_HOUR / NANOS_PER_MIN;
    let seconds = decimal(nanos % NANOS_PER_MIN, NANOS_PER_SEC);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Renders `value / unit` with the fractional digits trimmed.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let rest = value % unit;
    if rest == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let fraction = format!("{rest:0width$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
