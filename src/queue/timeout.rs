//! Wait budgets for blocking queue operations
//!
//! Every blocking call on [`BoundedQueue`](crate::queue::BoundedQueue) takes a
//! [`Timeout`]. The budget is converted into a [`Deadline`] once, on entry, so
//! that spurious wakeups and repeated waits draw from the same budget instead
//! of restarting it.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// How long a blocking `put`/`get` may wait before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeout {
    /// Wait until the operation can complete or the queue is shut down
    #[default]
    Unbounded,
    /// Never wait; fail immediately if the operation cannot complete
    NonBlocking,
    /// Wait at most the given duration
    After(Duration),
}

impl Timeout {
    /// Bounded wait expressed in milliseconds (`0` is non-blocking)
    pub fn from_millis(millis: u64) -> Self {
        Self::from(Duration::from_millis(millis))
    }

    /// Returns true if this budget never suspends the caller
    pub fn is_non_blocking(&self) -> bool {
        match self {
            Timeout::NonBlocking => true,
            Timeout::After(duration) => duration.is_zero(),
            Timeout::Unbounded => false,
        }
    }

    /// The bounded duration, if any
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Timeout::Unbounded => None,
            Timeout::NonBlocking => Some(Duration::ZERO),
            Timeout::After(duration) => Some(*duration),
        }
    }

    pub(crate) fn start(self) -> Deadline {
        match self {
            Timeout::Unbounded => Deadline::Never,
            Timeout::NonBlocking => Deadline::Elapsed,
            Timeout::After(duration) if duration.is_zero() => Deadline::Elapsed,
            // An unrepresentable deadline is as good as no deadline
            Timeout::After(duration) => match Instant::now().checked_add(duration) {
                Some(at) => Deadline::At(at),
                None => Deadline::Never,
            },
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        if duration.is_zero() {
            Timeout::NonBlocking
        } else {
            Timeout::After(duration)
        }
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(Timeout::Unbounded, Timeout::from)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeout::Unbounded => write!(f, "unbounded"),
            Timeout::NonBlocking => write!(f, "0ms"),
            Timeout::After(duration) => fmt_duration(*duration, f),
        }
    }
}

/// Whole milliseconds as `{n}ms`, anything finer as exact decimal seconds
fn fmt_duration(duration: Duration, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let nanos = duration.subsec_nanos();
    if nanos % 1_000_000 == 0 {
        let millis = duration
            .as_secs()
            .checked_mul(1000)
            .and_then(|ms| ms.checked_add(u64::from(nanos / 1_000_000)));
        if let Some(millis) = millis {
            return write!(f, "{}ms", millis);
        }
    }
    if nanos == 0 {
        write!(f, "{}s", duration.as_secs())
    } else {
        let fraction = format!("{:09}", nanos);
        write!(f, "{}.{}s", duration.as_secs(), fraction.trim_end_matches('0'))
    }
}

/// Seconds as written: exact for plain decimals, `f64` for exponent forms
fn parse_seconds(text: &str) -> Option<Duration> {
    if let Some(exact) = parse_decimal_seconds(text) {
        return Some(exact);
    }
    let secs: f64 = text.parse().ok()?;
    if secs.is_sign_negative() {
        return None;
    }
    // Out-of-range and non-finite values are rejected here rather than panicking
    Duration::try_from_secs_f64(secs).ok()
}

fn parse_decimal_seconds(text: &str) -> Option<Duration> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 9 || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs = if whole.is_empty() { 0 } else { whole.parse::<u64>().ok()? };
    let nanos = if fraction.is_empty() {
        0
    } else {
        format!("{:0<9}", fraction).parse::<u32>().ok()?
    };
    Some(Duration::new(secs, nanos))
}

/// Error returned when a timeout string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid timeout '{input}': expected 'unbounded', milliseconds, or a value ending in 'ms' or 's'")]
pub struct ParseTimeoutError {
    pub input: String,
}

impl FromStr for Timeout {
    type Err = ParseTimeoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let err = || ParseTimeoutError {
            input: s.to_string(),
        };

        match trimmed.as_str() {
            "unbounded" | "none" | "forever" => return Ok(Timeout::Unbounded),
            "" => return Err(err()),
            _ => {}
        }

        let duration = if let Some(ms) = trimmed.strip_suffix("ms") {
            Duration::from_millis(ms.trim().parse().map_err(|_| err())?)
        } else if let Some(secs) = trimmed.strip_suffix('s') {
            parse_seconds(secs.trim()).ok_or_else(err)?
        } else {
            Duration::from_millis(trimmed.parse().map_err(|_| err())?)
        };

        Ok(Timeout::from(duration))
    }
}

/// Remaining wait budget for a single blocking call
#[derive(Debug, Clone, Copy)]
pub(crate) enum Deadline {
    Never,
    Elapsed,
    At(Instant),
}

/// What the caller may do next with its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wait {
    Forever,
    For(Duration),
    Expired,
}

impl Deadline {
    pub(crate) fn remaining(&self) -> Wait {
        match self {
            Deadline::Never => Wait::Forever,
            Deadline::Elapsed => Wait::Expired,
            Deadline::At(at) => {
                let now = Instant::now();
                if now >= *at {
                    Wait::Expired
                } else {
                    Wait::For(*at - now)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_keywords() {
        assert_eq!("unbounded".parse::<Timeout>().unwrap(), Timeout::Unbounded);
        assert_eq!("None".parse::<Timeout>().unwrap(), Timeout::Unbounded);
        assert_eq!("forever".parse::<Timeout>().unwrap(), Timeout::Unbounded);
    }

    #[test]
    fn test_parse_timeout_durations() {
        assert_eq!("0".parse::<Timeout>().unwrap(), Timeout::NonBlocking);
        assert_eq!(
            "250".parse::<Timeout>().unwrap(),
            Timeout::After(Duration::from_millis(250))
        );
        assert_eq!(
            "40ms".parse::<Timeout>().unwrap(),
            Timeout::After(Duration::from_millis(40))
        );
        assert_eq!(
            "1.5s".parse::<Timeout>().unwrap(),
            Timeout::After(Duration::from_millis(1500))
        );
        assert_eq!("0s".parse::<Timeout>().unwrap(), Timeout::NonBlocking);
        assert_eq!(
            "0.0005s".parse::<Timeout>().unwrap(),
            Timeout::After(Duration::from_micros(500))
        );
        assert_eq!(
            "2e-3s".parse::<Timeout>().unwrap(),
            Timeout::After(Duration::from_millis(2))
        );
    }

    #[test]
    fn test_parse_timeout_rejects_garbage() {
        assert!("".parse::<Timeout>().is_err());
        assert!("soon".parse::<Timeout>().is_err());
        assert!("-5".parse::<Timeout>().is_err());
        assert!("-1s".parse::<Timeout>().is_err());
        assert!("1e30s".parse::<Timeout>().is_err());
        assert!("99999999999999999999s".parse::<Timeout>().is_err());
        assert!("infs".parse::<Timeout>().is_err());
        assert!("nans".parse::<Timeout>().is_err());
        assert!(".s".parse::<Timeout>().is_err());

        let err = "later".parse::<Timeout>().unwrap_err();
        assert_eq!(err.input, "later");
    }

    #[test]
    fn test_zero_duration_is_non_blocking() {
        assert!(Timeout::from(Duration::ZERO).is_non_blocking());
        assert!(Timeout::After(Duration::ZERO).is_non_blocking());
        assert!(!Timeout::Unbounded.is_non_blocking());
        assert_eq!(Timeout::from(None), Timeout::Unbounded);
    }

    #[test]
    fn test_deadline_budget() {
        assert_eq!(Timeout::Unbounded.start().remaining(), Wait::Forever);
        assert_eq!(Timeout::NonBlocking.start().remaining(), Wait::Expired);

        match Timeout::from_millis(500).start().remaining() {
            Wait::For(left) => assert!(left <= Duration::from_millis(500)),
            other => panic!("Expected bounded wait, got {:?}", other),
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for timeout in [
            Timeout::Unbounded,
            Timeout::NonBlocking,
            Timeout::After(Duration::from_millis(75)),
            Timeout::After(Duration::from_micros(500)),
            Timeout::After(Duration::new(3, 1)),
            Timeout::After(Duration::from_secs(u64::MAX)),
        ] {
            assert_eq!(timeout.to_string().parse::<Timeout>().unwrap(), timeout);
        }
    }

    #[test]
    fn test_display_keeps_sub_millisecond_precision() {
        assert_eq!(Timeout::After(Duration::from_micros(500)).to_string(), "0.0005s");
        assert_eq!(Timeout::After(Duration::from_millis(1500)).to_string(), "1500ms");
        assert_eq!(Timeout::After(Duration::new(3, 1)).to_string(), "3.000000001s");
        assert_eq!(
            Timeout::After(Duration::from_secs(u64::MAX)).to_string(),
            format!("{}s", u64::MAX)
        );
    }
}
