//! Small policy enums that tune queue and worker behavior.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string names none of a policy's choices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown value '{value}': expected {expected}")]
pub struct ParseChoiceError {
    /// The rejected input
    pub value: String,
    /// Human-readable list of accepted values
    pub expected: &'static str,
}

/// Which end of the queue workers pop from.
///
/// Calls are always appended at the tail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueueOrder {
    /// Pop from the tail: the most recently queued call goes first.
    #[default]
    Lifo,
    /// Pop from the head: calls go out in arrival order.
    Fifo,
}

/// What happens when a bounded queue is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Reject the incoming call.
    #[default]
    DropNewest,
    /// Evict the oldest queued call to make room.
    DropOldest,
}

/// How a drain loop reacts to a failed call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// End the drain loop. Remaining calls wait for the next pool refresh.
    #[default]
    StopWorker,
    /// Log the failure and move on to the next call.
    Continue,
}

impl QueueOrder {
    const EXPECTED: &'static str = "lifo or fifo";

    /// Returns the configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lifo => "lifo",
            Self::Fifo => "fifo",
        }
    }
}

impl OverflowPolicy {
    const EXPECTED: &'static str = "drop-newest or drop-oldest";

    /// Returns the configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DropNewest => "drop-newest",
            Self::DropOldest => "drop-oldest",
        }
    }
}

impl FailurePolicy {
    const EXPECTED: &'static str = "stop-worker or continue";

    /// Returns the configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StopWorker => "stop-worker",
            Self::Continue => "continue",
        }
    }
}

/// Normalizes `snake_case` and `kebab-case` spellings to lower kebab-case.
fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('_', "-")
}

impl FromStr for QueueOrder {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "lifo" | "stack" => Ok(Self::Lifo),
            "fifo" | "queue" => Ok(Self::Fifo),
            _ => Err(ParseChoiceError {
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "drop-newest" => Ok(Self::DropNewest),
            "drop-oldest" => Ok(Self::DropOldest),
            _ => Err(ParseChoiceError {
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "stop-worker" | "stop" => Ok(Self::StopWorker),
            "continue" => Ok(Self::Continue),
            _ => Err(ParseChoiceError {
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl fmt::Display for QueueOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
