//! Game-specific error types.
//!
//! Library code returns [`GameResult`] instead of panicking; assertion
//! failures in tests stay assertion failures.

use std::fmt;

/// Top-level error enum for the rockfall game and its harness.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// `assets/game.toml` (or a string passed to the parser) is not valid TOML
    /// for [`crate::config::GameConfig`].
    ConfigParse {
        /// Where the text came from, for the log line.
        origin: String,
        message: String,
    },

    /// A tunable is outside the range the gameplay systems can handle.
    InvalidConfig {
        /// Field name as it appears in `game.toml`.
        name: &'static str,
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// An entity was referenced through a handle but no longer exists.
    EntityNotFound {
        /// Human-readable description of where the lookup occurred.
        context: &'static str,
    },

    /// A harness wait ran out of frames before its condition held.
    Timeout {
        frames: u32,
        waited_secs: f32,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ConfigParse { origin, message } => {
                write!(f, "failed to parse game config from {}: {}", origin, message)
            }
            GameError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is invalid (expected {})",
                name, value, expected
            ),
            GameError::EntityNotFound { context } => {
                write!(f, "entity not found during '{}'", context)
            }
            GameError::Timeout {
                frames,
                waited_secs,
            } => write!(
                f,
                "condition not met after {} frames ({:.3}s simulated)",
                frames, waited_secs
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive and finite.
pub fn validate_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value,
            expected: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn validate_non_negative(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value,
            expected: "[0.0, ∞)",
        })
    }
}

/// Returns an error if a `[min, max]` pair is inverted.
pub fn validate_range(name: &'static str, min: f32, max: f32) -> GameResult<()> {
    if min <= max {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value: min,
            expected: "min ≤ max",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(validate_positive("x", 1.0).is_ok());
        assert!(validate_positive("x", 0.0).is_err());
        assert!(validate_positive("x", f32::NAN).is_err());
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert!(validate_range("r", 1.0, 1.0).is_ok());
        let err = validate_range("r", 2.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidConfig {
                name: "r",
                value: 2.0,
                expected: "min ≤ max"
            }
        );
    }

    #[test]
    fn timeout_message_mentions_frames() {
        let msg = GameError::Timeout {
            frames: 30,
            waited_secs: 0.5,
        }
        .to_string();
        assert!(msg.contains("30 frames"));
    }
}
