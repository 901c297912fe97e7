//! Custom error types for point generation.
//!
//! This module defines the primary error type, `GeneratorError`, for the whole crate.
//! Using the `thiserror` crate, it provides a centralized and consistent way to handle
//! the different kinds of errors that can occur while building and iterating a
//! generator tree.
//!
//! ## Error Hierarchy
//!
//! - **`Configuration`**: A single model is invalid on its own (zero step, step direction
//!   that never reaches `stop`, zero-extent bounding box, region bound to axes the model
//!   does not produce). Raised while the generator is constructed.
//! - **`Structural`**: The composition of generators is invalid (duplicate axis names
//!   across a compound, a compound nested inside another compound).
//! - **`Bounds`**: An iterator produced more positions than its generator declared. This
//!   indicates an internal composition bug rather than a user mistake.
//! - **`Incomplete`**: The opposite case, an iterator that ran dry before its declared
//!   size while every position was being materialized.
//! - **`PositionOutOfRange`**: Random access past the end of a generator.
//! - **`SizeOverflow`** / **`TooManyPoints`**: The total scan size cannot be represented
//!   or exceeds the configured limit.
//! - **`Settings`**, **`ModelFile`**, **`Io`**, **`Logging`**: ambient failures while
//!   loading settings or scan definitions, or installing the log subscriber.
//!
//! None of these are retried. The caller must reconfigure and rebuild the tree.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type PointsResult<T> = std::result::Result<T, GeneratorError>;

/// Errors raised while building or iterating point generators.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// A model, region or mutator is invalid on its own.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generators cannot be composed as requested.
    #[error("Structural error: {0}")]
    Structural(String),

    /// An iterator was advanced past its declared size.
    #[error("Iterator produced more than its declared {size} positions")]
    Bounds {
        /// Declared size of the generator being iterated.
        size: usize,
    },

    /// An iterator ended before its declared size.
    #[error("Iterator ended after {yielded} of its declared {size} positions")]
    Incomplete {
        /// Positions actually produced.
        yielded: usize,
        /// Declared size of the generator being iterated.
        size: usize,
    },

    /// Random access beyond the end of a generator.
    #[error("Position index {index} is out of range for a scan of {size} points")]
    PositionOutOfRange {
        /// Requested index.
        index: usize,
        /// Size of the generator.
        size: usize,
    },

    /// Size arithmetic overflowed.
    #[error("Point count overflow while computing {context}")]
    SizeOverflow {
        /// What was being computed.
        context: &'static str,
    },

    /// The scan is larger than the configured limit.
    #[error("Scan of {points} points exceeds the limit of {max_points}")]
    TooManyPoints {
        /// Requested number of points.
        points: usize,
        /// Configured maximum.
        max_points: usize,
    },

    /// Settings could not be loaded.
    #[error("Settings error: {0}")]
    Settings(#[from] Box<figment::Error>),

    /// A scan definition file could not be parsed.
    #[error("Scan definition error: {0}")]
    ModelFile(#[from] toml::de::Error),

    /// I/O failure while reading a scan definition.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The log subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

impl GeneratorError {
    /// True for errors caused by an individually invalid model or an oversized scan.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GeneratorError::Configuration(_)
                | GeneratorError::SizeOverflow { .. }
                | GeneratorError::TooManyPoints { .. }
        )
    }

    /// True for errors caused by an invalid composition of generators.
    pub fn is_structural(&self) -> bool {
        matches!(self, GeneratorError::Structural(_))
    }
}

impl From<figment::Error> for GeneratorError {
    fn from(err: figment::Error) -> Self {
        GeneratorError::Settings(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeneratorError::Configuration("step size must be non-zero".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: step size must be non-zero"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(GeneratorError::Structural("duplicate axis".into()).is_structural());
        assert!(!GeneratorError::Structural("duplicate axis".into()).is_configuration());
        assert!(GeneratorError::TooManyPoints {
            points: 10,
            max_points: 5
        }
        .is_configuration());
        assert!(!GeneratorError::Bounds { size: 3 }.is_configuration());
    }

    #[test]
    fn test_bounds_error_mentions_size() {
        let err = GeneratorError::Bounds { size: 36 };
        assert!(err.to_string().contains("36"));
    }

    #[test]
    fn test_incomplete_error_reports_both_counts() {
        let err = GeneratorError::Incomplete {
            yielded: 4,
            size: 9,
        };
        assert_eq!(
            err.to_string(),
            "Iterator ended after 4 of its declared 9 positions"
        );
        assert!(!err.is_configuration());
    }
}
