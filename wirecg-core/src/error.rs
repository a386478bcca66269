/// Error types for recoverable geometry failures
///
/// Most core entry points never surface these: they log the error and fall
/// back to a safe default. The `try_*` variants return them directly.
use thiserror::Error;

/// A matrix or vector could not be built from the given input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("matrix must have 4 rows, got {0}")]
    RowCount(usize),
    #[error("matrix row {row} must have 4 columns, got {len}")]
    RowLength { row: usize, len: usize },
    #[error("matrix entry ({row}, {col}) is out of bounds")]
    OutOfBounds { row: usize, col: usize },
}

/// An L-system grammar could not be parsed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarError {
    #[error("malformed rule near {0:?}")]
    Malformed(String),
    #[error("symbol {0:?} has more than one rule")]
    DuplicateRule(char),
}

/// A scene configuration could not be loaded
#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid scene config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid L-system grammar in scene config: {0}")]
    Grammar(#[from] GrammarError),
}
