//! Inspector error types

use crate::types::ValueType;

/// Failure reading, writing or invoking a member on a live instance
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    /// The instance handed to an accessor is not of the declaring type
    #[error("instance is not a {expected}")]
    InstanceType { expected: &'static str },

    /// A value could not be converted to the member's declared type
    #[error("expected a {expected} value, got {found}")]
    ValueType { expected: ValueType, found: ValueType },

    /// Wrong number of method arguments
    #[error("expected {expected} arguments, got {found}")]
    ArgumentCount { expected: usize, found: usize },

    /// A method argument could not be converted to the parameter type
    #[error("argument {index} expects {expected}, got {found}")]
    Argument {
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    /// Member has no getter
    #[error("member `{0}` is not readable")]
    NotReadable(String),

    /// Member has no setter
    #[error("member `{0}` is not writable")]
    NotWritable(String),

    /// Member is not a method
    #[error("member `{0}` is not invokable")]
    NotInvokable(String),

    /// A property setter refused the value
    #[error("value rejected: {0}")]
    Rejected(String),

    /// No live instance is selected
    #[error("no instance selected")]
    NoInstance,

    /// The accessor or invoked method panicked
    #[error("panicked: {0}")]
    Panicked(String),
}

/// Per-member failure while building the registry
///
/// Never fatal to a scan: the member is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The member descriptor does not name a declaring type
    #[error("{owner}::{member}: no declaring type")]
    NoDeclaringType {
        owner: &'static str,
        member: String,
    },

    /// The member is declared on a different type than the one being scanned
    #[error("{owner}::{member}: declared on {declared}")]
    DeclaringTypeMismatch {
        owner: &'static str,
        member: String,
        declared: &'static str,
    },

    /// A member with the same name and kind was already registered
    #[error("{owner}::{member}: duplicate {kind} member")]
    DuplicateMember {
        owner: &'static str,
        member: String,
        kind: &'static str,
    },

    /// A readable member has no accessor
    #[error("{owner}::{member}: missing accessor")]
    MissingAccessor {
        owner: &'static str,
        member: String,
    },
}

/// Configuration load/save failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no platform config directory")]
    NoConfigDir,
}
