use thiserror::Error;

/// An error produced by a [ValidationModel](crate::ValidationModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A listener was registered for an event name that is neither
    /// `"valid"` nor `"invalid"`.
    #[error("unknown validation event \"{name}\", expected \"valid\" or \"invalid\"")]
    InvalidEvent { name: String },
    /// The model was asked to update or validate while it was
    /// already notifying its listeners.
    #[error("validation model updated from inside one of its own listeners")]
    Reentrant,
}

impl ModelError {
    /// Creates a new invalid event error.
    pub fn invalid_event(name: impl Into<String>) -> Self {
        Self::InvalidEvent { name: name.into() }
    }
}

/// An error produced while reading a [RuleSet](crate::RuleSet) from a
/// [FieldConfig](crate::FieldConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The parameter for a length rule is not a non-negative integer.
    #[error("invalid parameter \"{value}\" for rule \"{rule}\"")]
    InvalidParameter { rule: &'static str, value: String },
}

impl ConfigError {
    /// Creates a new invalid parameter error.
    pub fn invalid_parameter(rule: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            rule,
            value: value.into(),
        }
    }
}
