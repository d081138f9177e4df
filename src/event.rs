use crate::ModelError;
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// The outcome of a validation pass, announced to the listeners of a
/// [ValidationModel](crate::ValidationModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationEvent {
    /// Every rule passed.
    Valid,
    /// At least one rule failed.
    Invalid,
}

impl ValidationEvent {
    /// All event kinds, in the order their listener lists are stored.
    pub const ALL: [ValidationEvent; 2] = [ValidationEvent::Valid, ValidationEvent::Invalid];

    /// The event name as used in markup and by
    /// [ValidationModel::on_named()](crate::ValidationModel::on_named()).
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationEvent::Valid => "valid",
            ValidationEvent::Invalid => "invalid",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ValidationEvent::Valid => 0,
            ValidationEvent::Invalid => 1,
        }
    }
}

impl Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Example
/// ```
/// use field_validation::{ModelError, ValidationEvent};
///
/// assert_eq!(Ok(ValidationEvent::Invalid), "invalid".parse());
/// assert_eq!(
///     Err(ModelError::invalid_event("blur")),
///     "blur".parse::<ValidationEvent>()
/// );
/// ```
impl FromStr for ValidationEvent {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(ValidationEvent::Valid),
            "invalid" => Ok(ValidationEvent::Invalid),
            other => Err(ModelError::invalid_event(other)),
        }
    }
}
