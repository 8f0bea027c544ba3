use thiserror::Error;

/// A customer form that cannot be turned into model input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    Missing { field: &'static str },

    #[error("`{field}` must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("`{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("`{field}` has unknown value {value:?}")]
    UnknownCategory { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending form field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::InvalidNumber { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::UnknownCategory { field, .. } => field,
        }
    }
}
