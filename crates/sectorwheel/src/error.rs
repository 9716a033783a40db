use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    #[error("Not enough sector info: {supplied} supplied for {required} sectors")]
    InsufficientData { supplied: usize, required: usize },
    #[error("Invalid value for `{option}`: {reason}")]
    InvalidConfiguration {
        option: &'static str,
        reason: String,
    },
}

impl WidgetError {
    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            option,
            reason: reason.into(),
        }
    }
}
