//! Request-scoped display state of one rendered entity.

/// Selects the renderer variant for a row or attribute.
///
/// `Error` can only be built with a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Normal,
    Editing,
    Error { message: String },
}

impl ViewState {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Builds the state from `?error=1&msg=...` query parameters.
    ///
    /// A set error flag without a message still renders as an edit row.
    pub fn from_query(error: Option<u8>, message: Option<&str>) -> Self {
        match (error, message) {
            (Some(flag), Some(message)) if flag != 0 && !message.is_empty() => {
                Self::error(message)
            }
            _ => Self::Editing,
        }
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message.as_str()),
            Self::Normal | Self::Editing => None,
        }
    }
}
