use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    InvalidItem,
    InvalidEfficiency,
    InvalidSkillLevel,
    EmptyItemList,
    NothingParsed,
}

impl CoreErrorCode {
    /// Stable snake_case identifier used when errors cross into JSON or JS.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::InvalidItem => "invalid_item",
            Self::InvalidEfficiency => "invalid_efficiency",
            Self::InvalidSkillLevel => "invalid_skill_level",
            Self::EmptyItemList => "empty_item_list",
            Self::NothingParsed => "nothing_parsed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
