use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionMode {
    #[default]
    Focus,
    Break,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Focus => "focus",
            SessionMode::Break => "break",
        }
    }

    /// Unknown values fall back to `Focus`, the kind every record had before
    /// break sessions were tracked.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "break" => SessionMode::Break,
            _ => SessionMode::Focus,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            SessionMode::Focus => SessionMode::Break,
            SessionMode::Break => SessionMode::Focus,
        }
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
