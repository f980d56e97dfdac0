//! Project type tags and field definitions.

use serde::{Deserialize, Serialize};

/// Kind of training data a project collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Sounds,
    Text,
    Numbers,
    Images,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sounds => "sounds",
            Self::Text => "text",
            Self::Numbers => "numbers",
            Self::Images => "images",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sounds" => Some(Self::Sounds),
            "text" => Some(Self::Text),
            "numbers" => Some(Self::Numbers),
            "images" => Some(Self::Images),
            _ => None,
        }
    }
}

/// One field definition for projects whose examples are structured
/// records rather than raw audio (numbers projects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}
