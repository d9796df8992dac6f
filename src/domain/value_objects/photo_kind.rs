use serde::{Deserialize, Serialize};

/// Which upload endpoint a queued photo belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    /// Photo of an inspected element (`POST /upload/photo`).
    Element,
    /// Photo of a meter reading (`POST /upload/compteur-photo`).
    Compteur,
}

impl PhotoKind {
    pub fn as_str(&self) -> &str {
        match self {
            PhotoKind::Element => "element",
            PhotoKind::Compteur => "compteur",
        }
    }
}

impl From<&str> for PhotoKind {
    fn from(value: &str) -> Self {
        match value {
            "compteur" => PhotoKind::Compteur,
            _ => PhotoKind::Element,
        }
    }
}
