use serde::{Deserialize, Serialize};

pub const SANDBOX_KIND: &str = "sandboxed-process";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolState {
    Ready,
    Offline,
}

/// Availability of one cataloged tool. Computed per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "status")]
    pub state: ToolState,
}

impl ToolStatus {
    pub fn new(name: impl Into<String>, available: bool) -> Self {
        Self {
            name: name.into(),
            available,
            kind: SANDBOX_KIND.to_string(),
            state: if available {
                ToolState::Ready
            } else {
                ToolState::Offline
            },
        }
    }
}
