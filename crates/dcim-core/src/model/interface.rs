// ── Interface leaf records ──

use serde::{Deserialize, Serialize};

/// A network interface on a device. Leaf-list member: attributes only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(rename = "type")]
    pub interface_type: String,
}

impl Interface {
    pub fn new(name: impl Into<String>, interface_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interface_type: interface_type.into(),
        }
    }
}
