use serde::{Deserialize, Serialize};

/// Compact payload broadcast for a Red exit code: just enough for a
/// first-response console to act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalAlert {
    pub patient: AlertPatient,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPatient {
    pub first_name: String,
    pub last_name: String,
}

impl CriticalAlert {
    pub fn new(first_name: String, last_name: String, location: String) -> Self {
        Self {
            patient: AlertPatient {
                first_name,
                last_name,
            },
            location,
        }
    }
}
