//! Wire format for animal payloads.
//!
//! These types mirror the JSON a backend (or a local fixture file) serves.
//! They stay inside the service layer; the UI only ever sees
//! [`AnimalViewData`](super::AnimalViewData).

use serde::{Deserialize, Serialize};

/// One animal entry as served over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
    /// Backend identifier, used only to build the favorite key.
    pub id: u64,

    pub breed: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        rename = "country_of_origin",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub origin: Option<String>,
}
