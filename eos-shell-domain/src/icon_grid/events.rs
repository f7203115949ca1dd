use serde::{Deserialize, Serialize};

/// Emitted whenever the in-memory icon tree changes.
///
/// `applications` is the flattened list of non-folder identifiers at the time
/// of the change, for consumers that only track installed applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconGridChangedEvent {
    pub applications: Vec<String>,
}
