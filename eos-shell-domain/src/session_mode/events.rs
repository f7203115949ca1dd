use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionModeEvent {
    /// `init()` finished; `mode` is the initial mode.
    SessionsLoaded { mode: String },
    /// The effective parameters were recomputed for `mode`.
    Updated { mode: String },
}
