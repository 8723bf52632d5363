//! Per-event score weights.

use serde::{Deserialize, Serialize};

/// Score contribution of each observed event. Keyword signals carry
/// their weight on the rule that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// A created file is mundane
    pub file_created: u32,
    /// A new process is more notable
    pub process_spawned: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            file_created: 5,
            process_spawned: 10,
        }
    }
}
