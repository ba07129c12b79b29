use serde::{Deserialize, Serialize};

///
/// CONSTANTS
///

/// Default maximum node depth accepted by validation.
pub const DEFAULT_MAX_DEPTH: usize = 128;

///
/// PrepareConfig
///
/// Knobs for validation and compilation. Missing fields take their defaults
/// when deserialized.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Maximum number of nodes on any root-to-leaf path. Deeper trees are
    /// rejected before any recursive pass runs.
    pub max_depth: usize,

    /// Apply logic-preserving normalization before lowering.
    pub normalize: bool,
}

impl PrepareConfig {
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            normalize: true,
        }
    }
}
