//! Engine configuration.
//!
//! Options can be built in code or read from TOML:
//!
//! ```toml
//! unsort_column = true
//! section_mode = false
//! max_build_steps = 20000
//! ```

use agrid_engine::engine::{BuildOptions, DEFAULT_MAX_BUILD_STEPS};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// A third click on a descending column removes its sort instead of
    /// wrapping back to ascending.
    pub unsort_column: bool,
    /// Mark rightmost column spines and offer the `OR_GROUP` combinator.
    pub section_mode: bool,
    /// Iteration cap for the column tree builder.
    pub max_build_steps: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            unsort_column: false,
            section_mode: false,
            max_build_steps: DEFAULT_MAX_BUILD_STEPS,
        }
    }
}

impl EngineOptions {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn unsort_column(mut self, enabled: bool) -> Self {
        self.unsort_column = enabled;
        self
    }

    pub fn section_mode(mut self, enabled: bool) -> Self {
        self.section_mode = enabled;
        self
    }

    pub(crate) fn build_options(&self) -> BuildOptions {
        BuildOptions {
            section_mode: self.section_mode,
            max_steps: self.max_build_steps,
        }
    }
}
