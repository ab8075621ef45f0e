pub mod inspect;
pub mod run;

use std::path::Path;

use anyhow::Result;
use attrition_core::{AnalysisConfig, load_config};

/// Load `--config` when given, otherwise the built-in defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    path.map_or_else(|| Ok(AnalysisConfig::default()), load_config)
}
