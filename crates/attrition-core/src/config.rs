use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::rank::Method;

/// Settings for one analysis run.
///
/// Every field has a default, so an empty TOML file (or no file at all)
/// reproduces the classic fungi / bacteria / lipid comparison under degree
/// and betweenness attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Node attribute that assigns nodes to subgroups.
    #[serde(default = "default_group_attribute")]
    pub group_attribute: String,
    /// Subgroups to analyze, in output order.
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupSpec>,
    /// Attack strategies to run, in output order.
    #[serde(default = "default_methods")]
    pub methods: Vec<Method>,
    /// Seed for random-order removal. Drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            group_attribute: default_group_attribute(),
            groups: default_groups(),
            methods: default_methods(),
            seed: None,
        }
    }
}

/// One subgroup: nodes whose group attribute equals `value`, reported under
/// `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub label: String,
    pub value: String,
}

impl GroupSpec {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

fn default_group_attribute() -> String {
    "group".to_string()
}

fn default_groups() -> Vec<GroupSpec> {
    vec![
        GroupSpec::new("fungi", "fungi"),
        GroupSpec::new("bacti", "Bact"),
        GroupSpec::new("lipid", "lipid"),
    ]
}

fn default_methods() -> Vec<Method> {
    vec![Method::Degree, Method::Betweenness]
}

impl AnalysisConfig {
    /// Reject configurations that cannot produce a well-formed table.
    ///
    /// # Errors
    ///
    /// Returns an error when there are no groups or methods, or when two
    /// groups or two methods would produce the same column key.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            bail!("configuration lists no groups");
        }
        if self.methods.is_empty() {
            bail!("configuration lists no methods");
        }

        let mut labels = HashSet::new();
        for group in &self.groups {
            if !labels.insert(group.label.as_str()) {
                bail!("group label {:?} appears more than once", group.label);
            }
        }
        let mut methods = HashSet::new();
        for method in &self.methods {
            if !methods.insert(method) {
                bail!("method {method} appears more than once");
            }
        }
        Ok(())
    }
}

/// Load and validate an [`AnalysisConfig`] from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or fails
/// [`AnalysisConfig::validate`].
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: AnalysisConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}
