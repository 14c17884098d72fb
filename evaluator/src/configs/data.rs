use std::path::PathBuf;

use dataset::LabelColumn;
use serde::{Deserialize, Serialize};

/// Where the observations come from and how they are split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    pub sample_paths: Vec<PathBuf>,
    /// The array holding the samples inside each archive. Optional for single array archives.
    #[serde(default)]
    pub sample_array: Option<String>,
    pub label_paths: Vec<PathBuf>,
    #[serde(default = "default_test_size")]
    pub test_size: usize,
    #[serde(default)]
    pub seed: u64,
    /// The network's output columns, in order.
    #[serde(default = "default_columns")]
    pub columns: Vec<LabelColumn>,
}

fn default_test_size() -> usize {
    3015
}

fn default_columns() -> Vec<LabelColumn> {
    LabelColumn::ALL.to_vec()
}
