use dataset::LabelColumn;
use serde::{Deserialize, Serialize};

/// How prediction errors are measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// Wrap the errors of `circular_columns` onto `[-period / 2, period / 2]`.
    pub circ_correction: bool,
    pub circular_columns: Vec<LabelColumn>,
    pub period: f32,
    /// Fold out of range predictions on circular columns back into range first.
    pub reflect_predictions: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            circ_correction: true,
            circular_columns: vec![LabelColumn::HeadingX, LabelColumn::HeadingY],
            period: 360.,
            reflect_predictions: false,
        }
    }
}
