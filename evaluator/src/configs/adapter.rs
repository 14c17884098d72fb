use std::collections::HashSet;

use dataset::LabelColumn;
use machine_learning::metrics::CircularCorrection;

use super::{DatasetConfig, EvalConfig, MetricsConfig};
use crate::error::EvalError;

/// Validates an `EvalConfig` and turns its declarative parts into the types the pipeline uses.
pub struct Adapter;

impl Adapter {
    pub fn new() -> Self {
        Self
    }

    /// Checks `config` and builds its circular correction.
    ///
    /// # Returns
    /// The correction to apply to the metrics, `None` if disabled.
    ///
    /// # Errors
    /// Returns `EvalError::InvalidConfig` describing the first inconsistency found.
    pub fn adapt_config(
        &self,
        config: &EvalConfig,
    ) -> Result<Option<CircularCorrection>, EvalError> {
        self.validate_dataset(&config.dataset)?;
        self.validate_metrics(&config.dataset, &config.metrics)?;
        self.adapt_correction(&config.dataset.columns, &config.metrics)
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    fn validate_dataset(&self, dataset: &DatasetConfig) -> Result<(), EvalError> {
        if dataset.sample_paths.is_empty() {
            return Err(EvalError::InvalidConfig(
                "at least one sample archive is required".into(),
            ));
        }

        if dataset.label_paths.is_empty() {
            return Err(EvalError::InvalidConfig(
                "at least one label file is required".into(),
            ));
        }

        if dataset.test_size == 0 {
            return Err(EvalError::InvalidConfig(
                "test_size must be greater than 0".into(),
            ));
        }

        if dataset.columns.is_empty() {
            return Err(EvalError::InvalidConfig(
                "at least one label column is required".into(),
            ));
        }

        if let Some(column) = first_duplicate(&dataset.columns) {
            return Err(EvalError::InvalidConfig(format!(
                "label column '{column}' is selected more than once"
            )));
        }

        if dataset.sample_array.as_deref() == Some("") {
            return Err(EvalError::InvalidConfig(
                "sample_array must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn validate_metrics(
        &self,
        dataset: &DatasetConfig,
        metrics: &MetricsConfig,
    ) -> Result<(), EvalError> {
        if !metrics.circ_correction {
            return Ok(());
        }

        if !metrics.period.is_finite() || metrics.period <= 0. {
            return Err(EvalError::InvalidConfig(format!(
                "period ({}) must be finite and greater than 0",
                metrics.period
            )));
        }

        // Circular columns must be among the network's outputs
        if let Some(column) = metrics
            .circular_columns
            .iter()
            .find(|c| !dataset.columns.contains(*c))
        {
            return Err(EvalError::InvalidConfig(format!(
                "circular column '{column}' is not one of the selected label columns"
            )));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Adaptation
    // -------------------------------------------------------------------------

    fn adapt_correction(
        &self,
        columns: &[LabelColumn],
        metrics: &MetricsConfig,
    ) -> Result<Option<CircularCorrection>, EvalError> {
        if !metrics.circ_correction {
            return Ok(None);
        }

        let indices = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| metrics.circular_columns.contains(*c))
            .map(|(i, _)| i);

        let correction = CircularCorrection::new(metrics.period, indices)?
            .with_reflection(metrics.reflect_predictions);

        Ok(Some(correction))
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

fn first_duplicate(columns: &[LabelColumn]) -> Option<LabelColumn> {
    let mut seen = HashSet::with_capacity(columns.len());
    columns.iter().copied().find(|&c| !seen.insert(c))
}
