mod adapter;
mod data;
mod metrics;
mod model;

use std::{fs, path::Path};

pub use adapter::Adapter;
pub use data::DatasetConfig;
pub use metrics::MetricsConfig;
pub use model::ModelConfig;

use serde::{Deserialize, Serialize};

use crate::EvalError;

/// Everything an evaluation run needs, as read from its JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    pub dataset: DatasetConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl EvalConfig {
    /// Joins every relative path of this config onto `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let paths = self
            .dataset
            .sample_paths
            .iter_mut()
            .chain(self.dataset.label_paths.iter_mut())
            .chain(std::iter::once(&mut self.model.path));

        for path in paths.filter(|p| p.is_relative()) {
            *path = base.join(&*path);
        }
    }
}

/// Loads an [`EvalConfig`] from a JSON file.
///
/// Relative paths inside the file are taken relative to the file's own directory.
///
/// # Errors
/// Returns an `EvalError` if the file cannot be read or parsed.
pub fn load<P: AsRef<Path>>(path: P) -> Result<EvalConfig, EvalError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| EvalError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config: EvalConfig =
        serde_json::from_str(&content).map_err(|source| EvalError::ConfigJson {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }

    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, path::PathBuf};

    use dataset::LabelColumn;

    use super::*;

    #[test]
    fn defaults_are_filled_in() {
        let json = r#"{
            "dataset": { "sample_paths": ["a.npz"], "label_paths": ["a.csv"] },
            "model": { "path": "model.safetensors" }
        }"#;

        let config: EvalConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.dataset.test_size, 3015);
        assert_eq!(config.dataset.seed, 0);
        assert_eq!(config.dataset.sample_array, None);
        assert_eq!(config.dataset.columns, LabelColumn::ALL);
        assert_eq!(config.model.batch_size, NonZeroUsize::new(256).unwrap());
        assert!(config.metrics.circ_correction);
        assert_eq!(
            config.metrics.circular_columns,
            [LabelColumn::HeadingX, LabelColumn::HeadingY]
        );
        assert_eq!(config.metrics.period, 360.);
        assert!(!config.metrics.reflect_predictions);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{
            "dataset": { "sample_paths": [], "label_paths": [], "shuffle": true },
            "model": { "path": "m" }
        }"#;

        assert!(serde_json::from_str::<EvalConfig>(json).is_err());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.json");
        fs::write(
            &path,
            r#"{
                "dataset": { "sample_paths": ["data/a.npz", "/abs/b.npz"], "label_paths": ["a.csv"] },
                "model": { "path": "model.safetensors", "batch_size": 8 }
            }"#,
        )
        .unwrap();

        let config = load(&path).unwrap();

        assert_eq!(
            config.dataset.sample_paths,
            [dir.path().join("data/a.npz"), PathBuf::from("/abs/b.npz")]
        );
        assert_eq!(config.dataset.label_paths, [dir.path().join("a.csv")]);
        assert_eq!(config.model.path, dir.path().join("model.safetensors"));
        assert_eq!(config.model.batch_size.get(), 8);
    }

    #[test]
    fn missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(dir.path().join("nope.json")),
            Err(EvalError::ConfigIo { .. })
        ));

        let path = dir.path().join("eval.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(EvalError::ConfigJson { .. })));
    }
}
