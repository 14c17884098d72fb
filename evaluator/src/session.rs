use dataset::{DataErr, Observations, load_labels, load_samples, partition};
use log::{debug, info};
use machine_learning::{
    arch::{
        Checkpoint, Sequential,
        loss::{Circular, LossFn, Mse},
    },
    metrics::{self, CircularCorrection},
    normalization::MinMax,
};
use ml_core::Model;

use crate::{
    EvalError, Report,
    configs::{Adapter, EvalConfig},
    predict::predict,
};

/// A validated evaluation, ready to run.
#[derive(Debug)]
pub struct Evaluation {
    config: EvalConfig,
    correction: Option<CircularCorrection>,
}

impl Evaluation {
    /// Validates `config`.
    ///
    /// # Errors
    /// Returns `EvalError::InvalidConfig` if the config is inconsistent.
    pub fn new(config: EvalConfig) -> Result<Self, EvalError> {
        let correction = Adapter::new().adapt_config(&config)?;
        Ok(Self { config, correction })
    }

    /// Loads the data and the model, predicts the held-out split and measures the errors.
    pub fn run(&self) -> Result<Report, EvalError> {
        let dataset = &self.config.dataset;

        info!("loading observations");
        let samples = load_samples(&dataset.sample_paths, dataset.sample_array.as_deref())?;
        let labels = load_labels(&dataset.label_paths, &dataset.columns)?;
        let observations = Observations::new(samples, labels)?;
        if observations.is_empty() {
            return Err(DataErr::NoInput("observation").into());
        }

        info!(
            total = observations.len(), test = dataset.test_size, seed = dataset.seed;
            "partitioning observations"
        );
        let partition = partition(observations.len(), dataset.test_size, dataset.seed)?;
        let (train, test) = observations.split(&partition)?;

        // Statistics come from the training split only
        let stats = MinMax::fit(train.labels().values())?;
        debug!("label min {:?}, max {:?}", stats.min(), stats.max());

        let (model, params) = Checkpoint::load(&self.config.model.path)?.into_parts();
        self.check_model(&model)?;

        info!(batch_size = self.config.model.batch_size.get(); "running inference");
        let normalized = predict(
            &model,
            &params,
            test.samples(),
            self.config.model.batch_size,
        )?;
        let predictions = stats.denormalize(normalized.view())?;

        info!("computing metrics");
        let truth = test.labels().values();
        let correction = self.correction.as_ref();
        let mae = metrics::mae(predictions.view(), truth, correction)?;
        let mse = metrics::mse(predictions.view(), truth, correction)?;

        let normalized_truth = stats.normalize(truth)?;
        let normalized_mse = Mse::new().loss(normalized.view(), normalized_truth.view());
        let circular_loss = Circular::new().loss(normalized.view(), normalized_truth.view());

        let circular_columns = match correction {
            Some(c) => c.columns().iter().map(|&k| dataset.columns[k]).collect(),
            None => Vec::new(),
        };

        Ok(Report {
            columns: dataset.columns.clone(),
            train_size: train.len(),
            test_size: test.len(),
            circular_columns,
            mae,
            mse,
            normalized_mse,
            circular_loss,
        })
    }

    fn check_model(&self, model: &Sequential) -> Result<(), EvalError> {
        let outputs = self.config.dataset.columns.len();
        if model.output_size() != outputs {
            return Err(EvalError::Incompatible(format!(
                "model has {} outputs but {outputs} label columns are selected",
                model.output_size()
            )));
        }

        Ok(())
    }
}
