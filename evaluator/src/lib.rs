pub mod configs;
pub mod error;
mod init;
mod predict;
mod report;
mod session;

pub use error::EvalError;
pub use init::init_checkpoint;
pub use predict::predict;
pub use report::Report;
pub use session::Evaluation;

use crate::configs::EvalConfig;

/// Evaluates a trained model on the held-out split described by `config`.
///
/// # Errors
/// Returns an `EvalError` if the config is invalid or any step of the evaluation fails.
pub fn evaluate(config: EvalConfig) -> Result<Report, EvalError> {
    log::info!("validating config");
    let evaluation = Evaluation::new(config)?;
    let report = evaluation.run()?;
    log::info!(
        "evaluated {} test samples, overall mae {}",
        report.test_size,
        report.mae.overall()
    );
    Ok(report)
}
