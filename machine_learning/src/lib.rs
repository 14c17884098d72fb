pub mod arch;
pub mod error;
pub mod initialization;
pub mod metrics;
pub mod normalization;

pub use error::{MlErr, Result};
