pub mod error;
pub mod labels;
pub mod observations;
pub mod partition;
pub mod samples;

pub use error::{DataErr, Result};
pub use labels::{LabelColumn, Labels, load_labels};
pub use observations::Observations;
pub use partition::{Partition, partition};
pub use samples::load_samples;
