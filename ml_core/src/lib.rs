mod error;
mod model;

pub use error::MlError;
pub use model::Model;
