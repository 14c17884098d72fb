pub mod activations;
pub mod checkpoint;
pub mod layers;
pub mod loss;
mod sequential;
mod spec;

pub use checkpoint::Checkpoint;
pub use sequential::Sequential;
pub use spec::{ActFnSpec, LayerSpec, ModelSpec};
