mod circular;
mod loss_fn;
mod mse;

pub use circular::Circular;
pub use loss_fn::LossFn;
pub use mse::Mse;
