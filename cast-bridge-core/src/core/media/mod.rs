pub use codec::*;
pub use model::*;

mod codec;
mod model;
