pub use errors::*;
pub use session::*;

mod errors;
mod session;
