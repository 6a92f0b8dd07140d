pub use bridge::*;
pub use button::*;
pub use channel::*;
pub use errors::*;

mod bridge;
mod button;
mod channel;
mod errors;
