pub use command::*;
pub use dispatcher::*;

mod command;
mod dispatcher;
