pub mod channel;
pub mod commands;
pub mod config;
pub mod events;
pub mod media;
pub mod session;
pub mod status;
pub mod tracks;
