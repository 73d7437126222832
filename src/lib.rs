pub mod config;
pub mod logging;

pub mod content_type;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod handler;
pub mod part;
