pub mod error;
pub mod rule;
pub mod matcher;
pub mod encoding;
pub mod document;
pub mod projector;
pub mod config;
pub mod engine;


pub use error::*;
pub use rule::*;
pub use matcher::*;
pub use encoding::*;
pub use document::*;
pub use projector::*;
pub use config::*;
pub use engine::*;
