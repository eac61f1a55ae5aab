pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{CoreError, Result};
pub use types::{Color, EntityId, FactionId, IdAllocator, Round};
