pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod geo;
pub mod heading;
pub mod interaction;
pub mod lock;
pub mod mapper;
pub mod picking;

pub use config::*;
pub use constants::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use geo::*;
pub use heading::*;
pub use interaction::*;
pub use lock::*;
pub use mapper::*;
pub use picking::*;
