//! Lane-based rhythm game core: chart generation from an audio feature
//! timeline and a real-time judgement engine synced to an external
//! media transport.

pub mod chart;
pub mod error;
pub mod input;
pub mod logic;
pub mod models;
pub mod shared;
pub mod state;
pub mod system;

pub use error::{ConfigError, SessionError, TimelineError};
pub use logic::session::GameSession;
pub use models::config::GameConfig;
pub use models::timeline::FeatureTimeline;
pub use shared::result::SessionResult;
