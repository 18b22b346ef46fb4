//! Session state owned by the judgement engine.

pub mod game;

pub use game::{GameEngine, JudgementEvent, Phase, SessionState};
