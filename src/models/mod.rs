pub mod config;
pub mod engine;
pub mod stats;
pub mod timeline;
