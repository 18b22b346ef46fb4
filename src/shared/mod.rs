//! Data handed from the session thread to rendering and persistence.

pub mod result;
pub mod snapshot;
