pub mod constants;
pub mod hit_window;
pub mod note;

pub use constants::*;
pub use hit_window::HitWindow;
pub use note::{Note, NoteId, NoteKind, NoteSource, NoteState};
