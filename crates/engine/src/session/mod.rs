mod engine;
mod state;
mod view;

// Public API of the session subsystem.
pub use engine::SessionEngine;
pub use state::{Feedback, Phase, RecallPhase};
pub use view::{ItemView, SessionView};
