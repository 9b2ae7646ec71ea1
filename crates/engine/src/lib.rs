#![forbid(unsafe_code)]

pub mod countdown;
pub mod runtime;
pub mod scheduler;
pub mod session;

pub use countdown::{Countdown, CountdownSignal};
pub use runtime::Intent;
pub use scheduler::{CancelToken, Scheduler, TimerEvent};
pub use session::{Feedback, ItemView, Phase, RecallPhase, SessionEngine, SessionView};
