//! Wall-clock driver for a session engine.
//!
//! The engine itself runs on virtual time; this loop is the single owner that
//! maps wall time onto it. Shell intents arrive on an mpsc channel, state
//! snapshots leave through a watch channel, and nothing else ever touches the
//! session: one logical thread, no locks.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior, interval};

use quiz_core::model::SubmittedAnswer;

use crate::session::{SessionEngine, SessionView};

/// A user intention forwarded into the running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Submit(SubmittedAnswer),
    PushRecall(String),
    UndoRecall,
    ConfirmRecall,
    Reset,
    Quit,
}

/// How often the loop samples wall time. Timer deadlines land at most this
/// far behind the wall clock, well under the one-second tick granularity.
const DRIVE_GRANULARITY: Duration = Duration::from_millis(250);

/// Drive a session on wall time until the shell quits or goes away.
///
/// Returns the engine so the caller can inspect the final state. When every
/// view receiver is dropped the loop tears down as well, so no timer keeps
/// mutating a session nobody renders.
pub async fn drive(
    mut engine: SessionEngine,
    mut intents: mpsc::Receiver<Intent>,
    views: watch::Sender<SessionView>,
) -> SessionEngine {
    let mut ticker = interval(DRIVE_GRANULARITY);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last);
                last = now;
                engine.advance(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
            }
            intent = intents.recv() => {
                match intent {
                    None | Some(Intent::Quit) => break,
                    Some(Intent::Start) => engine.start(),
                    Some(Intent::Submit(answer)) => engine.submit_answer(answer),
                    Some(Intent::PushRecall(entry)) => engine.push_recall(&entry),
                    Some(Intent::UndoRecall) => engine.undo_recall(),
                    Some(Intent::ConfirmRecall) => engine.confirm_recall(),
                    Some(Intent::Reset) => engine.reset(),
                }
            }
        }

        views.send_if_modified(|current| {
            let next = engine.view();
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if views.is_closed() {
            break;
        }
    }

    engine
}
