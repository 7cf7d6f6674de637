//! Shutdown Signal
//!
//! Lifetime token handed to background tasks by the owning application.

use tokio::sync::watch;

/// Creates a linked trigger/token pair.
///
/// Cancelling the trigger, or dropping it, cancels every clone of the token.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownToken) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, ShutdownToken { receiver })
}

// == Shutdown Trigger ==
/// Owner side of the lifetime signal.
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Signals cancellation to all tokens. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns a new token linked to this trigger.
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            receiver: self.sender.subscribe(),
        }
    }
}

// == Shutdown Token ==
/// Task side of the lifetime signal.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    receiver: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Returns true once the trigger has been cancelled or dropped.
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow() || self.receiver.has_changed().is_err()
    }

    /// Completes when the trigger is cancelled or dropped.
    pub async fn cancelled(&mut self) {
        // An Err means the trigger was dropped
        let _ = self.receiver.wait_for(|cancelled| *cancelled).await;
    }
}
