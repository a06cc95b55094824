pub mod events;

use self::events::InputEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Key events handed from the polling side to the session.
///
/// Producers hold a [`sender`](Self::sender); the session owner drains the queue
/// once per tick and passes the events to [`Session::tick`](crate::Session::tick).
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn push(&self, event: InputEvent) {
        // The queue owns a receiver, so the channel cannot be disconnected here.
        let _ = self.sender.send(event);
    }

    /// Non-blocking.
    pub fn pop(&self) -> Option<InputEvent> {
        self.receiver.try_recv().ok()
    }

    /// Takes every event queued so far, in arrival order.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }

    /// Events waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    pub fn sender(&self) -> Sender<InputEvent> {
        self.sender.clone()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
