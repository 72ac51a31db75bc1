//! Event streaming for the Actor+Relay architecture.
//!
//! A `Relay` is the sending half of an unbounded channel. Each relay stands for
//! one event source, so in debug builds sending from a second call site panics.

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use std::sync::{Arc, OnceLock};

#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
    #[cfg(debug_assertions)]
    emit_location: Arc<OnceLock<&'static std::panic::Location<'static>>>,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        let relay = Relay {
            sender,
            #[cfg(debug_assertions)]
            emit_location: Arc::new(OnceLock::new()),
        };
        (relay, receiver)
    }

    #[cfg(debug_assertions)]
    #[track_caller]
    fn assert_single_source(&self) {
        let caller = std::panic::Location::caller();
        if let Err(previous) = self.emit_location.set(caller) {
            if previous != caller {
                panic!("Relay sent from {caller} but its source is {previous}");
            }
        }
    }

    /// Events sent after the receiving actor is gone are dropped.
    #[track_caller]
    pub fn send(&self, value: T) {
        #[cfg(debug_assertions)]
        self.assert_single_source();

        let _ = self.sender.unbounded_send(value);
    }
}

pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}
