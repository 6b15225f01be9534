//! Two-party meeting point with a bounded wait, for concurrency tests

use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

const PATIENCE: Duration = Duration::from_secs(5);

pub(crate) struct Party {
    arrived: Sender<()>,
    peer: Mutex<Receiver<()>>,
}

impl Party {
    /// Announce arrival, then wait for the peer. `false` if it never came.
    pub(crate) fn meet(&self) -> bool {
        let _ = self.arrived.send(());
        self.peer
            .lock()
            .is_ok_and(|peer| peer.recv_timeout(PATIENCE).is_ok())
    }
}

pub(crate) fn pair() -> [Party; 2] {
    let (a_tx, a_rx) = channel();
    let (b_tx, b_rx) = channel();
    [
        Party {
            arrived: a_tx,
            peer: Mutex::new(b_rx),
        },
        Party {
            arrived: b_tx,
            peer: Mutex::new(a_rx),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lone_party_gives_up() {
        let [a, _b] = pair();
        assert!(!a.meet());
    }
}
