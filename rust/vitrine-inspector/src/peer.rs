//! Connected DevTools clients.

use std::{fmt::Debug, sync::Arc};

use parking_lot::Mutex;
use serde_json::Value;

/// Identifies a connected client for the lifetime of its connection
pub type PeerId = u64;

/// A connected DevTools client that can receive events
pub trait Peer: Send + Sync {
    /// Stable identifier of this connection
    fn id(&self) -> PeerId;

    /// Push an event to the client. Delivery is best effort.
    fn notify(&self, method: &str, params: Value);
}

/// Observes peers joining and leaving a [`PeerRegistry`]
pub trait PeerRegistrationListener: Send + Sync {
    /// `peer` has just been added
    fn on_peer_registered(&self, peer: &Arc<dyn Peer>);

    /// `peer` has just been removed
    fn on_peer_unregistered(&self, peer: &Arc<dyn Peer>);
}

/// The set of currently attached peers.
///
/// The listener is called after the registry lock is released, so it may
/// inspect the registry or notify peers.
pub struct PeerRegistry<L>
where
    L: PeerRegistrationListener,
{
    peers: Mutex<Vec<Arc<dyn Peer>>>,
    listener: L,
}

impl<L> PeerRegistry<L>
where
    L: PeerRegistrationListener,
{
    /// An empty registry reporting to `listener`
    pub fn new(listener: L) -> Self {
        Self {
            peers: Mutex::new(Vec::new()),
            listener,
        }
    }

    /// Attach `peer`. Returns `false`, without notifying the listener, if a
    /// peer with the same id is already attached.
    pub fn add(&self, peer: Arc<dyn Peer>) -> bool {
        {
            let mut peers = self.peers.lock();
            if peers.iter().any(|known| known.id() == peer.id()) {
                return false;
            }
            peers.push(peer.clone());
        }
        tracing::info!(peer = peer.id(), "Peer attached");
        self.listener.on_peer_registered(&peer);
        true
    }

    /// Detach the peer with `id`. Returns `false`, without notifying the
    /// listener, if no such peer is attached.
    pub fn remove(&self, id: PeerId) -> bool {
        let removed = {
            let mut peers = self.peers.lock();
            peers
                .iter()
                .position(|known| known.id() == id)
                .map(|index| peers.remove(index))
        };

        match removed {
            Some(peer) => {
                tracing::info!(peer = id, "Peer detached");
                self.listener.on_peer_unregistered(&peer);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the attached peers, in attach order
    pub fn peers(&self) -> Vec<Arc<dyn Peer>> {
        self.peers.lock().clone()
    }

    /// Whether any peer is attached
    pub fn is_empty(&self) -> bool {
        self.peers.lock().is_empty()
    }

    /// The registration listener
    pub fn listener(&self) -> &L {
        &self.listener
    }
}

impl<L> Debug for PeerRegistry<L>
where
    L: PeerRegistrationListener,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<PeerId> = self.peers.lock().iter().map(|peer| peer.id()).collect();
        f.debug_struct("PeerRegistry").field("peers", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct Inbox {
        id: PeerId,
        events: Mutex<Vec<(String, Value)>>,
    }

    impl Peer for Inbox {
        fn id(&self) -> PeerId {
            self.id
        }

        fn notify(&self, method: &str, params: Value) {
            self.events.lock().push((method.to_owned(), params));
        }
    }

    #[derive(Default)]
    struct Tally {
        registered: AtomicUsize,
        unregistered: AtomicUsize,
    }

    impl PeerRegistrationListener for Tally {
        fn on_peer_registered(&self, _peer: &Arc<dyn Peer>) {
            self.registered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_peer_unregistered(&self, _peer: &Arc<dyn Peer>) {
            self.unregistered.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn inbox(id: PeerId) -> Arc<Inbox> {
        Arc::new(Inbox {
            id,
            ..Default::default()
        })
    }

    #[test]
    fn it_ignores_repeated_registration() {
        let registry = PeerRegistry::new(Tally::default());

        assert!(registry.add(inbox(1)));
        assert!(!registry.add(inbox(1)));
        assert!(!registry.remove(2));
        assert!(registry.remove(1));
        assert!(!registry.remove(1));

        assert_eq!(registry.listener().registered.load(Ordering::SeqCst), 1);
        assert_eq!(registry.listener().unregistered.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn it_lists_attached_peers_in_attach_order() {
        let registry = PeerRegistry::new(Tally::default());
        registry.add(inbox(3));
        registry.add(inbox(1));
        registry.add(inbox(2));
        registry.remove(1);

        let ids: Vec<PeerId> = registry.peers().iter().map(|peer| peer.id()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(format!("{registry:?}"), "PeerRegistry { peers: [3, 2] }");
    }
}
