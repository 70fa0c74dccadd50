//! Reactions to DevTools clients attaching and detaching.
//!
//! A client that attaches is told about every database currently on disk,
//! one [`ADD_DATABASE_EVENT`] per file. When any client detaches, every open
//! store handle is closed, even if other clients are still attached; they
//! reopen handles on their next request.

use std::sync::Arc;

use vitrine_store::StoreOpener;

use crate::{
    ADD_DATABASE_EVENT, AddDatabaseEvent, ConnectionCache, InspectorConfig, Peer,
    PeerRegistrationListener, PeerRegistry, scan,
};

/// Whether any client is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No client attached; the initial state
    Detached,
    /// At least one client attached
    Attached,
}

impl SessionState {
    /// The state implied by the peers currently in `registry`
    pub fn of<L>(registry: &PeerRegistry<L>) -> Self
    where
        L: PeerRegistrationListener,
    {
        if registry.is_empty() {
            SessionState::Detached
        } else {
            SessionState::Attached
        }
    }
}

/// Emits discovery events on attach and releases handles on detach
pub struct DatabaseSession<O>
where
    O: StoreOpener,
{
    config: Arc<InspectorConfig>,
    cache: Arc<ConnectionCache<O>>,
}

impl<O> DatabaseSession<O>
where
    O: StoreOpener,
{
    /// A session scanning per `config` and releasing `cache`
    pub fn new(config: Arc<InspectorConfig>, cache: Arc<ConnectionCache<O>>) -> Self {
        Self { config, cache }
    }

    /// Scan the configured directories and announce each database to `peer`
    pub fn announce(&self, peer: &dyn Peer) {
        for database in scan(&self.config) {
            match serde_json::to_value(AddDatabaseEvent { database }) {
                Ok(params) => peer.notify(ADD_DATABASE_EVENT, params),
                Err(error) => tracing::warn!(%error, "Failed to encode database event"),
            }
        }
    }
}

impl<O> PeerRegistrationListener for DatabaseSession<O>
where
    O: StoreOpener,
{
    fn on_peer_registered(&self, peer: &Arc<dyn Peer>) {
        self.announce(peer.as_ref());
    }

    fn on_peer_unregistered(&self, _peer: &Arc<dyn Peer>) {
        self.cache.close_all();
    }
}
