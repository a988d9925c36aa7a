//! HTTP server configuration object.

use std::net::SocketAddr;

use onboarding_backend::outbound::persistence::DbPool;

/// Where contracts, tasks and staff are kept.
#[derive(Clone)]
pub enum StoreBackend {
    /// Process-local store seeded with one user per department role.
    Memory,
    Postgres(DbPool),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreBackend,
    pub(crate) extended_sequence: bool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: StoreBackend) -> Self {
        Self {
            bind_addr,
            store,
            extended_sequence: false,
        }
    }

    /// Continue past the second parallel group through orientation.
    #[must_use]
    pub fn with_extended_sequence(mut self, extended: bool) -> Self {
        self.extended_sequence = extended;
        self
    }
}
