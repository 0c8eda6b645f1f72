//! Application context shared by every update handler.

use std::sync::Arc;
use tracing::info;

use crate::browse::BrowseNavigator;
use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::checkout::SessionStore;
use crate::gateway::MediaProvider;

/// Owns all per-user state for the lifetime of the process
pub struct Storefront {
    catalog: Arc<Catalog>,
    carts: CartStore,
    browse: BrowseNavigator,
    sessions: SessionStore,
    media: Arc<dyn MediaProvider>,
}

impl Storefront {
    pub fn new(catalog: Catalog, media: Arc<dyn MediaProvider>) -> Self {
        let catalog = Arc::new(catalog);
        info!(products = catalog.len(), "Storefront initialized");
        Self {
            carts: CartStore::new(Arc::clone(&catalog)),
            browse: BrowseNavigator::new(catalog.len()),
            sessions: SessionStore::new(),
            catalog,
            media,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn carts(&self) -> &CartStore {
        &self.carts
    }

    pub fn browse(&self) -> &BrowseNavigator {
        &self.browse
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn media(&self) -> &dyn MediaProvider {
        self.media.as_ref()
    }

    /// Drop all per-user state; called once the dispatcher has stopped
    pub fn shutdown(&self) {
        info!(
            carts = self.carts.active_carts(),
            checkout_sessions = self.sessions.active_count(),
            "Discarding in-memory storefront state"
        );
        self.carts.clear_all();
        self.browse.clear_all();
        self.sessions.clear_all();
    }
}
