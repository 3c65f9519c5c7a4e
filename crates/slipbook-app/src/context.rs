//! Application context
//!
//! Owns the persistence gateway and the reference-data directories loaded
//! from it. Use cases borrow the context instead of reaching for globals.

use slipbook_domain::repository::PersistenceGateway;
use slipbook_domain::{PartyDirectory, ShortcutDirectory};
use slipbook_types::Result;
use tracing::debug;

use crate::config::Config;
use crate::repository::open_store;

pub struct AppContext {
    gateway: Box<dyn PersistenceGateway>,
    pub parties: PartyDirectory,
    pub shortcuts: ShortcutDirectory,
}

impl AppContext {
    /// Wrap a gateway and load parties and shortcuts from it.
    pub fn new(gateway: Box<dyn PersistenceGateway>) -> Self {
        let parties = PartyDirectory::from_parties(gateway.load_parties());
        let shortcuts = ShortcutDirectory::from_shortcuts(gateway.load_shortcuts());
        debug!(
            parties = parties.parties().len(),
            shortcuts = shortcuts.shortcuts().len(),
            "loaded reference data"
        );
        Self {
            gateway,
            parties,
            shortcuts,
        }
    }

    /// Open the JSON store named by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let store = open_store(config)?;
        Ok(Self::new(Box::new(store)))
    }

    pub fn gateway(&self) -> &dyn PersistenceGateway {
        self.gateway.as_ref()
    }

    pub fn persist_parties(&self) {
        self.gateway.save_parties(self.parties.parties());
    }

    pub fn persist_shortcuts(&self) {
        self.gateway.save_shortcuts(self.shortcuts.shortcuts());
    }
}
