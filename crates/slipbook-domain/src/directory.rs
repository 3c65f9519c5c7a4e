//! Reference data: parties and adjustment shortcuts
//!
//! Both directories are plain in-memory lists owned by the application
//! context. Callers persist them through the gateway after a change.

use slipbook_types::{Error, ResolutionError, ValidationError};

use crate::model::{Party, PartyKey, Shortcut};
use crate::repository::{has_deliveries_for_party, DeliveryStore, Directory};
use crate::service::allocation::AllocationColumn;

/// Name shown for a numeric key whose party no longer exists.
pub const UNKNOWN_PARTY: &str = "Unknown Party";

#[derive(Debug, Clone, Default)]
pub struct PartyDirectory {
    parties: Vec<Party>,
}

impl PartyDirectory {
    pub fn from_parties(parties: Vec<Party>) -> Self {
        Self { parties }
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Party> {
        self.parties.iter().find(|p| p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Party> {
        self.parties.iter().find(|p| p.name == name)
    }

    /// Key under which deliveries of `name` are filed: the party's id when
    /// known, the literal name otherwise.
    pub fn resolve_key(&self, name: &str) -> PartyKey {
        match self.find_by_name(name) {
            Some(party) => PartyKey::Id(party.id),
            None => PartyKey::Name(name.to_string()),
        }
    }

    /// Display name for a stored key, with unknown ids shown as
    /// [`UNKNOWN_PARTY`].
    pub fn display_name(&self, key: &PartyKey) -> String {
        match key {
            PartyKey::Id(id) => self
                .find_by_id(*id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PARTY.to_string()),
            PartyKey::Name(name) => name.clone(),
        }
    }

    /// Register a new party. Ids continue from the last one in the list.
    pub fn add(&mut self, name: &str) -> Result<&Party, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingParty);
        }
        let id = self.parties.last().map_or(1, |p| p.id + 1);
        self.parties.push(Party {
            id,
            name: name.to_string(),
        });
        Ok(&self.parties[self.parties.len() - 1])
    }

    pub fn rename(&mut self, id: u32, name: &str) -> Result<(), Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingParty.into());
        }
        let party = self
            .parties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ResolutionError::UnknownParty(id))?;
        party.name = name.to_string();
        Ok(())
    }

    /// Remove a party that has no deliveries filed under its id.
    pub fn remove(&mut self, id: u32, deliveries: &DeliveryStore) -> Result<Party, Error> {
        let index = self
            .parties
            .iter()
            .position(|p| p.id == id)
            .ok_or(ResolutionError::UnknownParty(id))?;
        if has_deliveries_for_party(deliveries, id) {
            return Err(ValidationError::PartyInUse(self.parties[index].name.clone()).into());
        }
        Ok(self.parties.remove(index))
    }
}

impl Directory for PartyDirectory {
    fn party_name_for_key(&self, key: &str) -> String {
        key.trim()
            .parse::<u32>()
            .ok()
            .and_then(|id| self.find_by_id(id))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| key.to_string())
    }

    fn party_key_for_name(&self, name: &str) -> String {
        self.resolve_key(name).storage_key()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShortcutDirectory {
    shortcuts: Vec<Shortcut>,
}

impl ShortcutDirectory {
    pub fn from_shortcuts(shortcuts: Vec<Shortcut>) -> Self {
        Self { shortcuts }
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Case-sensitive lookup by code.
    pub fn find(&self, code: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.code == code)
    }

    pub fn add(&mut self, shortcut: Shortcut) -> Result<(), ValidationError> {
        shortcut.validate()?;
        if self.find(&shortcut.code).is_some() {
            return Err(ValidationError::DuplicateShortcut(shortcut.code));
        }
        self.shortcuts.push(shortcut);
        Ok(())
    }

    /// Replace the shortcut stored under `code`. Ledger adjustments made
    /// with the old definition keep their own copy of label and sign.
    pub fn edit(&mut self, code: &str, shortcut: Shortcut) -> Result<(), Error> {
        shortcut.validate()?;
        let index = self
            .shortcuts
            .iter()
            .position(|s| s.code == code)
            .ok_or_else(|| ResolutionError::UnknownShortcut(code.to_string()))?;
        let clash = self
            .shortcuts
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.code == shortcut.code);
        if clash {
            return Err(ValidationError::DuplicateShortcut(shortcut.code).into());
        }
        self.shortcuts[index] = shortcut;
        Ok(())
    }

    pub fn remove(&mut self, code: &str) -> Result<Shortcut, ResolutionError> {
        let index = self
            .shortcuts
            .iter()
            .position(|s| s.code == code)
            .ok_or_else(|| ResolutionError::UnknownShortcut(code.to_string()))?;
        Ok(self.shortcuts.remove(index))
    }

    /// Shortcuts shown as purchase book columns, in list order.
    pub fn allocation_columns(&self) -> Vec<AllocationColumn> {
        self.shortcuts
            .iter()
            .filter(|s| s.include_in_allocation_view)
            .map(|s| AllocationColumn {
                code: s.code.clone(),
                label: s.label.clone(),
            })
            .collect()
    }
}
