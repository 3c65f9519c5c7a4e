use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: u32,
    pub name: String,
}

/// Identifier under which a party's deliveries are filed.
///
/// Known parties are filed under their numeric id; a name that cannot be
/// resolved to an id is filed under the literal name instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartyKey {
    Id(u32),
    Name(String),
}

impl PartyKey {
    /// Interpret a stored key. Purely numeric keys are ids.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(id) => PartyKey::Id(id),
            Err(_) => PartyKey::Name(raw.to_string()),
        }
    }

    /// The string used as the map key on disk.
    pub fn storage_key(&self) -> String {
        match self {
            PartyKey::Id(id) => id.to_string(),
            PartyKey::Name(name) => name.clone(),
        }
    }

    pub fn id(&self) -> Option<u32> {
        match self {
            PartyKey::Id(id) => Some(*id),
            PartyKey::Name(_) => None,
        }
    }
}

impl std::fmt::Display for PartyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.storage_key())
    }
}
