//! Party and shortcut maintenance
//!
//! Every change is written through the gateway straight away.

use tracing::info;

use slipbook_domain::model::{Party, Shortcut};
use slipbook_types::Result;

use crate::AppContext;

pub fn add_party(ctx: &mut AppContext, name: &str) -> Result<Party> {
    let party = ctx.parties.add(name)?.clone();
    ctx.persist_parties();
    info!(id = party.id, name = %party.name, "added party");
    Ok(party)
}

pub fn rename_party(ctx: &mut AppContext, id: u32, name: &str) -> Result<()> {
    ctx.parties.rename(id, name)?;
    ctx.persist_parties();
    info!(id, name = %name.trim(), "renamed party");
    Ok(())
}

/// Remove a party. Refused while deliveries are filed under its id.
pub fn remove_party(ctx: &mut AppContext, id: u32) -> Result<Party> {
    let deliveries = ctx.gateway().load_deliveries();
    let party = ctx.parties.remove(id, &deliveries)?;
    ctx.persist_parties();
    info!(id, name = %party.name, "removed party");
    Ok(party)
}

pub fn add_shortcut(ctx: &mut AppContext, shortcut: Shortcut) -> Result<()> {
    let code = shortcut.code.clone();
    ctx.shortcuts.add(shortcut)?;
    ctx.persist_shortcuts();
    info!(code = %code, "added shortcut");
    Ok(())
}

pub fn edit_shortcut(ctx: &mut AppContext, code: &str, shortcut: Shortcut) -> Result<()> {
    ctx.shortcuts.edit(code, shortcut)?;
    ctx.persist_shortcuts();
    info!(code, "edited shortcut");
    Ok(())
}

pub fn remove_shortcut(ctx: &mut AppContext, code: &str) -> Result<Shortcut> {
    let removed = ctx.shortcuts.remove(code)?;
    ctx.persist_shortcuts();
    info!(code, "removed shortcut");
    Ok(removed)
}
