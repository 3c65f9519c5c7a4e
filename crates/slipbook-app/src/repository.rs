//! Repository adapters for persistence layer

use std::path::PathBuf;

use slipbook_infra::JsonFileStore;
use slipbook_types::Result;

use crate::config::Config;

/// Open the JSON file store in the configured data directory
pub fn open_store(config: &Config) -> Result<JsonFileStore> {
    let data_dir = config.data_dir()?;
    open_store_at(data_dir)
}

/// Open the JSON file store at a custom directory
pub fn open_store_at(data_dir: PathBuf) -> Result<JsonFileStore> {
    JsonFileStore::open(data_dir).map_err(Into::into)
}
