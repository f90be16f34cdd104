//! Console entry point.

use std::io;

use anyhow::Context;
use eggman_desktop::{AppConfig, Shell, Terminal};
use eggman_inventory::InventoryStore;
use eggman_storage::FileKeyValueStore;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    eggman_observability::tracing::init(&config.log);

    tracing::info!(data_dir = %config.data_dir.display(), "starting");

    let storage = FileKeyValueStore::new(&config.data_dir);
    let store = InventoryStore::load(storage).with_context(|| {
        format!("failed to load inventory from {}", config.data_dir.display())
    })?;

    let terminal = Terminal::new(io::stdin().lock(), io::stdout().lock());
    Shell::new(store, terminal).run()
}
