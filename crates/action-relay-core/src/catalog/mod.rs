mod action;
#[allow(clippy::module_inception)]
mod catalog;
mod store;
mod toml_store;

pub use {
    action::{Action, ActionId, ActionKind, ActionSpec},
    catalog::ActionCatalog,
    store::{CatalogStore, MemoryCatalogStore, StoredCatalog},
    toml_store::TomlCatalogStore,
};
