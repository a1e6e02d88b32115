pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logger;
pub mod models;
pub mod resolver;
pub mod service;
pub mod storage;

pub use error::MoimError;
pub use ledger::{AccountLedger, AccountView};
pub use logger::in_memory::InMemoryAuditLogger;
pub use resolver::{RoleResolver, RoleTable, RoleView};
pub use service::GroupService;
pub use storage::in_memory::InMemoryStorage;

/// Snapshot bundled with the crate, used when no `SNAPSHOT_PATH` is configured.
pub const DEFAULT_SNAPSHOT: &str = include_str!("../fixtures/snapshot.json");

#[cfg(test)]
mod tests;
