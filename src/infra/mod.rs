//! Infrastructure layer: adapters for config, storage, and OS integrations.

pub mod config;
pub mod contracts;
pub mod error;
pub mod http;
pub mod logging;
pub mod notifier;
pub mod secrets;
pub mod storage_layout;
#[cfg(test)]
pub mod stubs;
