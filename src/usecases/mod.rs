//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod fetch_worker;
pub mod list_users;
pub mod load_history;
pub mod notifications;
pub mod send_message;
pub mod shell;
