//! Domain layer: chat entities, view state, and the rules that drive them.

pub mod composer_state;
pub mod connection;
pub mod conversation;
pub mod events;
pub mod message;
pub mod notification;
pub mod roster;
pub mod roster_state;
pub mod shell_state;
pub mod thread_state;
pub mod throttle;
pub mod time_labels;
pub mod typing;
pub mod user;
