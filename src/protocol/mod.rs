//! Wire protocol of the realtime chat channel.

mod error;
mod frame;

pub use error::{FrameError, SendError};
pub use frame::{decode_inbound, InboundFrame, OutboundFrame, WireMessage, WireUser};
