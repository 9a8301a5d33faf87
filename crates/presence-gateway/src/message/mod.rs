//! Gateway wire protocol: opcodes, payload envelopes, dispatch events,
//! and close codes.

pub mod close;
pub mod events;
pub mod opcode;
pub mod payload;

pub use opcode::OpCode;
pub use payload::GatewayPayload;
