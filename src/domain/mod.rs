//! Domain layer: records, value objects, the dialogue state machine and the
//! storage ports the ledger is written against.

pub mod command;
pub mod conversation;
pub mod message;
pub mod money;
pub mod ports;
pub mod subscription;
pub mod transaction;
pub mod user;
