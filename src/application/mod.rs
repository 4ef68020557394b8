//! Application layer containing the core business logic orchestration.
//!
//! The `Ledger` is the only path that mutates balances and appends to the
//! transaction log. The `CommandRouter` sits in front of it, turning each inbound
//! chat message into either the next step of an open dialogue or a command.

pub mod ledger;
pub mod replies;
pub mod router;
