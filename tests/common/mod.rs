#![allow(dead_code)]

use std::io::Write;
use subtrack::application::ledger::Ledger;
use subtrack::application::router::CommandRouter;
use subtrack::domain::message::InboundMessage;
use subtrack::domain::user::Identity;
use subtrack::infrastructure::in_memory::{
    InMemorySubscriptionStore, InMemoryTransactionStore, InMemoryUserStore,
};
use tempfile::NamedTempFile;

pub fn in_memory_router() -> CommandRouter {
    CommandRouter::new(Ledger::new(
        Box::new(InMemoryUserStore::new()),
        Box::new(InMemorySubscriptionStore::new()),
        Box::new(InMemoryTransactionStore::new()),
    ))
}

/// Sends one message and returns the reply, panicking on storage errors.
pub async fn send(router: &mut CommandRouter, user: Identity, text: &str) -> Option<String> {
    router
        .handle(&InboundMessage::new(user, text))
        .await
        .expect("message handling failed")
}

/// Writes a `user,text` CSV with the given messages.
pub fn messages_csv(messages: &[(Identity, &str)]) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let mut wtr = csv::Writer::from_path(file.path()).unwrap();
    wtr.write_record(["user", "text"]).unwrap();
    for (user, text) in messages {
        wtr.write_record([user.to_string().as_str(), *text]).unwrap();
    }
    wtr.flush().unwrap();
    file
}

/// Appends raw lines to a CSV file, for malformed input.
pub fn raw_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}
