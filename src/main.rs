use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use subtrack::application::ledger::Ledger;
use subtrack::application::router::CommandRouter;
use subtrack::config::{Config, subscribe_tracing};
use subtrack::infrastructure::in_memory::{
    InMemorySubscriptionStore, InMemoryTransactionStore, InMemoryUserStore,
};
use subtrack::interfaces::csv::message_reader::MessageReader;
use subtrack::interfaces::csv::reply_writer::ReplyWriter;
use tracing::{error, info};

fn in_memory_ledger() -> Ledger {
    Ledger::new(
        Box::new(InMemoryUserStore::new()),
        Box::new(InMemorySubscriptionStore::new()),
        Box::new(InMemoryTransactionStore::new()),
    )
}

#[cfg(feature = "storage-rocksdb")]
fn build_ledger(db_path: Option<PathBuf>) -> Result<Ledger> {
    use subtrack::infrastructure::rocksdb::RocksDBStore;

    let Some(db_path) = db_path else {
        return Ok(in_memory_ledger());
    };
    // One RocksDB instance backs all three stores
    let store = RocksDBStore::open(&db_path).into_diagnostic()?;
    info!(path = %db_path.display(), "using RocksDB storage");
    Ok(Ledger::new(
        Box::new(store.clone()),
        Box::new(store.clone()),
        Box::new(store),
    ))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn build_ledger(db_path: Option<PathBuf>) -> Result<Ledger> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_ledger())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    subscribe_tracing(&config.log_level);

    let ledger = build_ledger(config.db_path.clone())?;
    let mut router = CommandRouter::new(ledger);

    let source: Box<dyn Read> = match &config.input {
        Some(path) => Box::new(File::open(path).into_diagnostic()?),
        None => Box::new(io::stdin()),
    };
    let reader = MessageReader::new(source);

    let stdout = io::stdout();
    let mut writer = ReplyWriter::new(stdout.lock()).into_diagnostic()?;

    let (mut handled, mut failed) = (0usize, 0usize);
    for message in reader.messages() {
        match message {
            Ok(message) => match router.handle(&message).await {
                Ok(Some(reply)) => {
                    handled += 1;
                    writer.write_reply(message.sender, &reply).into_diagnostic()?;
                }
                Ok(None) => handled += 1,
                Err(e) => {
                    failed += 1;
                    error!(sender = message.sender, "Error handling message: {}", e);
                }
            },
            Err(e) => {
                failed += 1;
                error!("Error reading message: {}", e);
            }
        }
    }

    info!(handled, failed, "message stream finished");
    Ok(())
}
