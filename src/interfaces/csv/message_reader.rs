use crate::domain::message::InboundMessage;
use crate::error::{Result, TrackerError};
use std::io::Read;

/// Reads inbound chat messages from a CSV source with a `user,text` header.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<InboundMessage>`. It trims whitespace and tolerates short records.
pub struct MessageReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> MessageReader<R> {
    /// Creates a new `MessageReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes messages, so a live
    /// stream (stdin) is handled message by message.
    pub fn messages(self) -> impl Iterator<Item = Result<InboundMessage>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(TrackerError::from))
    }
}
