use crate::domain::user::Identity;
use crate::error::{Result, TrackerError};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ReplyRow<'a> {
    user: Identity,
    reply: &'a str,
}

/// Writes outgoing replies as CSV rows with a `user,reply` header.
///
/// Each reply is flushed as soon as it is written.
pub struct ReplyWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReplyWriter<W> {
    /// Creates a writer and emits the header row.
    pub fn new(sink: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        writer.write_record(["user", "reply"])?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn write_reply(&mut self, user: Identity, reply: &str) -> Result<()> {
        self.writer.serialize(ReplyRow { user, reply })?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| TrackerError::IoError(e.into_error()))
    }
}
