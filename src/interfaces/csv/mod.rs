pub mod message_reader;
pub mod reply_writer;
