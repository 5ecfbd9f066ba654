//! Output module
//!
//! Emits SCHEMA, RECORD and STATE messages as line-delimited JSON on
//! stdout. Logging goes to stderr so the message stream stays clean.

mod message;
mod writer;

pub use message::Message;
pub use writer::MessageWriter;

#[cfg(test)]
mod tests;
