//! Snapshot tests for user-facing text and JSON.

mod error_messages;
mod packing_output;
