//! Terminal client for a REST notes service.
//!
//! Notes live on the remote service; this crate lists them as cards and
//! creates, edits and deletes them through a modal editor.

pub mod api;
pub mod cli;
pub mod config;
pub mod dto;
pub mod logging;
pub mod shell;
pub mod ui;
