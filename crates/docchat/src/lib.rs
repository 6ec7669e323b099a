//! A terminal front-end for asking questions about a document.
//!
//! The crate includes a CLI tool for chatting with a local model. The
//! pieces it is built from (command parsing and the attached document
//! state) are also usable as a library.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod command;
mod sidebar;

pub use command::{Command, ParseError};
pub use sidebar::{AttachError, Sidebar, mime_for_path};

/// Re-exports of [`docchat_core`] crate.
pub mod core {
    pub use docchat_core::*;
}
