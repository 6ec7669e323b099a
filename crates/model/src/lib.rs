//! An abstraction layer over language-model inference endpoints.
//!
//! This crate establishes the protocol the chat core uses to talk to a
//! model: a single text prompt goes in, a stream of text deltas comes
//! out. Any endpoint (a local server, a remote API, an in-process
//! runtime) can be plugged in by implementing [`ModelProvider`].
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
