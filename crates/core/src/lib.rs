//! Core logic of a chat turn: document extraction, prompt composition,
//! model inference and the session transcript.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod compose;
pub mod conversation;
pub mod extract;
mod model_client;
mod session;

pub use model_client::{InferenceError, ModelClient, ModelClientResponse};
pub use session::{ChatSession, ChatSessionBuilder, TurnReport};
