//! Translation between the runner's data model and the A2A protocol's.
//!
//! - [`part`] — bidirectional `Part` <-> `RunnerPart` conversion
//! - [`message`] — builds runner content from a protocol message, or a
//!   loose map shape, and back
//! - [`event`] — translates a [`crate::runner::RunnerStep`] into zero or
//!   more [`crate::types::StreamResponse`] events, including task-state
//!   classification

pub mod event;
pub mod message;
pub mod part;

pub use event::{convert_event, is_partial};
pub use message::{message_from_loose, protocol_message_from_content, runner_message_from_protocol};
pub use part::{protocol_to_runner, runner_to_protocol};
