//! Assistant layer — conversations and the gateway orchestrator.
//!
//! [`Conversation`] is the per-surface streaming aggregator; the
//! orchestrator ([`run_assistant`]) runs on the tokio runtime and turns
//! [`AssistantCommand`]s into [`AssistantEvent`]s the UI polls each frame.

pub mod conversation;
pub mod orchestrator;

pub use conversation::{ChatMessage, Conversation, MsgSender, StreamTicket};
pub use orchestrator::{
    run_assistant, AssistantCommand, AssistantEvent, ChatSurface, OneShotKind,
};
