//! Conversation state — the streaming-response aggregator.
//!
//! [`Conversation`] turns an asynchronous sequence of text fragments into
//! a single growing assistant message, visible to the renderer after every
//! fragment, with exactly one placeholder-then-fill lifecycle per question:
//!
//! ```text
//! ask(q)      → user turn (final) + assistant placeholder ("", not final)
//! fragment    → append to placeholder, arrival order, no reordering
//! stream end  → placeholder marked final
//! stream err  → placeholder text REPLACED by a fixed localized message
//! ```
//!
//! Each conversation admits one outstanding request at a time, and every
//! stream is tagged with the generation captured when it was opened.
//! [`Conversation::reset`] (called on district or language switch) bumps
//! the generation, so fragments from a stream opened under the previous
//! context are discarded instead of landing in the fresh message list.

// ---------------------------------------------------------------------------
// Message types
// ---------------------------------------------------------------------------

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgSender {
    User,
    Assistant,
}

/// One turn in a conversation.  Append-only ordering: insertion order is
/// display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: MsgSender,
    pub text: String,
    /// `false` only while the assistant turn is still streaming.
    pub done: bool,
}

/// Handle for one streaming request; carries the generation captured at
/// stream-open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamTicket {
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// Ordered message sequence plus the single-in-flight guard.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
    in_flight: bool,
    generation: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered message sequence.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// `true` while a streaming request is outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Current context generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin a question/answer turn.
    ///
    /// Returns `None` — leaving the message sequence untouched — when the
    /// question is blank or another request is still in flight.  Otherwise
    /// appends the user turn and the assistant placeholder and returns the
    /// ticket the stream's events must carry.
    pub fn ask(&mut self, question: &str) -> Option<StreamTicket> {
        let question = question.trim();
        if question.is_empty() || self.in_flight {
            return None;
        }

        self.push(MsgSender::User, question.to_string(), true);
        self.push(MsgSender::Assistant, String::new(), false);
        self.in_flight = true;

        Some(StreamTicket {
            generation: self.generation,
        })
    }

    /// Append a fragment to the open placeholder, in arrival order.
    ///
    /// Returns `false` (and changes nothing) when the ticket's generation
    /// is stale or no request is in flight.
    pub fn apply_fragment(&mut self, ticket: StreamTicket, fragment: &str) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        if let Some(placeholder) = self.open_placeholder() {
            placeholder.text.push_str(fragment);
            return true;
        }
        false
    }

    /// Mark the assistant turn final after clean stream exhaustion.
    pub fn finish(&mut self, ticket: StreamTicket) {
        if !self.accepts(ticket) {
            return;
        }
        if let Some(placeholder) = self.open_placeholder() {
            placeholder.done = true;
        }
        self.in_flight = false;
    }

    /// Replace the assistant turn's text with a fixed localized error
    /// message and mark it final.  Partial text already streamed in is
    /// discarded, so the UI is never stuck showing a half answer.
    pub fn fail(&mut self, ticket: StreamTicket, message: &str) {
        if !self.accepts(ticket) {
            return;
        }
        if let Some(placeholder) = self.open_placeholder() {
            placeholder.text = message.to_string();
            placeholder.done = true;
        }
        self.in_flight = false;
    }

    /// Context switch: clear the sequence and invalidate every open stream.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.generation += 1;
        self.in_flight = false;
    }

    fn accepts(&self, ticket: StreamTicket) -> bool {
        ticket.generation == self.generation && self.in_flight
    }

    fn open_placeholder(&mut self) -> Option<&mut ChatMessage> {
        self.messages
            .last_mut()
            .filter(|m| m.sender == MsgSender::Assistant && !m.done)
    }

    fn push(&mut self, sender: MsgSender, text: String, done: bool) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            sender,
            text,
            done,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
