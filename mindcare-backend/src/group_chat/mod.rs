//! Round-robin group chat between fixed conversational roles
//!
//! A run is seeded by the initiating participant and then handed to the
//! speakers in a fixed cyclic order until the round cap is reached.
//!
//! ```text
//! submit(input)
//!   Idle ──start──▶ Running ──step × (max_rounds - 1)──▶ Done
//!                      │
//!                      └── provider error ──▶ Idle (turns discarded)
//! ```
//!
//! With the default roster and `max_rounds = 3`:
//!
//! ```text
//! patient (seed) → emotion_analysis → therapy_recommendation
//! ```
//!
//! The finished conversation is reduced to display text by
//! [`extract_response`].

pub mod extractor;
pub mod scheduler;
pub mod types;

pub use extractor::{NO_MESSAGES, NO_RESPONSE, extract_response};
pub use scheduler::GroupChat;
pub use types::{ChatState, Conversation, GroupChatConfig, Participant, Roster, Turn};
