//! Reduces a finished conversation to the text shown to the user

use super::types::{Roster, Turn};

pub const NO_MESSAGES: &str = "No messages captured from group chat.";
pub const NO_RESPONSE: &str = "No AI response found.";
pub const TURN_SEPARATOR: &str = "\n---\n";

/// Format every displayable turn as `**speaker**: text`, joined by
/// [`TURN_SEPARATOR`].
///
/// Turns by excluded participants and turns without text are skipped. If
/// nothing survives, the last turn's text is returned whoever spoke it, and
/// failing that [`NO_RESPONSE`].
pub fn extract_response(turns: &[Turn], roster: &Roster) -> String {
    if turns.is_empty() {
        return NO_MESSAGES.to_string();
    }

    let responses: Vec<String> = turns
        .iter()
        .filter(|turn| turn.has_text() && !roster.is_excluded(&turn.speaker))
        .map(|turn| format!("**{}**: {}", turn.speaker, turn.text))
        .collect();

    if !responses.is_empty() {
        return responses.join(TURN_SEPARATOR);
    }

    match turns.last() {
        Some(last) if last.has_text() => last.text.clone(),
        _ => NO_RESPONSE.to_string(),
    }
}
