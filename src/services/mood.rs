// src/services/mood.rs
use super::session_manager::{ChatMessage, Mood, Sender};

pub fn mood_statement(mood: Mood) -> String {
    format!("I'm feeling {} right now.", mood)
}

pub fn mood_acknowledgement(mood: Mood) -> String {
    format!(
        "I understand you're feeling {}. Thank you for sharing that with me. Would you like to talk about what's contributing to these feelings?",
        mood
    )
}

/// The user/assistant pair recorded when a mood is picked. No upstream call involved.
pub fn mood_exchange(mood: Mood) -> (ChatMessage, ChatMessage) {
    (
        ChatMessage::new(Sender::User, mood_statement(mood), Some(mood)),
        ChatMessage::new(Sender::Assistant, mood_acknowledgement(mood), None),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_tags_only_the_user_message() {
        let (user, reply) = mood_exchange(Mood::Sad);
        assert_eq!(user.text, "I'm feeling sad right now.");
        assert_eq!(user.mood, Some(Mood::Sad));
        assert_eq!(user.sender, Sender::User);
        assert!(reply.text.starts_with("I understand you're feeling sad."));
        assert_eq!(reply.mood, None);
    }
}
