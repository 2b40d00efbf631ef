//! Chat transcript

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered chat history. Entries are only appended, except that the
/// trailing assistant entry may grow while a reply streams in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<Message>,
}

impl ChatTranscript {
    /// Number of entries the UI renders
    pub const VISIBLE: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Extend the trailing assistant entry. Returns false when the last
    /// entry is not an assistant message.
    pub fn extend_last_assistant(&mut self, chunk: &str) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content.push_str(chunk);
                true
            }
            _ => false,
        }
    }

    /// Replace the trailing assistant entry's content
    pub fn replace_last_assistant(&mut self, content: impl Into<String>) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content = content.into();
                true
            }
            _ => false,
        }
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The trailing entries presented to the player
    pub fn visible(&self) -> &[Message] {
        let start = self.messages.len().saturating_sub(Self::VISIBLE);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_is_last_two() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.visible().is_empty());

        transcript.push(Message::user("hi"));
        assert_eq!(transcript.visible().len(), 1);

        transcript.push(Message::assistant("Ho ho ho!"));
        transcript.push(Message::user("where are my presents"));
        let visible = transcript.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].role, Role::Assistant);
        assert_eq!(visible[1].content, "where are my presents");
    }

    #[test]
    fn test_streaming_grows_last_assistant_only() {
        let mut transcript = ChatTranscript::new();
        transcript.push(Message::user("hi"));
        assert!(!transcript.extend_last_assistant("lost"));

        transcript.push(Message::assistant(""));
        assert!(transcript.extend_last_assistant("Ho ho"));
        assert!(transcript.extend_last_assistant(" ho!"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().unwrap().content, "Ho ho ho!");

        assert!(transcript.replace_last_assistant("fallback"));
        assert_eq!(transcript.last().unwrap().content, "fallback");
    }
}
