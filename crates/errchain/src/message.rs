use std::borrow::Cow;

/// An error that is nothing but its message.
///
/// Suitable for sentinels:
///
/// ```rust,ignore
/// static ERR_TOO_SHORT: Message = Message::new_static("string is too short");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{text}")]
pub struct Message {
    text: Cow<'static, str>,
}

impl Message {
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self { text: text.into() }
    }

    pub const fn new_static(text: &'static str) -> Self {
        Self {
            text: Cow::Borrowed(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self::new_static(text)
    }
}
