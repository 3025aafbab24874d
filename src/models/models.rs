use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// One comment as handed out by the comment section, replies included.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CommentRecord {
    pub comment_id: String,
    pub text: String,
    pub author: String,
    pub channel_id: String,
    pub user_verified: bool,
    pub published_time: String,
    pub like_count: u64,
    pub reply_count: u64,
    pub is_reply: bool,
}

impl CommentRecord {
    pub fn new(comment_id: impl Into<String>, text: impl Into<String>) -> Self {
        let comment_id = comment_id.into();
        Self {
            is_reply: comment_id.contains('.'),
            comment_id,
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Short language code produced by the detector ("en", "ko", ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LanguageLabel(String);

impl LanguageLabel {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LanguageLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LanguageLabel {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
