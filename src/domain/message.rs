use super::user::Identity;
use serde::Deserialize;

/// A text message delivered by the chat gateway.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct InboundMessage {
    #[serde(rename = "user")]
    pub sender: Identity,
    #[serde(default)]
    pub text: String,
}

impl InboundMessage {
    pub fn new(sender: Identity, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}
