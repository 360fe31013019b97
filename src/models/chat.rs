use serde::{ Deserialize, Serialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One prior exchange restated by the caller; never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub chat_history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_history_is_empty() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "chatHistory": null}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some("hi"));
        assert!(req.chat_history.is_empty());
    }

    #[test]
    fn history_senders_parse_lowercase() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message": "c", "chatHistory": [{"sender": "user", "text": "a"}, {"sender": "bot", "text": "b"}]}"#
        ).unwrap();
        assert_eq!(req.chat_history[0].sender, Sender::User);
        assert_eq!(req.chat_history[1].sender, Sender::Bot);
    }
}
