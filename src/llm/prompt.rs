use crate::models::chat::{ ChatTurn, Sender };

pub const SYSTEM_INSTRUCTION: &str =
    "You are a calm, concise first-aid assistant. Give clear, step-by-step guidance for \
emergencies and injuries. Always advise contacting local emergency services when a \
situation may be life-threatening. Do not diagnose conditions or prescribe medication.";

/// Renders the single prompt sent for one chat call: instruction, prior turns, then the new message.
pub fn build_chat_prompt(history: &[ChatTurn], message: &str) -> String {
    let mut prompt = String::from(SYSTEM_INSTRUCTION);
    prompt.push_str("\n\n");

    if !history.is_empty() {
        prompt.push_str("Previous conversation:\n");
        for turn in history {
            let role_display = match turn.sender {
                Sender::User => "User",
                Sender::Bot => "Assistant",
            };
            prompt.push_str(&format!("{}: {}\n", role_display, turn.text));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("User: {}\nAssistant:", message));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(sender: Sender, text: &str) -> ChatTurn {
        ChatTurn { sender, text: text.to_string() }
    }

    #[test]
    fn preserves_turn_order() {
        let history = vec![turn(Sender::User, "a"), turn(Sender::Bot, "b")];
        let prompt = build_chat_prompt(&history, "c");

        let a = prompt.find("User: a").unwrap();
        let b = prompt.find("Assistant: b").unwrap();
        let c = prompt.find("User: c").unwrap();
        assert!(a < b && b < c);
        assert!(prompt.starts_with(SYSTEM_INSTRUCTION));
    }

    #[test]
    fn empty_history_has_no_transcript() {
        let prompt = build_chat_prompt(&[], "How do I treat a burn?");
        assert!(!prompt.contains("Previous conversation"));
        assert!(prompt.ends_with("User: How do I treat a burn?\nAssistant:"));
    }
}
