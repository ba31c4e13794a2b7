//! Prompt text sent to the language model.

use shared::agent_api::ChatMessage;

pub const SYSTEM_PROMPT: &str = "Si Aura, priateľský osobný asistent. \
Odpovedaj po slovensky, stručne a vecne. \
Ak niečo nevieš, povedz to otvorene a navrhni, kde môže používateľ hľadať ďalej.";

/// Messages for a fallback model call: persona, optional conversation
/// summary, then the user's text exactly as typed.
pub fn fallback_messages(command: &str, summary: &str) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
    if !summary.trim().is_empty() {
        messages.push(ChatMessage::system(format!(
            "Kontext predchádzajúcej konverzácie:\n{}",
            summary.trim_end()
        )));
    }
    messages.push(ChatMessage::user(command));
    messages
}
