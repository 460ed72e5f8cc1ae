//! Small helpers shared by the payload builders

use switchboard_core::{ChatRequest, Message, Role};

/// Split a request into the effective system prompt and the plain turns
///
/// The settings' system prompt wins; system-role messages embedded in the
/// history are used only when the settings carry none. Either way the
/// returned turns hold no system entries.
pub(crate) fn split_system(request: &ChatRequest) -> (Option<String>, Vec<&Message>) {
    let turns: Vec<&Message> = request
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .collect();

    let system = if !request.settings.system_prompt.is_empty() {
        Some(request.settings.system_prompt.clone())
    } else {
        let embedded: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        if embedded.is_empty() {
            None
        } else {
            Some(embedded.join("\n\n"))
        }
    };

    (system, turns)
}
