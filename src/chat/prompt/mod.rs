
use super::{ChatMessage, Role};
use crate::config::ProfileConfig;
use crate::database::lancedb::RetrievalResult;

/// Shown to the model instead of retrieved chunks when nothing cleared the
/// similarity threshold
pub const NO_CONTEXT_PLACEHOLDER: &str = "No specific information found in the knowledge base.";

const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// Format retrieved chunks into the context section of the system prompt.
/// Each chunk is labelled with its rank and kind so the model can cite
/// sources.
pub fn format_context(results: &[RetrievalResult]) -> String {
    if results.is_empty() {
        return NO_CONTEXT_PLACEHOLDER.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!(
                "[Source {} - {}]:\n{}",
                i + 1,
                result.chunk.metadata.kind,
                result.chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_DELIMITER)
}

/// Build the persona-plus-context system prompt. The persona comes from
/// configuration; the grounding rules are fixed.
pub fn system_prompt(profile: &ProfileConfig, results: &[RetrievalResult]) -> String {
    let mut prompt = format!(
        "You are {assistant}, the assistant on {owner}'s portfolio website. You \
         talk about {owner} the way a close friend would: warm, first person, \
         genuinely enthusiastic about their work.",
        assistant = profile.assistant_name,
        owner = profile.owner_name,
    );

    if !profile.headline.trim().is_empty() {
        prompt.push_str(&format!(" {} is {}.", profile.owner_name, profile.headline));
    }

    prompt.push_str(
        "\n\nYour job is to answer visitors' questions about the portfolio owner's \
         background, projects, skills, and experience.\n\n\
         Guidelines:\n\
         - Answer ONLY from the context provided below. Never invent projects, \
         employers, dates, or qualifications.\n\
         - If the context does not contain the answer, say so honestly and suggest \
         the visitor get in touch directly.\n\
         - Keep answers concise and conversational.\n\
         - Playfully steer questions unrelated to the portfolio back on topic.",
    );

    let mut contact_lines = Vec::new();
    if !profile.email.trim().is_empty() {
        contact_lines.push(format!("Email: {}", profile.email));
    }
    if !profile.linkedin.trim().is_empty() {
        contact_lines.push(format!("LinkedIn: {}", profile.linkedin));
    }
    if !profile.portfolio_url.trim().is_empty() {
        contact_lines.push(format!("Portfolio: {}", profile.portfolio_url));
    }
    if !contact_lines.is_empty() {
        prompt.push_str("\n\nContact details you may share:\n");
        prompt.push_str(&contact_lines.join("\n"));
    }

    prompt.push_str("\n\nContext from the knowledge base:\n\n");
    prompt.push_str(&format_context(results));

    prompt
}

/// Assemble the full message list for a completion request: system prompt,
/// then the most recent `history_window` turns, then the current question.
/// System messages smuggled into the client-supplied history are dropped.
pub fn build_messages(
    profile: &ProfileConfig,
    results: &[RetrievalResult],
    history: &[ChatMessage],
    history_window: usize,
    question: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history_window + 2);
    messages.push(ChatMessage::system(system_prompt(profile, results)));

    let trusted: Vec<&ChatMessage> = history
        .iter()
        .filter(|m| m.role != Role::System)
        .collect();
    let start = trusted.len().saturating_sub(history_window);
    for message in &trusted[start..] {
        messages.push((*message).clone());
    }

    messages.push(ChatMessage::user(question));
    messages
}
