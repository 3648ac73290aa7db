//! Decision extractor — reads a human's reply to a tool-approval interrupt
//! and classifies it as approve, deny, reject, or undecided.
//!
//! Data parts win over free text: if any part carries a literal
//! `data["decision_type"]`, that value is authoritative. Otherwise the
//! extractor falls back to keyword matching over text parts, trying reject
//! keywords, then deny keywords, before approve keywords — a reply like
//! "no, approved by mistake" must deny, not approve.

use crate::types::{Message, Part};

const REJECT_KEYWORDS: &[&str] = &["reject", "rejected"];
const DENY_KEYWORDS: &[&str] = &["denied", "deny", "no", "cancel", "stop"];
const APPROVE_KEYWORDS: &[&str] = &["approved", "approve", "proceed", "yes", "continue"];

/// The outcome of scanning a reply for an approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The reply approves the pending tool call(s).
    Approve,
    /// The reply denies the pending tool call(s).
    Deny,
    /// The reply rejects the pending tool call(s).
    Reject,
    /// No decision could be extracted.
    None,
}

/// Extract a [`Decision`] from a message sent in reply to an approval
/// interrupt.
pub fn extract_decision(message: &Message) -> Decision {
    if let Some(decision) = decision_from_data_parts(&message.parts) {
        return decision;
    }
    decision_from_text_parts(&message.parts)
}

fn decision_from_data_parts(parts: &[Part]) -> Option<Decision> {
    for part in parts {
        let Part::Data { data, .. } = part else { continue };
        let Some(decision_type) = data.get("decision_type").and_then(|v| v.as_str()) else {
            continue;
        };
        match decision_type {
            "approve" => return Some(Decision::Approve),
            "deny" => return Some(Decision::Deny),
            "reject" => return Some(Decision::Reject),
            _ => continue,
        }
    }
    None
}

fn decision_from_text_parts(parts: &[Part]) -> Decision {
    let combined: String = parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text, .. } => Some(text.to_lowercase()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ");

    if combined.is_empty() {
        return Decision::None;
    }

    let words: Vec<&str> = combined.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();

    if REJECT_KEYWORDS.iter().any(|kw| words.contains(kw)) {
        return Decision::Reject;
    }
    if DENY_KEYWORDS.iter().any(|kw| words.contains(kw)) {
        return Decision::Deny;
    }
    if APPROVE_KEYWORDS.iter().any(|kw| words.contains(kw)) {
        return Decision::Approve;
    }
    Decision::None
}
