//! Parsing helpers for AI backend responses
//!
//! Models often wrap their JSON in prose or code fences, so the object is
//! located inside the text before deserializing. Nothing from the service is
//! trusted until it passes these checks.

use crate::error::{Error, Result};

use super::types::AIAnalysis;

/// Maximum characters of raw reply echoed into error messages
const RAW_PREVIEW_LEN: usize = 200;

/// Longest quote accepted from a completion service (characters)
const MAX_QUOTE_LEN: usize = 400;

/// Parse and validate a financial analysis reply
pub fn parse_analysis(response: &str) -> Result<AIAnalysis> {
    let json_str = extract_json_object(response)?;

    let mut parsed: AIAnalysis = serde_json::from_str(json_str).map_err(|e| {
        Error::Upstream(format!(
            "Invalid analysis JSON from AI: {} | Raw: {}",
            e,
            preview(json_str)
        ))
    })?;

    parsed.analysis = parsed.analysis.trim().to_string();
    if parsed.analysis.is_empty() {
        return Err(Error::Upstream("AI analysis is empty".into()));
    }

    parsed.recommendations = clean_list(parsed.recommendations);
    parsed.insights = clean_list(parsed.insights);
    if parsed.recommendations.is_empty() {
        return Err(Error::Upstream(format!(
            "AI analysis has no recommendations | Raw: {}",
            preview(json_str)
        )));
    }

    Ok(parsed)
}

/// Parse a quote reply: trim and strip one surrounding quote character
pub fn parse_quote(response: &str) -> Result<String> {
    let mut text = response.trim();

    for quote in ['"', '\u{201c}', '\''] {
        if let Some(rest) = text.strip_prefix(quote) {
            text = rest;
            break;
        }
    }
    for quote in ['"', '\u{201d}', '\''] {
        if let Some(rest) = text.strip_suffix(quote) {
            text = rest;
            break;
        }
    }

    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Upstream("AI quote is empty".into()));
    }
    if text.chars().count() > MAX_QUOTE_LEN {
        return Err(Error::Upstream(format!(
            "AI quote too long | Raw: {}",
            preview(text)
        )));
    }

    Ok(text.to_string())
}

/// Slice from the first `{` to the last `}`
fn extract_json_object(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::Upstream(format!(
            "No JSON found in AI response | Raw: {}",
            preview(response)
        ))),
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn preview(text: &str) -> String {
    if text.chars().count() > RAW_PREVIEW_LEN {
        let truncated: String = text.chars().take(RAW_PREVIEW_LEN).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
