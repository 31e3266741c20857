//! Clean AI findings text for display.
//!
//! Report findings come straight from the model and may carry an internal
//! reasoning block (`<think>...</think>`) and a trailing signature section
//! introduced by `**Signature:**`. Neither belongs on the dashboard.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Opening/closing pair of the model's reasoning block (non-greedy, spans lines).
static REASONING_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think>.*?</think>").expect("reasoning block regex must compile")
});

/// Everything from this marker on is the report signature.
pub const SIGNATURE_MARKER: &str = "**Signature:**";

/// Field of a report record holding the findings text.
pub const FINDINGS_FIELD: &str = "findings";

/// Produce the visible part of a findings text.
///
/// Strips reasoning blocks, trims, cuts at the first signature marker and
/// trims again. Blocks are stripped until none remain so that a block which
/// only forms after an inner one is removed cannot survive a second pass;
/// this keeps `clean_findings(&clean_findings(x)) == clean_findings(x)`.
pub fn clean_findings(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let stripped = REASONING_BLOCK_RE.replace(&current, "").into_owned();
        if stripped.len() == current.len() {
            break;
        }
        current = stripped;
    }

    let trimmed = current.trim();
    let visible = match trimmed.find(SIGNATURE_MARKER) {
        Some(idx) => trimmed[..idx].trim(),
        None => trimmed,
    };
    visible.to_string()
}

/// Clean a findings value of unknown JSON type. Non-strings yield `""`.
pub fn clean_findings_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => clean_findings(text),
        _ => String::new(),
    }
}

/// Cleaned findings of a report record (empty when absent).
pub fn report_findings(report: Option<&Value>) -> String {
    clean_findings_value(report.and_then(|r| r.get(FINDINGS_FIELD)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_reasoning_and_signature() {
        assert_eq!(
            clean_findings("<think>internal</think>Visible part**Signature:**John"),
            "Visible part"
        );
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(clean_findings("plain text"), "plain text");
        assert_eq!(clean_findings(""), "");
    }

    #[test]
    fn reasoning_block_spans_lines() {
        let text = "<think>\nstep 1\nstep 2\n</think>\n\nVoice shows mild strain.";
        assert_eq!(clean_findings(text), "Voice shows mild strain.");
    }

    #[test]
    fn match_is_non_greedy() {
        let text = "<think>a</think>keep</think>";
        assert_eq!(clean_findings(text), "keep</think>");
    }

    #[test]
    fn unclosed_block_is_left_alone() {
        assert_eq!(clean_findings("<think>never closed"), "<think>never closed");
    }

    #[test]
    fn signature_without_reasoning() {
        let text = "Healthy voice.\n\n**Signature:** Dr. Rao\nClinic";
        assert_eq!(clean_findings(text), "Healthy voice.");
    }

    #[test]
    fn every_reasoning_block_is_removed() {
        assert_eq!(clean_findings("<think>a</think>one<think>b</think>two"), "onetwo");
        assert_eq!(
            clean_findings("Start. <think>x</think>Middle.<think>y</think> End."),
            "Start. Middle. End."
        );
    }

    #[test]
    fn nested_block_formed_after_stripping_is_removed() {
        let text = "<thi<think>x</think>nk>hidden</think>shown";
        assert_eq!(clean_findings(text), "shown");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "<think>internal</think>Visible part**Signature:**John",
            "  padded  ",
            "<think>a</think>one<think>b</think>two",
            "<thi<think>x</think>nk>hidden</think>shown",
            "**Signature:**only signature",
            "text **Signature:** a **Signature:** b",
            "<think>open only",
            "",
        ];
        for sample in samples {
            let once = clean_findings(sample);
            assert_eq!(clean_findings(&once), once, "sample = {sample:?}");
        }
    }

    #[test]
    fn non_text_values_yield_empty() {
        assert_eq!(clean_findings_value(None), "");
        assert_eq!(clean_findings_value(Some(&Value::Null)), "");
        assert_eq!(clean_findings_value(Some(&json!(42))), "");
        assert_eq!(clean_findings_value(Some(&json!(["a"]))), "");
        assert_eq!(clean_findings_value(Some(&json!("ok"))), "ok");
    }

    #[test]
    fn report_findings_reads_field() {
        let report = json!({ "findings": "<think>x</think> Fine." , "jitter": 1.0 });
        assert_eq!(report_findings(Some(&report)), "Fine.");
        assert_eq!(report_findings(Some(&json!({}))), "");
        assert_eq!(report_findings(None), "");
    }
}
