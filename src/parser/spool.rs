//! Spool file parsing: subject header and the marked HTML body block.
//!
//! Spool files are plain text. Headers come first, and somewhere after them
//! the rendered HTML is wrapped between two literal marker lines:
//!
//! ```text
//! Subject: Welcome
//! ...
//! --- HTML Body ---
//! <div class="postheader">...</div>
//! --- End HTML Body ---
//! ```
//!
//! Both extractions are independent and lenient: anything missing becomes an
//! empty string.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::message::{RawMessage, SpooledMessage};

/// Marker that opens the HTML body block.
pub const HTML_BODY_START: &str = "--- HTML Body ---";

/// Marker that closes the HTML body block.
pub const HTML_BODY_END: &str = "--- End HTML Body ---";

fn subject_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Whitespace after the colon must stay on the header line.
    RE.get_or_init(|| Regex::new(r"Subject:[^\S\n](.*)").expect("valid subject regex"))
}

fn html_body_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            "(?s){}(.*?){}",
            regex::escape(HTML_BODY_START),
            regex::escape(HTML_BODY_END)
        );
        Regex::new(&pattern).expect("valid body regex")
    })
}

/// Parse a raw spool file into a [`SpooledMessage`].
pub fn parse_message(raw: RawMessage) -> SpooledMessage {
    let subject = extract_subject(&raw.text);
    let html_body = extract_html_body(&raw.text);
    SpooledMessage {
        path: raw.path,
        raw: raw.text,
        subject,
        html_body,
    }
}

/// Return the trimmed value of the first `Subject:` header, or `""`.
pub fn extract_subject(text: &str) -> String {
    subject_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Return the trimmed HTML between the first start marker and the next end
/// marker, or `""` when the block is missing or unterminated.
pub fn extract_html_body(text: &str) -> String {
    html_body_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Date: Thu, 04 Jan 2024 10:00:00 +0000\r\n\
Subject:   Welcome aboard  \r\n\
To: jane@example.com\r\n\
\r\n\
--- Text Body ---\r\n\
Hi Jane\r\n\
--- End Text Body ---\r\n\
--- HTML Body ---\r\n\
<div class=\"postheader\">Hi Jane</div>\r\n\
--- End HTML Body ---\r\n";

    #[test]
    fn test_subject_trimmed_including_crlf() {
        assert_eq!(extract_subject(SAMPLE), "Welcome aboard");
    }

    #[test]
    fn test_subject_first_occurrence_wins() {
        let text = "Subject: First\nSubject: Second\n";
        assert_eq!(extract_subject(text), "First");
    }

    #[test]
    fn test_subject_missing_is_empty() {
        assert_eq!(extract_subject("From: a@b.com\n\nBody"), "");
    }

    #[test]
    fn test_subject_does_not_spill_onto_next_line() {
        assert_eq!(extract_subject("Subject:\nTo: x@y.z\n"), "");
    }

    #[test]
    fn test_html_body_between_markers() {
        assert_eq!(
            extract_html_body(SAMPLE),
            "<div class=\"postheader\">Hi Jane</div>"
        );
    }

    #[test]
    fn test_html_body_inline_markers() {
        let text = "--- HTML Body ---<p>x</p>--- End HTML Body ---";
        assert_eq!(extract_html_body(text), "<p>x</p>");
    }

    #[test]
    fn test_html_body_is_non_greedy() {
        let text = "--- HTML Body ---a--- End HTML Body ---\n--- End HTML Body ---";
        assert_eq!(extract_html_body(text), "a");
    }

    #[test]
    fn test_html_body_unterminated_is_empty() {
        assert_eq!(extract_html_body("--- HTML Body ---\n<p>x</p>\n"), "");
        assert_eq!(extract_html_body("<p>x</p>\n--- End HTML Body ---"), "");
    }

    #[test]
    fn test_parse_message_extracts_independently() {
        let msg = parse_message(RawMessage::new("a.eml", "no headers\n--- HTML Body ---<b>hi</b>--- End HTML Body ---"));
        assert_eq!(msg.subject, "");
        assert_eq!(msg.html_body, "<b>hi</b>");
        assert!(msg.has_html_body());

        let msg = parse_message(RawMessage::new("b.eml", "Subject: Only subject\n"));
        assert_eq!(msg.subject, "Only subject");
        assert!(!msg.has_html_body());
    }
}
