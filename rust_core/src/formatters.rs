//! Chat message text for status changes and malfunction reports

use crate::error::BotError;
use crate::models::{HomeworkStatus, StatusChange};

/// Telegram `sendMessage` limit, counted in UTF-16 code units
pub const MAX_MESSAGE_LEN: usize = 4096;

const ELLIPSIS: char = '…';

pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Cut `text` to at most `max_len` UTF-16 units on a char boundary,
/// marking the cut with an ellipsis.
pub fn truncate_message(text: &str, max_len: usize) -> String {
    if utf16_len(text) <= max_len {
        return text.to_string();
    }

    let ellipsis_len = ELLIPSIS.len_utf16();
    let budget = max_len.saturating_sub(ellipsis_len);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let width = c.len_utf16();
        if used + width > budget {
            break;
        }
        used += width;
        out.push(c);
    }
    if max_len >= ellipsis_len {
        out.push(ELLIPSIS);
    }
    out
}

pub fn format_status_change(change: &StatusChange) -> String {
    const COMMENT_PREFIX: &str = "\nReviewer comment: ";

    let hw = &change.homework;
    let mut out = format!(
        "Homework \"{}\" review status changed. {}",
        hw.name,
        hw.status.verdict()
    );

    if hw.status == HomeworkStatus::Rejected {
        if let Some(comment) = hw.reviewer_comment.as_deref() {
            let room = MAX_MESSAGE_LEN.saturating_sub(utf16_len(&out) + utf16_len(COMMENT_PREFIX));
            if room > 0 {
                out.push_str(COMMENT_PREFIX);
                out.push_str(&truncate_message(comment.trim(), room));
            }
        }
    }

    // The homework name itself is unbounded.
    truncate_message(&out, MAX_MESSAGE_LEN)
}

/// Chat message reporting a failed poll
pub fn format_malfunction(err: &BotError) -> String {
    truncate_message(&format!("Bot malfunction: {err}"), MAX_MESSAGE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Homework;

    #[test]
    fn test_approved_message() {
        let change = StatusChange {
            homework: Homework::new("1", "hw_python_oop.zip", HomeworkStatus::Approved),
            previous: Some(HomeworkStatus::Reviewing),
        };
        assert_eq!(
            format_status_change(&change),
            "Homework \"hw_python_oop.zip\" review status changed. \
             The work has been reviewed: the reviewer liked everything. Hooray!"
        );
    }

    #[test]
    fn test_rejected_message_includes_comment() {
        let mut hw = Homework::new("2", "hw_bot.zip", HomeworkStatus::Rejected);
        hw.reviewer_comment = Some("Add logging to the main loop.".to_string());
        let msg = format_status_change(&StatusChange {
            homework: hw,
            previous: None,
        });
        assert!(msg.contains("the reviewer has comments"));
        assert!(msg.ends_with("\nReviewer comment: Add logging to the main loop."));
    }

    #[test]
    fn test_comment_ignored_unless_rejected() {
        let mut hw = Homework::new("3", "hw_api.zip", HomeworkStatus::Approved);
        hw.reviewer_comment = Some("Nice work".to_string());
        let msg = format_status_change(&StatusChange {
            homework: hw,
            previous: Some(HomeworkStatus::Reviewing),
        });
        assert!(!msg.contains("Nice work"));
    }

    #[test]
    fn test_long_comment_fits_telegram_limit() {
        let mut hw = Homework::new("4", "hw_long.zip", HomeworkStatus::Rejected);
        hw.reviewer_comment = Some("x".repeat(5000));
        let msg = format_status_change(&StatusChange {
            homework: hw,
            previous: Some(HomeworkStatus::Reviewing),
        });

        assert_eq!(utf16_len(&msg), MAX_MESSAGE_LEN);
        assert!(msg.starts_with("Homework \"hw_long.zip\" review status changed."));
        assert!(msg.contains("\nReviewer comment: xxx"));
        assert!(msg.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_long_name_fits_telegram_limit() {
        let hw = Homework::new("5", "n".repeat(6000), HomeworkStatus::Approved);
        let msg = format_status_change(&StatusChange {
            homework: hw,
            previous: None,
        });
        assert!(utf16_len(&msg) <= MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_malfunction_message() {
        let msg = format_malfunction(&BotError::Network("endpoint unavailable: HTTP 503".to_string()));
        assert_eq!(
            msg,
            "Bot malfunction: network error: endpoint unavailable: HTTP 503"
        );
    }

    #[test]
    fn test_long_malfunction_fits_telegram_limit() {
        let err = BotError::Auth {
            status: 401,
            body: "<html>".to_string() + &"e".repeat(6000),
        };
        let msg = format_malfunction(&err);
        assert!(utf16_len(&msg) <= MAX_MESSAGE_LEN);
        assert!(msg.starts_with("Bot malfunction: authentication rejected (HTTP 401)"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // Each emoji is two UTF-16 units and four UTF-8 bytes.
        let text = "😀".repeat(3000);
        let cut = truncate_message(&text, MAX_MESSAGE_LEN);
        assert!(utf16_len(&cut) <= MAX_MESSAGE_LEN);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(cut.trim_end_matches(ELLIPSIS).chars().all(|c| c == '😀'));

        assert_eq!(truncate_message("short", 10), "short");
        assert_eq!(truncate_message("abcdef", 4), "abc…");
    }
}
