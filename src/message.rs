use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable input to the classifier: the raw header map plus decoded
/// subject and body text. Header keys are kept case-sensitive exactly as
/// received; rule lookups are by exact name.
///
/// All fields default to empty, so a partially populated record (missing
/// subject, missing body, no headers) classifies cleanly instead of failing.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl EmailRecord {
    /// Parse a raw RFC-822-style message: header lines up to the first
    /// blank line (continuation lines folded with a space), then the body.
    ///
    /// This never fails; garbage input just produces a record with fewer
    /// recognized headers. Header name case is preserved.
    pub fn parse(raw: &str) -> Self {
        let mut headers: HashMap<String, String> = HashMap::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_headers = true;
        let mut last_header_key: Option<String> = None;
        let mut subject_key: Option<String> = None;

        for line in raw.lines() {
            if in_headers {
                if line.trim().is_empty() {
                    in_headers = false;
                    continue;
                }

                if line.starts_with(' ') || line.starts_with('\t') {
                    // Continuation of the previous header
                    if let Some(ref key) = last_header_key {
                        if let Some(existing) = headers.get_mut(key) {
                            existing.push(' ');
                            existing.push_str(line.trim());
                        }
                    }
                    continue;
                }

                if let Some((key, value)) = line.split_once(':') {
                    let key = key.trim().to_string();
                    // First subject-like header wins, whatever its casing;
                    // resolved against the map after the loop so folded
                    // continuation lines are included
                    if subject_key.is_none() && key.eq_ignore_ascii_case("Subject") {
                        subject_key = Some(key.clone());
                    }
                    headers.insert(key.clone(), value.trim().to_string());
                    last_header_key = Some(key);
                }
            } else {
                body_lines.push(line);
            }
        }

        let subject = subject_key
            .and_then(|key| headers.get(&key).cloned())
            .unwrap_or_default();

        EmailRecord {
            headers,
            subject,
            body: body_lines.join("\n"),
        }
    }
}

/// Mailbox folders recognized by the folder-transition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    Inbox,
    Sent,
    Drafts,
    Trash,
    Spam,
}

/// Caller-side view of a stored message: where it currently lives and
/// which labels it carries. The policy reads this; only the backing store
/// is ever mutated.
#[derive(Debug, Clone)]
pub struct MessageState {
    pub id: String,
    pub folder: Folder,
    pub labels: Vec<String>,
}

/// One triggered rule's share of the final score. Reasons are not
/// deduplicated, so independent rules with the same reason string each
/// produce their own contribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreContribution {
    pub reason: String,
    pub amount: f64,
}

/// Classification result: the aggregate score, the threshold decision,
/// and the human-readable trigger reasons in evaluation order (header
/// rules first, then content rules, then URL rules).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub is_spam: bool,
    pub score: f64,
    pub reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers_and_body() {
        let raw = "From: alice@example.com\n\
                   Subject: Hello\n\
                   X-Spam-Flag: YES\n\
                   \n\
                   First line.\n\
                   Second line.";
        let record = EmailRecord::parse(raw);

        assert_eq!(record.subject, "Hello");
        assert_eq!(record.headers.get("X-Spam-Flag").unwrap(), "YES");
        assert_eq!(record.headers.get("From").unwrap(), "alice@example.com");
        assert_eq!(record.body, "First line.\nSecond line.");
    }

    #[test]
    fn test_parse_folded_header() {
        let raw = "Authentication-Results: mx.example.com;\n\
                   \tspf=softfail smtp.mailfrom=bad.example\n\
                   \n\
                   body";
        let record = EmailRecord::parse(raw);

        assert_eq!(
            record.headers.get("Authentication-Results").unwrap(),
            "mx.example.com; spf=softfail smtp.mailfrom=bad.example"
        );
    }

    #[test]
    fn test_parse_duplicate_subject_casings_first_wins() {
        let raw = "Subject: First subject\n\
                   SUBJECT: SHOUTED DUPLICATE\n\
                   \n\
                   body";
        let record = EmailRecord::parse(raw);
        assert_eq!(record.subject, "First subject");
    }

    #[test]
    fn test_parse_preserves_header_name_case() {
        let record = EmailRecord::parse("x-spam-flag: yes\n\nbody");
        assert!(record.headers.contains_key("x-spam-flag"));
        assert!(!record.headers.contains_key("X-Spam-Flag"));
    }

    #[test]
    fn test_parse_empty_input() {
        let record = EmailRecord::parse("");
        assert_eq!(record, EmailRecord::default());
    }

    #[test]
    fn test_record_deserializes_with_missing_fields() {
        let record: EmailRecord = serde_json::from_str("{}").unwrap();
        assert!(record.headers.is_empty());
        assert_eq!(record.subject, "");
        assert_eq!(record.body, "");
    }

    #[test]
    fn test_folder_serde_names() {
        assert_eq!(serde_json::to_string(&Folder::Spam).unwrap(), "\"spam\"");
        let folder: Folder = serde_json::from_str("\"inbox\"").unwrap();
        assert_eq!(folder, Folder::Inbox);
    }
}
