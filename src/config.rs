use serde::{Deserialize, Serialize};

/// Default score at or above which a message is classified as spam.
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// The complete rule configuration for a classifier: the decision
/// threshold plus the three rule tables, evaluated in this order. Rules
/// are plain data so they can be added and tuned without touching the
/// evaluation logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub header_rules: Vec<HeaderRule>,
    pub content_rules: Vec<PatternRule>,
    pub url_rules: Vec<PatternRule>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// A boolean check against one named header. The header is looked up by
/// exact name; a missing header simply never triggers. A triggered rule
/// contributes its full weight at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderRule {
    pub header: String,
    pub weight: f64,
    pub check: HeaderCheck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HeaderCheck {
    /// Value equals the given string, case-insensitively.
    Equals { value: String },
    /// Value contains any of the given substrings, case-insensitively.
    ContainsAny { values: Vec<String> },
    /// Raw value is longer than the given number of bytes.
    LongerThan { length: usize },
}

/// A regex rule over the combined subject + body text. Contributes
/// `weight * match_count` (non-overlapping matches), with the reason
/// emitted once per rule regardless of count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub weight: f64,
    pub reason: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            threshold: DEFAULT_THRESHOLD,
            header_rules: vec![
                HeaderRule {
                    header: "X-Spam-Flag".to_string(),
                    weight: 5.0,
                    check: HeaderCheck::Equals {
                        value: "yes".to_string(),
                    },
                },
                HeaderRule {
                    header: "X-Spam-Status".to_string(),
                    weight: 3.0,
                    check: HeaderCheck::ContainsAny {
                        values: vec!["yes".to_string()],
                    },
                },
                HeaderRule {
                    header: "X-Spam-Level".to_string(),
                    weight: 0.5,
                    check: HeaderCheck::LongerThan { length: 5 },
                },
                HeaderRule {
                    header: "Authentication-Results".to_string(),
                    weight: 3.0,
                    check: HeaderCheck::ContainsAny {
                        values: vec!["fail".to_string(), "softfail".to_string()],
                    },
                },
            ],
            content_rules: vec![
                PatternRule {
                    pattern: r"(?i)\b(viagra|cialis|enlargement|casino|lottery|winner)\b"
                        .to_string(),
                    weight: 2.0,
                    reason: "Suspicious keywords detected".to_string(),
                },
                PatternRule {
                    pattern: r"(?i)\b(urgent|congratulations|won|prize|million|dollars)\b"
                        .to_string(),
                    weight: 1.0,
                    reason: "Potential scam keywords".to_string(),
                },
                // Long strings without spaces
                PatternRule {
                    pattern: r"\S{30,}".to_string(),
                    weight: 1.0,
                    reason: "Unusual text patterns".to_string(),
                },
                // Runs of 5+ uppercase letters
                PatternRule {
                    pattern: r"[A-Z]{5,}".to_string(),
                    weight: 0.5,
                    reason: "Excessive capitalization".to_string(),
                },
            ],
            url_rules: vec![
                PatternRule {
                    pattern: r"(?i)https?://[^\s/$.?#][^\s]*".to_string(),
                    weight: 0.5,
                    reason: "Suspicious URLs".to_string(),
                },
                PatternRule {
                    pattern: r"(?i)\b(?:click here|visit now|sign up)\b".to_string(),
                    weight: 1.0,
                    reason: "Suspicious call-to-action phrases".to_string(),
                },
            ],
        }
    }
}

impl RuleSet {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let rules: RuleSet = serde_yaml::from_str(&content)?;
        Ok(rules)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let rules = RuleSet::default();
        assert_eq!(rules.threshold, 5.0);
        assert_eq!(rules.header_rules.len(), 4);
        assert_eq!(rules.content_rules.len(), 4);
        assert_eq!(rules.url_rules.len(), 2);
        assert_eq!(rules.header_rules[0].header, "X-Spam-Flag");
        assert_eq!(rules.header_rules[0].weight, 5.0);
    }

    #[test]
    fn test_yaml_tagged_checks() {
        let yaml = r#"
threshold: 7.5
header_rules:
  - header: X-Custom-Flag
    weight: 2.0
    check:
      type: Equals
      value: spam
content_rules:
  - pattern: '(?i)\bfree money\b'
    weight: 3.0
    reason: Free money offer
url_rules: []
"#;
        let rules: RuleSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.threshold, 7.5);
        assert_eq!(rules.header_rules.len(), 1);
        match &rules.header_rules[0].check {
            HeaderCheck::Equals { value } => assert_eq!(value, "spam"),
            other => panic!("Expected Equals check, got {other:?}"),
        }
        assert_eq!(rules.content_rules[0].reason, "Free money offer");
    }

    #[test]
    fn test_threshold_defaults_when_omitted() {
        let yaml = "header_rules: []\ncontent_rules: []\nurl_rules: []\n";
        let rules: RuleSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_default_ruleset_survives_yaml() {
        let rules = RuleSet::default();
        let yaml = serde_yaml::to_string(&rules).unwrap();
        let reloaded: RuleSet = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(reloaded.content_rules.len(), rules.content_rules.len());
        assert_eq!(
            reloaded.content_rules[0].pattern,
            rules.content_rules[0].pattern
        );
    }
}
