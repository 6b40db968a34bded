use crate::config::{HeaderCheck, HeaderRule, PatternRule, RuleSet};
use crate::message::{EmailRecord, ScoreContribution, Verdict};

use anyhow::{bail, Context};
use regex::Regex;
use std::collections::HashMap;

/// The heuristic spam-classification engine.
///
/// Holds pre-compiled rule tables and nothing else; `classify` is a pure
/// function of its input, so one engine can be shared across any number
/// of concurrent callers without locking.
pub struct Classifier {
    threshold: f64,
    header_rules: Vec<HeaderRule>,
    content_rules: Vec<CompiledRule>,
    url_rules: Vec<CompiledRule>,
}

struct CompiledRule {
    regex: Regex,
    weight: f64,
    reason: String,
}

impl Classifier {
    /// Build an engine from a rule set, compiling all regex patterns up
    /// front. An invalid pattern or a negative rule weight is a
    /// configuration error surfaced here, once, never per message.
    pub fn new(rules: RuleSet) -> anyhow::Result<Self> {
        for rule in &rules.header_rules {
            validate_weight(rule.weight, &rule.header)?;
        }
        Ok(Classifier {
            threshold: rules.threshold,
            header_rules: rules.header_rules,
            content_rules: compile_rules(rules.content_rules)?,
            url_rules: compile_rules(rules.url_rules)?,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify one email. Header rules run first, then content-pattern
    /// rules over `"<subject>\n<body>"`, then URL rules over the same
    /// text; reasons keep that group order. Never fails, whatever the
    /// content looks like.
    pub fn classify(&self, email: &EmailRecord) -> Verdict {
        let mut contributions = self.analyze_headers(&email.headers);

        let text = format!("{}\n{}", email.subject, email.body);
        contributions.extend(analyze_patterns(&self.content_rules, &text));
        contributions.extend(analyze_patterns(&self.url_rules, &text));

        let score: f64 = contributions.iter().map(|c| c.amount).sum();
        let reasons: Vec<String> = contributions.into_iter().map(|c| c.reason).collect();
        let is_spam = score >= self.threshold;

        log::debug!(
            "Classified message: score {score:.1} (threshold {:.1}), spam: {is_spam}, reasons: {reasons:?}",
            self.threshold
        );

        Verdict {
            is_spam,
            score,
            reasons,
        }
    }

    fn analyze_headers(&self, headers: &HashMap<String, String>) -> Vec<ScoreContribution> {
        let mut contributions = Vec::new();

        for rule in &self.header_rules {
            // Exact-name lookup; a missing header never triggers
            if let Some(value) = headers.get(&rule.header) {
                if check_matches(&rule.check, value) {
                    contributions.push(ScoreContribution {
                        reason: format!("Suspicious header: {}", rule.header),
                        amount: rule.weight,
                    });
                }
            }
        }

        contributions
    }
}

// Weights scale contributions, so a negative or NaN weight would let the
// aggregate score go below zero; the comparison is written to reject NaN
fn validate_weight(weight: f64, rule_name: &str) -> anyhow::Result<()> {
    if !(weight >= 0.0) {
        bail!("rule weight must be non-negative, got {weight} for rule {rule_name}");
    }
    Ok(())
}

fn compile_rules(rules: Vec<PatternRule>) -> anyhow::Result<Vec<CompiledRule>> {
    rules
        .into_iter()
        .map(|rule| {
            validate_weight(rule.weight, &rule.reason)?;
            let regex = Regex::new(&rule.pattern)
                .with_context(|| format!("invalid rule pattern: {}", rule.pattern))?;
            Ok(CompiledRule {
                regex,
                weight: rule.weight,
                reason: rule.reason,
            })
        })
        .collect()
}

fn analyze_patterns(rules: &[CompiledRule], text: &str) -> Vec<ScoreContribution> {
    let mut contributions = Vec::new();

    for rule in rules {
        // Non-overlapping match count; the reason is emitted once per
        // rule while the amount scales with the count
        let count = rule.regex.find_iter(text).count();
        if count > 0 {
            contributions.push(ScoreContribution {
                reason: rule.reason.clone(),
                amount: rule.weight * count as f64,
            });
        }
    }

    contributions
}

fn check_matches(check: &HeaderCheck, value: &str) -> bool {
    match check {
        HeaderCheck::Equals { value: expected } => value.eq_ignore_ascii_case(expected),
        HeaderCheck::ContainsAny { values } => {
            let lower = value.to_lowercase();
            values.iter().any(|needle| lower.contains(&needle.to_lowercase()))
        }
        HeaderCheck::LongerThan { length } => value.len() > *length,
    }
}
