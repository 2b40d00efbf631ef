//! Canned replies checked before the text service

use serde::{Deserialize, Serialize};

/// Reply with `reply` when the lower-cased, trimmed input contains `contains`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CannedRule {
    pub contains: String,
    pub reply: String,
}

impl CannedRule {
    pub fn new(contains: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            contains: contains.into().to_lowercase(),
            reply: reply.into(),
        }
    }

    fn matches(&self, normalized: &str) -> bool {
        !self.contains.is_empty() && normalized.contains(&self.contains.to_lowercase())
    }
}

/// Ordered rule table; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CannedRules {
    rules: Vec<CannedRule>,
}

impl CannedRules {
    pub fn new(rules: Vec<CannedRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with(mut self, rule: CannedRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[CannedRule] {
        &self.rules
    }

    /// Canned reply for `input`, if any rule matches
    pub fn reply_for(&self, input: &str) -> Option<&str> {
        let normalized = input.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.reply.as_str())
    }
}

impl Default for CannedRules {
    fn default() -> Self {
        Self::empty()
            .with(CannedRule::new(
                "17 divided by 5",
                "Ho ho ho! Let's check the math! 17 ÷ 5 = 3 with remainder 2! 🎄",
            ))
            .with(CannedRule::new(
                "glasses",
                "I have lost my glasses! They are black and usually sit right on my nose!",
            ))
    }
}
