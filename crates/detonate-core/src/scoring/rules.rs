//! Keyword rule table.
//!
//! Matching is plain substring search, so short keywords are broad: `rm`
//! also hits `format` and `nc` hits `sync`. That breadth is kept; a rule
//! table from config can narrow it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::RiskCategory;

/// Default score contribution of one keyword hit.
pub const DEFAULT_SIGNAL_WEIGHT: u32 = 20;

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRule {
    pub category: RiskCategory,
    /// Lowercase substrings to look for
    #[serde(deserialize_with = "lowercase_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

const fn default_weight() -> u32 {
    DEFAULT_SIGNAL_WEIGHT
}

/// Matching runs against lowercased input, so keywords from a config file
/// are folded the same way `RiskRule::new` folds them.
fn lowercase_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords = Vec::<String>::deserialize(deserializer)?;
    Ok(keywords.iter().map(|k| k.to_lowercase()).collect())
}

impl RiskRule {
    pub fn new(category: RiskCategory, keywords: &[&str], weight: u32) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            weight,
        }
    }

    /// Keywords found in either the process name or its command line.
    ///
    /// Both inputs must already be lowercase.
    pub fn matches<'a>(
        &'a self,
        name: &'a str,
        cmdline: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(move |kw| !kw.is_empty() && (name.contains(*kw) || cmdline.contains(*kw)))
    }
}

/// The built-in table.
pub fn default_rules() -> Vec<RiskRule> {
    vec![
        RiskRule::new(
            RiskCategory::RemoteAccess,
            &["ssh", "telnet", "nc", "netcat"],
            DEFAULT_SIGNAL_WEIGHT,
        ),
        RiskRule::new(
            RiskCategory::NetworkTransfer,
            &["curl", "wget"],
            DEFAULT_SIGNAL_WEIGHT,
        ),
        RiskRule::new(
            RiskCategory::Destructive,
            &["rm", "del", "format", "dd", "shred"],
            DEFAULT_SIGNAL_WEIGHT,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_matching_is_broad() {
        let destructive = &default_rules()[2];
        let hits: Vec<_> = destructive.matches("format", "").collect();
        assert_eq!(hits, vec!["rm", "format"]);
    }

    #[test]
    fn cmdline_only_match() {
        let transfer = &default_rules()[1];
        let hits: Vec<_> = transfer.matches("python3", "python3 -c urllib; wget x").collect();
        assert_eq!(hits, vec!["wget"]);
    }

    #[test]
    fn empty_keyword_never_matches() {
        let rule = RiskRule::new(RiskCategory::Custom("odd".into()), &[""], 5);
        assert_eq!(rule.matches("anything", "at all").count(), 0);
    }

    #[test]
    fn keywords_are_lowercased() {
        let rule = RiskRule::new(RiskCategory::Custom("mining".into()), &["XMRig"], 40);
        assert_eq!(rule.keywords, vec!["xmrig"]);
        assert_eq!(rule.matches("xmrig", "").count(), 1);
    }
}
