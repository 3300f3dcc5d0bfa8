// query.rs — Filtering and aggregate statistics over audit records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{AuditRecord, Decision};

/// Number of entries kept in each "most denied" ranking.
pub const TOP_DENIED_LIMIT: usize = 5;

/// Conjunctive filter over audit records. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditFilter {
    pub decision: Option<Decision>,
    pub tool_name: Option<String>,
    pub skill_name: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    /// Inclusive lower bound.
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub until: Option<DateTime<Utc>>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decision(mut self, decision: Decision) -> Self {
        self.decision = Some(decision);
        self
    }

    pub fn tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn skill(mut self, skill_name: impl Into<String>) -> Self {
        self.skill_name = Some(skill_name.into());
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn matches(&self, record: &AuditRecord) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w == have)
        }
        self.decision.map_or(true, |d| d == record.decision)
            && eq(&self.tool_name, &record.tool_name)
            && eq(&self.skill_name, &record.skill_name)
            && eq(&self.user_id, &record.user_id)
            && eq(&self.session_id, &record.session_id)
            && self.since.map_or(true, |s| record.timestamp >= s)
            && self.until.map_or(true, |u| record.timestamp <= u)
    }
}

/// A name and how many times it was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialCount {
    pub name: String,
    pub count: usize,
}

/// Aggregates over a filtered set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    pub total: usize,
    pub allowed: usize,
    pub denied: usize,
    /// `allowed / total`, 0.0 for an empty set.
    pub allow_rate: f64,
    /// `denied / total`, 0.0 for an empty set.
    pub deny_rate: f64,
    pub average_overlap: f64,
    pub average_sovereignty: f64,
    pub top_denied_tools: Vec<DenialCount>,
    pub top_denied_skills: Vec<DenialCount>,
}

impl AuditStats {
    pub fn compute<'a>(records: impl IntoIterator<Item = &'a AuditRecord>) -> Self {
        let mut total = 0usize;
        let mut allowed = 0usize;
        let mut overlap_sum = 0.0;
        let mut sovereignty_sum = 0.0;
        let mut denied_tools: HashMap<&str, usize> = HashMap::new();
        let mut denied_skills: HashMap<&str, usize> = HashMap::new();

        for record in records {
            total += 1;
            overlap_sum += record.overlap;
            sovereignty_sum += record.sovereignty;
            match record.decision {
                Decision::Allow => allowed += 1,
                Decision::Deny => {
                    *denied_tools.entry(record.tool_name.as_str()).or_insert(0) += 1;
                    *denied_skills.entry(record.skill_name.as_str()).or_insert(0) += 1;
                }
            }
        }

        let denied = total - allowed;
        let ratio = |n: f64| if total > 0 { n / total as f64 } else { 0.0 };
        Self {
            total,
            allowed,
            denied,
            allow_rate: ratio(allowed as f64),
            deny_rate: ratio(denied as f64),
            average_overlap: ratio(overlap_sum),
            average_sovereignty: ratio(sovereignty_sum),
            top_denied_tools: top_n(denied_tools),
            top_denied_skills: top_n(denied_skills),
        }
    }
}

/// Highest counts first; ties broken alphabetically so output is stable.
fn top_n(counts: HashMap<&str, usize>) -> Vec<DenialCount> {
    let mut ranked: Vec<DenialCount> = counts
        .into_iter()
        .map(|(name, count)| DenialCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_DENIED_LIMIT);
    ranked
}
