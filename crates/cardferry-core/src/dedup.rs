//! Duplicate detection against the destination address book.
//!
//! Matching is exact after normalization and follows a fixed priority: email,
//! then phone, then full name. The first rule that matches decides.

use crate::domain::{normalize_email, normalize_name, normalize_phone_for_match, ContactRecord};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Canonical comparison keys for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedKey {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub name: Option<String>,
}

impl NormalizedKey {
    pub fn from_record(record: &ContactRecord) -> Self {
        let mut emails = Vec::new();
        for entry in &record.emails {
            if let Some(email) = normalize_email(&entry.address) {
                if !emails.contains(&email) {
                    emails.push(email);
                }
            }
        }

        let mut phones = Vec::new();
        for entry in &record.phones {
            if let Some(phone) = normalize_phone_for_match(&entry.number) {
                if !phones.contains(&phone) {
                    phones.push(phone);
                }
            }
        }

        Self {
            emails,
            phones,
            name: normalize_name(&record.full_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.name.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    Email,
    Phone,
    Name,
}

impl MatchRule {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchRule::Email => "email",
            MatchRule::Phone => "phone",
            MatchRule::Name => "name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReason {
    pub rule: MatchRule,
    pub key: String,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule.as_str(), self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    New,
    Duplicate(MatchReason),
}

impl Disposition {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Disposition::Duplicate(_))
    }
}

/// Whether records accepted during a run are folded back into the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum IndexPolicy {
    /// Only records present in the destination before the run are matched.
    #[default]
    Snapshot,
    /// Each accepted record is added to the index before the next one is resolved.
    Cumulative,
}

impl IndexPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            IndexPolicy::Snapshot => "snapshot",
            IndexPolicy::Cumulative => "cumulative",
        }
    }
}

impl FromStr for IndexPolicy {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "snapshot" => Ok(IndexPolicy::Snapshot),
            "cumulative" => Ok(IndexPolicy::Cumulative),
            _ => Err(CoreError::InvalidIndexPolicy(value.to_string())),
        }
    }
}

impl TryFrom<String> for IndexPolicy {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for IndexPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DestinationIndex {
    emails: HashSet<String>,
    phones: HashSet<String>,
    names: HashSet<String>,
}

impl DestinationIndex {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ContactRecord>,
    {
        let mut index = Self::default();
        for record in records {
            index.insert(&NormalizedKey::from_record(record));
        }
        index
    }

    pub fn insert(&mut self, key: &NormalizedKey) {
        self.emails.extend(key.emails.iter().cloned());
        self.phones.extend(key.phones.iter().cloned());
        if let Some(name) = &key.name {
            self.names.insert(name.clone());
        }
    }

    pub fn resolve(&self, key: &NormalizedKey) -> Disposition {
        if let Some(email) = key.emails.iter().find(|e| self.emails.contains(*e)) {
            return duplicate(MatchRule::Email, email);
        }
        if let Some(phone) = key.phones.iter().find(|p| self.phones.contains(*p)) {
            return duplicate(MatchRule::Phone, phone);
        }
        if let Some(name) = key.name.as_ref().filter(|n| self.names.contains(*n)) {
            return duplicate(MatchRule::Name, name);
        }
        Disposition::New
    }

    pub fn email_count(&self) -> usize {
        self.emails.len()
    }

    pub fn phone_count(&self) -> usize {
        self.phones.len()
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

fn duplicate(rule: MatchRule, key: &str) -> Disposition {
    Disposition::Duplicate(MatchReason {
        rule,
        key: key.to_string(),
    })
}
