//! Core types shared by the netting engine and the debt lifecycle
//!
//! Member identifiers are opaque strings handed over by the identity
//! collaborator. Everything here is immutable for the duration of a
//! computation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Member identifier (opaque, unique per user)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create new member ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Group member profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member ID
    pub id: MemberId,

    /// Display nickname
    pub nickname: String,
}

impl Member {
    /// Create new member
    pub fn new(id: impl Into<MemberId>, nickname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
        }
    }
}

/// Payment status of a single participant or debtor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    /// Share not yet paid back
    Unpaid,
    /// Share paid back (or the payer's own share)
    Paid,
}

impl ParticipationStatus {
    /// Storage code
    pub fn code(&self) -> &'static str {
        match self {
            ParticipationStatus::Unpaid => "unpaid",
            ParticipationStatus::Paid => "paid",
        }
    }

    /// Parse from storage code
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "unpaid" => Some(ParticipationStatus::Unpaid),
            "paid" => Some(ParticipationStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Ordered group roster
///
/// Order is the order the members were supplied in, with duplicates dropped
/// (first occurrence wins). Nicknames are optional: a roster built from bare
/// ids has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    ids: Vec<MemberId>,
    nicknames: HashMap<MemberId, String>,
}

impl Roster {
    /// Build a roster from bare member ids
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<MemberId>,
    {
        let mut roster = Roster::default();
        for id in ids {
            roster.push(id.into(), None);
        }
        roster
    }

    /// Build a roster from member profiles
    pub fn from_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a Member>,
    {
        let mut roster = Roster::default();
        for member in members {
            roster.push(member.id.clone(), Some(member.nickname.clone()));
        }
        roster
    }

    /// Build a roster from the group's member ids, taking nicknames from
    /// whichever profiles could be fetched
    pub fn with_profiles<'a, I>(ids: &[MemberId], profiles: I) -> Self
    where
        I: IntoIterator<Item = &'a Member>,
    {
        let profiles: HashMap<&MemberId, &str> = profiles
            .into_iter()
            .map(|m| (&m.id, m.nickname.as_str()))
            .collect();

        let mut roster = Roster::default();
        for id in ids {
            let nickname = profiles.get(id).map(|n| n.to_string());
            roster.push(id.clone(), nickname);
        }
        roster
    }

    fn push(&mut self, id: MemberId, nickname: Option<String>) {
        if self.ids.contains(&id) {
            tracing::debug!(member = %id, "Duplicate roster entry ignored");
            return;
        }
        if let Some(nickname) = nickname {
            self.nicknames.insert(id.clone(), nickname);
        }
        self.ids.push(id);
    }

    /// Member ids in roster order
    pub fn ids(&self) -> &[MemberId] {
        &self.ids
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the roster has no members
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check membership
    pub fn contains(&self, id: &MemberId) -> bool {
        self.ids.contains(id)
    }

    /// Nickname, if the roster was built from profiles
    pub fn nickname(&self, id: &MemberId) -> Option<&str> {
        self.nicknames.get(id).map(String::as_str)
    }

    /// Nickname or the supplied fallback label
    pub fn display_name<'a>(&'a self, id: &MemberId, fallback: &'a str) -> &'a str {
        self.nickname(id).unwrap_or(fallback)
    }

    /// Ids from `candidates` that are not in the roster, deduplicated, in
    /// first-seen order
    pub fn unknown<'a, I>(&self, candidates: I) -> Vec<MemberId>
    where
        I: IntoIterator<Item = &'a MemberId>,
    {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|id| !self.contains(id))
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect()
    }
}
