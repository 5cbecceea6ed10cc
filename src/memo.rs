//! Memo pad: prioritized, tagged notes with search, filter and sort.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::store::{keys, read_json, write_json, Store, StoreError};

pub const PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Important,
    #[default]
    Normal,
}

impl Priority {
    fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 3,
            Priority::Important => 2,
            Priority::Normal => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Urgent => "urgent",
            Priority::Important => "important",
            Priority::Normal => "normal",
        })
    }
}

impl FromStr for Priority {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "important" => Ok(Priority::Important),
            "normal" => Ok(Priority::Normal),
            other => Err(MemoError::UnknownPriority(other.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MemoError {
    #[error("memo {0} is required")]
    MissingField(&'static str),
    #[error("no memo with id '{0}'")]
    NotFound(String),
    #[error("unknown priority '{0}' (expected urgent, important or normal)")]
    UnknownPriority(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User input for creating or editing a memo. `tags` is comma separated.
#[derive(Debug, Clone, Default)]
pub struct MemoDraft {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub tags: String,
}

struct Cleaned {
    title: String,
    content: String,
    tags: Vec<String>,
}

impl MemoDraft {
    fn clean(&self) -> Result<Cleaned, MemoError> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() {
            return Err(MemoError::MissingField("title"));
        }
        if content.is_empty() {
            return Err(MemoError::MissingField("content"));
        }
        Ok(Cleaned { title: title.to_string(), content: content.to_string(), tags: parse_tags(&self.tags) })
    }
}

pub fn parse_tags(input: &str) -> Vec<String> {
    input.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoSort {
    /// Most recently updated first.
    #[default]
    Date,
    Title,
    Priority,
}

impl FromStr for MemoSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(MemoSort::Date),
            "title" => Ok(MemoSort::Title),
            "priority" => Ok(MemoSort::Priority),
            other => Err(format!("unknown sort '{other}' (expected date, title or priority)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoQuery {
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub sort: MemoSort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoBook {
    memos: Vec<Memo>,
}

impl MemoBook {
    pub fn load(store: &Store) -> Self {
        MemoBook { memos: store.get_or_default(keys::MEMOS) }
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        store.set(keys::MEMOS, &self.memos)
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Memo> {
        self.memos.iter().find(|m| m.id == id)
    }

    /// Validate and insert a new memo at the front.
    pub fn create<R: Rng + ?Sized>(&mut self, draft: &MemoDraft, now: DateTime<Utc>, rng: &mut R) -> Result<&Memo, MemoError> {
        let cleaned = draft.clean()?;
        let memo = Memo {
            id: new_id("memo", now, rng),
            title: cleaned.title,
            content: cleaned.content,
            priority: draft.priority,
            tags: cleaned.tags,
            created_at: now,
            updated_at: now,
        };
        self.memos.insert(0, memo);
        Ok(&self.memos[0])
    }

    pub fn update(&mut self, id: &str, draft: &MemoDraft, now: DateTime<Utc>) -> Result<&Memo, MemoError> {
        let cleaned = draft.clean()?;
        let memo = self
            .memos
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| MemoError::NotFound(id.to_string()))?;
        memo.title = cleaned.title;
        memo.content = cleaned.content;
        memo.priority = draft.priority;
        memo.tags = cleaned.tags;
        memo.updated_at = now;
        Ok(&*memo)
    }

    pub fn delete(&mut self, id: &str) -> Result<Memo, MemoError> {
        let pos = self
            .memos
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| MemoError::NotFound(id.to_string()))?;
        Ok(self.memos.remove(pos))
    }

    /// Write every memo to `dest` as a pretty-printed JSON array.
    pub fn export_to(&self, dest: &Path) -> Result<(), StoreError> {
        write_json(dest, &self.memos)
    }

    /// Read a JSON array of memos from `src` and put them in front of the
    /// existing ones under fresh ids. Returns how many were added.
    pub fn import_from<R: Rng + ?Sized>(&mut self, src: &Path, now: DateTime<Utc>, rng: &mut R) -> Result<usize, StoreError> {
        let value = read_json(src)?;
        if !value.is_array() {
            return Err(StoreError::WrongShape { path: src.to_path_buf(), expected: "array" });
        }
        let incoming: Vec<Memo> = serde_json::from_value(value)?;
        Ok(self.prepend_imported(incoming, now, rng))
    }

    fn prepend_imported<R: Rng + ?Sized>(&mut self, mut incoming: Vec<Memo>, now: DateTime<Utc>, rng: &mut R) -> usize {
        for memo in &mut incoming {
            memo.id = new_id("imported", now, rng);
        }
        let added = incoming.len();
        incoming.append(&mut self.memos);
        self.memos = incoming;
        added
    }

    pub fn query(&self, query: &MemoQuery) -> Vec<&Memo> {
        let needle = query.search.as_deref().map(str::to_lowercase).filter(|s| !s.is_empty());
        let mut out: Vec<&Memo> = self
            .memos
            .iter()
            .filter(|m| needle.as_deref().map_or(true, |n| matches_search(m, n)))
            .filter(|m| query.priority.map_or(true, |p| m.priority == p))
            .collect();
        out.sort_by(|a, b| compare(a, b, query.sort));
        out
    }
}

fn matches_search(memo: &Memo, needle: &str) -> bool {
    memo.title.to_lowercase().contains(needle)
        || memo.content.to_lowercase().contains(needle)
        || memo.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

fn compare(a: &Memo, b: &Memo, sort: MemoSort) -> Ordering {
    match sort {
        MemoSort::Date => b.updated_at.cmp(&a.updated_at),
        MemoSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        MemoSort::Priority => b.priority.rank().cmp(&a.priority.rank()),
    }
}

/// `<prefix>_<unix millis>_<9 base36 chars>`
fn new_id<R: Rng + ?Sized>(prefix: &str, now: DateTime<Utc>, rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String = (0..9).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect();
    format!("{prefix}_{}_{}", now.timestamp_millis(), suffix)
}

/// Cut `text` to `len` characters, appending "..." when shortened.
pub fn preview(text: &str, len: usize) -> String {
    if text.chars().count() <= len {
        return text.to_string();
    }
    let head: String = text.chars().take(len).collect();
    format!("{}...", head.trim_end())
}

/// Relative age for listings; a week or older shows the date.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let mins = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();
    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{mins} min ago")
    } else if hours < 24 {
        format!("{hours} h ago")
    } else if days < 7 {
        format!("{days} d ago")
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}
