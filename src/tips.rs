//! Service-life tips: a fixed catalog with category filter, search and ratings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::store::{keys, Store, StoreError};

pub const MAX_RATING: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Life,
    Training,
    Relationships,
    Health,
    Discharge,
    Other,
}

impl TipCategory {
    pub const ALL: [TipCategory; 6] = [
        TipCategory::Life,
        TipCategory::Training,
        TipCategory::Relationships,
        TipCategory::Health,
        TipCategory::Discharge,
        TipCategory::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TipCategory::Life => "life",
            TipCategory::Training => "training",
            TipCategory::Relationships => "relationships",
            TipCategory::Health => "health",
            TipCategory::Discharge => "discharge",
            TipCategory::Other => "other",
        }
    }
}

impl fmt::Display for TipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TipCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TipCategory::ALL
            .into_iter()
            .find(|c| c.name() == needle)
            .ok_or_else(|| format!("unknown category '{needle}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tip {
    pub id: u32,
    pub title: &'static str,
    pub category: TipCategory,
    pub icon: &'static str,
    pub content: &'static str,
    pub tags: &'static [&'static str],
    pub rating: f32,
    pub views: u32,
}

impl Tip {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.category.name().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("no tip with id {0}")]
pub struct TipNotFound(pub u32);

#[derive(Debug, Clone)]
pub struct TipBook {
    tips: Vec<Tip>,
}

impl Default for TipBook {
    fn default() -> Self {
        TipBook { tips: catalog() }
    }
}

impl TipBook {
    /// The catalog with persisted ratings and view counts applied on top.
    pub fn load(store: &Store) -> Self {
        let ratings: BTreeMap<u32, f32> = store.get_or_default(keys::TIP_RATINGS);
        let views: BTreeMap<u32, u32> = store.get_or_default(keys::TIP_VIEWS);
        let mut book = TipBook::default();
        for tip in &mut book.tips {
            if let Some(&r) = ratings.get(&tip.id) {
                tip.rating = r.clamp(0.0, MAX_RATING);
            }
            if let Some(&v) = views.get(&tip.id) {
                tip.views = tip.views.max(v);
            }
        }
        book
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        let ratings: BTreeMap<u32, f32> = self.tips.iter().map(|t| (t.id, t.rating)).collect();
        let views: BTreeMap<u32, u32> = self.tips.iter().map(|t| (t.id, t.views)).collect();
        store.set(keys::TIP_RATINGS, &ratings)?;
        store.set(keys::TIP_VIEWS, &views)
    }

    pub fn all(&self) -> &[Tip] {
        &self.tips
    }

    pub fn get(&self, id: u32) -> Option<&Tip> {
        self.tips.iter().find(|t| t.id == id)
    }

    /// Tips in `category` (all when `None`) matching `search`, most viewed first.
    pub fn filtered(&self, category: Option<TipCategory>, search: Option<&str>) -> Vec<&Tip> {
        let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        let mut out: Vec<&Tip> = self
            .tips
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .filter(|t| needle.as_deref().map_or(true, |n| t.matches(n)))
            .collect();
        out.sort_by(|a, b| b.views.cmp(&a.views));
        out
    }

    /// Open a tip, counting one more view.
    pub fn view(&mut self, id: u32) -> Result<&Tip, TipNotFound> {
        let tip = self.tips.iter_mut().find(|t| t.id == id).ok_or(TipNotFound(id))?;
        tip.views = tip.views.saturating_add(1);
        Ok(&*tip)
    }

    /// Nudge the rating up by 0.1, capped at 5.0 and kept to one decimal.
    pub fn like(&mut self, id: u32) -> Result<f32, TipNotFound> {
        let tip = self.tips.iter_mut().find(|t| t.id == id).ok_or(TipNotFound(id))?;
        let bumped = (tip.rating + 0.1).min(MAX_RATING);
        tip.rating = (bumped * 10.0).round() / 10.0;
        Ok(tip.rating)
    }

    pub fn popular(&self, limit: usize) -> Vec<&Tip> {
        self.top_by(limit, |a, b| b.views.cmp(&a.views))
    }

    pub fn recent(&self, limit: usize) -> Vec<&Tip> {
        self.top_by(limit, |a, b| b.id.cmp(&a.id))
    }

    pub fn recommended(&self, limit: usize) -> Vec<&Tip> {
        self.top_by(limit, |a, b| b.rating.total_cmp(&a.rating))
    }

    fn top_by<F>(&self, limit: usize, cmp: F) -> Vec<&Tip>
    where
        F: FnMut(&&Tip, &&Tip) -> std::cmp::Ordering,
    {
        let mut out: Vec<&Tip> = self.tips.iter().collect();
        out.sort_by(cmp);
        out.truncate(limit);
        out
    }
}

fn catalog() -> Vec<Tip> {
    vec![
        Tip {
            id: 1,
            title: "Surviving your first week in the unit",
            category: TipCategory::Life,
            icon: "🏠",
            content: "The first week is hard for everyone.\n\
                - Seniors: be polite and show you want to learn.\n\
                - Routine: adapt to the daily schedule fast and sleep enough.\n\
                - Upkeep: keep yourself and your gear tidy.\n\
                - Peers: lean on the people who enlisted with you.\n\
                Get through the first week and it gets easier.",
            tags: &["recruit", "adjustment", "routine"],
            rating: 4.8,
            views: 1520,
        },
        Tip {
            id: 2,
            title: "Using the PX wisely",
            category: TipCategory::Life,
            icon: "🛒",
            content: "Set a monthly budget before you go.\n\
                - Buy daily necessities in bulk when they are discounted.\n\
                - Snacks add up fast; decide on a weekly limit.\n\
                - Check expiry dates on anything you store in your locker.",
            tags: &["px", "shopping", "saving"],
            rating: 4.6,
            views: 987,
        },
        Tip {
            id: 3,
            title: "Training your fitness effectively",
            category: TipCategory::Training,
            icon: "💪",
            content: "Consistency beats intensity.\n\
                - Push-ups, sit-ups and running every other day.\n\
                - Warm up and stretch to avoid injuries.\n\
                - Track your fitness test results to see progress.",
            tags: &["fitness", "exercise", "health"],
            rating: 4.7,
            views: 1234,
        },
        Tip {
            id: 4,
            title: "Keeping good relations with seniors",
            category: TipCategory::Relationships,
            icon: "🤝",
            content: "Respect and reliability go a long way.\n\
                - Greet first and keep basic courtesy.\n\
                - Do what you said you would do.\n\
                - Ask when unsure instead of guessing.",
            tags: &["seniors", "relationships", "courtesy"],
            rating: 4.9,
            views: 2100,
        },
        Tip {
            id: 5,
            title: "Staying in touch through letters",
            category: TipCategory::Life,
            icon: "✉️",
            content: "Letters keep you connected.\n\
                - Share your unit address with family early.\n\
                - Reply regularly; short notes are fine.\n\
                - Keep letters somewhere dry and safe.",
            tags: &["letters", "family", "contact"],
            rating: 4.5,
            views: 876,
        },
        Tip {
            id: 6,
            title: "Getting through night duty",
            category: TipCategory::Training,
            icon: "🌙",
            content: "Night shifts are about managing energy.\n\
                - Nap before your shift when you can.\n\
                - Stay hydrated and move around within the rules.\n\
                - Go easy on caffeine late in the shift.",
            tags: &["night duty", "staying awake", "duty"],
            rating: 4.4,
            views: 756,
        },
        Tip {
            id: 7,
            title: "Ways to relieve stress",
            category: TipCategory::Health,
            icon: "🧘",
            content: "Stress builds up quietly.\n\
                - Exercise and regular sleep help the most.\n\
                - Keep a short journal or memo of your day.\n\
                - Talk to a counselor or someone you trust.",
            tags: &["stress", "mental health", "rest"],
            rating: 4.8,
            views: 1345,
        },
        Tip {
            id: 8,
            title: "Preparing your career after discharge",
            category: TipCategory::Discharge,
            icon: "🎓",
            content: "Use your remaining service time well.\n\
                - Study for certificates in your free time.\n\
                - Check education support programs for service members.\n\
                - Plan your first month after discharge early.",
            tags: &["discharge", "jobs", "career"],
            rating: 4.7,
            views: 1678,
        },
        Tip {
            id: 9,
            title: "Managing rations and snacks",
            category: TipCategory::Life,
            icon: "🍫",
            content: "Small habits keep your locker in order.\n\
                - Store snacks sealed and away from moisture.\n\
                - Share with your squad; it builds goodwill.\n\
                - Eat the oldest items first.",
            tags: &["rations", "snacks", "storage"],
            rating: 4.3,
            views: 654,
        },
        Tip {
            id: 10,
            title: "Cleaning and tidying efficiently",
            category: TipCategory::Life,
            icon: "🧹",
            content: "A tidy barracks saves time at inspection.\n\
                - Put everything back in the same place every time.\n\
                - Clean a little every day instead of all at once.\n\
                - Split chores fairly within the room.",
            tags: &["cleaning", "tidying", "barracks"],
            rating: 4.6,
            views: 892,
        },
        Tip {
            id: 11,
            title: "Taking care of your health in the service",
            category: TipCategory::Health,
            icon: "🏥",
            content: "Small problems grow if ignored.\n\
                - Visit the medical office early when something hurts.\n\
                - Wash your hands and keep your feet dry.\n\
                - Drink water regularly during training.",
            tags: &["health", "hygiene", "medical"],
            rating: 4.9,
            views: 1456,
        },
        Tip {
            id: 12,
            title: "Planning leave and overnight passes",
            category: TipCategory::Other,
            icon: "🧳",
            content: "Good leave starts with a plan.\n\
                - Apply early and confirm the dates with your unit.\n\
                - Book transport both ways in advance.\n\
                - Keep a checklist for before, during and after.",
            tags: &["leave", "pass", "planning"],
            rating: 4.5,
            views: 1123,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(tips: &[&Tip]) -> Vec<u32> {
        tips.iter().map(|t| t.id).collect()
    }

    #[test]
    fn filter_by_category_sorted_by_views() {
        let book = TipBook::default();
        assert_eq!(ids(&book.filtered(Some(TipCategory::Health), None)), vec![11, 7]);
        assert_eq!(ids(&book.filtered(Some(TipCategory::Life), None)), vec![1, 2, 10, 5, 9]);
        assert_eq!(book.filtered(None, None).len(), 12);
    }

    #[test]
    fn search_covers_tags_and_category() {
        let book = TipBook::default();
        assert_eq!(ids(&book.filtered(None, Some("FAMILY"))), vec![5]);
        assert_eq!(ids(&book.filtered(None, Some("discharge"))), vec![8]);
        assert_eq!(ids(&book.filtered(Some(TipCategory::Training), Some("night"))), vec![6]);
        assert!(book.filtered(None, Some("submarine")).is_empty());
        assert_eq!(book.filtered(None, Some("   ")).len(), 12);
    }

    #[test]
    fn like_caps_and_rounds() {
        let mut book = TipBook::default();
        assert_eq!(book.like(2), Ok(4.7));
        assert_eq!(book.like(4), Ok(5.0));
        assert_eq!(book.like(4), Ok(5.0));
        assert_eq!(book.like(99), Err(TipNotFound(99)));
    }

    #[test]
    fn rankings() {
        let book = TipBook::default();
        assert_eq!(ids(&book.popular(3)), vec![4, 8, 1]);
        assert_eq!(ids(&book.recent(2)), vec![12, 11]);
        assert_eq!(ids(&book.recommended(2)), vec![4, 11]);
    }

    #[test]
    fn views_count_and_reorder() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        let mut book = TipBook::load(&store);
        assert_eq!(book.view(9).map(|t| t.views), Ok(655));
        for _ in 0..159 {
            book.view(1).unwrap();
        }
        assert_eq!(book.view(42), Err(TipNotFound(42)));
        book.save(&mut store).unwrap();

        let reloaded = TipBook::load(&Store::open(store.path()).unwrap());
        assert_eq!(reloaded.get(9).map(|t| t.views), Some(655));
        assert_eq!(reloaded.get(1).map(|t| t.views), Some(1679));
        assert_eq!(ids(&reloaded.popular(3)), vec![4, 1, 8]);
        assert_eq!(ids(&reloaded.filtered(Some(TipCategory::Life), None))[0], 1);
    }

    #[test]
    fn ratings_persist() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        let mut book = TipBook::load(&store);
        book.like(9).unwrap();
        book.save(&mut store).unwrap();
        let reloaded = TipBook::load(&Store::open(store.path()).unwrap());
        assert_eq!(reloaded.get(9).map(|t| t.rating), Some(4.4));
        assert_eq!(reloaded.get(1).map(|t| t.rating), Some(4.8));
    }
}
