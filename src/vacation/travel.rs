use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::VacationError;
use crate::store::{keys, Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Planned,
    Completed,
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TripStatus::Planned => "planned",
            TripStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub status: TripStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Won.
    #[serde(default)]
    pub budget: u64,
    #[serde(default = "one")]
    pub people: u32,
    #[serde(default)]
    pub satisfaction: Option<u8>,
}

fn one() -> u32 {
    1
}

impl TravelPlan {
    /// Days covered, counting both ends.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[derive(Debug, Clone)]
pub struct TravelDraft {
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub budget: u64,
    pub people: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelPlans {
    plans: Vec<TravelPlan>,
}

impl TravelPlans {
    pub fn load(store: &Store) -> Self {
        store.get_or_default(keys::TRAVEL_PLANS)
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        store.set(keys::TRAVEL_PLANS, self)
    }

    pub fn all(&self) -> &[TravelPlan] {
        &self.plans
    }

    pub fn get(&self, id: u32) -> Option<&TravelPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn add(&mut self, draft: TravelDraft) -> Result<&TravelPlan, VacationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(VacationError::Blank);
        }
        if draft.end < draft.start {
            return Err(VacationError::InvalidRange { start: draft.start, end: draft.end });
        }
        let id = self.plans.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        self.plans.push(TravelPlan {
            id,
            title: title.to_string(),
            status: TripStatus::Planned,
            start_date: draft.start,
            end_date: draft.end,
            budget: draft.budget,
            people: draft.people.max(1),
            satisfaction: None,
        });
        Ok(&self.plans[self.plans.len() - 1])
    }

    /// Mark a trip as done with a 1..=5 rating.
    pub fn complete(&mut self, id: u32, satisfaction: u8) -> Result<&TravelPlan, VacationError> {
        if !(1..=5).contains(&satisfaction) {
            return Err(VacationError::InvalidSatisfaction(satisfaction));
        }
        let plan = self.plans.iter_mut().find(|p| p.id == id).ok_or(VacationError::PlanNotFound(id))?;
        plan.status = TripStatus::Completed;
        plan.satisfaction = Some(satisfaction);
        Ok(&*plan)
    }

    pub fn remove(&mut self, id: u32) -> Result<TravelPlan, VacationError> {
        let idx = self.plans.iter().position(|p| p.id == id).ok_or(VacationError::PlanNotFound(id))?;
        Ok(self.plans.remove(idx))
    }

    pub fn planned_budget(&self) -> u64 {
        self.plans
            .iter()
            .filter(|p| p.status == TripStatus::Planned)
            .map(|p| p.budget)
            .sum()
    }
}

/// `500000` -> `₩500,000`.
pub fn format_krw(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push('₩');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
