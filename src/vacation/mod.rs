//! Vacation planner: leave ledger, month calendar, checklists and travel plans.

mod checklist;
mod travel;

pub use checklist::{ChecklistItem, Checklists, Section};
pub use travel::{format_krw, TravelDraft, TravelPlan, TravelPlans, TripStatus};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Bound;
use tracing::debug;

use crate::discharge::DDay;
use crate::store::{keys, Store, StoreError};

pub const CALENDAR_CELLS: usize = 42;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum VacationError {
    #[error("{year}-{month:02} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },
    #[error("end date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("text must not be empty")]
    Blank,
    #[error("no checklist item with id {0}")]
    ItemNotFound(u32),
    #[error("no travel plan with id {0}")]
    PlanNotFound(u32),
    #[error("satisfaction must be between 1 and 5, got {0}")]
    InvalidSatisfaction(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveBucket {
    pub total: u32,
    pub used: u32,
}

impl LeaveBucket {
    pub const fn new(total: u32) -> Self {
        LeaveBucket { total, used: 0 }
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.used)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VacationLedger {
    pub total_days: u32,
    pub used_days: u32,
    pub annual_leave: LeaveBucket,
    pub compensatory_leave: LeaveBucket,
    pub comfort_leave: LeaveBucket,
    pub vacation_dates: BTreeSet<NaiveDate>,
}

impl Default for VacationLedger {
    fn default() -> Self {
        VacationLedger {
            total_days: 20,
            used_days: 0,
            annual_leave: LeaveBucket::new(15),
            compensatory_leave: LeaveBucket::new(4),
            comfort_leave: LeaveBucket::new(1),
            vacation_dates: BTreeSet::new(),
        }
    }
}

impl VacationLedger {
    pub fn load(store: &Store) -> Self {
        store.get_or_default(keys::VACATION)
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        store.set(keys::VACATION, self)
    }

    /// Book or unbook `date`. Returns whether the date is booked afterwards.
    pub fn toggle_day(&mut self, date: NaiveDate) -> bool {
        if self.vacation_dates.remove(&date) {
            self.used_days = self.used_days.saturating_sub(1);
            debug!(%date, "vacation day removed");
            false
        } else {
            self.vacation_dates.insert(date);
            self.used_days += 1;
            debug!(%date, "vacation day added");
            true
        }
    }

    /// Book every day in `start..=end` not already booked; returns how many were added.
    pub fn book_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<u32, VacationError> {
        if end < start {
            return Err(VacationError::InvalidRange { start, end });
        }
        let mut added = 0;
        for date in start.iter_days().take_while(|d| *d <= end) {
            if self.vacation_dates.insert(date) {
                added += 1;
            }
        }
        self.used_days += added;
        Ok(added)
    }

    pub fn remaining_days(&self) -> u32 {
        self.total_days.saturating_sub(self.used_days)
    }

    /// The earliest booked date strictly after `today`.
    pub fn next_vacation(&self, today: NaiveDate) -> Option<(NaiveDate, DDay)> {
        self.vacation_dates
            .range((Bound::Excluded(today), Bound::Unbounded))
            .next()
            .map(|&date| (date, DDay::until(date, today)))
    }

    /// Six weeks of days starting on the Sunday on or before the 1st of the month.
    pub fn month_calendar(&self, year: i32, month: u32, today: NaiveDate) -> Result<Vec<CalendarDay>, VacationError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(VacationError::InvalidMonth { year, month })?;
        let lead = u64::from(first.weekday().num_days_from_sunday());
        let start = first
            .checked_sub_days(Days::new(lead))
            .ok_or(VacationError::InvalidMonth { year, month })?;
        let days: Vec<CalendarDay> = start
            .iter_days()
            .take(CALENDAR_CELLS)
            .map(|date| CalendarDay {
                date,
                in_month: date.month() == month && date.year() == year,
                is_vacation: self.vacation_dates.contains(&date),
                is_today: date == today,
            })
            .collect();
        if days.len() != CALENDAR_CELLS {
            return Err(VacationError::InvalidMonth { year, month });
        }
        Ok(days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_vacation: bool,
    pub is_today: bool,
}
