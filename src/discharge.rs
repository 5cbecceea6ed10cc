//! Discharge date arithmetic and service progress.
//!
//! All values are whole calendar days, so "today" is a `NaiveDate` supplied
//! by the caller. Use [`today`] for the local date.

use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Branch or alternative service, which fixes the mandatory duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    #[default]
    Army,
    Navy,
    #[serde(rename = "airforce")]
    AirForce,
    Marine,
    AuxiliaryPolice,
    AuxiliaryFire,
    SocialService,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Army,
        ServiceType::Navy,
        ServiceType::AirForce,
        ServiceType::Marine,
        ServiceType::AuxiliaryPolice,
        ServiceType::AuxiliaryFire,
        ServiceType::SocialService,
    ];

    /// Mandatory service length in months.
    pub fn months(self) -> u32 {
        match self {
            ServiceType::Army | ServiceType::Navy | ServiceType::AirForce | ServiceType::Marine => 18,
            ServiceType::AuxiliaryPolice | ServiceType::AuxiliaryFire | ServiceType::SocialService => 21,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ServiceType::Army => "army",
            ServiceType::Navy => "navy",
            ServiceType::AirForce => "airforce",
            ServiceType::Marine => "marine",
            ServiceType::AuxiliaryPolice => "auxiliary-police",
            ServiceType::AuxiliaryFire => "auxiliary-fire",
            ServiceType::SocialService => "social-service",
        }
    }

    /// Korean display label.
    pub fn label(self) -> &'static str {
        match self {
            ServiceType::Army => "육군",
            ServiceType::Navy => "해군",
            ServiceType::AirForce => "공군",
            ServiceType::Marine => "해병대",
            ServiceType::AuxiliaryPolice => "의무경찰",
            ServiceType::AuxiliaryFire => "의무소방",
            ServiceType::SocialService => "사회복무",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ServiceType {
    type Err = DischargeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ServiceType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(needle) || t.label() == needle)
            .ok_or_else(|| DischargeError::UnknownServiceType(needle.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DischargeError {
    #[error("unknown service type '{0}' (expected one of: army, navy, airforce, marine, auxiliary-police, auxiliary-fire, social-service)")]
    UnknownServiceType(String),
    #[error("discharge date for {0} is outside the supported calendar range")]
    OutOfRange(NaiveDate),
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Enlistment date plus the service length in calendar months.
///
/// The day of month is kept where it exists in the target month, otherwise it
/// is clamped to the month's last day (Aug 31 + 18 months = Feb 28/29).
pub fn discharge_date(enlistment: NaiveDate, service: ServiceType) -> Result<NaiveDate, DischargeError> {
    enlistment
        .checked_add_months(Months::new(service.months()))
        .ok_or(DischargeError::OutOfRange(enlistment))
}

/// Snapshot of service progress as of a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeProgress {
    pub enlistment_date: NaiveDate,
    pub discharge_date: NaiveDate,
    pub service_type: ServiceType,
    /// Days served so far, 0 before enlistment.
    pub service_days: i64,
    /// Days left until discharge, 0 once discharged.
    pub remaining_days: i64,
    pub total_service_days: i64,
    /// Rounded share of the service completed, within 0..=100.
    pub progress_percent: u8,
}

impl DischargeProgress {
    /// ```
    /// use chrono::NaiveDate;
    /// use milbase::discharge::{DischargeProgress, ServiceType};
    ///
    /// let enlisted = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    /// let today = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
    /// let p = DischargeProgress::compute(enlisted, ServiceType::Army, today).unwrap();
    /// assert_eq!(p.discharge_date, NaiveDate::from_ymd_opt(2026, 7, 6).unwrap());
    /// assert_eq!(p.service_days + p.remaining_days, p.total_service_days);
    /// ```
    pub fn compute(enlistment: NaiveDate, service: ServiceType, today: NaiveDate) -> Result<Self, DischargeError> {
        let discharge = discharge_date(enlistment, service)?;
        let total = (discharge - enlistment).num_days();
        let service_days = (today - enlistment).num_days().max(0);
        let remaining_days = (discharge - today).num_days().max(0);
        let progress = if total > 0 {
            ((service_days as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
        } else {
            100
        };
        Ok(DischargeProgress {
            enlistment_date: enlistment,
            discharge_date: discharge,
            service_type: service,
            service_days,
            remaining_days,
            total_service_days: total,
            progress_percent: progress,
        })
    }

    pub fn is_discharged(&self) -> bool {
        self.remaining_days == 0
    }

    /// Countdown to the discharge date.
    pub fn d_day(&self, today: NaiveDate) -> DDay {
        DDay::until(self.discharge_date, today)
    }

    /// `[#####-----]`-style bar `width` cells wide.
    pub fn bar(&self, width: usize) -> String {
        let filled = (width * self.progress_percent as usize + 50) / 100;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

/// Signed day distance to a target date, shown as `D-n`, `D-Day` or `D+n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DDay(pub i64);

impl DDay {
    pub fn until(target: NaiveDate, today: NaiveDate) -> Self {
        DDay((target - today).num_days())
    }

    pub fn days(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("D-Day"),
            n if n > 0 => write!(f, "D-{n}"),
            n => write!(f, "D+{}", -n),
        }
    }
}
