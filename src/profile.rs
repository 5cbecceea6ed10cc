//! User profile and settings, stored together under `milbase_data`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::discharge::{DischargeError, DischargeProgress, ServiceType};
use crate::store::{keys, Store, StoreError};

pub const DEFAULT_NAME: &str = "Soldier";
pub const DEFAULT_RANK: &str = "Private";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub rank: String,
    pub unit: String,
    pub enlistment_date: Option<NaiveDate>,
    pub service_type: ServiceType,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            name: DEFAULT_NAME.to_string(),
            rank: DEFAULT_RANK.to_string(),
            unit: String::new(),
            enlistment_date: None,
            service_type: ServiceType::Army,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub fn welcome(self, name: &str) -> String {
        match self {
            Language::Ko => format!("안녕하세요, {name}님!"),
            Language::En => format!("Hello, {name}!"),
        }
    }

    pub fn days_unit(self) -> &'static str {
        match self {
            Language::Ko => "일",
            Language::En => " days",
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown value '{0}'")]
pub struct UnknownSetting(pub String);

impl FromStr for Theme {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(UnknownSetting(other.to_string())),
        }
    }
}

impl FromStr for Language {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Language::Ko),
            "en" | "english" => Ok(Language::En),
            other => Err(UnknownSetting(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Ko => "ko",
            Language::En => "en",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub language: Language,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings { theme: Theme::Dark, language: Language::Ko, notifications: true }
    }
}

/// Fields a profile edit may change; `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub rank: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppData {
    pub user: UserProfile,
    pub settings: Settings,
}

impl AppData {
    pub fn load(store: &Store) -> Self {
        store.get_or_default(keys::APP_DATA)
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        store.set(keys::APP_DATA, self)
    }

    /// Write the full document, defaults included, to `dest`.
    pub fn export_to(store: &Store, dest: &Path) -> Result<(), StoreError> {
        store.export_to::<AppData, _>(keys::APP_DATA, dest)
    }

    /// Merge the document at `src` into the stored one. A file whose merged
    /// result no longer reads as `AppData` is rejected and nothing changes.
    pub fn import_from(store: &mut Store, src: &Path) -> Result<AppData, StoreError> {
        store.import_from(keys::APP_DATA, src)
    }

    pub fn set_enlistment(&mut self, date: NaiveDate, service: ServiceType) {
        self.user.enlistment_date = Some(date);
        self.user.service_type = service;
    }

    /// Apply an edit. Blank name or rank falls back to the defaults.
    pub fn edit_profile(&mut self, edit: ProfileEdit) {
        if let Some(name) = edit.name {
            self.user.name = non_blank_or(name, DEFAULT_NAME);
        }
        if let Some(rank) = edit.rank {
            self.user.rank = non_blank_or(rank, DEFAULT_RANK);
        }
        if let Some(unit) = edit.unit {
            self.user.unit = unit.trim().to_string();
        }
    }

    /// Service progress, or `None` until an enlistment date is set.
    pub fn discharge(&self, today: NaiveDate) -> Option<Result<DischargeProgress, DischargeError>> {
        self.user
            .enlistment_date
            .map(|date| DischargeProgress::compute(date, self.user.service_type, today))
    }

    pub fn welcome(&self) -> String {
        self.settings.language.welcome(&self.user.name)
    }
}

fn non_blank_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_nothing_stored() {
        let dir = TempDir::new().unwrap();
        let store = Store::open_in_dir(dir.path()).unwrap();
        let data = AppData::load(&store);
        assert_eq!(data.user.name, "Soldier");
        assert_eq!(data.settings.language, Language::Ko);
        assert!(data.discharge(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()).is_none());
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        store
            .set(keys::APP_DATA, &json!({"user": {"name": "Kim", "enlistmentDate": "2025-03-04", "serviceType": "navy"}}))
            .unwrap();
        let data = AppData::load(&store);
        assert_eq!(data.user.name, "Kim");
        assert_eq!(data.user.rank, "Private");
        assert_eq!(data.user.service_type, ServiceType::Navy);
        assert_eq!(data.settings, Settings::default());
        let progress = data.discharge(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()).unwrap().unwrap();
        assert_eq!(progress.service_days, 0);
        assert_eq!(progress.discharge_date, NaiveDate::from_ymd_opt(2026, 9, 4).unwrap());
    }

    #[test]
    fn blank_edits_restore_defaults() {
        let mut data = AppData::default();
        data.edit_profile(ProfileEdit { name: Some("Lee".into()), rank: Some("Corporal".into()), unit: Some(" 3rd ".into()) });
        assert_eq!((data.user.name.as_str(), data.user.unit.as_str()), ("Lee", "3rd"));
        data.edit_profile(ProfileEdit { name: Some("   ".into()), rank: None, unit: None });
        assert_eq!(data.user.name, "Soldier");
        assert_eq!(data.user.rank, "Corporal");
    }

    #[test]
    fn round_trips_through_store() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        let mut data = AppData::default();
        data.set_enlistment(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), ServiceType::SocialService);
        data.settings.language = Language::En;
        data.save(&mut store).unwrap();
        let loaded = AppData::load(&Store::open(store.path()).unwrap());
        assert_eq!(loaded, data);
        assert_eq!(loaded.welcome(), "Hello, Soldier!");
    }

    #[test]
    fn export_fills_defaults_for_fresh_store() {
        let dir = TempDir::new().unwrap();
        let store = Store::open_in_dir(dir.path()).unwrap();
        let out = dir.path().join("profile.json");
        AppData::export_to(&store, &out).unwrap();
        let written: AppData = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, AppData::default());
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("\"name\": \"Soldier\""));
        assert!(text.contains("\"theme\": \"dark\""));
    }

    #[test]
    fn import_with_bad_date_keeps_profile() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        let mut data = AppData::default();
        data.edit_profile(ProfileEdit { name: Some("Kim".into()), rank: Some("Sergeant".into()), unit: None });
        data.save(&mut store).unwrap();

        let src = dir.path().join("import.json");
        std::fs::write(&src, r#"{"user": {"enlistmentDate": "next tuesday"}}"#).unwrap();
        assert!(matches!(AppData::import_from(&mut store, &src), Err(StoreError::Rejected { .. })));
        let loaded = AppData::load(&Store::open(store.path()).unwrap());
        assert_eq!((loaded.user.name.as_str(), loaded.user.rank.as_str()), ("Kim", "Sergeant"));

        std::fs::write(&src, r#"{"user": {"enlistmentDate": "2025-05-12"}, "settings": {"language": "en"}}"#).unwrap();
        let merged = AppData::import_from(&mut store, &src).unwrap();
        assert_eq!(merged.user.name, "Kim");
        assert_eq!(merged.user.enlistment_date, NaiveDate::from_ymd_opt(2025, 5, 12));
        assert_eq!(AppData::load(&store).settings.language, Language::En);
    }

    #[test]
    fn parse_settings() {
        assert_eq!("LIGHT".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!("english".parse::<Language>(), Ok(Language::En));
        assert!("blue".parse::<Theme>().is_err());
    }
}
