use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::VacationError;
use crate::store::{keys, Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    PreVacation,
    Packing,
    Return,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::PreVacation, Section::Packing, Section::Return];

    pub fn title(self) -> &'static str {
        match self {
            Section::PreVacation => "Before leave",
            Section::Packing => "Packing",
            Section::Return => "Return",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::PreVacation => "pre",
            Section::Packing => "packing",
            Section::Return => "return",
        })
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pre" | "pre-vacation" | "before" => Ok(Section::PreVacation),
            "packing" | "pack" => Ok(Section::Packing),
            "return" | "back" => Ok(Section::Return),
            other => Err(format!("unknown checklist section '{other}' (expected pre, packing or return)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

fn item(id: u32, text: &str, completed: bool) -> ChecklistItem {
    ChecklistItem { id, text: text.to_string(), completed }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Checklists {
    pub pre_vacation: Vec<ChecklistItem>,
    pub packing: Vec<ChecklistItem>,
    #[serde(rename = "return")]
    pub return_trip: Vec<ChecklistItem>,
}

impl Default for Checklists {
    fn default() -> Self {
        Checklists {
            pre_vacation: vec![
                item(1, "Submit the leave request", true),
                item(2, "Hand over unit duties", true),
                item(3, "Confirm accommodation booking", false),
                item(4, "Book transport", false),
                item(5, "Share the emergency contact list", true),
            ],
            packing: vec![
                item(6, "Uniform and personal gear", false),
                item(7, "Toiletries", false),
                item(8, "Spare clothes", false),
                item(9, "Chargers and electronics", false),
                item(10, "ID card and required documents", true),
            ],
            return_trip: vec![
                item(11, "Check the return time", false),
                item(12, "Book return transport", false),
                item(13, "Call the unit", false),
                item(14, "Sort out personal belongings", false),
                item(15, "Prepare to resume duties", false),
            ],
        }
    }
}

impl Checklists {
    pub fn load(store: &Store) -> Self {
        store.get_or_default(keys::CHECKLIST)
    }

    pub fn save(&self, store: &mut Store) -> Result<(), StoreError> {
        store.set(keys::CHECKLIST, self)
    }

    pub fn section(&self, section: Section) -> &[ChecklistItem] {
        match section {
            Section::PreVacation => &self.pre_vacation,
            Section::Packing => &self.packing,
            Section::Return => &self.return_trip,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<ChecklistItem> {
        match section {
            Section::PreVacation => &mut self.pre_vacation,
            Section::Packing => &mut self.packing,
            Section::Return => &mut self.return_trip,
        }
    }

    /// (completed, total) for a section.
    pub fn progress(&self, section: Section) -> (usize, usize) {
        let items = self.section(section);
        (items.iter().filter(|i| i.completed).count(), items.len())
    }

    /// Flip an item's completion; returns the new state.
    pub fn toggle(&mut self, section: Section, id: u32) -> Result<bool, VacationError> {
        let entry = self
            .section_mut(section)
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(VacationError::ItemNotFound(id))?;
        entry.completed = !entry.completed;
        Ok(entry.completed)
    }

    /// Append an item. Ids are unique across all sections.
    pub fn add(&mut self, section: Section, text: &str) -> Result<&ChecklistItem, VacationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VacationError::Blank);
        }
        let id = self.max_id() + 1;
        let items = self.section_mut(section);
        items.push(item(id, text, false));
        Ok(&items[items.len() - 1])
    }

    pub fn reset(&mut self) {
        *self = Checklists::default();
    }

    fn max_id(&self) -> u32 {
        Section::ALL
            .into_iter()
            .flat_map(|s| self.section(s).iter().map(|i| i.id))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn seeded_sections() {
        let lists = Checklists::default();
        assert_eq!(lists.progress(Section::PreVacation), (3, 5));
        assert_eq!(lists.progress(Section::Packing), (1, 5));
        assert_eq!(lists.progress(Section::Return), (0, 5));
    }

    #[test]
    fn add_uses_global_max_id() {
        let mut lists = Checklists::default();
        let added = lists.add(Section::PreVacation, "  Charge phone ").unwrap();
        assert_eq!((added.id, added.text.as_str(), added.completed), (16, "Charge phone", false));
        assert_eq!(lists.add(Section::Return, "Buy snacks").unwrap().id, 17);
        assert_eq!(lists.add(Section::Packing, "   "), Err(VacationError::Blank));
    }

    #[test]
    fn add_to_empty_lists_starts_at_one() {
        let mut lists = Checklists { pre_vacation: vec![], packing: vec![], return_trip: vec![] };
        assert_eq!(lists.add(Section::Packing, "Socks").unwrap().id, 1);
    }

    #[test]
    fn toggle_and_reset() {
        let mut lists = Checklists::default();
        assert_eq!(lists.toggle(Section::Return, 11), Ok(true));
        assert_eq!(lists.toggle(Section::Return, 11), Ok(false));
        // Item 11 lives in the return section only.
        assert_eq!(lists.toggle(Section::Packing, 11), Err(VacationError::ItemNotFound(11)));
        lists.toggle(Section::Packing, 6).unwrap();
        lists.reset();
        assert_eq!(lists, Checklists::default());
    }

    #[test]
    fn stored_under_return_key() {
        let dir = TempDir::new().unwrap();
        let mut store = Store::open_in_dir(dir.path()).unwrap();
        let mut lists = Checklists::default();
        lists.toggle(Section::Packing, 7).unwrap();
        lists.save(&mut store).unwrap();
        let raw = store.raw(keys::CHECKLIST).unwrap();
        assert!(raw.get("return").is_some());
        assert!(raw.get("preVacation").is_some());
        assert_eq!(Checklists::load(&store), lists);
    }

    #[test]
    fn parse_section() {
        assert_eq!("Packing".parse::<Section>(), Ok(Section::Packing));
        assert_eq!("pre-vacation".parse::<Section>(), Ok(Section::PreVacation));
        assert!("misc".parse::<Section>().is_err());
    }
}
