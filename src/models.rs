use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fresh identifier for students, lessons and links. UUIDv7 sorts by
/// creation time.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStatus {
    pub skill: String,
    pub is_mastered: bool,
    pub repeat_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl SkillStatus {
    pub fn new(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            is_mastered: false,
            repeat_count: 0,
            info: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonLog {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn next(self) -> Day {
        Day::from(chrono::Weekday::from(self).succ())
    }
}

impl From<chrono::Weekday> for Day {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
            chrono::Weekday::Sun => Day::Sunday,
        }
    }
}

impl From<Day> for chrono::Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Monday => chrono::Weekday::Mon,
            Day::Tuesday => chrono::Weekday::Tue,
            Day::Wednesday => chrono::Weekday::Wed,
            Day::Thursday => chrono::Weekday::Thu,
            Day::Friday => chrono::Weekday::Fri,
            Day::Saturday => chrono::Weekday::Sat,
            Day::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDay(pub String);

impl fmt::Display for UnknownDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown weekday `{}`", self.0)
    }
}

impl std::error::Error for UnknownDay {}

impl FromStr for Day {
    type Err = UnknownDay;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Day::ALL
            .into_iter()
            .find(|day| {
                day.name().eq_ignore_ascii_case(trimmed)
                    || day.name()[..3].eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownDay(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub current_level: u8,
    pub level_progress: BTreeMap<u8, Vec<SkillStatus>>,
    #[serde(default)]
    pub lesson_logs: Vec<LessonLog>,
    #[serde(default)]
    pub tutoring_days: BTreeSet<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_lesson_focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_lesson_focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_book: Option<String>,
}

impl Student {
    pub fn skills(&self, level: u8) -> &[SkillStatus] {
        self.level_progress
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            quick_note: self.quick_note.clone(),
            last_lesson_focus: self.last_lesson_focus.clone(),
            next_lesson_focus: self.next_lesson_focus.clone(),
        }
    }
}

/// The free-text quick-reference fields that autosave after a quiet period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub quick_note: Option<String>,
    pub last_lesson_focus: Option<String>,
    pub next_lesson_focus: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    #[serde(default)]
    pub today_plan: String,
    #[serde(default)]
    pub tomorrow_plan: String,
    #[serde(default)]
    pub quick_links: Vec<QuickLink>,
}
