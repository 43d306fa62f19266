use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::models::{new_id, Day, GlobalSettings, QuickLink, Student};

pub fn update_today_plan(settings: &GlobalSettings, text: &str) -> GlobalSettings {
    GlobalSettings {
        today_plan: text.to_string(),
        ..settings.clone()
    }
}

pub fn update_tomorrow_plan(settings: &GlobalSettings, text: &str) -> GlobalSettings {
    GlobalSettings {
        tomorrow_plan: text.to_string(),
        ..settings.clone()
    }
}

pub fn add_quick_link(
    settings: &GlobalSettings,
    title: &str,
    url: &str,
) -> Result<GlobalSettings, ValidationError> {
    let title = title.trim();
    let url = url.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyLinkTitle);
    }
    if url.is_empty() {
        return Err(ValidationError::EmptyLinkUrl);
    }

    let mut quick_links = settings.quick_links.clone();
    quick_links.push(QuickLink {
        id: new_id(),
        title: title.to_string(),
        url: normalize_url(url),
    });
    Ok(GlobalSettings {
        quick_links,
        ..settings.clone()
    })
}

pub fn remove_quick_link(settings: &GlobalSettings, link_id: &str) -> GlobalSettings {
    GlobalSettings {
        quick_links: settings
            .quick_links
            .iter()
            .filter(|link| link.id != link_id)
            .cloned()
            .collect(),
        ..settings.clone()
    }
}

/// Prefixes `https://` unless the url already names an http(s) scheme.
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

pub fn students_scheduled_on(students: &[Student], day: Day) -> Vec<&Student> {
    students
        .iter()
        .filter(|student| student.tutoring_days.contains(&day))
        .collect()
}

/// Who is tutored on `today` and on the following day.
pub struct Rosters<'a> {
    pub today: Day,
    pub tomorrow: Day,
    pub today_students: Vec<&'a Student>,
    pub tomorrow_students: Vec<&'a Student>,
}

pub fn rosters(students: &[Student], today: NaiveDate) -> Rosters<'_> {
    let today = Day::from(today.weekday());
    let tomorrow = today.next();
    Rosters {
        today,
        tomorrow,
        today_students: students_scheduled_on(students, today),
        tomorrow_students: students_scheduled_on(students, tomorrow),
    }
}
