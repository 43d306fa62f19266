use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::models::{new_id, Day, LessonLog, SkillStatus, Snapshot, Student};

/// Builds a student with every catalog level fully materialized, nothing
/// mastered and no repeats.
pub fn create_student(
    catalog: &Catalog,
    name: &str,
    start_level: u8,
    tutoring_days: BTreeSet<Day>,
) -> Result<Student, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !catalog.contains_level(start_level) {
        return Err(ValidationError::UnknownLevel(start_level));
    }

    let level_progress: BTreeMap<u8, Vec<SkillStatus>> = catalog
        .levels()
        .map(|level| {
            let statuses = level
                .skills
                .iter()
                .map(|definition| SkillStatus::new(definition.name))
                .collect();
            (level.number, statuses)
        })
        .collect();

    Ok(Student {
        id: new_id(),
        name: name.to_string(),
        current_level: start_level,
        level_progress,
        lesson_logs: Vec::new(),
        tutoring_days,
        quick_note: None,
        last_lesson_focus: None,
        next_lesson_focus: None,
        current_book: None,
    })
}

pub fn rename(student: &Student, new_name: &str) -> Result<Student, ValidationError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(Student {
        name: new_name.to_string(),
        ..student.clone()
    })
}

/// Moves the student to another level. Progress recorded on every level is
/// kept as is.
pub fn change_level(
    catalog: &Catalog,
    student: &Student,
    new_level: u8,
) -> Result<Student, ValidationError> {
    if !catalog.contains_level(new_level) {
        return Err(ValidationError::UnknownLevel(new_level));
    }
    if new_level == student.current_level {
        return Ok(student.clone());
    }
    Ok(Student {
        current_level: new_level,
        ..student.clone()
    })
}

pub fn set_tutoring_days(student: &Student, days: BTreeSet<Day>) -> Student {
    Student {
        tutoring_days: days,
        ..student.clone()
    }
}

pub fn set_current_book(student: &Student, book: Option<&str>) -> Student {
    Student {
        current_book: non_blank(book),
        ..student.clone()
    }
}

/// Replaces the quick note and lesson focus fields together. Blank text
/// clears a field.
pub fn update_snapshot(student: &Student, snapshot: Snapshot) -> Student {
    Student {
        quick_note: non_blank(snapshot.quick_note.as_deref()),
        last_lesson_focus: non_blank(snapshot.last_lesson_focus.as_deref()),
        next_lesson_focus: non_blank(snapshot.next_lesson_focus.as_deref()),
        ..student.clone()
    }
}

/// Records a lesson held on `date`. The new entry goes to the front of the
/// log so the newest lesson is always first.
///
/// Notes that are empty or whitespace-only are rejected with
/// [`ValidationError::EmptyNotes`]; any other notes are stored verbatim.
/// A missing `date` is rejected with [`ValidationError::MissingDate`].
pub fn log_lesson(
    student: &Student,
    date: Option<NaiveDate>,
    title: Option<&str>,
    notes: &str,
) -> Result<Student, ValidationError> {
    if notes.trim().is_empty() {
        return Err(ValidationError::EmptyNotes);
    }
    let date = date.ok_or(ValidationError::MissingDate)?;

    let entry = LessonLog {
        id: new_id(),
        date: date.and_time(NaiveTime::MIN).and_utc(),
        title: non_blank(title),
        notes: notes.to_string(),
    };

    let mut lesson_logs = Vec::with_capacity(student.lesson_logs.len() + 1);
    lesson_logs.push(entry);
    lesson_logs.extend(student.lesson_logs.iter().cloned());

    Ok(Student {
        lesson_logs,
        ..student.clone()
    })
}

/// Drops the student with `student_id`, keeping everyone else in order.
pub fn remove_student(students: &[Student], student_id: &str) -> Vec<Student> {
    students
        .iter()
        .filter(|student| student.id != student_id)
        .cloned()
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    fn ana() -> Student {
        create_student(&CATALOG, "Ana", 1, BTreeSet::from([Day::Monday])).unwrap()
    }

    #[test]
    fn create_materializes_every_level_in_catalog_order() {
        let student = ana();

        assert_eq!(student.level_progress.len(), 5);
        for level in CATALOG.levels() {
            let statuses = &student.level_progress[&level.number];
            let names: Vec<&str> = statuses.iter().map(|status| status.skill.as_str()).collect();
            let expected: Vec<&str> = level.skills.iter().map(|skill| skill.name).collect();
            assert_eq!(names, expected);
            assert!(statuses
                .iter()
                .all(|status| !status.is_mastered && status.repeat_count == 0));
        }
        assert!(student.lesson_logs.is_empty());
        assert_eq!(student.current_level, 1);
    }

    #[test]
    fn create_trims_and_rejects_blank_names() {
        let student = create_student(&CATALOG, "  Ben ", 2, BTreeSet::new()).unwrap();
        assert_eq!(student.name, "Ben");
        assert_eq!(
            create_student(&CATALOG, "   ", 1, BTreeSet::new()),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn create_rejects_levels_outside_catalog() {
        assert_eq!(
            create_student(&CATALOG, "Ana", 6, BTreeSet::new()),
            Err(ValidationError::UnknownLevel(6))
        );
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(ana().id, ana().id);
    }

    #[test]
    fn rename_rejects_blank_and_keeps_original() {
        let student = ana();
        assert_eq!(rename(&student, " "), Err(ValidationError::EmptyName));
        assert_eq!(student.name, "Ana");

        let renamed = rename(&student, "Anabel").unwrap();
        assert_eq!(renamed.name, "Anabel");
        assert_eq!(renamed.id, student.id);
    }

    #[test]
    fn change_level_keeps_progress() {
        let student = ana();
        let moved = change_level(&CATALOG, &student, 3).unwrap();
        assert_eq!(moved.current_level, 3);
        assert_eq!(moved.level_progress, student.level_progress);

        let same = change_level(&CATALOG, &moved, 3).unwrap();
        assert_eq!(same, moved);
        assert!(change_level(&CATALOG, &moved, 0).is_err());
    }

    #[test]
    fn tutoring_days_are_replaced_wholesale() {
        let student = ana();
        let updated = set_tutoring_days(&student, BTreeSet::from([Day::Tuesday, Day::Friday]));
        assert_eq!(
            updated.tutoring_days,
            BTreeSet::from([Day::Tuesday, Day::Friday])
        );
    }

    #[test]
    fn log_lesson_prepends_newest_first() {
        let student = ana();
        let first = log_lesson(
            &student,
            NaiveDate::from_ymd_opt(2026, 3, 2),
            None,
            "short a review",
        )
        .unwrap();
        let second = log_lesson(
            &first,
            NaiveDate::from_ymd_opt(2026, 3, 4),
            Some("Blends"),
            "bl, st, str",
        )
        .unwrap();

        assert_eq!(second.lesson_logs.len(), 2);
        assert_eq!(second.lesson_logs[0].notes, "bl, st, str");
        assert_eq!(second.lesson_logs[0].title.as_deref(), Some("Blends"));
        assert_eq!(second.lesson_logs[1].notes, "short a review");
        assert_eq!(
            second.lesson_logs[0].date.date_naive(),
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
    }

    #[test]
    fn log_lesson_with_empty_notes_or_no_date_is_rejected() {
        let student = ana();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2);

        assert_eq!(
            log_lesson(&student, date, None, ""),
            Err(ValidationError::EmptyNotes)
        );
        assert_eq!(
            log_lesson(&student, date, None, " \n\t"),
            Err(ValidationError::EmptyNotes)
        );
        assert_eq!(
            log_lesson(&student, None, None, "notes"),
            Err(ValidationError::MissingDate)
        );
        assert!(student.lesson_logs.is_empty());
    }

    #[test]
    fn snapshot_blank_text_clears_fields() {
        let student = update_snapshot(
            &ana(),
            Snapshot {
                quick_note: Some("likes dinosaurs".to_string()),
                last_lesson_focus: Some("short a".to_string()),
                next_lesson_focus: Some("  ".to_string()),
            },
        );
        assert_eq!(student.quick_note.as_deref(), Some("likes dinosaurs"));
        assert_eq!(student.last_lesson_focus.as_deref(), Some("short a"));
        assert_eq!(student.next_lesson_focus, None);
    }

    #[test]
    fn current_book_can_be_cleared() {
        let student = set_current_book(&ana(), Some("Bob Books 1"));
        assert_eq!(student.current_book.as_deref(), Some("Bob Books 1"));
        assert_eq!(set_current_book(&student, None).current_book, None);
    }

    #[test]
    fn remove_student_keeps_others_in_order() {
        let students = vec![ana(), ana(), ana()];
        let remaining = remove_student(&students, &students[1].id);

        let ids: Vec<&str> = remaining.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![students[0].id.as_str(), students[2].id.as_str()]);
        assert_eq!(remove_student(&remaining, "missing"), remaining);
    }
}
