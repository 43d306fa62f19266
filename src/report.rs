use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{GlobalSettings, LessonLog, Student};
use crate::progress::{first_unmastered_skill, level_progress_percent, mastered_count};
use crate::settings::rosters;

pub struct StudentSummary<'a> {
    pub student: &'a Student,
    pub percent: u32,
    pub mastered: usize,
    pub total: usize,
    pub focus: Option<&'a str>,
}

/// Progress on each student's current level, in roster order.
pub fn summarize_students(students: &[Student]) -> Vec<StudentSummary<'_>> {
    students
        .iter()
        .map(|student| {
            let level = student.current_level;
            StudentSummary {
                student,
                percent: level_progress_percent(student, level),
                mastered: mastered_count(student, level),
                total: student.skills(level).len(),
                focus: first_unmastered_skill(student, level).map(|status| status.skill.as_str()),
            }
        })
        .collect()
}

pub fn build_report(today: NaiveDate, students: &[Student], settings: &GlobalSettings) -> String {
    let rosters = rosters(students, today);
    let summaries = summarize_students(students);

    let mut output = String::new();

    let _ = writeln!(output, "# Tutoring Progress Report");
    let _ = writeln!(output, "Generated on {} ({})", today, rosters.today);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Today ({})", rosters.today);
    write_roster(&mut output, &rosters.today_students);
    write_plan(&mut output, &settings.today_plan);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Tomorrow ({})", rosters.tomorrow);
    write_roster(&mut output, &rosters.tomorrow_students);
    write_plan(&mut output, &settings.tomorrow_plan);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students yet.");
    } else {
        for summary in summaries.iter() {
            let student = summary.student;
            let _ = write!(
                output,
                "- {}: level {}, {}% mastered ({}/{})",
                student.name,
                student.current_level,
                summary.percent,
                summary.mastered,
                summary.total
            );
            match summary.focus {
                Some(focus) => {
                    let _ = write!(output, ", next up: {}", focus);
                }
                None => {
                    let _ = write!(output, ", level complete");
                }
            }
            if let Some(book) = &student.current_book {
                let _ = write!(output, ", reading {}", book);
            }
            let _ = writeln!(output);
            if let Some(next) = &student.next_lesson_focus {
                let _ = writeln!(output, "  - next lesson: {}", next);
            }
            if let Some(note) = &student.quick_note {
                let _ = writeln!(output, "  - note: {}", note);
            }
        }
    }

    let mut recent: Vec<(&Student, &LessonLog)> = students
        .iter()
        .flat_map(|student| student.lesson_logs.iter().map(move |log| (student, log)))
        .collect();
    recent.sort_by(|a, b| b.1.date.cmp(&a.1.date));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Lessons");

    if recent.is_empty() {
        let _ = writeln!(output, "No lessons logged yet.");
    } else {
        for (student, log) in recent.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} on {}{}: {}",
                student.name,
                log.date.date_naive(),
                log.title
                    .as_deref()
                    .map(|title| format!(" ({title})"))
                    .unwrap_or_default(),
                log.notes
            );
        }
    }

    if !settings.quick_links.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Quick Links");
        for link in settings.quick_links.iter() {
            let _ = writeln!(output, "- [{}]({})", link.title, link.url);
        }
    }

    output
}

fn write_roster(output: &mut String, students: &[&Student]) {
    if students.is_empty() {
        let _ = writeln!(output, "No students scheduled.");
    } else {
        for student in students {
            let _ = writeln!(output, "- {} (level {})", student.name, student.current_level);
        }
    }
}

fn write_plan(output: &mut String, plan: &str) {
    if !plan.trim().is_empty() {
        let _ = writeln!(output, "Plan: {}", plan.trim());
    }
}
