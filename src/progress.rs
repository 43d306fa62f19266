use crate::models::{SkillStatus, Student};

/// Which statuses a change reaches when a level lists the same skill name
/// more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matches {
    First,
    All,
}

/// Stores `note` as given; an empty note clears it. Only the first status
/// with that name is touched.
pub fn update_skill_info(student: &Student, level: u8, skill_name: &str, note: &str) -> Student {
    update_matching(student, level, skill_name, Matches::First, |status| SkillStatus {
        info: (!note.is_empty()).then(|| note.to_string()),
        ..status.clone()
    })
}

/// Adds `delta` repeats to the first status with that name, never going
/// below zero. Callers should not adjust a mastered skill; this function
/// does not check.
pub fn adjust_repeat_count(student: &Student, level: u8, skill_name: &str, delta: i64) -> Student {
    update_matching(student, level, skill_name, Matches::First, |status| {
        let adjusted = i64::from(status.repeat_count)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        SkillStatus {
            repeat_count: adjusted as u32,
            ..status.clone()
        }
    })
}

/// Repeat count is left untouched when mastering.
pub fn mark_mastered(student: &Student, level: u8, skill_name: &str) -> Student {
    update_matching(student, level, skill_name, Matches::All, |status| SkillStatus {
        is_mastered: true,
        ..status.clone()
    })
}

/// Un-mastering restarts the retry sequence, so the repeat count goes back to zero.
pub fn unmark_mastered(student: &Student, level: u8, skill_name: &str) -> Student {
    update_matching(student, level, skill_name, Matches::All, |status| SkillStatus {
        is_mastered: false,
        repeat_count: 0,
        ..status.clone()
    })
}

pub fn first_unmastered_skill(student: &Student, level: u8) -> Option<&SkillStatus> {
    student.skills(level).iter().find(|status| !status.is_mastered)
}

pub fn mastered_count(student: &Student, level: u8) -> usize {
    student
        .skills(level)
        .iter()
        .filter(|status| status.is_mastered)
        .count()
}

pub fn level_progress_percent(student: &Student, level: u8) -> u32 {
    let total = student.skills(level).len();
    if total == 0 {
        return 0;
    }
    let mastered = mastered_count(student, level);
    (100.0 * mastered as f64 / total as f64).round() as u32
}

/// Applies `change` to the statuses named `skill_name` at `level`. An
/// unknown level or skill leaves the student unchanged.
fn update_matching<F>(
    student: &Student,
    level: u8,
    skill_name: &str,
    matches: Matches,
    change: F,
) -> Student
where
    F: Fn(&SkillStatus) -> SkillStatus,
{
    let Some(statuses) = student.level_progress.get(&level) else {
        tracing::debug!(level, "no progress recorded for level, nothing to update");
        return student.clone();
    };
    if !statuses.iter().any(|status| status.skill == skill_name) {
        tracing::debug!(level, skill = skill_name, "skill not found, nothing to update");
        return student.clone();
    }

    let mut seen = false;
    let updated: Vec<SkillStatus> = statuses
        .iter()
        .map(|status| {
            let hit = status.skill == skill_name && (matches == Matches::All || !seen);
            if status.skill == skill_name {
                seen = true;
            }
            if hit {
                change(status)
            } else {
                status.clone()
            }
        })
        .collect();

    let mut level_progress = student.level_progress.clone();
    level_progress.insert(level, updated);
    Student {
        level_progress,
        ..student.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::catalog::CATALOG;
    use crate::models::Day;
    use crate::student::{change_level, create_student};

    fn ana() -> Student {
        create_student(&CATALOG, "Ana", 1, BTreeSet::from([Day::Monday])).unwrap()
    }

    fn with_level(skills: &[(&str, bool)]) -> Student {
        let mut student = ana();
        let statuses = skills
            .iter()
            .map(|(name, mastered)| SkillStatus {
                is_mastered: *mastered,
                ..SkillStatus::new(*name)
            })
            .collect();
        student.level_progress = BTreeMap::from([(1, statuses)]);
        student
    }

    fn status<'a>(student: &'a Student, level: u8, name: &str) -> &'a SkillStatus {
        student
            .skills(level)
            .iter()
            .find(|status| status.skill == name)
            .unwrap()
    }

    #[test]
    fn repeat_count_never_goes_negative() {
        let student = adjust_repeat_count(&ana(), 1, "a", 2);
        assert_eq!(status(&student, 1, "a").repeat_count, 2);

        let student = adjust_repeat_count(&student, 1, "a", -1000);
        assert_eq!(status(&student, 1, "a").repeat_count, 0);
    }

    #[test]
    fn extreme_deltas_saturate() {
        let student = adjust_repeat_count(&ana(), 1, "a", 1);
        let student = adjust_repeat_count(&student, 1, "a", i64::MAX);
        assert_eq!(status(&student, 1, "a").repeat_count, u32::MAX);

        let student = adjust_repeat_count(&student, 1, "a", i64::MIN);
        assert_eq!(status(&student, 1, "a").repeat_count, 0);
    }

    fn duplicate_u(student: &Student) -> Vec<&SkillStatus> {
        student
            .skills(1)
            .iter()
            .filter(|status| status.skill == "u")
            .collect()
    }

    #[test]
    fn repeats_and_notes_reach_only_the_first_duplicate() {
        let student = adjust_repeat_count(&ana(), 1, "u", 1);
        let student = update_skill_info(&student, 1, "u", "long u");
        let u = duplicate_u(&student);
        assert_eq!(u.len(), 2);
        assert_eq!((u[0].repeat_count, u[1].repeat_count), (1, 0));
        assert_eq!(u[0].info.as_deref(), Some("long u"));
        assert_eq!(u[1].info, None);
    }

    #[test]
    fn mastery_reaches_every_duplicate() {
        let student = adjust_repeat_count(&ana(), 1, "u", 3);
        let student = mark_mastered(&student, 1, "u");
        assert!(duplicate_u(&student).iter().all(|status| status.is_mastered));

        let student = unmark_mastered(&student, 1, "u");
        assert!(duplicate_u(&student)
            .iter()
            .all(|status| !status.is_mastered && status.repeat_count == 0));
    }

    #[test]
    fn mastering_leaves_repeats_alone() {
        let student = adjust_repeat_count(&ana(), 1, "a", 3);
        let student = mark_mastered(&student, 1, "a");
        let a = status(&student, 1, "a");
        assert!(a.is_mastered);
        assert_eq!(a.repeat_count, 3);
    }

    #[test]
    fn unmastering_resets_repeats() {
        let student = adjust_repeat_count(&ana(), 1, "e", 5);
        let student = mark_mastered(&student, 1, "e");
        let student = unmark_mastered(&student, 1, "e");
        let e = status(&student, 1, "e");
        assert!(!e.is_mastered);
        assert_eq!(e.repeat_count, 0);
    }

    #[test]
    fn unknown_skill_or_level_is_a_no_op() {
        let student = ana();
        assert_eq!(mark_mastered(&student, 1, "no such skill"), student);
        assert_eq!(adjust_repeat_count(&student, 9, "a", 1), student);
        assert_eq!(update_skill_info(&student, 2, "closed syllables", "x"), student);
    }

    #[test]
    fn skill_info_is_set_and_cleared() {
        let student = update_skill_info(&ana(), 1, "sh", "confuses with ch");
        assert_eq!(status(&student, 1, "sh").info.as_deref(), Some("confuses with ch"));

        let student = update_skill_info(&student, 1, "sh", "  spaced note ");
        assert_eq!(status(&student, 1, "sh").info.as_deref(), Some("  spaced note "));

        let student = update_skill_info(&student, 1, "sh", " ");
        assert_eq!(status(&student, 1, "sh").info.as_deref(), Some(" "));

        let student = update_skill_info(&student, 1, "sh", "");
        assert_eq!(status(&student, 1, "sh").info, None);
    }

    #[test]
    fn only_the_named_level_changes() {
        let student = mark_mastered(&ana(), 2, "ou");
        assert!(status(&student, 2, "ou").is_mastered);
        assert!(!status(&student, 3, "ou").is_mastered);
    }

    #[test]
    fn first_unmastered_follows_catalog_order() {
        let student = mark_mastered(&ana(), 1, "assessment");
        let student = mark_mastered(&student, 1, "consonant");
        assert_eq!(
            first_unmastered_skill(&student, 1).map(|s| s.skill.as_str()),
            Some("syllables")
        );

        let all_done = with_level(&[("a", true), ("b", true)]);
        assert!(first_unmastered_skill(&all_done, 1).is_none());
    }

    #[test]
    fn percent_handles_empty_partial_and_complete_levels() {
        assert_eq!(level_progress_percent(&with_level(&[]), 1), 0);
        assert_eq!(level_progress_percent(&ana(), 7), 0);

        let quarter = with_level(&[("a", true), ("b", false), ("c", false), ("d", false)]);
        assert_eq!(level_progress_percent(&quarter, 1), 25);

        let done = with_level(&[("a", true), ("b", true), ("c", true)]);
        assert_eq!(level_progress_percent(&done, 1), 100);

        let third = with_level(&[("a", true), ("b", false), ("c", false)]);
        assert_eq!(level_progress_percent(&third, 1), 33);
    }

    #[test]
    fn progress_is_retained_per_level_across_level_changes() {
        let student = ana();
        let student = mark_mastered(&student, 1, "a");
        let student = mark_mastered(&student, 1, "e");
        let student = mark_mastered(&student, 1, "i");

        let student = change_level(&CATALOG, &student, 2).unwrap();
        assert_eq!(mastered_count(&student, 2), 0);

        let student = change_level(&CATALOG, &student, 1).unwrap();
        assert_eq!(mastered_count(&student, 1), 3);
        for name in ["a", "e", "i"] {
            assert!(status(&student, 1, name).is_mastered);
        }
    }
}
