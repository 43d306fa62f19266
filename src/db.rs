use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::catalog::CATALOG;
use crate::error::StoreError;
use crate::models::{Day, Snapshot, UnknownDay};
use crate::progress::{adjust_repeat_count, first_unmastered_skill, mark_mastered};
use crate::settings::add_quick_link;
use crate::store::KeyValueStore;
use crate::student::{create_student, log_lesson, set_current_book, update_snapshot};
use crate::tracker::Tracker;

/// Key-value records kept in a local SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `database_url`, e.g.
    /// `sqlite://og-tracker.db` or `sqlite::memory:`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // One connection: a single writer, and in-memory databases stay shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl KeyValueStore for SqliteStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.get("value")))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE
            SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub async fn init_db(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Adds a small demo roster. Students whose name already exists are left alone.
pub async fn seed<S>(tracker: &mut Tracker<S>) -> anyhow::Result<usize>
where
    S: KeyValueStore + Clone,
{
    let students = vec![
        (
            "Avery Lee",
            1,
            vec![Day::Monday, Day::Wednesday],
            vec!["assessment", "syllables", "consonant", "vowel"],
            Some("Bob Books Set 1"),
        ),
        (
            "Jules Moreno",
            2,
            vec![Day::Tuesday, Day::Thursday],
            vec!["open syllable", "y says i"],
            None,
        ),
        (
            "Kiara Patel",
            3,
            vec![Day::Friday],
            vec!["contractions"],
            Some("Frog and Toad"),
        ),
    ];

    let mut inserted = 0usize;
    for (name, level, days, mastered, book) in students {
        if tracker.find(name).is_some() {
            continue;
        }

        let mut student = create_student(&CATALOG, name, level, days.into_iter().collect())?;
        for skill in mastered {
            student = mark_mastered(&student, level, skill);
        }
        if let Some(first) = first_unmastered_skill(&student, level) {
            let skill = first.skill.clone();
            student = adjust_repeat_count(&student, level, &skill, 2);
        }
        student = set_current_book(&student, book);
        student = log_lesson(
            &student,
            NaiveDate::from_ymd_opt(2026, 1, 28),
            Some("Placement"),
            "Initial assessment and placement.",
        )?;
        student = update_snapshot(
            &student,
            Snapshot {
                next_lesson_focus: Some("review the last mastered skill".to_string()),
                ..student.snapshot()
            },
        );

        tracker.add_student(student).await?;
        inserted += 1;
    }

    if tracker.settings().quick_links.is_empty() {
        tracker
            .try_update_settings(|settings| {
                add_quick_link(settings, "Orton-Gillingham Academy", "www.ortonacademy.org")
            })
            .await?;
    }

    Ok(inserted)
}

/// Imports a roster from CSV with columns
/// `name,level,tutoring_days,current_book`, where `tutoring_days` is a
/// `;`-separated list. Returns the number of students added.
pub async fn import_csv<S>(tracker: &mut Tracker<S>, csv_path: &std::path::Path) -> anyhow::Result<usize>
where
    S: KeyValueStore + Clone,
{
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        level: u8,
        #[serde(default)]
        tutoring_days: String,
        current_book: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid row {}", index + 1))?;

        if tracker.find(&row.name).is_some() {
            tracing::debug!(name = %row.name, "student already exists, skipping");
            continue;
        }

        let days = match parse_days(&row.tutoring_days) {
            Ok(days) => days,
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "skipping row");
                continue;
            }
        };

        let student = match create_student(&CATALOG, &row.name, row.level, days) {
            Ok(student) => set_current_book(&student, row.current_book.as_deref()),
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "skipping row");
                continue;
            }
        };

        tracker.add_student(student).await?;
        inserted += 1;
    }

    Ok(inserted)
}

fn parse_days(value: &str) -> Result<BTreeSet<Day>, UnknownDay> {
    value
        .split(';')
        .map(str::trim)
        .filter(|day| !day.is_empty())
        .map(Day::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::mastered_count;
    use crate::repository::STUDENTS_KEY;
    use crate::store::MemoryStore;

    async fn memory_db() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        init_db(store.pool()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn sqlite_store_upserts_values() {
        let store = memory_db().await;
        assert!(store.load("students").await.unwrap().is_none());

        store.save("students", "[]").await.unwrap();
        store.save("students", "[1]").await.unwrap();
        assert_eq!(store.load("students").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let store = memory_db().await;
        init_db(store.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn tracker_state_survives_reopening_a_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tracker.db").display());

        let store = SqliteStore::connect(&url).await.unwrap();
        init_db(store.pool()).await.unwrap();
        let mut tracker = Tracker::open(store.clone()).await.unwrap();
        assert_eq!(seed(&mut tracker).await.unwrap(), 3);
        let expected = tracker.students().to_vec();
        store.pool().close().await;

        let store = SqliteStore::connect(&url).await.unwrap();
        let reopened = Tracker::open(store.clone()).await.unwrap();
        assert_eq!(reopened.students(), expected.as_slice());
        assert_eq!(reopened.settings().quick_links.len(), 1);
        assert!(store.load(STUDENTS_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn seeding_twice_adds_nothing() {
        let mut tracker = Tracker::open(MemoryStore::new()).await.unwrap();
        assert_eq!(seed(&mut tracker).await.unwrap(), 3);
        assert_eq!(seed(&mut tracker).await.unwrap(), 0);
        assert_eq!(tracker.students().len(), 3);
        assert_eq!(tracker.settings().quick_links.len(), 1);

        let avery = tracker.find("Avery Lee").unwrap();
        assert_eq!(mastered_count(avery, 1), 4);
        assert_eq!(avery.lesson_logs.len(), 1);
    }

    #[tokio::test]
    async fn import_skips_duplicates_and_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(
            &path,
            "name,level,tutoring_days,current_book\n\
             Ana,1,Monday;Wed,\n\
             Ben,2,Funday,\n\
             Cy,9,Friday,\n\
             ana,2,Tuesday,\n\
             Dee,4,,Charlotte's Web\n",
        )
        .unwrap();

        let mut tracker = Tracker::open(MemoryStore::new()).await.unwrap();
        assert_eq!(import_csv(&mut tracker, &path).await.unwrap(), 2);

        let ana = tracker.find("Ana").unwrap();
        assert_eq!(ana.tutoring_days, BTreeSet::from([Day::Monday, Day::Wednesday]));
        let dee = tracker.find("Dee").unwrap();
        assert!(dee.tutoring_days.is_empty());
        assert_eq!(dee.current_book.as_deref(), Some("Charlotte's Web"));
        assert!(tracker.find("Ben").is_none());
        assert!(tracker.find("Cy").is_none());
    }
}
