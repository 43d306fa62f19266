use crate::error::{StoreError, TrackerError, ValidationError};
use crate::models::{GlobalSettings, Snapshot, Student};
use crate::repository::{settings_repository, student_repository, SettingsRepository, StudentRepository};
use crate::store::KeyValueStore;
use crate::student::update_snapshot;

/// Owns the student records and global settings for one session.
///
/// Every change is applied in memory first and then written through to the
/// store. When a write fails the in-memory value stays authoritative and the
/// error is returned so the caller can report it.
pub struct Tracker<S> {
    student_repo: StudentRepository<S>,
    settings_repo: SettingsRepository<S>,
    students: Vec<Student>,
    settings: GlobalSettings,
}

impl<S> Tracker<S>
where
    S: KeyValueStore + Clone,
{
    pub async fn open(store: S) -> Result<Self, StoreError> {
        let student_repo = student_repository(store.clone());
        let settings_repo = settings_repository(store);
        let students = student_repo.load().await?;
        let settings = settings_repo.load().await?;
        tracing::debug!(students = students.len(), "tracker opened");

        Ok(Self {
            student_repo,
            settings_repo,
            students,
            settings,
        })
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == student_id)
    }

    /// Looks a student up by id, falling back to a case-insensitive name match.
    pub fn find(&self, id_or_name: &str) -> Option<&Student> {
        let needle = id_or_name.trim();
        self.student(needle).or_else(|| {
            self.students
                .iter()
                .find(|student| student.name.eq_ignore_ascii_case(needle))
        })
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub async fn add_student(&mut self, student: Student) -> Result<(), StoreError> {
        tracing::info!(id = %student.id, name = %student.name, "adding student");
        self.students.push(student);
        self.persist_students().await
    }

    /// Replaces the student with `change(student)`. Returns `false` when no
    /// student has that id.
    pub async fn update_student<F>(&mut self, student_id: &str, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&Student) -> Student,
    {
        let Some(index) = self.position(student_id) else {
            tracing::debug!(id = student_id, "student not found, nothing to update");
            return Ok(false);
        };
        let updated = change(&self.students[index]);
        if updated == self.students[index] {
            return Ok(true);
        }
        self.students[index] = updated;
        self.persist_students().await?;
        Ok(true)
    }

    pub async fn try_update_student<F>(
        &mut self,
        student_id: &str,
        change: F,
    ) -> Result<bool, TrackerError>
    where
        F: FnOnce(&Student) -> Result<Student, ValidationError>,
    {
        let Some(index) = self.position(student_id) else {
            tracing::debug!(id = student_id, "student not found, nothing to update");
            return Ok(false);
        };
        let updated = change(&self.students[index])?;
        if updated != self.students[index] {
            self.students[index] = updated;
            self.persist_students().await?;
        }
        Ok(true)
    }

    pub async fn commit_snapshot(
        &mut self,
        student_id: &str,
        snapshot: Snapshot,
    ) -> Result<bool, StoreError> {
        self.update_student(student_id, |student| update_snapshot(student, snapshot))
            .await
    }

    /// Permanently removes a student. Returns `false` when the id is unknown.
    pub async fn delete_student(&mut self, student_id: &str) -> Result<bool, StoreError> {
        let Some(index) = self.position(student_id) else {
            tracing::debug!(id = student_id, "student not found, nothing to delete");
            return Ok(false);
        };
        let removed = self.students.remove(index);
        tracing::info!(id = %removed.id, name = %removed.name, "deleted student");
        self.persist_students().await?;
        Ok(true)
    }

    pub async fn update_settings<F>(&mut self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&GlobalSettings) -> GlobalSettings,
    {
        let updated = change(&self.settings);
        if updated == self.settings {
            return Ok(());
        }
        self.settings = updated;
        self.persist_settings().await
    }

    pub async fn try_update_settings<F>(&mut self, change: F) -> Result<(), TrackerError>
    where
        F: FnOnce(&GlobalSettings) -> Result<GlobalSettings, ValidationError>,
    {
        let updated = change(&self.settings)?;
        self.update_settings(|_| updated).await?;
        Ok(())
    }

    fn position(&self, student_id: &str) -> Option<usize> {
        self.students.iter().position(|student| student.id == student_id)
    }

    async fn persist_students(&self) -> Result<(), StoreError> {
        if let Err(err) = self.student_repo.save(&self.students).await {
            tracing::warn!(key = self.student_repo.key(), error = %err, "failed to persist students");
            return Err(err);
        }
        Ok(())
    }

    async fn persist_settings(&self) -> Result<(), StoreError> {
        if let Err(err) = self.settings_repo.save(&self.settings).await {
            tracing::warn!(key = self.settings_repo.key(), error = %err, "failed to persist settings");
            return Err(err);
        }
        Ok(())
    }
}
