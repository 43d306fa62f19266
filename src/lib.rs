//! Progress tracking for one-to-one reading and spelling tutoring.
//!
//! Students work through a fixed five-level curriculum. For each skill the
//! tracker records mastery, a repeat count and a free-text note; it also
//! keeps dated lesson logs, tutoring days and a few global reminders. The
//! mutation functions in [`student`], [`progress`] and [`settings`] take a
//! value and return the updated value. [`tracker::Tracker`] owns the live
//! records and writes them through a [`store::KeyValueStore`].

pub mod autosave;
pub mod catalog;
pub mod db;
pub mod error;
pub mod models;
pub mod progress;
pub mod report;
pub mod repository;
pub mod settings;
pub mod store;
pub mod student;
pub mod tracker;

pub use catalog::CATALOG;
pub use error::{StoreError, TrackerError, ValidationError};
pub use models::{Day, GlobalSettings, LessonLog, QuickLink, SkillStatus, Snapshot, Student};
pub use tracker::Tracker;
