use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{GlobalSettings, Student};
use crate::store::KeyValueStore;

pub const STUDENTS_KEY: &str = "students";
pub const SETTINGS_KEY: &str = "global-settings";

/// One JSON record stored under a fixed key.
#[derive(Debug, Clone)]
pub struct Repository<S, T> {
    store: S,
    key: &'static str,
    _record: PhantomData<fn() -> T>,
}

pub type StudentRepository<S> = Repository<S, Vec<Student>>;
pub type SettingsRepository<S> = Repository<S, GlobalSettings>;

pub fn student_repository<S: KeyValueStore>(store: S) -> StudentRepository<S> {
    Repository::new(store, STUDENTS_KEY)
}

pub fn settings_repository<S: KeyValueStore>(store: S) -> SettingsRepository<S> {
    Repository::new(store, SETTINGS_KEY)
}

impl<S, T> Repository<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(store: S, key: &'static str) -> Self {
        Self {
            store,
            key,
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Loads the record, or the default value if none was ever saved.
    pub async fn load(&self) -> Result<T, StoreError> {
        match self.store.load(self.key).await? {
            Some(json) => serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
                key: self.key.to_string(),
                source,
            }),
            None => {
                tracing::debug!(key = self.key, "no stored record, using default");
                Ok(T::default())
            }
        }
    }

    pub async fn save(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: self.key.to_string(),
            source,
        })?;
        self.store.save(self.key, &json).await
    }
}
