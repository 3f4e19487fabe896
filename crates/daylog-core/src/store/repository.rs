//! Shared Day repository

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use crate::store::{Day, DayStore};
use crate::{Error, Result};

/// Process-wide handle to the Day store
///
/// Cloning is cheap; all clones share one connection. The lock is held for a
/// single statement at a time.
#[derive(Clone)]
pub struct DayRepository {
    store: Arc<Mutex<DayStore>>,
}

impl DayRepository {
    /// Open (or create) the database at `db_path`
    pub fn new(db_path: &str) -> Result<Self> {
        let store = DayStore::new(db_path)?;
        info!("Day store opened at {}", db_path);
        Ok(Self::from_store(store))
    }

    /// Create an in-memory repository (for testing)
    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_store(DayStore::in_memory()?))
    }

    pub fn from_store(store: DayStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DayStore>> {
        self.store
            .lock()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))
    }

    /// Look up the record for a date key
    pub async fn get_by_date(&self, date_key: &str) -> Result<Option<Day>> {
        debug!("Loading day {}", date_key);
        self.lock()?.get_by_date(date_key)
    }

    /// Inclusive, ascending range query
    pub async fn get_range(&self, start: &str, end: &str) -> Result<Vec<Day>> {
        debug!("Loading days {}..={}", start, end);
        self.lock()?.get_range(start, end)
    }

    /// Create or overwrite the record for a date key
    pub async fn upsert(&self, date_key: &str, who: Option<&str>, lesson: Option<&str>) -> Result<Day> {
        let day = self.lock()?.upsert(date_key, who, lesson)?;
        info!("Saved day {} (id {})", day.date_str, day.id);
        Ok(day)
    }

    pub async fn count(&self) -> Result<usize> {
        self.lock()?.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_then_get() {
        let repo = DayRepository::in_memory().unwrap();

        repo.upsert("2024-01-01", Some("Ana"), Some("Intro")).await.unwrap();
        let day = repo.get_by_date("2024-01-01").await.unwrap().unwrap();

        assert_eq!(day.who.as_deref(), Some("Ana"));
        assert_eq!(day.lesson.as_deref(), Some("Intro"));
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let repo = DayRepository::in_memory().unwrap();
        let other = repo.clone();

        repo.upsert("2024-01-02", Some("Ben"), None).await.unwrap();

        assert_eq!(other.count().await.unwrap(), 1);
        let days = other.get_range("2024-01-01", "2024-01-31").await.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date_str, "2024-01-02");
    }

    #[tokio::test]
    async fn test_concurrent_upserts_last_write_wins() {
        let repo = DayRepository::in_memory().unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let who = format!("writer-{}", i);
                repo.upsert("2024-05-05", Some(&who), None).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.count().await.unwrap(), 1);
        let day = repo.get_by_date("2024-05-05").await.unwrap().unwrap();
        assert!(day.who.unwrap().starts_with("writer-"));
    }
}
