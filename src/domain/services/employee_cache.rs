use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use crate::domain::ports::EmployeeRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeMutation {
    Created(i64),
    Renamed(i64),
    Deleted(i64),
}

/// Read cache of all known employee ids.
///
/// Empty until the first `get` or `refresh`. Writes made through the API are
/// folded in with `invalidate_on` so a populated cache never needs a reload.
pub struct EmployeeIdCache {
    repo: Arc<dyn EmployeeRepository>,
    ids: RwLock<Option<BTreeSet<i64>>>,
}

impl EmployeeIdCache {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self { repo, ids: RwLock::new(None) }
    }

    /// Reloads the ids while holding the write lock, so `invalidate_on` calls
    /// racing the load are applied on top of the fresh snapshot.
    pub async fn refresh(&self) -> Result<Vec<i64>, AppError> {
        let mut guard = self.ids.write().await;
        let loaded: BTreeSet<i64> = self.repo.list_ids().await?.into_iter().collect();
        let ids = loaded.iter().copied().collect();
        *guard = Some(loaded);
        debug!("Employee id cache refreshed");
        Ok(ids)
    }

    pub async fn get(&self) -> Result<Vec<i64>, AppError> {
        if let Some(ids) = self.ids.read().await.as_ref() {
            return Ok(ids.iter().copied().collect());
        }
        self.refresh().await
    }

    pub async fn invalidate_on(&self, mutation: EmployeeMutation) {
        let mut guard = self.ids.write().await;
        let Some(ids) = guard.as_mut() else { return };
        match mutation {
            EmployeeMutation::Created(id) => { ids.insert(id); }
            EmployeeMutation::Deleted(id) => { ids.remove(&id); }
            EmployeeMutation::Renamed(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::employee::Employee;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct LoadGate {
        entered: Notify,
        release: Notify,
    }

    struct MockEmployeeRepo {
        ids: Mutex<Vec<i64>>,
        loads: AtomicUsize,
        gate: Option<LoadGate>,
    }

    #[async_trait]
    impl EmployeeRepository for MockEmployeeRepo {
        async fn create(&self, fullname: &str) -> Result<Employee, AppError> {
            let mut ids = self.ids.lock().unwrap();
            let id = ids.iter().max().copied().unwrap_or(0) + 1;
            ids.push(id);
            Ok(Employee { id, fullname: fullname.to_string() })
        }
        async fn find_by_id(&self, _id: i64) -> Result<Option<Employee>, AppError> {
            Ok(None)
        }
        async fn list_ids(&self) -> Result<Vec<i64>, AppError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let snapshot = self.ids.lock().unwrap().clone();
            if let Some(gate) = &self.gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            Ok(snapshot)
        }
        async fn rename(&self, id: i64, fullname: &str) -> Result<Employee, AppError> {
            Ok(Employee { id, fullname: fullname.to_string() })
        }
        async fn delete(&self, id: i64) -> Result<(), AppError> {
            self.ids.lock().unwrap().retain(|i| *i != id);
            Ok(())
        }
    }

    fn setup(ids: Vec<i64>) -> (Arc<MockEmployeeRepo>, EmployeeIdCache) {
        let repo = Arc::new(MockEmployeeRepo { ids: Mutex::new(ids), loads: AtomicUsize::new(0), gate: None });
        let cache = EmployeeIdCache::new(repo.clone());
        (repo, cache)
    }

    #[tokio::test]
    async fn test_get_loads_once() {
        let (repo, cache) = setup(vec![3, 1, 2]);
        assert_eq!(cache.get().await.unwrap(), vec![1, 2, 3]);
        assert_eq!(cache.get().await.unwrap(), vec![1, 2, 3]);
        assert_eq!(repo.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mutations_are_folded_in() {
        let (repo, cache) = setup(vec![1, 2]);
        cache.get().await.unwrap();

        let created = repo.create("New Hire").await.unwrap();
        cache.invalidate_on(EmployeeMutation::Created(created.id)).await;
        repo.delete(1).await.unwrap();
        cache.invalidate_on(EmployeeMutation::Deleted(1)).await;
        cache.invalidate_on(EmployeeMutation::Renamed(2)).await;

        assert_eq!(cache.get().await.unwrap(), vec![2, 3]);
        assert_eq!(repo.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mutation_before_first_load_is_ignored() {
        let (repo, cache) = setup(vec![5]);
        cache.invalidate_on(EmployeeMutation::Created(9)).await;
        assert_eq!(cache.get().await.unwrap(), vec![5]);
        assert_eq!(repo.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_external_writes() {
        let (repo, cache) = setup(vec![1]);
        cache.get().await.unwrap();
        repo.ids.lock().unwrap().push(4);
        assert_eq!(cache.get().await.unwrap(), vec![1]);
        assert_eq!(cache.refresh().await.unwrap(), vec![1, 4]);
        assert_eq!(cache.get().await.unwrap(), vec![1, 4]);
        assert_eq!(repo.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_create_during_first_load_is_not_lost() {
        let repo = Arc::new(MockEmployeeRepo {
            ids: Mutex::new(vec![1]),
            loads: AtomicUsize::new(0),
            gate: Some(LoadGate { entered: Notify::new(), release: Notify::new() }),
        });
        let cache = Arc::new(EmployeeIdCache::new(repo.clone()));

        let loader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.get().await.unwrap() }
        });

        // The load has taken its snapshot of [1] and is parked.
        repo.gate.as_ref().unwrap().entered.notified().await;
        let created = repo.create("Late Joiner").await.unwrap();
        let mutation = tokio::spawn({
            let cache = cache.clone();
            async move { cache.invalidate_on(EmployeeMutation::Created(created.id)).await }
        });

        repo.gate.as_ref().unwrap().release.notify_one();
        assert_eq!(loader.await.unwrap(), vec![1]);
        mutation.await.unwrap();

        assert_eq!(cache.get().await.unwrap(), vec![1, 2]);
        assert_eq!(repo.loads.load(Ordering::SeqCst), 1);
    }
}
