//! In-memory registry of feedback runs.
//!
//! [`ProcessRegistry`] wraps `Arc<Mutex<HashMap<Uuid, ProcessInfo>>>`.  It is
//! cheap to clone and safe to share across tasks.  Every method takes the
//! lock for a short critical section and returns; no lock is ever held across
//! an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::state::{FeedbackReport, ProcessInfo, ProcessStatus};

/// Thread-safe handle to every known [`ProcessInfo`].
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    inner: Arc<Mutex<HashMap<Uuid, ProcessInfo>>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new run in `status` and return its id.
    pub fn create(&self, status: ProcessStatus) -> Uuid {
        let info = ProcessInfo::new(status);
        let id = info.id;
        self.lock().insert(id, info);
        log::debug!("registry: created process {id} ({status})");
        id
    }

    /// Move `id` to `status`.  Returns `false` for unknown ids.
    pub fn set_status(&self, id: Uuid, status: ProcessStatus) -> bool {
        self.update(id, |info| info.status = status)
    }

    /// Replace the (possibly partial) report of `id`.
    pub fn set_result(&self, id: Uuid, report: FeedbackReport) -> bool {
        self.update(id, |info| info.result = Some(report))
    }

    /// Mark `id` as failed with `error`.
    pub fn fail(&self, id: Uuid, error: impl Into<String>) -> bool {
        let error = error.into();
        self.update(id, |info| {
            info.status = ProcessStatus::Failed;
            info.error = Some(error);
        })
    }

    /// Snapshot of `id`.
    pub fn get(&self, id: Uuid) -> Option<ProcessInfo> {
        self.lock().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut ProcessInfo)) -> bool {
        match self.lock().get_mut(&id) {
            Some(info) => {
                apply(info);
                info.touch();
                true
            }
            None => {
                log::warn!("registry: unknown process {id}");
                false
            }
        }
    }

    /// A panicking writer cannot leave a `ProcessInfo` half-updated, so a
    /// poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ProcessInfo>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get() {
        let registry = ProcessRegistry::new();
        assert!(registry.is_empty());

        let id = registry.create(ProcessStatus::Uploaded);
        let info = registry.get(id).unwrap();

        assert_eq!(info.id, id);
        assert_eq!(info.status, ProcessStatus::Uploaded);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn set_status_updates_timestamp() {
        let registry = ProcessRegistry::new();
        let id = registry.create(ProcessStatus::Pending);
        let before = registry.get(id).unwrap().updated_at;

        assert!(registry.set_status(id, ProcessStatus::Transcribing));

        let info = registry.get(id).unwrap();
        assert_eq!(info.status, ProcessStatus::Transcribing);
        assert!(info.updated_at >= before);
    }

    #[test]
    fn fail_sets_status_and_error() {
        let registry = ProcessRegistry::new();
        let id = registry.create(ProcessStatus::Transcribing);

        registry.fail(id, "speech-to-text unavailable");

        let info = registry.get(id).unwrap();
        assert_eq!(info.status, ProcessStatus::Failed);
        assert_eq!(info.error.as_deref(), Some("speech-to-text unavailable"));
    }

    #[test]
    fn set_result_stores_report() {
        let registry = ProcessRegistry::new();
        let id = registry.create(ProcessStatus::Pending);

        let report = FeedbackReport {
            dropped_annotations: 3,
            ..FeedbackReport::default()
        };
        registry.set_result(id, report.clone());

        assert_eq!(registry.get(id).unwrap().result, Some(report));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let registry = ProcessRegistry::new();
        let id = Uuid::new_v4();

        assert!(!registry.set_status(id, ProcessStatus::Complete));
        assert!(!registry.fail(id, "x"));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn clones_share_storage() {
        let registry = ProcessRegistry::new();
        let other = registry.clone();

        let id = registry.create(ProcessStatus::Pending);
        other.set_status(id, ProcessStatus::Complete);

        assert_eq!(registry.get(id).unwrap().status, ProcessStatus::Complete);
    }

    #[test]
    fn registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcessRegistry>();
    }

    #[test]
    fn survives_poisoned_lock() {
        let registry = ProcessRegistry::new();
        let id = registry.create(ProcessStatus::Pending);

        let poisoner = registry.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the registry lock");
        })
        .join();

        assert!(registry.set_status(id, ProcessStatus::Complete));
        assert_eq!(registry.get(id).unwrap().status, ProcessStatus::Complete);
    }
}
