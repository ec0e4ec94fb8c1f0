//! In-memory job service and object store for tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::ports::{JobService, JobServiceError, JobSubmission, ObjectStore, ObjectStoreError};

#[derive(Default)]
struct JobState {
    statuses: HashMap<String, String>,
    started: Vec<JobSubmission>,
    start_rejection: Option<String>,
    delete_failures: HashMap<String, u32>,
    delete_missing: HashMap<String, u32>,
    delete_attempts: HashMap<String, u32>,
}

#[derive(Default)]
pub struct MockJobService {
    state: Mutex<JobState>,
    delete_latency: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockJobService {
    pub fn reject_starts(&self, reason: &str) {
        self.state.lock().unwrap().start_rejection = Some(reason.to_string());
    }

    pub fn set_status(&self, name: &str, status: &str) {
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert(name.to_string(), status.to_string());
    }

    /// The next `times` deletes of `name` fail with a transport error.
    pub fn fail_deletes(&self, name: &str, times: u32) {
        self.state
            .lock()
            .unwrap()
            .delete_failures
            .insert(name.to_string(), times);
    }

    /// The next `times` deletes of `name` answer "not found".
    pub fn missing_on_delete(&self, name: &str, times: u32) {
        self.state
            .lock()
            .unwrap()
            .delete_missing
            .insert(name.to_string(), times);
    }

    pub fn with_delete_latency(self, latency: Duration) -> Self {
        *self.delete_latency.lock().unwrap() = Some(latency);
        self
    }

    pub fn started(&self) -> Vec<JobSubmission> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn delete_attempts(&self, name: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .delete_attempts
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_delete_attempts(&self) -> u32 {
        self.state.lock().unwrap().delete_attempts.values().sum()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

fn take_one(counter: &mut HashMap<String, u32>, name: &str) -> bool {
    match counter.get_mut(name) {
        Some(left) if *left > 0 => {
            *left -= 1;
            true
        }
        _ => false,
    }
}

#[async_trait]
impl JobService for MockJobService {
    async fn start(&self, submission: &JobSubmission) -> Result<(), JobServiceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.start_rejection {
            return Err(JobServiceError::Rejected(reason.clone()));
        }
        state.started.push(submission.clone());
        state
            .statuses
            .insert(submission.name.clone(), "IN_PROGRESS".to_string());
        Ok(())
    }

    async fn get_status(&self, name: &str) -> Result<String, JobServiceError> {
        self.state
            .lock()
            .unwrap()
            .statuses
            .get(name)
            .cloned()
            .ok_or_else(|| JobServiceError::NotFound(format!("The requested job {name} couldn't be found")))
    }

    async fn delete(&self, name: &str) -> Result<(), JobServiceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.delete_latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let result = {
            let mut state = self.state.lock().unwrap();
            *state.delete_attempts.entry(name.to_string()).or_default() += 1;
            if take_one(&mut state.delete_failures, name) {
                Err(JobServiceError::Transport("throttled".to_string()))
            } else if take_one(&mut state.delete_missing, name) {
                Err(JobServiceError::NotFound(name.to_string()))
            } else {
                state.statuses.remove(name);
                Ok(())
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[derive(Default)]
struct StoreState {
    objects: HashMap<String, Bytes>,
    failing_puts: HashSet<String>,
    failing_deletes: HashSet<String>,
    put_attempts: HashMap<String, Vec<String>>,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct MockObjectStore {
    state: Mutex<StoreState>,
}

impl MockObjectStore {
    pub fn insert(&self, key: &str, body: &str) {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(key.to_string(), Bytes::from(body.to_string()));
    }

    pub fn fail_puts_to(&self, key: &str) {
        self.state.lock().unwrap().failing_puts.insert(key.to_string());
    }

    pub fn fail_deletes_of(&self, key: &str) {
        self.state.lock().unwrap().failing_deletes.insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().unwrap().objects.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(key)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn put_attempts(&self, key: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .put_attempts
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, verb: &str) -> usize {
        let prefix = format!("{verb} ");
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("get {key}"));
        state
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), ObjectStoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("put {key}"));
        state
            .put_attempts
            .entry(key.to_string())
            .or_default()
            .push(String::from_utf8_lossy(&body).into_owned());
        if state.failing_puts.contains(key) {
            return Err(ObjectStoreError::Request(format!("put {key} refused")));
        }
        state.objects.insert(key.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {key}"));
        if state.failing_deletes.contains(key) {
            return Err(ObjectStoreError::Request(format!("delete {key} refused")));
        }
        state.objects.remove(key);
        Ok(())
    }
}
