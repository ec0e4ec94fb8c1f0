use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Result of one index inside a stage.
#[derive(Debug)]
pub enum TaskResult<T> {
    Finished(T),
    /// The task panicked or was aborted before producing a value.
    Lost(String),
}

/// Everything a stage produced, one entry per index, ordered by index.
#[derive(Debug)]
pub struct StageReport<T> {
    pub name: &'static str,
    pub results: Vec<(usize, TaskResult<T>)>,
}

impl<T> StageReport<T> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn lost(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, TaskResult::Lost(_)))
            .count()
    }
}

/// A group of per-index tasks with a join point at the end. `run` only
/// returns once every task has finished, and never runs more than
/// `max_in_flight` of them at a time.
#[derive(Debug, Clone)]
pub struct TaskStage {
    name: &'static str,
    max_in_flight: usize,
}

impl TaskStage {
    pub fn new(name: &'static str, max_in_flight: usize) -> Self {
        Self {
            name,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub async fn run<T, F, Fut>(&self, indices: std::ops::Range<usize>, task: F) -> StageReport<T>
    where
        T: Send + 'static,
        F: Fn(usize) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let total = indices.len();
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut join_set = JoinSet::new();
        let mut task_index = std::collections::HashMap::with_capacity(total);

        info!(stage = self.name, tasks = total, max_in_flight = self.max_in_flight, "stage started");

        for index in indices {
            let semaphore = Arc::clone(&semaphore);
            let fut = task(index);
            let handle = join_set.spawn(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire_owned().await.ok();
                (index, fut.await)
            });
            task_index.insert(handle.id(), index);
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (index, value))) => results.push((index, TaskResult::Finished(value))),
                Err(e) => {
                    let index = task_index.get(&e.id()).copied().unwrap_or(usize::MAX);
                    error!(stage = self.name, index, error = %e, "stage task lost");
                    results.push((index, TaskResult::Lost(e.to_string())));
                }
            }
        }
        results.sort_by_key(|(index, _)| *index);

        info!(stage = self.name, tasks = results.len(), "stage joined");

        StageReport {
            name: self.name,
            results,
        }
    }
}
