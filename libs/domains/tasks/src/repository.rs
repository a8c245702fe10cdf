use async_trait::async_trait;

use crate::error::TaskResult;
use crate::models::{NewTask, Task};

/// Persistence boundary for tasks.
///
/// The three title lookups are intentionally distinct: the service tries
/// them in order and only falls through when the previous one returned
/// nothing, so each maps to a differently-shaped query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: NewTask) -> TaskResult<Task>;

    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>>;

    async fn find_all(&self) -> TaskResult<Vec<Task>>;

    /// Persists the full row for an existing task.
    async fn save(&self, task: Task) -> TaskResult<Task>;

    /// Returns whether a row was actually removed.
    async fn delete_by_id(&self, id: i64) -> TaskResult<bool>;

    /// Case-insensitive contains match on title (derived query shape).
    async fn find_by_title(&self, title: &str) -> TaskResult<Vec<Task>>;

    /// Case-insensitive contains match via an explicit lowered comparison.
    async fn search_by_title(&self, title: &str) -> TaskResult<Vec<Task>>;

    /// Same match expressed as raw SQL against the table.
    async fn find_by_title_native(&self, title: &str) -> TaskResult<Vec<Task>>;

    /// Exact status match.
    async fn find_by_status(&self, status: &str) -> TaskResult<Vec<Task>>;

    /// Title contains (case-insensitive) combined with exact status.
    async fn find_by_title_and_status(&self, title: &str, status: &str) -> TaskResult<Vec<Task>>;
}
