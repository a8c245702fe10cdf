use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::conversions::{to_dto, to_new_task};
use crate::error::{TaskError, TaskResult};
use crate::models::{
    current_timestamp, Task, TaskDto, STATUS_DONE, STATUS_TODO, SYSTEM_STATUS_UPDATE,
    SYSTEM_UPDATE,
};
use crate::repository::TaskRepository;

/// Business logic for tasks, generic over the persistence backend.
#[derive(Debug, Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

/// Trims the parameter and treats empty as absent.
fn normalize(param: Option<&str>) -> Option<String> {
    param
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, dto))]
    pub async fn create_task(&self, dto: TaskDto) -> TaskResult<TaskDto> {
        if dto.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(TaskError::Validation("Task title is required".to_string()));
        }
        let task = self.repository.insert(to_new_task(dto)).await?;
        Ok(to_dto(task))
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, id: i64) -> TaskResult<TaskDto> {
        let task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;
        Ok(to_dto(task))
    }

    #[instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> TaskResult<Vec<TaskDto>> {
        let tasks = self.repository.find_all().await?;
        Ok(tasks.into_iter().map(to_dto).collect())
    }

    /// Applies client-supplied fields onto the stored task.
    ///
    /// Title is mandatory and validated before the lookup, so a missing
    /// title answers with a validation failure even for unknown ids.
    /// `description`, `due_date` and `remarks` are copied through as
    /// sent, absent values clearing the stored ones. `createdOn` and
    /// `createdBy` are never touched, whatever the client sent, and an
    /// absent or blank status leaves the stored status in place.
    #[instrument(skip(self, dto))]
    pub async fn update_task(&self, id: i64, dto: TaskDto) -> TaskResult<TaskDto> {
        let title = match dto.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(TaskError::Validation("Task title is required".to_string())),
        };

        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        task.title = title;
        task.description = dto.description;
        task.due_date = dto.due_date;
        task.remarks = dto.remarks;
        if let Some(status) = dto.status.filter(|s| !s.trim().is_empty()) {
            task.status = status;
        }
        task.last_updated_on = current_timestamp();
        task.last_updated_by = dto
            .last_updated_by
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| SYSTEM_UPDATE.to_string());

        let saved = self.repository.save(task).await?;
        Ok(to_dto(saved))
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: i64) -> TaskResult<()> {
        let deleted = self.repository.delete_by_id(id).await?;
        if !deleted {
            return Err(TaskError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn mark_completed(&self, id: i64) -> TaskResult<TaskDto> {
        self.set_status(id, STATUS_DONE).await
    }

    #[instrument(skip(self))]
    pub async fn mark_pending(&self, id: i64) -> TaskResult<TaskDto> {
        self.set_status(id, STATUS_TODO).await
    }

    async fn set_status(&self, id: i64, status: &str) -> TaskResult<TaskDto> {
        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;
        task.status = status.to_string();
        task.last_updated_on = current_timestamp();
        task.last_updated_by = SYSTEM_STATUS_UPDATE.to_string();
        let saved = self.repository.save(task).await?;
        Ok(to_dto(saved))
    }

    /// Multi-stage task search.
    ///
    /// A failure anywhere inside the stages degrades to an empty result
    /// instead of surfacing to the caller. Every other operation on this
    /// service propagates errors; search alone absorbs them.
    #[instrument(skip(self))]
    pub async fn search_tasks(
        &self,
        title: Option<&str>,
        status: Option<&str>,
    ) -> TaskResult<Vec<TaskDto>> {
        let title = normalize(title);
        let status = normalize(status);

        match self.run_search(title.as_deref(), status.as_deref()).await {
            Ok(tasks) => Ok(tasks.into_iter().map(to_dto).collect()),
            Err(err) => {
                error!(%err, ?title, ?status, "search failed, returning empty result");
                Ok(Vec::new())
            }
        }
    }

    async fn run_search(
        &self,
        title: Option<&str>,
        status: Option<&str>,
    ) -> TaskResult<Vec<Task>> {
        let results = match (title, status) {
            (Some(title), Some(status)) => {
                self.repository
                    .find_by_title_and_status(title, status)
                    .await?
            }
            (Some(title), None) => self.search_by_title_staged(title).await?,
            (None, Some(status)) => self.repository.find_by_status(status).await?,
            (None, None) => self.repository.find_all().await?,
        };

        // Last resort when the store-side queries came back empty for a
        // title search: scan everything and match in process.
        if results.is_empty() {
            if let Some(title) = title {
                warn!(title, "store queries empty, scanning in process");
                let needle = title.to_lowercase();
                let all = self.repository.find_all().await?;
                return Ok(all
                    .into_iter()
                    .filter(|task| task.title.to_lowercase().contains(&needle))
                    .collect());
            }
        }
        Ok(results)
    }

    /// Tries the three title query shapes in order, stopping at the first
    /// non-empty result.
    async fn search_by_title_staged(&self, title: &str) -> TaskResult<Vec<Task>> {
        let results = self.repository.find_by_title(title).await?;
        if !results.is_empty() {
            return Ok(results);
        }
        debug!(title, "primary title query empty, trying secondary");
        let results = self.repository.search_by_title(title).await?;
        if !results.is_empty() {
            return Ok(results);
        }
        debug!(title, "secondary title query empty, trying native");
        self.repository.find_by_title_native(title).await
    }

    /// Single-parameter search. A blank keyword lists everything.
    #[instrument(skip(self))]
    pub async fn search_by_keyword(&self, keyword: &str) -> TaskResult<Vec<TaskDto>> {
        if keyword.trim().is_empty() {
            return self.get_all_tasks().await;
        }
        self.search_tasks(Some(keyword), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockTaskRepository;
    use chrono::NaiveDate;

    fn sample_task(id: i64, title: &str, status: &str) -> Task {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Task {
            id,
            title: title.to_string(),
            description: Some("desc".to_string()),
            due_date: None,
            status: status.to_string(),
            remarks: None,
            created_on: created,
            last_updated_on: created,
            created_by: "alice".to_string(),
            last_updated_by: "alice".to_string(),
        }
    }

    fn service(repo: MockTaskRepository) -> TaskService<MockTaskRepository> {
        TaskService::new(repo)
    }

    #[tokio::test]
    async fn test_create_task_rejects_missing_title() {
        let service = service(MockTaskRepository::new());
        let result = service.create_task(TaskDto::default()).await;
        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_task_rejects_blank_title() {
        let service = service(MockTaskRepository::new());
        let dto = TaskDto {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.create_task(dto).await,
            Err(TaskError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_task_applies_defaults() {
        let mut repo = MockTaskRepository::new();
        repo.expect_insert()
            .withf(|new_task| {
                new_task.title == "Write report"
                    && new_task.status == STATUS_TODO
                    && new_task.created_by == "Company Admin"
            })
            .returning(|new_task| {
                Ok(Task {
                    id: 1,
                    title: new_task.title,
                    description: new_task.description,
                    due_date: new_task.due_date,
                    status: new_task.status,
                    remarks: new_task.remarks,
                    created_on: new_task.created_on,
                    last_updated_on: new_task.last_updated_on,
                    created_by: new_task.created_by,
                    last_updated_by: new_task.last_updated_by,
                })
            });

        let dto = TaskDto {
            title: Some("Write report".to_string()),
            ..Default::default()
        };
        let created = service(repo).create_task(dto).await.unwrap();
        assert_eq!(created.id, Some(1));
        assert_eq!(created.status.as_deref(), Some(STATUS_TODO));
        assert_eq!(created.created_by.as_deref(), Some("Company Admin"));
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let result = service(repo).get_task(99).await;
        assert!(matches!(result, Err(TaskError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_get_all_tasks_maps_to_dto() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![sample_task(1, "a", "TODO"), sample_task(2, "b", "DONE")]));
        let tasks = service(repo).get_all_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, Some(1));
        assert_eq!(tasks[1].status.as_deref(), Some("DONE"));
    }

    #[tokio::test]
    async fn test_update_task_preserves_creation_audit() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(sample_task(id, "old title", "TODO"))));
        repo.expect_save()
            .withf(|task| {
                task.title == "new title"
                    && task.created_by == "alice"
                    && task.last_updated_by == SYSTEM_UPDATE
                    && task.created_on <= task.last_updated_on
            })
            .returning(|task| Ok(task));

        let dto = TaskDto {
            title: Some("new title".to_string()),
            // Clients cannot rewrite creation audit fields
            created_by: Some("mallory".to_string()),
            ..Default::default()
        };
        let updated = service(repo).update_task(5, dto).await.unwrap();
        assert_eq!(updated.created_by.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_update_task_blank_status_keeps_existing() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(sample_task(id, "t", "IN_PROGRESS"))));
        repo.expect_save()
            .withf(|task| task.status == "IN_PROGRESS")
            .returning(|task| Ok(task));

        let dto = TaskDto {
            title: Some("t".to_string()),
            status: Some("  ".to_string()),
            ..Default::default()
        };
        let updated = service(repo).update_task(5, dto).await.unwrap();
        assert_eq!(updated.status.as_deref(), Some("IN_PROGRESS"));
    }

    #[tokio::test]
    async fn test_update_task_blank_title_rejected() {
        let dto = TaskDto {
            title: Some("".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service(MockTaskRepository::new()).update_task(5, dto).await,
            Err(TaskError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_task_missing_title_rejected_before_lookup() {
        // No expectations set: a find_by_id call would panic the mock
        let result = service(MockTaskRepository::new())
            .update_task(404, TaskDto::default())
            .await;
        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_task_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let dto = TaskDto {
            title: Some("t".to_string()),
            ..Default::default()
        };
        let result = service(repo).update_task(404, dto).await;
        assert!(matches!(result, Err(TaskError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_update_task_absent_fields_clear_stored_values() {
        let due = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().returning(move |id| {
            let mut task = sample_task(id, "t", "TODO");
            task.due_date = Some(due);
            task.remarks = Some("old remarks".to_string());
            Ok(Some(task))
        });
        repo.expect_save()
            .withf(|task| {
                task.description.is_none() && task.due_date.is_none() && task.remarks.is_none()
            })
            .returning(|task| Ok(task));

        let dto = TaskDto {
            title: Some("t".to_string()),
            ..Default::default()
        };
        let updated = service(repo).update_task(5, dto).await.unwrap();
        assert!(updated.description.is_none());
        assert!(updated.due_date.is_none());
        assert!(updated.remarks.is_none());
    }

    #[tokio::test]
    async fn test_delete_task_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_delete_by_id().returning(|_| Ok(false));
        assert!(matches!(
            service(repo).delete_task(7).await,
            Err(TaskError::NotFound(7))
        ));
    }

    #[tokio::test]
    async fn test_delete_task_ok() {
        let mut repo = MockTaskRepository::new();
        repo.expect_delete_by_id()
            .withf(|id| *id == 7)
            .returning(|_| Ok(true));
        assert!(service(repo).delete_task(7).await.is_ok());
    }

    #[tokio::test]
    async fn test_mark_completed_sets_done_and_audit_label() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(sample_task(id, "keep me", "TODO"))));
        repo.expect_save()
            .withf(|task| {
                task.status == STATUS_DONE
                    && task.last_updated_by == SYSTEM_STATUS_UPDATE
                    && task.title == "keep me"
                    && task.description.as_deref() == Some("desc")
            })
            .returning(|task| Ok(task));

        let dto = service(repo).mark_completed(3).await.unwrap();
        assert_eq!(dto.status.as_deref(), Some(STATUS_DONE));
        assert_eq!(dto.last_updated_by.as_deref(), Some(SYSTEM_STATUS_UPDATE));
    }

    #[tokio::test]
    async fn test_mark_pending_sets_todo() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(sample_task(id, "t", "DONE"))));
        repo.expect_save().returning(|task| Ok(task));

        let dto = service(repo).mark_pending(3).await.unwrap();
        assert_eq!(dto.status.as_deref(), Some(STATUS_TODO));
    }

    #[tokio::test]
    async fn test_mark_completed_not_found() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        assert!(matches!(
            service(repo).mark_completed(1).await,
            Err(TaskError::NotFound(1))
        ));
    }

    #[tokio::test]
    async fn test_search_both_params_uses_combined_query_only() {
        let mut repo = MockTaskRepository::new();
        // Any call to another query method would panic the mock
        repo.expect_find_by_title_and_status()
            .withf(|title, status| title == "foo" && status == "DONE")
            .returning(|_, _| Ok(vec![sample_task(1, "foo", "DONE")]));

        let results = service(repo)
            .search_tasks(Some("foo"), Some("DONE"))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_title_only_stops_at_first_non_empty_stage() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_title()
            .returning(|_| Ok(vec![sample_task(1, "foo bar", "TODO")]));

        let results = service(repo).search_tasks(Some("foo"), None).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_title_falls_through_stages_in_order() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_title().returning(|_| Ok(vec![]));
        repo.expect_search_by_title().returning(|_| Ok(vec![]));
        repo.expect_find_by_title_native()
            .returning(|_| Ok(vec![sample_task(2, "Foo", "TODO")]));

        let results = service(repo).search_tasks(Some("foo"), None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, Some(2));
    }

    #[tokio::test]
    async fn test_search_final_in_process_fallback() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_title().returning(|_| Ok(vec![]));
        repo.expect_search_by_title().returning(|_| Ok(vec![]));
        repo.expect_find_by_title_native().returning(|_| Ok(vec![]));
        repo.expect_find_all().returning(|| {
            Ok(vec![
                sample_task(1, "Foo Bar", "TODO"),
                sample_task(2, "a FOOT note", "TODO"),
                sample_task(3, "xfooY", "DONE"),
                sample_task(4, "unrelated", "TODO"),
            ])
        });

        let results = service(repo).search_tasks(Some("foo"), None).await.unwrap();
        let ids: Vec<_> = results.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_search_status_only_exact_match() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_status()
            .withf(|status| status == "DONE")
            .returning(|_| Ok(vec![sample_task(1, "t", "DONE")]));

        let results = service(repo).search_tasks(None, Some("DONE")).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_no_params_lists_all() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![sample_task(1, "a", "TODO")]));
        let results = service(repo).search_tasks(None, None).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_blank_params_treated_as_absent() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![sample_task(1, "a", "TODO")]));
        let results = service(repo)
            .search_tasks(Some("  "), Some(""))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_swallows_repository_errors() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_title()
            .returning(|_| Err(TaskError::Database("connection reset".to_string())));

        let results = service(repo).search_tasks(Some("foo"), None).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_no_match_returns_empty_not_error() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_title().returning(|_| Ok(vec![]));
        repo.expect_search_by_title().returning(|_| Ok(vec![]));
        repo.expect_find_by_title_native().returning(|_| Ok(vec![]));
        repo.expect_find_all()
            .returning(|| Ok(vec![sample_task(1, "anything", "TODO")]));

        let results = service(repo)
            .search_tasks(Some("zzz-no-match"), None)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_by_keyword_blank_lists_all() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_all()
            .returning(|| Ok(vec![sample_task(1, "a", "TODO")]));
        let results = service(repo).search_by_keyword("   ").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_keyword_delegates_to_title_search() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_title()
            .withf(|title| title == "foo")
            .returning(|_| Ok(vec![sample_task(1, "foo", "TODO")]));
        let results = service(repo).search_by_keyword("foo").await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
