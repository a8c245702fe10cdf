use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter,
    Statement,
};
use tracing::{debug, info, instrument};

use crate::entity;
use crate::error::TaskResult;
use crate::models::{NewTask, Task};
use crate::repository::TaskRepository;

/// Postgres-backed task repository.
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    #[instrument(skip(self, task), fields(title = %task.title))]
    async fn insert(&self, task: NewTask) -> TaskResult<Task> {
        let model = entity::ActiveModel::from(task).insert(&self.db).await?;
        info!(id = model.id, "task inserted");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_all(&self) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, task), fields(id = task.id))]
    async fn save(&self, task: Task) -> TaskResult<Task> {
        let model = entity::ActiveModel::from(task).update(&self.db).await?;
        info!(id = model.id, "task updated");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> TaskResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(id, rows = result.rows_affected, "task delete attempted");
        Ok(result.rows_affected > 0)
    }

    async fn find_by_title(&self, title: &str) -> TaskResult<Vec<Task>> {
        debug!(title, "title search, ILIKE stage");
        let models = entity::Entity::find()
            .filter(Expr::col(entity::Column::Title).ilike(contains_pattern(title)))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn search_by_title(&self, title: &str) -> TaskResult<Vec<Task>> {
        debug!(title, "title search, lowered LIKE stage");
        let pattern = contains_pattern(&title.to_lowercase());
        let models = entity::Entity::find()
            .filter(Func::lower(Expr::col(entity::Column::Title)).like(pattern))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_title_native(&self, title: &str) -> TaskResult<Vec<Task>> {
        debug!(title, "title search, native SQL stage");
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT * FROM tasks WHERE LOWER(title) LIKE LOWER($1)",
            [contains_pattern(title).into()],
        );
        let models = entity::Entity::find().from_raw_sql(stmt).all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_status(&self, status: &str) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Status.eq(status))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_title_and_status(&self, title: &str, status: &str) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(Expr::col(entity::Column::Title).ilike(contains_pattern(title)))
            .filter(entity::Column::Status.eq(status))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("foo_bar"), "foo\\_bar");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_contains_pattern_wraps_with_wildcards() {
        assert_eq!(contains_pattern("report"), "%report%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
    }
}
