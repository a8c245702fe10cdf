use sea_orm::entity::prelude::*;

use crate::models::{NewTask, Task};

/// Row mapping for the `tasks` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime>,
    pub status: String,
    pub remarks: Option<String>,
    pub created_on: DateTime,
    pub last_updated_on: DateTime,
    pub created_by: String,
    pub last_updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            status: model.status,
            remarks: model.remarks,
            created_on: model.created_on,
            last_updated_on: model.last_updated_on,
            created_by: model.created_by,
            last_updated_by: model.last_updated_by,
        }
    }
}

impl From<NewTask> for ActiveModel {
    fn from(task: NewTask) -> Self {
        use sea_orm::ActiveValue::{NotSet, Set};
        Self {
            id: NotSet,
            title: Set(task.title),
            description: Set(task.description),
            due_date: Set(task.due_date),
            status: Set(task.status),
            remarks: Set(task.remarks),
            created_on: Set(task.created_on),
            last_updated_on: Set(task.last_updated_on),
            created_by: Set(task.created_by),
            last_updated_by: Set(task.last_updated_by),
        }
    }
}

impl From<Task> for ActiveModel {
    fn from(task: Task) -> Self {
        use sea_orm::ActiveValue::Set;
        Self {
            id: Set(task.id),
            title: Set(task.title),
            description: Set(task.description),
            due_date: Set(task.due_date),
            status: Set(task.status),
            remarks: Set(task.remarks),
            created_on: Set(task.created_on),
            last_updated_on: Set(task.last_updated_on),
            created_by: Set(task.created_by),
            last_updated_by: Set(task.last_updated_by),
        }
    }
}
