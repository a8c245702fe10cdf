//! Mapping between the wire DTO and the domain entity.
//!
//! Inbound conversion is where creation defaults are resolved: absent or
//! blank audit fields get their system values, so the rest of the crate
//! only ever sees fully-populated tasks.

use crate::models::{
    current_timestamp, NewTask, Task, TaskDto, DEFAULT_CREATED_BY, STATUS_TODO,
};

/// Returns the string if it contains anything besides whitespace.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub fn to_dto(task: Task) -> TaskDto {
    TaskDto {
        id: Some(task.id),
        title: Some(task.title),
        description: task.description,
        due_date: task.due_date,
        status: Some(task.status),
        remarks: task.remarks,
        created_on: Some(task.created_on),
        last_updated_on: Some(task.last_updated_on),
        created_by: Some(task.created_by),
        last_updated_by: Some(task.last_updated_by),
    }
}

/// Builds an insertable task from client input, filling in every default.
///
/// Title is passed through as-is (empty if absent); the service rejects
/// blank titles before anything reaches the store. Both audit timestamps
/// are assigned here, never taken from the client, which keeps
/// `created_on <= last_updated_on` from the first write.
pub fn to_new_task(dto: TaskDto) -> NewTask {
    let now = current_timestamp();
    let created_by =
        non_empty(dto.created_by).unwrap_or_else(|| DEFAULT_CREATED_BY.to_string());
    let last_updated_by = non_empty(dto.last_updated_by).unwrap_or_else(|| created_by.clone());

    NewTask {
        title: dto.title.unwrap_or_default(),
        description: dto.description,
        due_date: dto.due_date,
        status: non_empty(dto.status).unwrap_or_else(|| STATUS_TODO.to_string()),
        remarks: dto.remarks,
        created_on: now,
        last_updated_on: now,
        created_by,
        last_updated_by,
    }
}
