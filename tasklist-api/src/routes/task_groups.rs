/// Task group and task endpoints
///
/// All routes act on the authenticated user's own hierarchy; groups and tasks
/// are addressed by title.
///
/// # Endpoints
///
/// - `GET    /task-groups/` - List groups with their tasks
/// - `POST   /task-groups/:group_name` - Create a group (201)
/// - `GET    /task-groups/:group_name` - Get a group
/// - `PUT    /task-groups/:group_name?new_group_name=` - Rename a group
/// - `DELETE /task-groups/:group_name` - Delete a group
/// - `POST   /task-groups/:group_name/:task_name?description=` - Create a task (201)
/// - `GET    /task-groups/:group_name/:task_name` - Get a task
/// - `DELETE /task-groups/:group_name/:task_name` - Delete a task

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasklist_shared::{
    auth::middleware::CurrentUser,
    models::{Task, TaskGroup},
    tasks::TaskService,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Group without its tasks
#[derive(Debug, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: Uuid,
    pub title: String,
    pub order_num: u32,
}

impl From<&TaskGroup> for GroupSummary {
    fn from(group: &TaskGroup) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
            order_num: group.order_num,
        }
    }
}

/// `?new_group_name=` query
#[derive(Debug, Deserialize)]
pub struct RenameQuery {
    pub new_group_name: String,
}

/// `?description=` query
#[derive(Debug, Deserialize)]
pub struct CreateTaskQuery {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}

pub async fn list_groups(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<TaskGroup>> {
    Json(TaskService::list_groups(&user).to_vec())
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(group_name): Path<String>,
) -> ApiResult<(StatusCode, Json<GroupSummary>)> {
    let group = state.tasks.create_group(&user, &group_name).await?;

    Ok((StatusCode::CREATED, Json(GroupSummary::from(&group))))
}

pub async fn get_group(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(group_name): Path<String>,
) -> ApiResult<Json<TaskGroup>> {
    TaskService::get_group(&user, &group_name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))
}

pub async fn rename_group(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(group_name): Path<String>,
    Query(query): Query<RenameQuery>,
) -> ApiResult<Json<GroupSummary>> {
    let group = state
        .tasks
        .rename_group(&user, &group_name, &query.new_group_name)
        .await?;

    Ok(Json(GroupSummary::from(&group)))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(group_name): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    state.tasks.delete_group(&user, &group_name).await?;

    Ok(Json(DeletedResponse {
        message: "Group deleted",
    }))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((group_name, task_name)): Path<(String, String)>,
    Query(query): Query<CreateTaskQuery>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state
        .tasks
        .create_task(&user, &group_name, &task_name, &query.description)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((group_name, task_name)): Path<(String, String)>,
) -> ApiResult<Json<Task>> {
    let group = TaskService::get_group(&user, &group_name)
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    TaskService::get_task(group, &task_name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((group_name, task_name)): Path<(String, String)>,
) -> ApiResult<Json<DeletedResponse>> {
    state
        .tasks
        .delete_task(&user, &group_name, &task_name)
        .await?;

    Ok(Json(DeletedResponse {
        message: "Task deleted",
    }))
}
