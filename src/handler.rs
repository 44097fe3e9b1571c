use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use sqlx::{query, query_as};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::{IdParam, JsonBody},
    model::{Todo, User, UserWithTodos},
    schema::{CreateTodoSchema, CreateUserSchema, UpdateTodoSchema, UpdateUserSchema},
    AppState,
};

const USER_COLUMNS: &str = "id, username, email, created_at, updated_at";
const TODO_COLUMNS: &str = "id, title, content, user_id, created_at, updated_at";

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "Users and todos CRUD API with Rust, SQLx, SQLite, and Axum";

    Json(json!({
        "status": "success",
        "message": MESSAGE
    }))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

// Handler for listing every user together with its todos
pub async fn get_users(State(data): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let users = query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(&data.db)
        .await?;
    let todos = query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id"))
        .fetch_all(&data.db)
        .await?;

    Ok(Json(json!({ "data": UserWithTodos::group(users, todos) })))
}

// Handler for getting a specific User by ID
pub async fn get_user(
    IdParam(id): IdParam,
    State(data): State<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
    let user = find_user(&data, id).await?.ok_or(AppError::NotFound("User"))?;

    Ok(Json(json!({ "data": user })))
}

// Handler for creating a new User
pub async fn create_user(
    State(data): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CreateUserSchema>,
) -> AppResult<impl IntoResponse> {
    body.validate().map_err(|errors| AppError::Validation {
        message: "Invalid user data",
        errors,
    })?;

    let now = Utc::now();
    let user = query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, created_at, updated_at) VALUES (?, ?, ?, ?) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&body.username)
    .bind(&body.email)
    .bind(now)
    .bind(now)
    .fetch_one(&data.db)
    .await
    .map_err(user_conflict)?;

    tracing::info!(user_id = user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(json!({ "data": user }))))
}

// Handler for updating a User by ID
pub async fn update_user(
    IdParam(id): IdParam,
    State(data): State<Arc<AppState>>,
    JsonBody(body): JsonBody<UpdateUserSchema>,
) -> AppResult<impl IntoResponse> {
    body.validate().map_err(|errors| AppError::Validation {
        message: "Invalid user data",
        errors,
    })?;

    let user = query_as::<_, User>(&format!(
        "UPDATE users SET username = COALESCE(?, username), email = COALESCE(?, email), \
         updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
    ))
    .bind(body.username)
    .bind(body.email)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&data.db)
    .await
    .map_err(user_conflict)?
    .ok_or(AppError::NotFound("User"))?;

    Ok(Json(json!({ "data": user })))
}

// Handler for deleting a User, together with its todos, by ID
pub async fn delete_user(
    IdParam(id): IdParam,
    State(data): State<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
    let mut tx = data.db.begin().await?;

    let todos_removed = query("DELETE FROM todos WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let rows_affected = query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        // Dropping the transaction rolls it back.
        return Err(AppError::NotFound("User"));
    }
    tx.commit().await?;

    tracing::info!(user_id = id, todos_removed, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

// Handler for creating a new Todo for an existing user
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CreateTodoSchema>,
) -> AppResult<impl IntoResponse> {
    body.validate().map_err(|errors| AppError::Validation {
        message: "Invalid todo data",
        errors,
    })?;

    if find_user(&data, body.user_id).await?.is_none() {
        return Err(AppError::NotFound("User"));
    }

    let now = Utc::now();
    let todo = query_as::<_, Todo>(&format!(
        "INSERT INTO todos (title, content, user_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING {TODO_COLUMNS}"
    ))
    .bind(&body.title)
    .bind(&body.content)
    .bind(body.user_id)
    .bind(now)
    .bind(now)
    .fetch_one(&data.db)
    .await?;

    tracing::info!(todo_id = todo.id, user_id = todo.user_id, "todo created");
    Ok((StatusCode::CREATED, Json(json!({ "data": todo }))))
}

// Handler for getting all Todo items
pub async fn get_todos(State(data): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let todos = query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id"))
        .fetch_all(&data.db)
        .await?;

    Ok(Json(json!({ "data": todos })))
}

// Handler for getting the todos of one user; the path segment is a user ID
pub async fn get_todos_by_user(
    IdParam(user_id): IdParam,
    State(data): State<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
    if find_user(&data, user_id).await?.is_none() {
        return Err(AppError::NotFound("User"));
    }

    let todos = query_as::<_, Todo>(&format!(
        "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = ? ORDER BY id"
    ))
    .bind(user_id)
    .fetch_all(&data.db)
    .await?;

    Ok(Json(json!({ "data": { "todos": todos } })))
}

// Handler for updating a Todo by ID
pub async fn update_todo(
    IdParam(id): IdParam,
    State(data): State<Arc<AppState>>,
    JsonBody(body): JsonBody<UpdateTodoSchema>,
) -> AppResult<impl IntoResponse> {
    body.validate().map_err(|errors| AppError::Validation {
        message: "Invalid todo data",
        errors,
    })?;

    // `content: null` clears the column; a missing key leaves it untouched.
    let content_given = body.content.is_some();
    let todo = query_as::<_, Todo>(&format!(
        "UPDATE todos SET title = COALESCE(?, title), \
         content = CASE WHEN ? THEN ? ELSE content END, \
         updated_at = ? WHERE id = ? RETURNING {TODO_COLUMNS}"
    ))
    .bind(body.title)
    .bind(content_given)
    .bind(body.content.flatten())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&data.db)
    .await?
    .ok_or(AppError::NotFound("Todo"))?;

    Ok(Json(json!({ "data": todo })))
}

// Handler for deleting a Todo by ID
pub async fn delete_todo(
    IdParam(id): IdParam,
    State(data): State<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
    let rows_affected = query("DELETE FROM todos WHERE id = ?")
        .bind(id)
        .execute(&data.db)
        .await?
        .rows_affected();
    if rows_affected == 0 {
        return Err(AppError::NotFound("Todo"));
    }

    tracing::info!(todo_id = id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_user(data: &AppState, id: i64) -> Result<Option<User>, sqlx::Error> {
    query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(&data.db)
        .await
}

fn user_conflict(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Username or email already in use".to_string())
        }
        _ => AppError::Database(err),
    }
}
