use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

// Data model representing a registered user
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Data model representing a Todo item owned by a user
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user serialized together with every todo it owns.
#[derive(Debug, Serialize)]
pub struct UserWithTodos {
    #[serde(flatten)]
    pub user: User,
    pub todos: Vec<Todo>,
}

impl UserWithTodos {
    /// Attach to each user the todos whose `user_id` matches, keeping the
    /// order of both inputs.
    pub fn group(users: Vec<User>, todos: Vec<Todo>) -> Vec<UserWithTodos> {
        let mut grouped: Vec<UserWithTodos> = users
            .into_iter()
            .map(|user| UserWithTodos {
                user,
                todos: Vec::new(),
            })
            .collect();

        let index: HashMap<i64, usize> = grouped
            .iter()
            .enumerate()
            .map(|(i, u)| (u.user.id, i))
            .collect();

        for todo in todos {
            if let Some(&i) = index.get(&todo.user_id) {
                grouped[i].todos.push(todo);
            }
        }

        grouped
    }
}
