use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

// Distinguishes an absent field (`None`) from an explicit `null`
// (`Some(None)`); pair with `#[serde(default)]`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// Struct representing the request body for creating a new User
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateUserSchema {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
}

// Struct representing the request body for updating a User.
// Absent fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserSchema {
    #[validate(length(min = 3, max = 30))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

// Struct representing the request body for creating a new Todo
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoSchema {
    pub user_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: Option<String>,
}

// Struct representing the request body for updating a Todo.
// `"content": null` clears the content; an absent `content` keeps it.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTodoSchema {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub content: Option<Option<String>>,
}
