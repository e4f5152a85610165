use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}
