use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Role;
use crate::routes::user::UserProfile;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}
