use serde::{Deserialize, Serialize};

/// Ping响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: String,
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBackupRequest {
    #[serde(default)]
    pub note: String,
}
