mod handler;
mod model;

pub use handler::{
    create_backup, get_settings, list_backups, list_logs, ping, restore_backup, update_settings,
};
pub use model::{CreateBackupRequest, LogQuery, PingResponse};
