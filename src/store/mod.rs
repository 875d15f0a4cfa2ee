//! 单个 JSON 文档充当数据库
//!
//! 所有修改都在同一把互斥锁内完成，并在释放锁之前写回磁盘。

mod seed;

use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Backup, BackupSnapshot, BackupSummary, Database, LogAction};

pub use seed::seed_database;

/// 最多保留的备份数量
pub const MAX_BACKUPS: usize = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize database: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("backup {0} not found")]
    BackupNotFound(String),
}

pub struct Store {
    path: Option<PathBuf>,
    db: Mutex<Database>,
}

impl Store {
    /// 读取数据文件；文件不存在或无法解析时用模拟数据重建
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let db = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<Database>(&text) {
                Ok(db) => {
                    tracing::info!("Loaded {} users from {}", db.users.len(), path.display());
                    Some(db)
                }
                Err(e) => {
                    tracing::warn!("Data file {} is corrupt, reseeding: {}", path.display(), e);
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No data file at {}, seeding", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read {}, reseeding: {}", path.display(), e);
                None
            }
        };

        let store = Self {
            path: Some(path),
            db: Mutex::new(Database::default()),
        };

        match db {
            Some(db) => *store.db.lock().await = db,
            None => {
                let mut guard = store.db.lock().await;
                *guard = seed_database(Utc::now());
                store.persist(&guard).await?;
            }
        }

        Ok(store)
    }

    /// 不落盘的存储，用于测试
    pub fn in_memory(db: Database) -> Self {
        Self {
            path: None,
            db: Mutex::new(db),
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&Database) -> R) -> R {
        let guard = self.db.lock().await;
        f(&guard)
    }

    /// 在副本上修改并写回，写入成功后才替换内存中的文档
    pub async fn update<R>(&self, f: impl FnOnce(&mut Database) -> R) -> Result<R, StoreError> {
        let mut guard = self.db.lock().await;
        let mut next = guard.clone();
        let result = f(&mut next);
        self.persist(&next).await?;
        *guard = next;
        Ok(result)
    }

    async fn persist(&self, db: &Database) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(db)?;
        let tmp = path.with_extension("json.tmp");
        let write_err = |source: std::io::Error| StoreError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(&tmp, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(write_err)?;
        Ok(())
    }

    pub async fn create_backup(&self, actor: &str, note: &str) -> Result<BackupSummary, StoreError> {
        self.update(|db| {
            let backup = Backup {
                id: Uuid::new_v4().to_string(),
                created_at: Utc::now(),
                created_by: actor.to_string(),
                note: note.to_string(),
                snapshot: BackupSnapshot {
                    users: db.users.clone(),
                    courses: db.courses.clone(),
                    settings: db.settings.clone(),
                },
            };
            let summary = BackupSummary::from(&backup);

            db.backups.push(backup);
            if db.backups.len() > MAX_BACKUPS {
                let overflow = db.backups.len() - MAX_BACKUPS;
                db.backups.drain(..overflow);
            }
            db.append_log(actor, LogAction::BackupCreated, format!("创建备份 {}", summary.id));
            summary
        })
        .await
    }

    pub async fn list_backups(&self) -> Vec<BackupSummary> {
        self.read(|db| db.backups.iter().rev().map(BackupSummary::from).collect())
            .await
    }

    /// 用备份替换用户、课程和设置；日志和备份列表保留
    pub async fn restore_backup(&self, backup_id: &str, actor: &str) -> Result<(), StoreError> {
        self.update(|db| {
            let snapshot = db
                .backups
                .iter()
                .find(|b| b.id == backup_id)
                .map(|b| b.snapshot.clone())
                .ok_or_else(|| StoreError::BackupNotFound(backup_id.to_string()))?;

            db.users = snapshot.users;
            db.courses = snapshot.courses;
            db.settings = snapshot.settings;
            db.append_log(actor, LogAction::BackupRestored, format!("恢复备份 {backup_id}"));
            Ok::<(), StoreError>(())
        })
        .await??;

        tracing::info!("Restored backup {}", backup_id);
        Ok(())
    }
}
