//! 从 CSV 批量导入用户
//!
//! 列按位置映射：用户名, 姓名, 角色, 邮箱, 电话, 密码

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::auth::credentials::{CredentialError, create_user};
use crate::csv::{CsvTable, encode_line};
use crate::models::{Database, LogAction, NewUser, Role};

pub const TEMPLATE_HEADERS: [&str; 6] = ["用户名", "姓名", "角色", "邮箱", "电话", "密码"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("the file has no header row")]
    MissingHeader,
    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("the file has no data rows")]
    NoRows,
}

/// 被跳过的行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
    /// 按表头展开的原始字段，便于定位
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

/// 导入模板内容：表头加一行示例
pub fn template() -> String {
    let sample = ["student01", "张三", "学生", "zhangsan@example.com", "13800000000", ""];
    format!("{}\n{}\n", encode_line(&TEMPLATE_HEADERS), encode_line(&sample))
}

/// 至少需要用户名、姓名、角色三列
const REQUIRED_COLUMNS: usize = 3;

fn column(fields: &[String], index: usize) -> Option<String> {
    fields
        .get(index)
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}

/// 逐行导入，单行失败不影响其他行
pub fn import_users(
    db: &mut Database,
    text: &str,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<ImportReport, ImportError> {
    let table = CsvTable::parse(text);
    if table.headers.is_empty() {
        return Err(ImportError::MissingHeader);
    }
    if table.headers.len() < REQUIRED_COLUMNS {
        return Err(ImportError::TooFewColumns {
            expected: REQUIRED_COLUMNS,
            found: table.headers.len(),
        });
    }
    if table.rows.is_empty() {
        return Err(ImportError::NoRows);
    }

    let mut report = ImportReport::default();
    for (line, fields) in &table.rows {
        let skip = |reason: String| SkippedRow {
            line: *line,
            reason,
            fields: table.record(fields),
        };

        let (Some(username), Some(name), Some(role_label)) =
            (column(fields, 0), column(fields, 1), column(fields, 2))
        else {
            report.skipped.push(skip("用户名、姓名和角色不能为空".into()));
            continue;
        };

        let role = match role_label.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                report.skipped.push(skip(format!("角色无效: {}", e.0)));
                continue;
            }
        };

        let req = NewUser {
            username,
            name,
            role,
            password: column(fields, 5).unwrap_or_else(|| db.settings.default_password.clone()),
            email: column(fields, 3),
            phone: column(fields, 4),
        };

        match create_user(db, req, actor, now) {
            Ok(_) => report.imported += 1,
            Err(CredentialError::Duplicate { username, role }) => {
                report
                    .skipped
                    .push(skip(format!("{}已存在: {}", role.label(), username)));
            }
            Err(e) => report.skipped.push(skip(e.to_string())),
        }
    }

    tracing::info!(
        "Imported {} users, skipped {} rows",
        report.imported,
        report.skipped.len()
    );
    db.append_log(
        actor,
        LogAction::UsersImported,
        format!("导入 {} 个用户，跳过 {} 行", report.imported, report.skipped.len()),
    );
    Ok(report)
}
