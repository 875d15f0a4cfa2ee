use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Course, Database, Enrollment, NewUser, Role, Settings, User};

fn seed_user(username: &str, name: &str, role: Role, password: &str, now: DateTime<Utc>) -> User {
    User::new(
        NewUser {
            username: username.to_string(),
            name: name.to_string(),
            role,
            password: password.to_string(),
            email: Some(format!("{username}@school.edu.cn")),
            phone: None,
        },
        now,
    )
}

/// 首次启动或数据损坏时使用的模拟数据
pub fn seed_database(now: DateTime<Utc>) -> Database {
    let admin = seed_user("admin", "系统管理员", Role::Admin, "admin123", now);
    let teacher = seed_user("teacher01", "张老师", Role::Teacher, "123456", now);
    let students = [
        seed_user("student01", "李明", Role::Student, "123456", now),
        seed_user("student02", "王芳", Role::Student, "123456", now),
        seed_user("student03", "赵强", Role::Student, "123456", now),
    ];

    let enroll = |scores: [Option<f32>; 3]| -> Vec<Enrollment> {
        students
            .iter()
            .zip(scores)
            .map(|(s, score)| Enrollment {
                student_id: s.id.clone(),
                score,
            })
            .collect()
    };

    let courses = vec![
        Course {
            id: Uuid::new_v4().to_string(),
            code: "MATH101".to_string(),
            name: "高等数学".to_string(),
            teacher_id: Some(teacher.id.clone()),
            credits: 4.0,
            enrollments: enroll([Some(92.0), Some(78.5), Some(85.0)]),
        },
        Course {
            id: Uuid::new_v4().to_string(),
            code: "ENG101".to_string(),
            name: "大学英语".to_string(),
            teacher_id: Some(teacher.id.clone()),
            credits: 3.0,
            enrollments: enroll([Some(88.0), None, Some(67.0)]),
        },
    ];

    let mut users = vec![admin, teacher];
    users.extend(students);

    Database {
        users,
        courses,
        logs: Vec::new(),
        backups: Vec::new(),
        settings: Settings::default(),
    }
}
