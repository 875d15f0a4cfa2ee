use serde::{Deserialize, Serialize};

/// 课程，依附于教师和学生记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub credits: f32,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

/// 选课记录及成绩
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: String,
    #[serde(default)]
    pub score: Option<f32>,
}

impl Course {
    pub fn score_of(&self, student_id: &str) -> Option<f32> {
        self.enrollments
            .iter()
            .find(|e| e.student_id == student_id)
            .and_then(|e| e.score)
    }
}
