use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub weight: i32,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// 截止时间已过（严格早于 now）
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now
    }

    pub fn is_due(&self) -> bool {
        self.is_due_at(Utc::now())
    }
}
