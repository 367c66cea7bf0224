use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 创建作业请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: DateTime<Utc>, // ISO 8601，如 "2026-01-24T12:00:00Z"
    pub weight: i32,
    pub points: i32,
}

impl CreateAssignmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title must not be empty");
        }
        if title.chars().count() > 200 {
            return Err("Title must be at most 200 characters");
        }
        if self.weight < 0 {
            return Err("Weight must not be negative");
        }
        if self.points < 0 {
            return Err("Points must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, weight: i32) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: title.to_string(),
            description: String::new(),
            deadline: Utc::now(),
            weight,
            points: 100,
        }
    }

    #[test]
    fn test_validate() {
        assert!(request("Homework 1", 10).validate().is_ok());
        assert!(request("   ", 10).validate().is_err());
        assert!(request(&"x".repeat(201), 10).validate().is_err());
        assert!(request("Homework 1", -1).validate().is_err());
    }
}
