use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub storage_path: Option<String>,
    pub analysis_score: Option<i32>,
    pub ats_compatible: Option<bool>,
    pub keywords: Option<Vec<String>>,
    pub missing_keywords: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
    pub improvements: Option<Vec<String>>,
    pub analysis_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Object-storage key of the uploaded file.
    pub fn object_key(&self) -> String {
        match self.storage_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => format!("{}/{}", self.user_id, self.file_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume(storage_path: Option<&str>) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            file_name: "cv.pdf".to_string(),
            storage_path: storage_path.map(str::to_string),
            analysis_score: None,
            ats_compatible: None,
            keywords: None,
            missing_keywords: None,
            strengths: None,
            improvements: None,
            analysis_data: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_object_key_prefers_storage_path() {
        assert_eq!(resume(Some("abc/def.pdf")).object_key(), "abc/def.pdf");
    }

    #[test]
    fn test_object_key_falls_back_to_user_and_file_name() {
        assert_eq!(
            resume(None).object_key(),
            "00000000-0000-0000-0000-000000000000/cv.pdf"
        );
        assert_eq!(
            resume(Some("  ")).object_key(),
            "00000000-0000-0000-0000-000000000000/cv.pdf"
        );
    }
}
