//! Resume Analysis: pluggable, trait-based AI review of an uploaded resume.
//!
//! Default: `GeminiResumeAnalyzer`. `AppState` holds an `Arc<dyn ResumeAnalyzer>`.

pub mod extract;
pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{ANALYSIS_FILE_PROMPT, ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::gemini_client::{GeminiClient, Part};

/// What the analyzer reads: extracted text, or the raw file for formats without a text layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeDocument {
    Text(String),
    Inline {
        mime_type: &'static str,
        data: Bytes,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatedSkill {
    pub name: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillInventory {
    #[serde(default)]
    pub technical: Vec<RatedSkill>,
    #[serde(default)]
    pub soft: Vec<RatedSkill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceQuality {
    pub score: u8, // 0 – 100
    pub feedback: String,
}

/// Normalized analysis, the shape persisted and returned to clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8, // 0 – 100
    pub ats_compatible: bool,
    pub keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub grammar_issues: Vec<String>,
    pub formatting_issues: Vec<String>,
    pub skills: SkillInventory,
    pub experience_quality: ExperienceQuality,
}

/// What the model actually sends back; every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnalysis {
    pub score: Option<f64>,
    pub ats_compatible: Option<bool>,
    pub keywords: Option<Vec<String>>,
    pub missing_keywords: Option<Vec<String>>,
    pub strengths: Option<Vec<String>>,
    pub improvements: Option<Vec<String>>,
    pub grammar_issues: Option<Vec<String>>,
    pub formatting_issues: Option<Vec<String>>,
    pub skills: Option<SkillInventory>,
    pub experience_quality: Option<RawExperienceQuality>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawExperienceQuality {
    pub score: Option<f64>,
    pub feedback: Option<String>,
}

fn percent(raw: Option<f64>) -> u8 {
    raw.filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

impl RawAnalysis {
    /// Fills gaps with empty values and clamps scores to 0–100.
    pub fn normalize(self) -> AnalysisResult {
        let experience = self.experience_quality.unwrap_or_default();
        AnalysisResult {
            score: percent(self.score),
            ats_compatible: self.ats_compatible.unwrap_or(false),
            keywords: self.keywords.unwrap_or_default(),
            missing_keywords: self.missing_keywords.unwrap_or_default(),
            strengths: self.strengths.unwrap_or_default(),
            improvements: self.improvements.unwrap_or_default(),
            grammar_issues: self.grammar_issues.unwrap_or_default(),
            formatting_issues: self.formatting_issues.unwrap_or_default(),
            skills: self.skills.unwrap_or_default(),
            experience_quality: ExperienceQuality {
                score: percent(experience.score),
                feedback: experience.feedback.unwrap_or_default(),
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap the analysis backend without touching handlers.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, document: &ResumeDocument) -> Result<AnalysisResult, AppError>;

    /// Short label reported to clients ("gemini", ...).
    fn backend(&self) -> &'static str;
}

pub struct GeminiResumeAnalyzer(pub GeminiClient);

#[async_trait]
impl ResumeAnalyzer for GeminiResumeAnalyzer {
    async fn analyze(&self, document: &ResumeDocument) -> Result<AnalysisResult, AppError> {
        let reply = match document {
            ResumeDocument::Text(resume_text) => {
                let prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
                self.0
                    .call_json::<RawAnalysis>(&[Part::text(&prompt)], ANALYSIS_SYSTEM)
                    .await
            }
            ResumeDocument::Inline { mime_type, data } => {
                info!("Sending {mime_type} resume inline ({} bytes)", data.len());
                let parts = [Part::text(ANALYSIS_FILE_PROMPT), Part::inline(mime_type, data)];
                self.0.call_json::<RawAnalysis>(&parts, ANALYSIS_SYSTEM).await
            }
        };
        let raw = reply.map_err(|e| AppError::Analysis(format!("Resume analysis failed: {e}")))?;

        let analysis = raw.normalize();
        info!(
            "Resume analyzed: score={}, ats_compatible={}",
            analysis.score, analysis.ats_compatible
        );
        Ok(analysis)
    }

    fn backend(&self) -> &'static str {
        "gemini"
    }
}
