//! Facets: the read-only snapshots of candidate and job fields the scorer looks at.
//!
//! Facets are built fresh per scoring call, either straight from a JSON request body
//! or from database rows (see `from_rows`). Blank strings are treated as absent.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::job::JobRow;
use crate::models::profile::{JobseekerSkillsRow, ProfileRow};

/// Ordered seniority ladder. The discriminant is the ordinal used for distance scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry = 0,
    Junior = 1,
    Mid = 2,
    Senior = 3,
    Lead = 4,
    Executive = 5,
}

impl ExperienceLevel {
    /// Case-insensitive parse. Unrecognized values yield `None` rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "entry" => Some(Self::Entry),
            "junior" => Some(Self::Junior),
            "mid" => Some(Self::Mid),
            "senior" => Some(Self::Senior),
            "lead" => Some(Self::Lead),
            "executive" => Some(Self::Executive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Lead => "lead",
            Self::Executive => "executive",
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn distance(self, other: Self) -> u8 {
        self.ordinal().abs_diff(other.ordinal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    /// Both bounds must be set for a range to exist. A zero bound means "not filled in".
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Self { min, max }).filter(Self::is_set),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        let filled = |bound: f64| bound.is_finite() && bound != 0.0;
        filled(self.min) && filled(self.max)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateFacet {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, deserialize_with = "string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub preferred_role: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub work_type: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobFacet {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, deserialize_with = "string_list")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub work_type: Option<String>,
    #[serde(default)]
    pub salary_range: Option<SalaryRange>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub availability: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Row → facet coercion
// ────────────────────────────────────────────────────────────────────────────

impl CandidateFacet {
    /// Builds a facet from the applicant's profile row (HR ranking view).
    pub fn from_profile(profile: &ProfileRow) -> Self {
        Self {
            location: non_blank(profile.location.as_deref()),
            experience_level: profile
                .experience_level
                .as_deref()
                .and_then(ExperienceLevel::parse),
            skills: clean_list(profile.skills.iter().flatten()),
            bio: non_blank(profile.bio.as_deref()),
            preferred_role: non_blank(profile.preferred_role.as_deref()),
            work_type: clean_list(profile.work_type.iter().flatten()),
            salary_range: SalaryRange::from_bounds(profile.salary_min, profile.salary_max),
            availability: non_blank(profile.availability.as_deref()),
        }
    }

    /// Job-seeker view: skills are the merged technical + soft skills rather than
    /// the profile's own skill list.
    pub fn for_job_seeker(profile: &ProfileRow, seeker: Option<&JobseekerSkillsRow>) -> Self {
        let skills = seeker
            .map(|s| {
                let mut merged = split_list(s.technical_skills.as_deref());
                merged.extend(split_list(s.soft_skills.as_deref()));
                merged
            })
            .unwrap_or_default();

        Self {
            skills,
            ..Self::from_profile(profile)
        }
    }
}

impl JobFacet {
    pub fn from_job(job: &JobRow) -> Self {
        Self {
            title: job.title.clone(),
            location: non_blank(job.location.as_deref()),
            experience_level: job
                .experience_level
                .as_deref()
                .and_then(ExperienceLevel::parse),
            required_skills: clean_list(job.required_skills.iter().flatten()),
            description: job.description.clone().unwrap_or_default(),
            work_type: non_blank(job.work_type.as_deref()),
            salary_range: SalaryRange::from_bounds(job.salary_min, job.salary_max),
            availability: non_blank(job.availability.as_deref()),
        }
    }
}

/// Splits a comma-separated stored list into trimmed, non-empty items.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| clean_list(s.split(','))).unwrap_or_default()
}

fn clean_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient deserializers for request bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<ListOrCsv>::deserialize(d)? {
        Some(ListOrCsv::List(items)) => clean_list(items),
        Some(ListOrCsv::Csv(raw)) => split_list(Some(&raw)),
        None => Vec::new(),
    })
}

fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(non_blank(raw.as_deref()))
}

fn lenient_level<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ExperienceLevel>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().and_then(ExperienceLevel::parse))
}
