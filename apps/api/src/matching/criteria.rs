//! Individual scoring criteria.
//!
//! A criterion looks at one aspect of a (candidate, job) pair and reports either
//! `Skipped` (input missing on one side) or a ratio in `[0, 1]`. Weights and the
//! treatment of skipped criteria belong to the `ScoringPolicy`, not to the criterion.

use serde::{Deserialize, Serialize};

use crate::matching::facets::{CandidateFacet, JobFacet, SalaryRange};
use crate::matching::keywords::extract_keywords;

/// Job salary bounds may sit 10% outside the candidate's stated range.
const SALARY_FLOOR: f64 = 0.9;
const SALARY_CEILING: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    // Recruiter-side
    Location,
    ExperienceLevel,
    SkillCoverage,
    BioKeywords,
    // Seeker-side
    SkillOverlap,
    PreferredRole,
    WorkType,
    SalaryRange,
    Availability,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    Skipped,
    Ratio(f64),
}

impl Evaluation {
    fn pass(ok: bool) -> Self {
        Evaluation::Ratio(if ok { 1.0 } else { 0.0 })
    }
}

impl Criterion {
    pub fn evaluate(self, candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
        match self {
            Criterion::Location => location(candidate, job),
            Criterion::ExperienceLevel => experience_level(candidate, job),
            Criterion::SkillCoverage => skill_coverage(candidate, job),
            Criterion::BioKeywords => bio_keywords(candidate, job),
            Criterion::SkillOverlap => skill_overlap(candidate, job),
            Criterion::PreferredRole => preferred_role(candidate, job),
            Criterion::WorkType => work_type(candidate, job),
            Criterion::SalaryRange => salary_range(candidate, job),
            Criterion::Availability => availability(candidate, job),
        }
    }
}

fn normalized(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Blank entries are dropped, so they never count toward a skill denominator.
fn normalized_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| normalized(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Exact = 1.0, containment either way = 0.75, same city before the comma = 0.5.
fn location(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let (Some(c), Some(j)) = (candidate.location.as_deref(), job.location.as_deref()) else {
        return Evaluation::Skipped;
    };
    let (c, j) = (normalized(c), normalized(j));
    if c.is_empty() || j.is_empty() {
        return Evaluation::Skipped;
    }

    let city = |s: &str| s.split(',').next().unwrap_or_default().trim().to_string();

    let ratio = if c == j {
        1.0
    } else if c.contains(&j) || j.contains(&c) {
        0.75
    } else if city(&c) == city(&j) {
        0.5
    } else {
        0.0
    };
    Evaluation::Ratio(ratio)
}

fn experience_level(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let (Some(c), Some(j)) = (candidate.experience_level, job.experience_level) else {
        return Evaluation::Skipped;
    };
    let ratio = match c.distance(j) {
        0 => 1.0,
        1 => 0.8,
        2 => 0.4,
        _ => 0.0,
    };
    Evaluation::Ratio(ratio)
}

/// Share of required skills matched by some candidate skill, substring in either direction.
fn skill_coverage(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let required = normalized_list(&job.required_skills);
    if required.is_empty() {
        return Evaluation::Skipped;
    }
    let owned = normalized_list(&candidate.skills);

    let matched = required
        .iter()
        .filter(|req| {
            owned
                .iter()
                .any(|have| have.contains(req.as_str()) || req.contains(have.as_str()))
        })
        .count();

    Evaluation::Ratio(matched as f64 / required.len() as f64)
}

/// Share of the job's salient keywords that appear in the candidate's bio.
fn bio_keywords(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let Some(bio) = candidate.bio.as_deref() else {
        return Evaluation::Skipped;
    };
    if bio.trim().is_empty() || job.description.trim().is_empty() {
        return Evaluation::Skipped;
    }

    let keywords = extract_keywords(&format!("{} {}", job.description, job.title));
    if keywords.is_empty() {
        return Evaluation::Ratio(0.0);
    }

    let bio = bio.to_lowercase();
    let found = keywords.iter().filter(|kw| bio.contains(kw.as_str())).count();
    Evaluation::Ratio(found as f64 / keywords.len() as f64)
}

fn skill_overlap(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let owned = normalized_list(&candidate.skills);
    let hit = normalized_list(&job.required_skills)
        .iter()
        .any(|req| owned.contains(req));
    Evaluation::pass(hit)
}

fn preferred_role(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let role = candidate.preferred_role.as_deref().map(normalized);
    let title = normalized(&job.title);
    match role {
        Some(role) if !role.is_empty() && !title.is_empty() => {
            Evaluation::pass(title.contains(&role) || role.contains(&title))
        }
        _ => Evaluation::Skipped,
    }
}

fn work_type(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let Some(job_type) = job.work_type.as_deref().map(normalized) else {
        return Evaluation::Skipped;
    };
    let hit = normalized_list(&candidate.work_type)
        .iter()
        .any(|tag| job_type.contains(tag.as_str()));
    Evaluation::pass(hit)
}

fn salary_range(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    let wanted = candidate.salary_range.filter(SalaryRange::is_set);
    let offered = job.salary_range.filter(SalaryRange::is_set);
    let (Some(wanted), Some(offered)) = (wanted, offered) else {
        return Evaluation::Skipped;
    };
    let within = offered.min >= wanted.min * SALARY_FLOOR
        && offered.max <= wanted.max * SALARY_CEILING;
    Evaluation::pass(within)
}

fn availability(candidate: &CandidateFacet, job: &JobFacet) -> Evaluation {
    match (candidate.availability.as_deref(), job.availability.as_deref()) {
        (Some(c), Some(j)) => Evaluation::pass(normalized(c) == normalized(j)),
        _ => Evaluation::Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::facets::ExperienceLevel;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn located(c: Option<&str>, j: Option<&str>) -> Evaluation {
        let candidate = CandidateFacet {
            location: c.map(str::to_string),
            ..Default::default()
        };
        let job = JobFacet {
            location: j.map(str::to_string),
            ..Default::default()
        };
        Criterion::Location.evaluate(&candidate, &job)
    }

    #[test]
    fn test_location_tiers() {
        assert_eq!(located(Some(" Manila"), Some("manila ")), Evaluation::Ratio(1.0));
        assert_eq!(
            located(Some("Makati, Metro Manila"), Some("Metro Manila")),
            Evaluation::Ratio(0.75)
        );
        assert_eq!(
            located(Some("Cebu, Visayas"), Some("Cebu, Philippines")),
            Evaluation::Ratio(0.5)
        );
        assert_eq!(located(Some("Davao"), Some("Cebu")), Evaluation::Ratio(0.0));
    }

    #[test]
    fn test_location_absent_is_skipped() {
        assert_eq!(located(None, Some("Cebu")), Evaluation::Skipped);
        assert_eq!(located(Some("Cebu"), None), Evaluation::Skipped);
    }

    #[test]
    fn test_experience_distance_tiers() {
        let eval = |c: ExperienceLevel, j: ExperienceLevel| {
            let candidate = CandidateFacet {
                experience_level: Some(c),
                ..Default::default()
            };
            let job = JobFacet {
                experience_level: Some(j),
                ..Default::default()
            };
            Criterion::ExperienceLevel.evaluate(&candidate, &job)
        };
        use ExperienceLevel::*;
        assert_eq!(eval(Mid, Mid), Evaluation::Ratio(1.0));
        assert_eq!(eval(Mid, Senior), Evaluation::Ratio(0.8));
        assert_eq!(eval(Junior, Senior), Evaluation::Ratio(0.4));
        assert_eq!(eval(Entry, Lead), Evaluation::Ratio(0.0));
    }

    #[test]
    fn test_skill_coverage_is_bidirectional() {
        let job = JobFacet {
            required_skills: strings(&["js", "TypeScript"]),
            ..Default::default()
        };
        let candidate = CandidateFacet {
            skills: strings(&["JavaScript", "type"]),
            ..Default::default()
        };
        // "js" is not inside "javascript"; "type" is inside "typescript"
        assert_eq!(
            Criterion::SkillCoverage.evaluate(&candidate, &job),
            Evaluation::Ratio(0.5)
        );

        let job = JobFacet {
            required_skills: strings(&["javascript"]),
            ..Default::default()
        };
        let candidate = CandidateFacet {
            skills: strings(&["Java"]),
            ..Default::default()
        };
        assert_eq!(
            Criterion::SkillCoverage.evaluate(&candidate, &job),
            Evaluation::Ratio(1.0)
        );
    }

    #[test]
    fn test_skill_coverage_matches_in_both_directions() {
        let pair = |have: &str, need: &str| {
            let candidate = CandidateFacet {
                skills: strings(&[have]),
                ..Default::default()
            };
            let job = JobFacet {
                required_skills: strings(&[need]),
                ..Default::default()
            };
            Criterion::SkillCoverage.evaluate(&candidate, &job)
        };
        assert_eq!(pair("javascript", "java"), Evaluation::Ratio(1.0));
        assert_eq!(pair("java", "javascript"), Evaluation::Ratio(1.0));
        assert_eq!(pair("vue.js", "js"), Evaluation::Ratio(1.0));
        assert_eq!(pair("js", "vue.js"), Evaluation::Ratio(1.0));
    }

    #[test]
    fn test_skill_coverage_ignores_blank_requirements() {
        let candidate = CandidateFacet {
            skills: strings(&["rust"]),
            ..Default::default()
        };
        let job = JobFacet {
            required_skills: strings(&["Rust", "  ", ""]),
            ..Default::default()
        };
        assert_eq!(
            Criterion::SkillCoverage.evaluate(&candidate, &job),
            Evaluation::Ratio(1.0)
        );

        let only_blanks = JobFacet {
            required_skills: strings(&[" "]),
            ..Default::default()
        };
        assert_eq!(
            Criterion::SkillCoverage.evaluate(&candidate, &only_blanks),
            Evaluation::Skipped
        );
    }

    #[test]
    fn test_skill_coverage_skipped_without_requirements() {
        let candidate = CandidateFacet {
            skills: strings(&["rust"]),
            ..Default::default()
        };
        assert_eq!(
            Criterion::SkillCoverage.evaluate(&candidate, &JobFacet::default()),
            Evaluation::Skipped
        );
    }

    #[test]
    fn test_bio_keywords_ratio() {
        let job = JobFacet {
            title: "Backend Engineer".to_string(),
            description: "We need a senior senior backend engineer with strong backend skills"
                .to_string(),
            ..Default::default()
        };
        let candidate = CandidateFacet {
            bio: Some("Senior developer, backend focus".to_string()),
            ..Default::default()
        };
        // keywords: backend, senior, engineer → 2 of 3 found
        match Criterion::BioKeywords.evaluate(&candidate, &job) {
            Evaluation::Ratio(r) => assert!((r - 2.0 / 3.0).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bio_keywords_without_keywords_scores_zero() {
        let job = JobFacet {
            description: "Unique words only here".to_string(),
            ..Default::default()
        };
        let candidate = CandidateFacet {
            bio: Some("unique words".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Criterion::BioKeywords.evaluate(&candidate, &job),
            Evaluation::Ratio(0.0)
        );
    }

    #[test]
    fn test_bio_keywords_skipped_without_bio() {
        let job = JobFacet {
            description: "rust rust".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Criterion::BioKeywords.evaluate(&CandidateFacet::default(), &job),
            Evaluation::Skipped
        );
    }

    #[test]
    fn test_skill_overlap_requires_exact_member() {
        let candidate = CandidateFacet {
            skills: strings(&["Rust", "Leadership"]),
            ..Default::default()
        };
        let hit = JobFacet {
            required_skills: strings(&["python", "RUST"]),
            ..Default::default()
        };
        let miss = JobFacet {
            required_skills: strings(&["rusty"]),
            ..Default::default()
        };
        assert_eq!(Criterion::SkillOverlap.evaluate(&candidate, &hit), Evaluation::Ratio(1.0));
        assert_eq!(Criterion::SkillOverlap.evaluate(&candidate, &miss), Evaluation::Ratio(0.0));
    }

    #[test]
    fn test_preferred_role_either_direction() {
        let job = JobFacet {
            title: "Senior Backend Engineer".to_string(),
            ..Default::default()
        };
        let narrow = CandidateFacet {
            preferred_role: Some("backend engineer".to_string()),
            ..Default::default()
        };
        assert_eq!(Criterion::PreferredRole.evaluate(&narrow, &job), Evaluation::Ratio(1.0));

        let short_title = JobFacet {
            title: "Engineer".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Criterion::PreferredRole.evaluate(&narrow, &short_title),
            Evaluation::Ratio(1.0)
        );
        assert_eq!(
            Criterion::PreferredRole.evaluate(&CandidateFacet::default(), &job),
            Evaluation::Skipped
        );
    }

    #[test]
    fn test_work_type_tag_substring() {
        let candidate = CandidateFacet {
            work_type: strings(&["Remote", "contract"]),
            ..Default::default()
        };
        let job = JobFacet {
            work_type: Some("Full-time, remote".to_string()),
            ..Default::default()
        };
        assert_eq!(Criterion::WorkType.evaluate(&candidate, &job), Evaluation::Ratio(1.0));
    }

    #[test]
    fn test_salary_within_widened_range() {
        let candidate = CandidateFacet {
            salary_range: Some(SalaryRange { min: 100.0, max: 200.0 }),
            ..Default::default()
        };
        let job = |min: f64, max: f64| JobFacet {
            salary_range: Some(SalaryRange { min, max }),
            ..Default::default()
        };
        assert_eq!(
            Criterion::SalaryRange.evaluate(&candidate, &job(90.0, 220.0)),
            Evaluation::Ratio(1.0)
        );
        assert_eq!(
            Criterion::SalaryRange.evaluate(&candidate, &job(89.0, 150.0)),
            Evaluation::Ratio(0.0)
        );
        assert_eq!(
            Criterion::SalaryRange.evaluate(&candidate, &job(100.0, 221.0)),
            Evaluation::Ratio(0.0)
        );
        assert_eq!(
            Criterion::SalaryRange.evaluate(&CandidateFacet::default(), &job(1.0, 2.0)),
            Evaluation::Skipped
        );
    }

    #[test]
    fn test_salary_with_zero_bound_is_skipped() {
        let range = |min: f64, max: f64| Some(SalaryRange { min, max });
        let candidate = |salary_range: Option<SalaryRange>| CandidateFacet {
            salary_range,
            ..Default::default()
        };
        let job = |salary_range: Option<SalaryRange>| JobFacet {
            salary_range,
            ..Default::default()
        };
        assert_eq!(
            Criterion::SalaryRange.evaluate(&candidate(range(0.0, 100.0)), &job(range(0.0, 50.0))),
            Evaluation::Skipped
        );
        assert_eq!(
            Criterion::SalaryRange.evaluate(&candidate(range(50.0, 100.0)), &job(range(0.0, 90.0))),
            Evaluation::Skipped
        );
        assert_eq!(
            Criterion::SalaryRange.evaluate(&candidate(range(0.0, 100.0)), &job(range(60.0, 90.0))),
            Evaluation::Skipped
        );
    }

    #[test]
    fn test_availability_case_insensitive() {
        let candidate = CandidateFacet {
            availability: Some("Immediate".to_string()),
            ..Default::default()
        };
        let job = JobFacet {
            availability: Some("IMMEDIATE".to_string()),
            ..Default::default()
        };
        assert_eq!(Criterion::Availability.evaluate(&candidate, &job), Evaluation::Ratio(1.0));
    }
}
