//! MatchScorer: stateless 0–100 compatibility score between a candidate and a job.
//!
//! Algorithm:
//! 1. Evaluate each criterion of the policy independently → skipped or ratio.
//! 2. earned += round(weight × ratio); possible += weight
//!    (skipped criteria add to `possible` only under `AlwaysCount`).
//! 3. percent = round(100 × earned / possible), clamped to 0–100; 0 if nothing is possible.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::criteria::{Criterion, Evaluation};
use crate::matching::facets::{CandidateFacet, JobFacet};
use crate::matching::policy::{DenominatorPolicy, ScoringPolicy};

/// Points earned by one criterion, kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub earned: u32,
    pub possible: u32,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub percent: u32, // 0 – 100
    pub earned: u32,
    pub possible: u32,
    pub breakdown: Vec<CriterionScore>,
}

#[derive(Debug, Clone)]
pub struct MatchScorer {
    policy: ScoringPolicy,
}

impl MatchScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn recruiter() -> Self {
        Self::new(ScoringPolicy::recruiter())
    }

    pub fn job_seeker() -> Self {
        Self::new(ScoringPolicy::job_seeker())
    }

    /// Pure and total: missing inputs degrade to skipped or zero, never to an error.
    pub fn score(&self, candidate: &CandidateFacet, job: &JobFacet) -> ScoreResult {
        let mut earned = 0_u32;
        let mut possible = 0_u32;
        let mut breakdown = Vec::with_capacity(self.policy.criteria.len());

        for weighted in &self.policy.criteria {
            let entry = match weighted.criterion.evaluate(candidate, job) {
                Evaluation::Ratio(ratio) => CriterionScore {
                    criterion: weighted.criterion,
                    earned: points(weighted.weight, ratio),
                    possible: weighted.weight,
                    skipped: false,
                },
                Evaluation::Skipped => CriterionScore {
                    criterion: weighted.criterion,
                    earned: 0,
                    possible: match self.policy.denominator {
                        DenominatorPolicy::AlwaysCount => weighted.weight,
                        DenominatorPolicy::SkipIfMissing => 0,
                    },
                    skipped: true,
                },
            };
            earned += entry.earned;
            possible += entry.possible;
            breakdown.push(entry);
        }

        let percent = if possible > 0 {
            ((earned as f64 / possible as f64) * 100.0)
                .round()
                .clamp(0.0, 100.0) as u32
        } else {
            0
        };

        debug!(
            "match score {percent}% ({earned}/{possible} of rubric max {})",
            self.policy.max_points()
        );

        ScoreResult {
            percent,
            earned,
            possible,
            breakdown,
        }
    }
}

fn points(weight: u32, ratio: f64) -> u32 {
    (ratio.clamp(0.0, 1.0) * weight as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::facets::{ExperienceLevel, SalaryRange};
    use crate::matching::policy::WeightedCriterion;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn breakdown_for(result: &ScoreResult, criterion: Criterion) -> &CriterionScore {
        result
            .breakdown
            .iter()
            .find(|c| c.criterion == criterion)
            .unwrap()
    }

    /// Five repeated job keywords, three of which the bio mentions.
    fn full_match_pair() -> (CandidateFacet, JobFacet) {
        let candidate = CandidateFacet {
            location: Some("Manila".to_string()),
            experience_level: Some(ExperienceLevel::Mid),
            skills: strings(&["Rust", "PostgreSQL"]),
            bio: Some("Rust developer shipping payments APIs on cloud infrastructure".to_string()),
            ..Default::default()
        };
        let job = JobFacet {
            title: "Payments Engineer".to_string(),
            location: Some("Manila".to_string()),
            experience_level: Some(ExperienceLevel::Mid),
            required_skills: strings(&["rust", "postgresql"]),
            description: "rust rust payments payments cloud cloud kafka kafka docker docker"
                .to_string(),
            ..Default::default()
        };
        (candidate, job)
    }

    #[test]
    fn test_recruiter_full_scenario_scores_92() {
        let (candidate, job) = full_match_pair();
        let result = MatchScorer::recruiter().score(&candidate, &job);

        assert_eq!(breakdown_for(&result, Criterion::Location).earned, 20);
        assert_eq!(breakdown_for(&result, Criterion::ExperienceLevel).earned, 25);
        assert_eq!(breakdown_for(&result, Criterion::SkillCoverage).earned, 35);
        // 3 of 5 keywords → round(20 × 0.6) = 12
        assert_eq!(breakdown_for(&result, Criterion::BioKeywords).earned, 12);
        assert_eq!(result.earned, 92);
        assert_eq!(result.possible, 100);
        assert_eq!(result.percent, 92);
    }

    #[test]
    fn test_recruiter_absent_location_excluded_from_denominator() {
        let (mut candidate, job) = full_match_pair();
        candidate.location = None;
        let result = MatchScorer::recruiter().score(&candidate, &job);

        let location = breakdown_for(&result, Criterion::Location);
        assert!(location.skipped);
        assert_eq!(location.possible, 0);
        assert_eq!(result.possible, 80);
        // 72 / 80 = 90%
        assert_eq!(result.percent, 90);
    }

    #[test]
    fn test_recruiter_everything_skipped_scores_zero() {
        let candidate = CandidateFacet::default();
        let job = JobFacet {
            title: "Ops".to_string(),
            location: Some("Cebu".to_string()),
            ..Default::default()
        };
        let result = MatchScorer::recruiter().score(&candidate, &job);
        assert_eq!(result.possible, 0);
        assert_eq!(result.percent, 0);
        assert!(result.breakdown.iter().all(|c| c.skipped));
    }

    #[test]
    fn test_recruiter_only_experience_evaluable() {
        let candidate = CandidateFacet {
            experience_level: Some(ExperienceLevel::Junior),
            ..Default::default()
        };
        let job = JobFacet {
            experience_level: Some(ExperienceLevel::Senior),
            ..Default::default()
        };
        let result = MatchScorer::recruiter().score(&candidate, &job);
        assert_eq!(result.possible, 25);
        assert_eq!(result.earned, 10);
        assert_eq!(result.percent, 40);
    }

    #[test]
    fn test_recruiter_skill_points_are_rounded() {
        let candidate = CandidateFacet {
            skills: strings(&["go"]),
            ..Default::default()
        };
        let job = JobFacet {
            required_skills: strings(&["go", "rust", "sql"]),
            ..Default::default()
        };
        let result = MatchScorer::recruiter().score(&candidate, &job);
        // round(35 / 3) = 12 of 35 → 34%
        assert_eq!(result.earned, 12);
        assert_eq!(result.percent, 34);
    }

    #[test]
    fn test_job_seeker_two_of_five_is_40() {
        let candidate = CandidateFacet {
            skills: strings(&["rust", "teamwork"]),
            availability: Some("Immediate".to_string()),
            ..Default::default()
        };
        let job = JobFacet {
            title: "Backend Engineer".to_string(),
            required_skills: strings(&["Rust"]),
            work_type: Some("Onsite".to_string()),
            salary_range: Some(SalaryRange {
                min: 1000.0,
                max: 2000.0,
            }),
            availability: Some("immediate".to_string()),
            ..Default::default()
        };
        let result = MatchScorer::job_seeker().score(&candidate, &job);
        assert_eq!(result.earned, 2);
        assert_eq!(result.possible, 5);
        assert_eq!(result.percent, 40);
    }

    #[test]
    fn test_job_seeker_empty_profile_still_divides_by_five() {
        let job = JobFacet {
            title: "Anything".to_string(),
            ..Default::default()
        };
        let result = MatchScorer::job_seeker().score(&CandidateFacet::default(), &job);
        assert_eq!(result.percent, 0);
        assert_eq!(result.possible, 5);
        assert_eq!(result.breakdown.len(), 5);
    }

    #[test]
    fn test_job_seeker_full_match_is_100() {
        let candidate = CandidateFacet {
            skills: strings(&["rust"]),
            preferred_role: Some("engineer".to_string()),
            work_type: strings(&["remote"]),
            salary_range: Some(SalaryRange {
                min: 100.0,
                max: 200.0,
            }),
            availability: Some("2 weeks".to_string()),
            ..Default::default()
        };
        let job = JobFacet {
            title: "Rust Engineer".to_string(),
            required_skills: strings(&["rust"]),
            work_type: Some("Remote".to_string()),
            salary_range: Some(SalaryRange {
                min: 120.0,
                max: 180.0,
            }),
            availability: Some("2 Weeks".to_string()),
            ..Default::default()
        };
        assert_eq!(MatchScorer::job_seeker().score(&candidate, &job).percent, 100);
    }

    #[test]
    fn test_job_seeker_zero_salary_bound_earns_nothing() {
        let candidate = CandidateFacet {
            salary_range: Some(SalaryRange { min: 0.0, max: 100.0 }),
            ..Default::default()
        };
        let job = JobFacet {
            title: "Support".to_string(),
            salary_range: Some(SalaryRange { min: 0.0, max: 50.0 }),
            ..Default::default()
        };
        let result = MatchScorer::job_seeker().score(&candidate, &job);
        assert!(breakdown_for(&result, Criterion::SalaryRange).skipped);
        assert_eq!(result.earned, 0);
        assert_eq!(result.percent, 0);
    }

    #[test]
    fn test_custom_policy_switches_denominator() {
        let policy = ScoringPolicy {
            criteria: vec![WeightedCriterion {
                criterion: Criterion::Location,
                weight: 10,
            }],
            denominator: DenominatorPolicy::AlwaysCount,
        };
        let result = MatchScorer::new(policy).score(&CandidateFacet::default(), &JobFacet::default());
        assert_eq!(result.possible, 10);
        assert_eq!(result.percent, 0);
    }

    #[test]
    fn test_score_is_deterministic_and_bounded() {
        let (candidate, job) = full_match_pair();
        for scorer in [MatchScorer::recruiter(), MatchScorer::job_seeker()] {
            let first = scorer.score(&candidate, &job);
            let second = scorer.score(&candidate, &job);
            assert_eq!(first, second);
            assert!(first.percent <= 100);
        }
    }
}
