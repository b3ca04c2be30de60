use serde::{Deserialize, Serialize};

use crate::matching::criteria::Criterion;

/// Whether a skipped criterion still counts toward the possible-points total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// Skipped criteria earn 0 but their weight stays in the denominator.
    AlwaysCount,
    /// Skipped criteria are dropped from both earned and possible.
    SkipIfMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedCriterion {
    pub criterion: Criterion,
    pub weight: u32,
}

const fn weighted(criterion: Criterion, weight: u32) -> WeightedCriterion {
    WeightedCriterion { criterion, weight }
}

/// Recruiter rubric: 100 possible points over four categories.
pub const RECRUITER_CRITERIA: &[WeightedCriterion] = &[
    weighted(Criterion::Location, 20),
    weighted(Criterion::ExperienceLevel, 25),
    weighted(Criterion::SkillCoverage, 35),
    weighted(Criterion::BioKeywords, 20),
];

/// Seeker rubric: five yes/no checks of one point each.
pub const JOB_SEEKER_CRITERIA: &[WeightedCriterion] = &[
    weighted(Criterion::SkillOverlap, 1),
    weighted(Criterion::PreferredRole, 1),
    weighted(Criterion::WorkType, 1),
    weighted(Criterion::SalaryRange, 1),
    weighted(Criterion::Availability, 1),
];

/// A rubric: which criteria run, how much each is worth, and how skips are counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub criteria: Vec<WeightedCriterion>,
    pub denominator: DenominatorPolicy,
}

impl ScoringPolicy {
    /// HR candidate ranking. Criteria lacking input on either side are left out.
    pub fn recruiter() -> Self {
        Self {
            criteria: RECRUITER_CRITERIA.to_vec(),
            denominator: DenominatorPolicy::SkipIfMissing,
        }
    }

    /// Job-seeker job matching. Every criterion counts, so the denominator is always 5.
    pub fn job_seeker() -> Self {
        Self {
            criteria: JOB_SEEKER_CRITERIA.to_vec(),
            denominator: DenominatorPolicy::AlwaysCount,
        }
    }

    pub fn max_points(&self) -> u32 {
        self.criteria.iter().map(|c| c.weight).sum()
    }
}
