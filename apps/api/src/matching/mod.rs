// Candidate/job match scoring.
// One scorer, two rubrics: recruiters rank applicants, job seekers rank postings.
// Scoring is pure; loading rows and HTTP live in `ranking` and `handlers`.

pub mod criteria;
pub mod facets;
pub mod handlers;
pub mod keywords;
pub mod policy;
pub mod ranking;
pub mod scorer;
