//! Match scoring — combines keyword overlap, skill overlap and an experience
//! check into a single report.
//!
//! Default: `KeywordMatchScorer` (pure, deterministic, no I/O).
//! `AppState` holds an `Arc<dyn MatchScorer>` so handlers never name a backend.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::experience::{detect_experience, ExperienceMatch};
use crate::analysis::keywords::extract_keywords;
use crate::analysis::skills::SkillCatalog;

const MATCHED_KEYWORDS_CAP: usize = 20;
const MISSING_KEYWORDS_CAP: usize = 10;
const KEYWORD_WEIGHT: f64 = 0.4;
const SKILL_WEIGHT: f64 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Matched/missing tally for one dimension (keywords or skills).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTally {
    pub total: usize,
    pub matched: usize,
    pub missing: usize,
    pub matched_list: Vec<String>,
    pub missing_list: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    #[serde(rename = "Excellent Match")]
    Excellent,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Moderate Match")]
    Moderate,
    #[serde(rename = "Low Match")]
    Low,
}

impl MatchTier {
    /// Thresholds are inclusive: exactly 80 is Excellent.
    pub fn for_score(score: u32) -> Self {
        match score {
            80.. => MatchTier::Excellent,
            60..=79 => MatchTier::Good,
            40..=59 => MatchTier::Moderate,
            _ => MatchTier::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::Excellent => "Excellent Match",
            MatchTier::Good => "Good Match",
            MatchTier::Moderate => "Moderate Match",
            MatchTier::Low => "Low Match",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MatchTier::Excellent => {
                "Your resume is a strong match for this position. You should definitely apply!"
            }
            MatchTier::Good => {
                "Your resume shows good alignment. Consider emphasizing relevant skills more."
            }
            MatchTier::Moderate => {
                "Your resume has some relevant experience. Add more matching keywords and skills."
            }
            MatchTier::Low => {
                "Your resume needs significant updates to match this position better."
            }
        }
    }

    /// Display color (hex).
    pub fn color(self) -> &'static str {
        match self {
            MatchTier::Excellent => "#22c55e",
            MatchTier::Good => "#3b82f6",
            MatchTier::Moderate => "#f59e0b",
            MatchTier::Low => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub level: MatchTier,
    pub message: String,
    pub color: String,
}

impl From<MatchTier> for Recommendation {
    fn from(tier: MatchTier) -> Self {
        Self {
            level: tier,
            message: tier.message().to_string(),
            color: tier.color().to_string(),
        }
    }
}

/// Full analysis returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub overall_score: u32, // 0 – 100
    pub keyword_score: u32,
    pub skill_score: u32,
    pub keyword_matches: MatchTally,
    pub skill_matches: MatchTally,
    /// Informational only; not part of `overall_score`.
    pub experience_match: ExperienceMatch,
    pub recommendation: Recommendation,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the handler.
pub trait MatchScorer: Send + Sync {
    fn score(&self, resume_text: &str, requirements_text: &str) -> MatchResult;
}

/// Catalog-driven keyword and skill overlap scorer.
pub struct KeywordMatchScorer {
    catalog: SkillCatalog,
}

impl KeywordMatchScorer {
    pub fn new(catalog: SkillCatalog) -> Self {
        Self { catalog }
    }
}

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, resume_text: &str, requirements_text: &str) -> MatchResult {
        calculate_match_score(&self.catalog, resume_text, requirements_text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Splits `required` into matched/missing by membership, keeping requirement order.
fn tally<'a>(
    required: impl Iterator<Item = &'a str>,
    is_present: impl Fn(&str) -> bool,
    matched_cap: usize,
    missing_cap: usize,
) -> MatchTally {
    let mut tally = MatchTally {
        total: 0,
        matched: 0,
        missing: 0,
        matched_list: Vec::new(),
        missing_list: Vec::new(),
    };

    for item in required {
        tally.total += 1;
        if is_present(item) {
            tally.matched += 1;
            if tally.matched_list.len() < matched_cap {
                tally.matched_list.push(item.to_string());
            }
        } else {
            tally.missing += 1;
            if tally.missing_list.len() < missing_cap {
                tally.missing_list.push(item.to_string());
            }
        }
    }
    tally
}

/// Percentage of matched items, rounded half-up. Zero when nothing was required.
fn percentage(tally: &MatchTally) -> u32 {
    if tally.total == 0 {
        return 0;
    }
    ((tally.matched as f64 / tally.total as f64) * 100.0).round() as u32
}

fn overall_score(keyword_score: u32, skill_score: u32) -> u32 {
    (keyword_score as f64 * KEYWORD_WEIGHT + skill_score as f64 * SKILL_WEIGHT).round() as u32
}

pub fn calculate_match_score(
    catalog: &SkillCatalog,
    resume_text: &str,
    requirements_text: &str,
) -> MatchResult {
    let resume_keywords = extract_keywords(resume_text);
    let requirement_keywords = extract_keywords(requirements_text);

    let resume_skills = catalog.extract_skills(resume_text);
    let requirement_skills = catalog.extract_skills(requirements_text);
    debug!(
        resume_keywords = resume_keywords.len(),
        requirement_keywords = requirement_keywords.len(),
        resume_skills = resume_skills.len(),
        requirement_skills = requirement_skills.len(),
        "Extracted features"
    );
    if requirement_keywords.is_empty() && requirement_skills.is_empty() {
        debug!("Requirements contain no keywords or skills; scores will be 0");
    }

    let keyword_matches = tally(
        requirement_keywords.iter(),
        |k| resume_keywords.contains(k),
        MATCHED_KEYWORDS_CAP,
        MISSING_KEYWORDS_CAP,
    );
    let skill_matches = tally(
        requirement_skills.iter(),
        |s| resume_skills.contains(s),
        usize::MAX,
        usize::MAX,
    );

    let keyword_score = percentage(&keyword_matches);
    let skill_score = percentage(&skill_matches);
    let overall_score = overall_score(keyword_score, skill_score);

    MatchResult {
        overall_score,
        keyword_score,
        skill_score,
        keyword_matches,
        skill_matches,
        experience_match: detect_experience(resume_text, requirements_text),
        recommendation: MatchTier::for_score(overall_score).into(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
