use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\+?\s*(?:years?|yrs?)").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceMatch {
    /// Years asked for by the requirements; 0 when none are mentioned.
    pub required: u32,
    /// Largest years figure anywhere in the resume; 0 when none are mentioned.
    pub found: u32,
    pub meets: bool,
}

impl ExperienceMatch {
    /// With no stated requirement the comparison says nothing useful.
    pub fn is_applicable(&self) -> bool {
        self.required > 0
    }
}

fn parse_years(digits: &str) -> u32 {
    // Only overflow can fail here; the capture is all ASCII digits.
    digits.parse().unwrap_or(u32::MAX)
}

/// First "N years" figure in the text.
pub fn required_years(requirements: &str) -> u32 {
    YEARS_RE
        .captures(requirements)
        .and_then(|c| c.get(1))
        .map(|m| parse_years(m.as_str()))
        .unwrap_or(0)
}

/// Largest "N years" figure across all non-overlapping mentions.
pub fn max_years_mentioned(resume: &str) -> u32 {
    YEARS_RE
        .captures_iter(resume)
        .filter_map(|c| c.get(1))
        .map(|m| parse_years(m.as_str()))
        .max()
        .unwrap_or(0)
}

pub fn detect_experience(resume: &str, requirements: &str) -> ExperienceMatch {
    let required = required_years(requirements);
    let found = max_years_mentioned(resume);
    ExperienceMatch {
        required,
        found,
        meets: found >= required,
    }
}
