//! Skill catalog and pattern matcher.
//!
//! The catalog is a fixed, ordered list of regex fragments grouped by category.
//! It is compiled once at startup and handed to the scorer; matching never
//! mutates it. Output order always follows catalog order, not text order.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    Languages,
    WebTechnologies,
    Databases,
    CloudDevOps,
    FrameworksTools,
    SoftSkills,
    OtherTech,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 7] = [
        SkillCategory::Languages,
        SkillCategory::WebTechnologies,
        SkillCategory::Databases,
        SkillCategory::CloudDevOps,
        SkillCategory::FrameworksTools,
        SkillCategory::SoftSkills,
        SkillCategory::OtherTech,
    ];
}

/// Catalog source: (category, regex fragments). Order is significant.
const CATALOG: &[(SkillCategory, &[&str])] = &[
    (
        SkillCategory::Languages,
        &[
            "javascript", "python", "java", r"c\+\+", "c#", "php", "ruby", "swift", "kotlin",
            "typescript", "go", "rust", "scala", "perl", "r", "matlab", "sql",
        ],
    ),
    (
        SkillCategory::WebTechnologies,
        &[
            "html", "css", "react", "angular", "vue", r"node\.?js", "express", "django", "flask",
            "spring", "laravel", "jquery", "bootstrap", "tailwind", "sass", "webpack",
        ],
    ),
    (
        SkillCategory::Databases,
        &[
            "mysql", "postgresql", "mongodb", "redis", "oracle", r"sql\s?server", "dynamodb",
            "cassandra", "elasticsearch", "firebase",
        ],
    ),
    (
        SkillCategory::CloudDevOps,
        &[
            "aws", "azure", "gcp", r"google\s?cloud", "docker", "kubernetes", "jenkins",
            "terraform", "ansible", "gitlab", "github", "bitbucket", "ci/cd",
        ],
    ),
    (
        SkillCategory::FrameworksTools,
        &[
            "git", "linux", "unix", "agile", "scrum", "jira", "rest", "api", "graphql",
            "microservices", "webpack", "babel", "jest", "junit", "selenium",
        ],
    ),
    (
        SkillCategory::SoftSkills,
        &[
            "leadership", "management", "communication", "teamwork", r"problem\s?solving",
            "analytical", "creative", r"detail\s?oriented", r"time\s?management",
        ],
    ),
    (
        SkillCategory::OtherTech,
        &[
            r"machine\s?learning", r"artificial\s?intelligence", r"data\s?science", "blockchain",
            "iot", "cybersecurity", "networking", "mobile", "android", "ios",
        ],
    ),
];

/// Chars that may not sit directly before or after a skill for it to count as a whole word.
/// `+` and `#` are deliberately absent so `c++` and `c#` close cleanly.
const WORD_CHARS: &str = "a-z0-9_";

#[derive(Debug, Clone)]
pub struct SkillPattern {
    pub category: SkillCategory,
    regex: Regex,
}

impl SkillPattern {
    fn compile(category: SkillCategory, fragment: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(
            r"(?i)(?:^|[^{WORD_CHARS}])({fragment})(?:[^{WORD_CHARS}]|$)"
        ))?;
        Ok(Self { category, regex })
    }

    /// First whole-word occurrence in `lower_text`, whitespace-collapsed.
    fn find(&self, lower_text: &str) -> Option<String> {
        let captures = self.regex.captures(lower_text)?;
        let raw = captures.get(1)?.as_str();
        Some(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Distinct skill names in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn push_unique(&mut self, skill: String) {
        if !self.contains(&skill) {
            self.0.push(skill);
        }
    }
}

/// Immutable, compiled skill catalog.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    patterns: Vec<SkillPattern>,
}

impl SkillCatalog {
    /// Compiles the built-in catalog.
    pub fn builtin() -> Result<Self, regex::Error> {
        let patterns = CATALOG
            .iter()
            .flat_map(|(category, fragments)| fragments.iter().map(move |f| (*category, *f)))
            .map(|(category, fragment)| SkillPattern::compile(category, fragment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns_in(&self, category: SkillCategory) -> impl Iterator<Item = &SkillPattern> {
        self.patterns.iter().filter(move |p| p.category == category)
    }

    /// Every catalog pattern is tested independently, so overlapping entries
    /// (`java` / `javascript`, `sql` / `sql server`) can all fire on one text.
    pub fn extract_skills(&self, text: &str) -> SkillSet {
        let lower = text.to_lowercase();
        let mut found = SkillSet::default();
        for pattern in &self.patterns {
            if let Some(skill) = pattern.find(&lower) {
                found.push_unique(skill);
            }
        }
        found
    }
}
