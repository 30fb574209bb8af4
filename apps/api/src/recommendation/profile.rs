//! Student profile: the immutable input of the scoring engine.
//!
//! Profiles enter the system through `ProfileForm` (the JSON shape the form
//! collector posts) and are validated into a `StudentProfile`. Every subject
//! always carries a score: unspecified subjects take the slider midpoint.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest score a student can give a subject.
pub const MAX_SUBJECT_SCORE: u8 = 10;
/// Score assumed for a subject the student left untouched.
pub const MIDPOINT_SUBJECT_SCORE: u8 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("score for {subject} must be between 0 and 10, got {value}")]
    ScoreOutOfRange { subject: Subject, value: u8 },

    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Tag enums
// ────────────────────────────────────────────────────────────────────────────

/// High-school subjects used as scoring inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    #[serde(alias = "Matematika")]
    Mathematics,
    #[serde(alias = "Fisika")]
    Physics,
    #[serde(alias = "Kimia")]
    Chemistry,
    #[serde(alias = "Biologi")]
    Biology,
    #[serde(alias = "TIK")]
    Informatics,
    #[serde(alias = "Ekonomi")]
    Economics,
    #[serde(alias = "Akuntansi")]
    Accounting,
    #[serde(alias = "Geografi")]
    Geography,
    #[serde(alias = "Sosiologi")]
    Sociology,
    #[serde(alias = "Sejarah")]
    History,
    #[serde(alias = "B. Indonesia")]
    NativeLanguage,
    #[serde(alias = "B. Inggris")]
    ForeignLanguage,
}

impl Subject {
    /// All subjects in form order.
    pub const ALL: [Subject; 12] = [
        Subject::Mathematics,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::Informatics,
        Subject::Economics,
        Subject::Accounting,
        Subject::Geography,
        Subject::Sociology,
        Subject::History,
        Subject::NativeLanguage,
        Subject::ForeignLanguage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Mathematics => "Matematika",
            Subject::Physics => "Fisika",
            Subject::Chemistry => "Kimia",
            Subject::Biology => "Biologi",
            Subject::Informatics => "TIK",
            Subject::Economics => "Ekonomi",
            Subject::Accounting => "Akuntansi",
            Subject::Geography => "Geografi",
            Subject::Sociology => "Sosiologi",
            Subject::History => "Sejarah",
            Subject::NativeLanguage => "B. Indonesia",
            Subject::ForeignLanguage => "B. Inggris",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interest areas a student can tick. Some of them unlock score bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    Science,
    Technology,
    Health,
    BusinessManagement,
    SocialHumanities,
    LawGovernment,
    ArtDesign,
    Environment,
    CommunicationMedia,
}

impl Interest {
    pub const ALL: [Interest; 9] = [
        Interest::Science,
        Interest::Technology,
        Interest::Health,
        Interest::BusinessManagement,
        Interest::SocialHumanities,
        Interest::LawGovernment,
        Interest::ArtDesign,
        Interest::Environment,
        Interest::CommunicationMedia,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Interest::Science => "science",
            Interest::Technology => "technology",
            Interest::Health => "health",
            Interest::BusinessManagement => "business_management",
            Interest::SocialHumanities => "social_humanities",
            Interest::LawGovernment => "law_government",
            Interest::ArtDesign => "art_design",
            Interest::Environment => "environment",
            Interest::CommunicationMedia => "communication_media",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Interest::Science => "Sains",
            Interest::Technology => "Teknologi",
            Interest::Health => "Kesehatan",
            Interest::BusinessManagement => "Bisnis/Manajemen",
            Interest::SocialHumanities => "Sosial/Humaniora",
            Interest::LawGovernment => "Hukum/Pemerintahan",
            Interest::ArtDesign => "Seni/Desain",
            Interest::Environment => "Lingkungan",
            Interest::CommunicationMedia => "Komunikasi/Media",
        }
    }

    /// Parses either the snake_case key or the display label, ignoring case.
    pub fn parse(raw: &str) -> Option<Interest> {
        let raw = raw.trim();
        Interest::ALL
            .into_iter()
            .find(|i| raw.eq_ignore_ascii_case(i.key()) || raw.eq_ignore_ascii_case(i.label()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    #[serde(alias = "Visual")]
    Visual,
    #[serde(alias = "Auditori")]
    Auditory,
    #[serde(alias = "Kinestetik")]
    Kinesthetic,
    #[serde(alias = "Kolaboratif")]
    Collaborative,
    #[serde(alias = "Mandiri")]
    Independent,
}

impl LearningStyle {
    pub fn label(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::Auditory => "Auditori",
            LearningStyle::Kinesthetic => "Kinestetik",
            LearningStyle::Collaborative => "Kolaboratif",
            LearningStyle::Independent => "Mandiri",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    #[default]
    X,
    XI,
    XII,
}

impl GradeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            GradeLevel::X => "X",
            GradeLevel::XI => "XI",
            GradeLevel::XII => "XII",
        }
    }
}

/// How comfortable the student is with mathematics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathComfort {
    #[serde(alias = "Rendah")]
    Low,
    #[default]
    #[serde(alias = "Sedang")]
    Medium,
    #[serde(alias = "Tinggi")]
    High,
}

impl MathComfort {
    pub fn label(&self) -> &'static str {
        match self {
            MathComfort::Low => "Rendah",
            MathComfort::Medium => "Sedang",
            MathComfort::High => "Tinggi",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Subject scores
// ────────────────────────────────────────────────────────────────────────────

/// Subject → self-reported strength (0–10).
///
/// The map itself may be sparse; the scoring engine reads an absent subject as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectScores(BTreeMap<Subject, u8>);

impl SubjectScores {
    /// An empty (sparse) score map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subject set to `value`.
    pub fn uniform(value: u8) -> Self {
        Self(Subject::ALL.iter().map(|s| (*s, value)).collect())
    }

    pub fn with(mut self, subject: Subject, value: u8) -> Self {
        self.0.insert(subject, value);
        self
    }

    pub fn get(&self, subject: Subject) -> Option<u8> {
        self.0.get(&subject).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, u8)> + '_ {
        self.0.iter().map(|(s, v)| (*s, *v))
    }

    fn validate(&self) -> Result<(), ProfileError> {
        match self.iter().find(|(_, v)| *v > MAX_SUBJECT_SCORE) {
            Some((subject, value)) => Err(ProfileError::ScoreOutOfRange { subject, value }),
            None => Ok(()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StudentProfile
// ────────────────────────────────────────────────────────────────────────────

/// Validated, immutable student profile. Build it with [`StudentProfile::builder`]
/// or from a [`ProfileForm`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentProfile {
    name: Option<String>,
    grade: GradeLevel,
    learning_styles: Vec<LearningStyle>,
    interests: Vec<Interest>,
    math_comfort: MathComfort,
    scores: SubjectScores,
}

impl StudentProfile {
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder::default()
    }

    #[cfg(test)]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[cfg(test)]
    pub fn grade(&self) -> GradeLevel {
        self.grade
    }

    /// In the order the student picked them, without repeats.
    #[cfg(test)]
    pub fn learning_styles(&self) -> &[LearningStyle] {
        &self.learning_styles
    }

    /// In the order the student picked them, without repeats.
    pub fn interests(&self) -> &[Interest] {
        &self.interests
    }

    pub fn math_comfort(&self) -> MathComfort {
        self.math_comfort
    }

    pub fn scores(&self) -> &SubjectScores {
        &self.scores
    }

    /// Human-readable profile text handed to the advisor and indexed for retrieval.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        if let Some(name) = &self.name {
            lines.push(format!("Nama: {name}"));
        }
        lines.push(format!("Kelas: {}", self.grade.label()));
        lines.push(format!(
            "Gaya belajar: {}",
            join_or_dash(self.learning_styles.iter().map(|s| s.label()))
        ));
        lines.push(format!(
            "Minat: {}",
            join_or_dash(self.interests.iter().map(|i| i.label()))
        ));
        lines.push(format!("Kenyamanan Matematika: {}", self.math_comfort.label()));
        let scores: Vec<String> = Subject::ALL
            .iter()
            .filter_map(|s| self.scores.get(*s).map(|v| format!("{} {v}/10", s.label())))
            .collect();
        lines.push(format!("Skor Mapel: {}", scores.join(", ")));
        lines.join("\n")
    }
}

fn join_or_dash<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<&str> = items.collect();
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    name: Option<String>,
    grade: GradeLevel,
    learning_styles: Vec<LearningStyle>,
    interests: Vec<Interest>,
    math_comfort: MathComfort,
    scores: SubjectScores,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self {
            name: None,
            grade: GradeLevel::default(),
            learning_styles: Vec::new(),
            interests: Vec::new(),
            math_comfort: MathComfort::default(),
            scores: SubjectScores::uniform(MIDPOINT_SUBJECT_SCORE),
        }
    }
}

impl ProfileBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn grade(mut self, grade: GradeLevel) -> Self {
        self.grade = grade;
        self
    }

    /// Repeats are ignored; the first pick keeps its position.
    pub fn learning_style(mut self, style: LearningStyle) -> Self {
        push_unique(&mut self.learning_styles, style);
        self
    }

    /// Repeats are ignored; the first pick keeps its position.
    pub fn interest(mut self, interest: Interest) -> Self {
        push_unique(&mut self.interests, interest);
        self
    }

    pub fn math_comfort(mut self, comfort: MathComfort) -> Self {
        self.math_comfort = comfort;
        self
    }

    pub fn score(mut self, subject: Subject, value: u8) -> Self {
        self.scores = self.scores.with(subject, value);
        self
    }

    /// Replaces the whole score map, gaps included.
    pub fn scores(mut self, scores: SubjectScores) -> Self {
        self.scores = scores;
        self
    }

    pub fn build(self) -> Result<StudentProfile, ProfileError> {
        self.scores.validate()?;
        Ok(StudentProfile {
            name: self.name,
            grade: self.grade,
            learning_styles: self.learning_styles,
            interests: self.interests,
            math_comfort: self.math_comfort,
            scores: self.scores,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Form boundary
// ────────────────────────────────────────────────────────────────────────────

/// Raw profile as posted by the form collector.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub grade: GradeLevel,
    #[serde(default)]
    pub learning_styles: Vec<LearningStyle>,
    /// Free strings: unknown tags are dropped, not rejected.
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub math_comfort: MathComfort,
    #[serde(default)]
    pub scores: BTreeMap<Subject, u8>,
}

/// A validated profile plus the interest tags that were not recognised.
#[derive(Debug, Clone)]
pub struct ParsedProfile {
    pub profile: StudentProfile,
    pub ignored_interests: Vec<String>,
}

impl ProfileForm {
    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(raw).map_err(|e| ProfileError::InvalidProfile(e.to_string()))
    }

    pub fn parse(self) -> Result<ParsedProfile, ProfileError> {
        let mut builder = StudentProfile::builder()
            .grade(self.grade)
            .math_comfort(self.math_comfort);
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        for style in self.learning_styles {
            builder = builder.learning_style(style);
        }

        let mut ignored_interests = Vec::new();
        for raw in self.interests {
            match Interest::parse(&raw) {
                Some(interest) => builder = builder.interest(interest),
                None => ignored_interests.push(raw),
            }
        }

        for (subject, value) in self.scores {
            builder = builder.score(subject, value);
        }

        Ok(ParsedProfile {
            profile: builder.build()?,
            ignored_interests,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fills_every_subject_with_midpoint() {
        let profile = StudentProfile::builder().build().unwrap();
        for subject in Subject::ALL {
            assert_eq!(profile.scores().get(subject), Some(MIDPOINT_SUBJECT_SCORE));
        }
        assert_eq!(profile.math_comfort(), MathComfort::Medium);
        assert_eq!(profile.grade(), GradeLevel::X);
    }

    #[test]
    fn test_score_above_ten_is_rejected() {
        let err = StudentProfile::builder()
            .score(Subject::Physics, 11)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ProfileError::ScoreOutOfRange {
                subject: Subject::Physics,
                value: 11
            }
        );
    }

    #[test]
    fn test_blank_name_is_dropped() {
        let profile = StudentProfile::builder().name("   ").build().unwrap();
        assert_eq!(profile.name(), None);
    }

    #[test]
    fn test_interest_parse_accepts_key_and_label() {
        assert_eq!(Interest::parse("technology"), Some(Interest::Technology));
        assert_eq!(Interest::parse("Bisnis/Manajemen"), Some(Interest::BusinessManagement));
        assert_eq!(Interest::parse(" sosial/humaniora "), Some(Interest::SocialHumanities));
        assert_eq!(Interest::parse("Olahraga"), None);
    }

    #[test]
    fn test_form_accepts_labels_and_collects_unknown_interests() {
        let form = ProfileForm::from_json(
            r#"{
                "name": "Sari",
                "grade": "XI",
                "learning_styles": ["Visual", "independent"],
                "interests": ["Teknologi", "Olahraga"],
                "math_comfort": "Tinggi",
                "scores": {"Matematika": 9, "informatics": 8}
            }"#,
        )
        .unwrap();
        let parsed = form.parse().unwrap();
        let p = &parsed.profile;

        assert_eq!(p.name(), Some("Sari"));
        assert_eq!(p.grade(), GradeLevel::XI);
        assert_eq!(p.math_comfort(), MathComfort::High);
        assert!(p.interests().contains(&Interest::Technology));
        assert_eq!(p.interests().len(), 1);
        assert_eq!(parsed.ignored_interests, vec!["Olahraga".to_string()]);
        assert_eq!(p.scores().get(Subject::Mathematics), Some(9));
        assert_eq!(p.scores().get(Subject::Informatics), Some(8));
        assert_eq!(p.scores().get(Subject::History), Some(MIDPOINT_SUBJECT_SCORE));
    }

    #[test]
    fn test_form_with_bad_json_is_invalid_profile() {
        let err = ProfileForm::from_json("{not json").unwrap_err();
        assert!(matches!(err, ProfileError::InvalidProfile(_)));
    }

    #[test]
    fn test_summary_lists_all_parts() {
        let profile = StudentProfile::builder()
            .name("Budi")
            .grade(GradeLevel::XII)
            .interest(Interest::Health)
            .math_comfort(MathComfort::Low)
            .score(Subject::Biology, 9)
            .build()
            .unwrap();
        let summary = profile.summary();

        assert!(summary.starts_with("Nama: Budi\nKelas: XII\n"));
        assert!(summary.contains("Gaya belajar: -"));
        assert!(summary.contains("Minat: Kesehatan"));
        assert!(summary.contains("Kenyamanan Matematika: Rendah"));
        assert!(summary.contains("Skor Mapel: Matematika 5/10, Fisika 5/10"));
        assert!(summary.contains("Biologi 9/10"));
        assert!(summary.ends_with("B. Inggris 5/10"));
    }

    #[test]
    fn test_summary_without_name_starts_with_grade() {
        let profile = StudentProfile::builder().build().unwrap();
        assert!(profile.summary().starts_with("Kelas: X\n"));
    }

    #[test]
    fn test_summary_keeps_selection_order_and_drops_repeats() {
        let form = ProfileForm::from_json(
            r#"{
                "learning_styles": ["independent", "Visual", "independent"],
                "interests": ["Seni/Desain", "Teknologi", "Kesehatan", "Teknologi"]
            }"#,
        )
        .unwrap();
        let profile = form.parse().unwrap().profile;

        assert_eq!(
            profile.interests(),
            &[Interest::ArtDesign, Interest::Technology, Interest::Health]
        );
        assert_eq!(profile.learning_styles().len(), 2);

        let summary = profile.summary();
        assert!(summary.contains("Minat: Seni/Desain, Teknologi, Kesehatan\n"));
        let independent = summary.find(LearningStyle::Independent.label()).unwrap();
        let visual = summary.find(LearningStyle::Visual.label()).unwrap();
        assert!(independent < visual);
    }
}
