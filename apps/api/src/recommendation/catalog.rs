//! Field catalog: the hand-curated table of candidate fields of study.
//!
//! Adding a field means adding one row to `BUILTIN_FIELDS` (plus, optionally,
//! naming it in a bonus group or in `MATH_SENSITIVE_FIELDS`). The scoring
//! algorithm never changes for that.
//!
//! Note: `DKV/Desain` carries a single token weight and is carried almost
//! entirely by the arts/communication interest bonuses. Whether that is
//! deliberate minimalism or an unfinished mapping is an open question; keep it.

use std::collections::HashSet;

use serde::Serialize;

use crate::recommendation::profile::{Interest, Subject};
use crate::recommendation::RecommendationError;

use crate::recommendation::profile::Subject::{
    Accounting, Biology, Chemistry, Economics, ForeignLanguage, Geography, History,
    Informatics, Mathematics, NativeLanguage, Physics, Sociology,
};

const BUILTIN_FIELDS: &[(&str, &[(Subject, u32)])] = &[
    ("Kedokteran", &[(Biology, 3), (Chemistry, 2), (ForeignLanguage, 1)]),
    ("Farmasi", &[(Chemistry, 3), (Biology, 2), (Mathematics, 1)]),
    ("Keperawatan", &[(Biology, 2), (NativeLanguage, 1), (ForeignLanguage, 1)]),
    (
        "Teknik Informatika / Ilmu Komputer",
        &[(Mathematics, 3), (Informatics, 3), (Physics, 1), (ForeignLanguage, 1)],
    ),
    ("Data Science / AI", &[(Mathematics, 3), (Informatics, 3), (ForeignLanguage, 1)]),
    ("Teknik Sipil", &[(Mathematics, 2), (Physics, 2), (Geography, 1)]),
    (
        "Teknik Lingkungan / HSE",
        &[(Chemistry, 2), (Biology, 1), (Geography, 2), (Physics, 1)],
    ),
    ("Teknik Industri", &[(Mathematics, 2), (Physics, 2), (ForeignLanguage, 1)]),
    ("Arsitektur", &[(Mathematics, 2), (Physics, 1), (NativeLanguage, 1)]),
    ("Perencanaan Wilayah & Kota", &[(Geography, 3), (Mathematics, 1), (History, 1)]),
    ("Manajemen/Marketing", &[(Economics, 2), (NativeLanguage, 1), (ForeignLanguage, 1)]),
    ("Akuntansi/Keuangan", &[(Accounting, 3), (Mathematics, 2), (Economics, 2)]),
    ("Hukum", &[(NativeLanguage, 2), (History, 2), (Sociology, 1)]),
    ("Psikologi", &[(Biology, 1), (Sociology, 2), (Mathematics, 1)]),
    ("Ilmu Komunikasi", &[(NativeLanguage, 2), (ForeignLanguage, 1), (History, 1)]),
    ("HI (Hubungan Internasional)", &[(ForeignLanguage, 2), (History, 2), (Sociology, 1)]),
    ("Sastra/Filologi", &[(NativeLanguage, 2), (ForeignLanguage, 2)]),
    ("DKV/Desain", &[(NativeLanguage, 1)]),
];

/// Interest → fields whose score gets the interest bonus.
///
/// The environment group names "PWK (Perencanaan Wilayah & Kota)", which is not
/// a catalog identifier, so the planning field never receives that bonus.
/// Unknown targets are skipped at scoring time.
const BUILTIN_BONUS_GROUPS: &[(Interest, &[&str])] = &[
    (Interest::Health, &["Kedokteran", "Farmasi", "Keperawatan"]),
    (Interest::Science, &["Farmasi", "Psikologi", "Data Science / AI"]),
    (
        Interest::Technology,
        &["Teknik Informatika / Ilmu Komputer", "Data Science / AI", "Teknik Industri"],
    ),
    (Interest::BusinessManagement, &["Manajemen/Marketing", "Akuntansi/Keuangan"]),
    (
        Interest::SocialHumanities,
        &[
            "Hukum",
            "HI (Hubungan Internasional)",
            "Ilmu Komunikasi",
            "Sastra/Filologi",
            "Psikologi",
        ],
    ),
    (Interest::ArtDesign, &["DKV/Desain", "Arsitektur"]),
    (
        Interest::Environment,
        &["Teknik Lingkungan / HSE", "PWK (Perencanaan Wilayah & Kota)"],
    ),
    (Interest::LawGovernment, &["Hukum", "HI (Hubungan Internasional)"]),
    (Interest::CommunicationMedia, &["Ilmu Komunikasi", "DKV/Desain"]),
];

/// Fields whose score follows the student's comfort with mathematics.
const MATH_SENSITIVE_FIELDS: &[&str] = &[
    "Teknik Informatika / Ilmu Komputer",
    "Data Science / AI",
    "Teknik Sipil",
    "Teknik Industri",
    "Arsitektur",
    "Akuntansi/Keuangan",
];

/// One candidate field of study.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub id: String,
    /// Subjects absent from this table weigh 0.
    pub weights: Vec<(Subject, u32)>,
    pub math_sensitive: bool,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, weights: Vec<(Subject, u32)>, math_sensitive: bool) -> Self {
        Self {
            id: id.into(),
            weights,
            math_sensitive,
        }
    }

    #[cfg(test)]
    pub fn weight(&self, subject: Subject) -> u32 {
        self.weights
            .iter()
            .find(|(s, _)| *s == subject)
            .map(|(_, w)| *w)
            .unwrap_or(0)
    }
}

/// Bonus group: an interest and the field ids it boosts, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusGroup {
    pub interest: Interest,
    pub fields: Vec<String>,
}

/// Immutable catalog, built once at start-up and shared behind an `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldCatalog {
    fields: Vec<FieldDefinition>,
    bonus_groups: Vec<BonusGroup>,
}

impl FieldCatalog {
    /// Validates and builds a catalog. Field order is the ranking tie-break order.
    pub fn new(
        fields: Vec<FieldDefinition>,
        bonus_groups: Vec<BonusGroup>,
    ) -> Result<Self, RecommendationError> {
        if fields.is_empty() {
            return Err(RecommendationError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.id.as_str()) {
                return Err(RecommendationError::DuplicateField(field.id.clone()));
            }
        }
        Ok(Self {
            fields,
            bonus_groups,
        })
    }

    /// The 18-field catalog the advisor ships with, validated like any other.
    pub fn builtin() -> Result<Self, RecommendationError> {
        let fields = BUILTIN_FIELDS
            .iter()
            .map(|(id, weights)| {
                FieldDefinition::new(*id, weights.to_vec(), MATH_SENSITIVE_FIELDS.contains(id))
            })
            .collect();
        let bonus_groups = BUILTIN_BONUS_GROUPS
            .iter()
            .map(|(interest, fields)| BonusGroup {
                interest: *interest,
                fields: fields.iter().map(|f| f.to_string()).collect(),
            })
            .collect();
        Self::new(fields, bonus_groups)
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn bonus_groups(&self) -> &[BonusGroup] {
        &self.bonus_groups
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Field ids boosted by `interest`. Empty when the interest has no group.
    pub fn bonus_targets(&self, interest: Interest) -> impl Iterator<Item = &str> {
        self.bonus_groups
            .iter()
            .filter(move |g| g.interest == interest)
            .flat_map(|g| g.fields.iter().map(String::as_str))
    }

    /// Interests whose bonus group lists `field_id` (once per listing).
    pub fn interests_for(&self, field_id: &str) -> Vec<Interest> {
        self.bonus_groups
            .iter()
            .flat_map(|g| {
                g.fields
                    .iter()
                    .filter(move |f| f.as_str() == field_id)
                    .map(move |_| g.interest)
            })
            .collect()
    }
}
