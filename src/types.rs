use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Speaker name used when a dialogue line carries no `character` field.
pub const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

fn null_as_unknown<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(unknown))
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Keeps the integer entries of a line list; `"2"`, `null` and the like cite nothing.
fn integer_entries<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<i64>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(raw.iter().filter_map(Value::as_i64).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    #[serde(rename = "character", default = "unknown", deserialize_with = "null_as_unknown")]
    pub speaker: String,
    #[serde(rename = "dialogue", default, deserialize_with = "null_as_empty")]
    pub utterance: String,
}

impl DialogueLine {
    pub fn new(speaker: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self { speaker: speaker.into(), utterance: utterance.into() }
    }
}

/// One contiguous scene. Identified by its position in the dialogue file.
pub type Interaction = Vec<DialogueLine>;

/// Closed evidence-strength vocabulary.
///
/// Generated records say `Explicit`, ground truth says `Definitive` for the
/// same thing. Each side is parsed against its own vocabulary only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceStrength {
    Explicit,
    Implied,
}

impl EvidenceStrength {
    pub const ALL: [EvidenceStrength; 2] = [EvidenceStrength::Explicit, EvidenceStrength::Implied];

    /// Label as produced by the generation service.
    pub fn generated_label(self) -> &'static str {
        match self {
            EvidenceStrength::Explicit => "Explicit",
            EvidenceStrength::Implied => "Implied",
        }
    }

    /// Label as written in ground-truth files.
    pub fn ground_truth_label(self) -> &'static str {
        match self {
            EvidenceStrength::Explicit => "Definitive",
            EvidenceStrength::Implied => "Implied",
        }
    }

    /// Case-insensitive; a ground-truth word such as `Definitive` is `None`.
    pub fn from_generated(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.generated_label().eq_ignore_ascii_case(label))
    }

    /// Case-insensitive; a generated word such as `Explicit` is `None`.
    pub fn from_ground_truth(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.ground_truth_label().eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(default, deserialize_with = "integer_entries")]
    pub line_indices: Vec<i64>,
    /// Derived from `line_indices`; never trusted when it comes from the service.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relationship: String,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnnotationRecord {
    /// Sentinel written when a response could not be turned into a record.
    pub fn placeholder(reason: impl Into<String>) -> Self {
        Self { relationship: UNKNOWN.to_string(), evidence: Vec::new(), error: Some(reason.into()) }
    }

    /// Unique line indices cited across all evidence items.
    pub fn cited_lines(&self) -> BTreeSet<i64> {
        self.evidence.iter().flat_map(|e| e.line_indices.iter().copied()).collect()
    }
}

/// Interaction id (stringified index) -> record, as stored on disk.
pub type RecordSet = BTreeMap<String, AnnotationRecord>;

/// Converts a file's records one by one. Ids whose record does not fit the
/// shape are returned separately instead of failing the whole set.
pub fn records_from_values(raw: BTreeMap<String, Value>) -> (RecordSet, Vec<String>) {
    let mut records = RecordSet::new();
    let mut rejected = Vec::new();
    for (id, value) in raw {
        match serde_json::from_value::<AnnotationRecord>(value) {
            Ok(record) => {
                records.insert(id, record);
            }
            Err(_) => rejected.push(id),
        }
    }
    (records, rejected)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeClass {
    Toddler,
    Child,
    Adolescent,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeClass {
    pub const ALL: [AgeClass; 6] = [
        AgeClass::Toddler,
        AgeClass::Child,
        AgeClass::Adolescent,
        AgeClass::YoungAdult,
        AgeClass::Adult,
        AgeClass::Senior,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeClass::Toddler => "Toddler",
            AgeClass::Child => "Child",
            AgeClass::Adolescent => "Adolescent",
            AgeClass::YoungAdult => "Young Adult",
            AgeClass::Adult => "Adult",
            AgeClass::Senior => "Senior",
        }
    }

    pub fn range(self) -> &'static str {
        match self {
            AgeClass::Toddler => "1-3",
            AgeClass::Child => "4-12",
            AgeClass::Adolescent => "13-19",
            AgeClass::YoungAdult => "20-35",
            AgeClass::Adult => "36-65",
            AgeClass::Senior => "65+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SexClass {
    Male,
    Female,
}

impl SexClass {
    pub const ALL: [SexClass; 2] = [SexClass::Male, SexClass::Female];

    pub fn label(self) -> &'static str {
        match self {
            SexClass::Male => "Male",
            SexClass::Female => "Female",
        }
    }
}

/// Which participant an age/sex entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CharSlot {
    First,
    Second,
}

/// One age/sex entry. On disk the name sits under `char1` for the first
/// participant and `char2` for the second; exactly one of the two is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char2: Option<String>,
    #[serde(default = "unknown")]
    pub age: String,
    #[serde(default = "unknown")]
    pub sex: String,
}

impl DemographicEntry {
    pub fn new(slot: CharSlot, name: impl Into<String>, age: impl Into<String>, sex: impl Into<String>) -> Self {
        let name = Some(name.into());
        let (char1, char2) = match slot {
            CharSlot::First => (name, None),
            CharSlot::Second => (None, name),
        };
        Self { char1, char2, age: age.into(), sex: sex.into() }
    }

    pub fn slot(&self) -> Option<CharSlot> {
        match (&self.char1, &self.char2) {
            (Some(_), _) => Some(CharSlot::First),
            (None, Some(_)) => Some(CharSlot::Second),
            (None, None) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.char1.as_deref().or(self.char2.as_deref())
    }
}
