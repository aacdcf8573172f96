use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Value of `metadata.source` stamped on every converted record.
pub const SOURCE: &str = "source-benchmark";

const ARITHMETIC_KEYWORDS: &[&str] = &[
    "+", "-", "×", "*", "/", "÷", "percent", "percentage", "sum", "total", "average",
];
const TEMPORAL_KEYWORDS: &[&str] = &[
    "day", "month", "year", "hour", "minute", "second", "date", "time", "age", "born", "old",
];
const LOGICAL_KEYWORDS: &[&str] = &[
    "if", "then", "and", "or", "not", "all", "some", "none", "implies", "therefore",
];
const SPATIAL_KEYWORDS: &[&str] = &[
    "square", "circle", "triangle", "perimeter", "area", "volume", "distance", "angle",
];
const COMMONSENSE_KEYWORDS: &[&str] = &[
    "capital", "president", "country", "city", "person", "animal", "color", "shape",
];
// Sequencing adverbs, deliberately separate from the five category lists
const STEP_INDICATORS: &[&str] = &[
    "then", "after", "next", "first", "second", "finally", "later", "subsequently",
];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unable to read dataset: {0}")]
    /// The path could not be opened or read
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    /// The document is not valid JSON, or a record is missing one of the
    /// required `id`/`question`/`answer` fields
    Parse(#[from] serde_json::Error),
}

/// One canonical benchmark question/answer unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub reasoning_steps: Vec<String>,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_domain() -> String {
    "general".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// A [`Record`] reshaped into the downstream system's input format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedRecord {
    pub id: String,
    pub question: String,
    pub expected_answer: String,
    pub metadata: RecordMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub domain: String,
    pub difficulty: String,
    pub source: String,
    pub reasoning_steps: Vec<String>,
}

impl From<&Record> for ConvertedRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            question: record.question.clone(),
            expected_answer: record.answer.clone(),
            metadata: RecordMetadata {
                domain: record.domain.clone(),
                difficulty: record.difficulty.clone(),
                source: SOURCE.to_string(),
                reasoning_steps: record.reasoning_steps.clone(),
            },
        }
    }
}

/// Coarse per-question classification. Flags are independent; a question may
/// set several or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QuestionAnalysis {
    pub arithmetic: bool,
    pub temporal: bool,
    pub logical: bool,
    pub spatial: bool,
    pub commonsense: bool,
    pub multi_step: bool,
}

impl QuestionAnalysis {
    /// Classify a question by case-insensitive substring presence against the
    /// fixed keyword list of each category
    pub fn analyze(question: &str) -> Self {
        let lower = question.to_lowercase();

        Self {
            arithmetic: contains_any(&lower, ARITHMETIC_KEYWORDS),
            temporal: contains_any(&lower, TEMPORAL_KEYWORDS),
            logical: contains_any(&lower, LOGICAL_KEYWORDS),
            spatial: contains_any(&lower, SPATIAL_KEYWORDS),
            commonsense: contains_any(&lower, COMMONSENSE_KEYWORDS),
            multi_step: contains_any(&lower, STEP_INDICATORS),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[derive(Deserialize)]
struct DatasetFile {
    examples: Vec<Record>,
}

/// Loads a benchmark dataset and converts its records. The loaded collection
/// lives for the adapter's lifetime; everything else is computed per call.
#[derive(Debug, Clone, Default)]
pub struct DatasetAdapter {
    records: Vec<Record>,
}

impl DatasetAdapter {
    /// Load a dataset from a JSON file shaped as `{"examples": [...]}`.
    /// Failures are logged and then propagated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();

        match File::open(path).map_err(LoadError::from).and_then(Self::from_reader) {
            Ok(adapter) => Ok(adapter),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load dataset");
                Err(e)
            }
        }
    }

    /// Load a dataset from any reader producing the same JSON document
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let file: DatasetFile = serde_json::from_reader(reader)?;
        tracing::info!(count = file.examples.len(), "loaded benchmark records");

        Ok(Self { records: file.examples })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Convert every loaded record, preserving order and count
    pub fn convert_all(&self) -> Vec<ConvertedRecord> {
        self.records.iter().map(ConvertedRecord::from).collect()
    }
}

#[cfg(test)]
fn sample_record() -> Record {
    Record {
        id: "q-001".to_string(),
        question: "What is 5 + 3?".to_string(),
        answer: "8".to_string(),
        reasoning_steps: vec!["add the operands".to_string()],
        domain: "math".to_string(),
        difficulty: "easy".to_string(),
    }
}

#[test]
fn test_convert_keeps_identity() {
    let record = sample_record();
    let converted = ConvertedRecord::from(&record);

    assert_eq!(converted.id, record.id);
    assert_eq!(converted.question, record.question);
    assert_eq!(converted.expected_answer, record.answer);
    assert_eq!(converted.metadata.domain, record.domain);
    assert_eq!(converted.metadata.difficulty, record.difficulty);
    assert_eq!(converted.metadata.reasoning_steps, record.reasoning_steps);
    assert_eq!(converted.metadata.source, SOURCE);
}

#[test]
fn test_converted_record_shape() {
    let value = serde_json::to_value(ConvertedRecord::from(&sample_record())).unwrap();

    assert_eq!(value["id"], "q-001");
    assert_eq!(value["expected_answer"], "8");
    assert_eq!(value["metadata"]["source"], "source-benchmark");
    assert_eq!(value["metadata"]["domain"], "math");
}

#[test]
fn test_load_applies_defaults() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"examples": [{{"id": "a", "question": "Who?", "answer": "Me"}}]}}"#
    )
    .unwrap();

    let adapter = DatasetAdapter::load(file.path()).unwrap();
    let records = adapter.records();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain, "general");
    assert_eq!(records[0].difficulty, "medium");
    assert!(records[0].reasoning_steps.is_empty());
}

#[test]
fn test_load_missing_required_field() {
    let input = br#"{"examples": [{"id": "a", "question": "Who?"}]}"#;
    let err = DatasetAdapter::from_reader(&input[..]).unwrap_err();

    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn test_load_missing_file() {
    let err = DatasetAdapter::load("/nonexistent/dataset.json").unwrap_err();

    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn test_convert_all_preserves_order() {
    let input = br#"{"examples": [
        {"id": "1", "question": "a", "answer": "x"},
        {"id": "2", "question": "b", "answer": "y"},
        {"id": "3", "question": "c", "answer": "z"}
    ]}"#;
    let adapter = DatasetAdapter::from_reader(&input[..]).unwrap();
    let converted = adapter.convert_all();

    assert_eq!(converted.len(), 3);
    let ids: Vec<&str> = converted.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[test]
fn test_analyze_arithmetic() {
    let analysis = QuestionAnalysis::analyze("What is 5 + 3?");
    assert!(analysis.arithmetic);
    assert!(!analysis.spatial);
}

#[test]
fn test_analyze_temporal() {
    let analysis = QuestionAnalysis::analyze("How old was he in 1990?");
    assert!(analysis.temporal);
}

#[test]
fn test_analyze_logical_and_multi_step() {
    let analysis = QuestionAnalysis::analyze("If it rains, then stay home");
    assert!(analysis.logical);
    assert!(analysis.multi_step);
}

#[test]
fn test_analyze_spatial() {
    let analysis = QuestionAnalysis::analyze("Find the area of a square");
    assert!(analysis.spatial);
}

#[test]
fn test_analyze_commonsense() {
    let analysis = QuestionAnalysis::analyze("What is the capital of France?");
    assert!(analysis.commonsense);
}

#[test]
fn test_analyze_can_be_empty() {
    let analysis = QuestionAnalysis::analyze("xyzzy");
    assert_eq!(analysis, QuestionAnalysis::default());
}
