//! # ReasonBench: Benchmark Adapter and Temporal Reasoning
//!
//! Two independent utilities for working with reasoning benchmarks:
//!
//! * [`adapter`] loads a JSON benchmark dataset, normalizes every entry into a
//!   [`Record`], converts records into the downstream input format
//!   ([`ConvertedRecord`]), and tags question text with coarse categories
//!   ([`QuestionAnalysis`]).
//! * [`temporal`] answers free-text date questions: it picks one of six fixed
//!   operations by a keyword scan, extracts dates with a `d/m/yyyy` pattern,
//!   and returns the answer with a heuristic confidence score.
//!
//! ## Example
//!
//! ```rust
//! use reasonbench::{TemporalAgent, TemporalQuery};
//!
//! let agent = TemporalAgent::new();
//! let response = agent.process(&TemporalQuery::new("what is 10 days after 15/03/2021"));
//!
//! assert_eq!(response.result.as_deref(), Some("March 25, 2021"));
//! assert!(response.confidence > 0.0);
//! ```
//!
//! ## Dataset format
//!
//! ```text
//! {"examples": [{"id", "question", "answer",
//!                "reasoning_steps"?, "domain"?, "difficulty"?}, ...]}
//! ```
//!
//! `reasoning_steps` defaults to empty, `domain` to `"general"`, `difficulty`
//! to `"medium"`. A missing `id`, `question`, or `answer` fails the load.
//!
//! ## Supported temporal queries
//!
//! Dates are read as day/month/year, `/` or `-` separated (`15/03/2021`,
//! `15-03-2021`). Operation selection is a priority-ordered keyword scan:
//!
//! ```text
//! age_calculation   age | born | birth             "how old is someone born on 01/01/1990 ..."
//! date_addition     later | after | next | add     "what is 10 days after 15/03/2021"
//! date_subtraction  before | ago | subtract        "10 days before 25/03/2021"
//! time_interval     between | interval | duration  "days between 01/01/2020 and 01/01/2021"
//! day_of_week       day of week | weekday          "what weekday is 01/01/2021"
//! leap_year_check   leap year                      "is 2000 a leap year"
//! ```
//!
//! A query matching none of the triggers is treated as `date_addition`.
//! Month and year arithmetic clamps the day-of-month to 28, and intervals
//! decompose with 365-day years and 30-day months; both are intentional
//! simplifications inherited from the benchmark's reference behavior.
//!
//! `process` never fails: a query with nothing extractable yields a
//! descriptive message ("No date found in query", "Could not extract two
//! dates", ...) with confidence 0.0.

pub mod adapter;
pub mod temporal;

pub use adapter::{
    ConvertedRecord, DatasetAdapter, LoadError, QuestionAnalysis, Record, RecordMetadata, SOURCE,
};
pub use temporal::{
    Operation, TemporalAgent, TemporalError, TemporalQuery, TemporalResponse, AGENT_NAME,
};

#[test]
fn test_process_end_to_end() {
    let agent = TemporalAgent::new();
    let response = agent.process(&TemporalQuery::new(
        "how old is someone born on 01/01/1990 as of 01/01/2020",
    ));

    assert_eq!(response.agent, AGENT_NAME);
    assert_eq!(response.operation, Operation::AgeCalculation);
    assert_eq!(response.result.as_deref(), Some("30 years"));
}

#[test]
fn test_process_never_fails() {
    let agent = TemporalAgent::new();
    let response = agent.process(&TemporalQuery::new(""));

    assert_eq!(response.confidence, 0.0);
    assert!(response.result.is_some());
}

#[test]
fn test_adapter_round_trip() {
    let input = br#"{"examples": [{"id": "q1", "question": "Why?", "answer": "Because"}]}"#;
    let adapter = DatasetAdapter::from_reader(&input[..]).unwrap();
    let converted = adapter.convert_all();

    assert_eq!(converted.len(), 1);
    assert_eq!(converted[0].id, "q1");
    assert_eq!(converted[0].metadata.source, SOURCE);
}
