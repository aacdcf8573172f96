use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Name reported in every [`TemporalResponse`]
pub const AGENT_NAME: &str = "TemporalReasoningAgent";

lazy_static! {
    // Day/month/year, `/` or `-` separated. Not locale-aware: a first field
    // above 31 or a second above 12 is rejected at date construction.
    static ref DATE_RE: Regex = Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap();
    static ref DURATION_RE: Regex = Regex::new(r"(\d+)\s+(day|month|year)s?").unwrap();
    static ref YEAR_RE: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemporalError {
    #[error("Could not extract dates for age calculation")]
    AgeDatesMissing,
    #[error("No date found in query")]
    DateMissing,
    #[error("No duration specified")]
    DurationMissing,
    #[error("Could not extract two dates")]
    IntervalDatesMissing,
    #[error("Could not extract date")]
    WeekdayDateMissing,
    #[error("Could not extract year")]
    YearMissing,
    #[error("Error in temporal operation: {0} is not a valid calendar date")]
    InvalidDate(String),
    #[error("Error in temporal operation: duration out of range")]
    DurationOutOfRange,
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

/// One of the six fixed temporal computation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    AgeCalculation,
    DateAddition,
    DateSubtraction,
    TimeInterval,
    DayOfWeek,
    LeapYearCheck,
}

// Scanned top to bottom, first hit wins. Ordering is significant: age words
// outrank forward-time words, which outrank backward-time words, and so on.
const OPERATION_TRIGGERS: &[(&[&str], Operation)] = &[
    (&["age", "born", "birth"], Operation::AgeCalculation),
    (&["later", "after", "next", "add"], Operation::DateAddition),
    (&["before", "ago", "subtract"], Operation::DateSubtraction),
    (&["between", "interval", "duration"], Operation::TimeInterval),
    (&["day of week", "weekday"], Operation::DayOfWeek),
    (&["leap year"], Operation::LeapYearCheck),
];

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::AgeCalculation,
        Operation::DateAddition,
        Operation::DateSubtraction,
        Operation::TimeInterval,
        Operation::DayOfWeek,
        Operation::LeapYearCheck,
    ];

    /// Pick the operation for a query by a case-insensitive keyword scan,
    /// defaulting to date addition when nothing matches
    pub fn identify(query: &str) -> Self {
        let lower = query.to_lowercase();

        OPERATION_TRIGGERS
            .iter()
            .find(|(words, _)| words.iter().any(|word| lower.contains(word)))
            .map(|(_, operation)| *operation)
            .unwrap_or(Operation::DateAddition)
    }

    /// Run the operation against a query. Extraction or computation failures
    /// come back as [`TemporalError`], never as a panic.
    pub fn execute(self, query: &str) -> Result<String, TemporalError> {
        match self {
            Operation::AgeCalculation => calculate_age(query),
            Operation::DateAddition => shift_date(query, 1),
            Operation::DateSubtraction => shift_date(query, -1),
            Operation::TimeInterval => calculate_interval(query),
            Operation::DayOfWeek => find_day_of_week(query),
            Operation::LeapYearCheck => check_leap_year(query),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::AgeCalculation => "age_calculation",
            Operation::DateAddition => "date_addition",
            Operation::DateSubtraction => "date_subtraction",
            Operation::TimeInterval => "time_interval",
            Operation::DayOfWeek => "day_of_week",
            Operation::LeapYearCheck => "leap_year_check",
        })
    }
}

/// Input to [`TemporalAgent::process`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalQuery {
    pub query: String,
    /// Reserved; no operation consumes it yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl TemporalQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
        }
    }
}

/// Structured result of one `process` call. `result` is a human-readable
/// answer or failure message; inspect `confidence` to tell them apart.
#[derive(Debug, Clone, Serialize)]
pub struct TemporalResponse {
    pub agent: &'static str,
    pub operation: Operation,
    pub result: Option<String>,
    pub confidence: f64,
}

/// Handles date calculations, time intervals, and temporal logic.
/// Stateless; every call is independent and idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalAgent;

impl TemporalAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn supported_operations(&self) -> &'static [Operation] {
        &Operation::ALL
    }

    /// Answer a temporal query. Never fails: extraction and computation
    /// problems surface as descriptive result strings with confidence 0.0.
    pub fn process(&self, input: &TemporalQuery) -> TemporalResponse {
        let operation = Operation::identify(&input.query);

        let (result, confidence) = match operation.execute(&input.query) {
            Ok(answer) => {
                let confidence = score(&answer);
                (answer, confidence)
            }
            Err(e) => (e.to_string(), 0.0),
        };

        TemporalResponse {
            agent: AGENT_NAME,
            operation,
            result: Some(result),
            confidence,
        }
    }
}

// Unit and weekday words that mark a well-formed answer. Every English
// weekday name contains "day", so listing two is enough.
const CONFIDENT_TOKENS: &[&str] = &["year", "month", "day", "Monday", "Tuesday"];

fn score(result: &str) -> f64 {
    if result.contains("Error") || result.contains("Could not") {
        return 0.0;
    }

    let mut confidence: f64 = 0.7;
    if CONFIDENT_TOKENS.iter().any(|token| result.contains(token)) {
        confidence += 0.2;
    }
    if result.chars().any(|c| c.is_ascii_digit()) {
        confidence += 0.1;
    }

    confidence.min(1.0)
}

fn capture_date(caps: &Captures) -> Result<NaiveDate, TemporalError> {
    let invalid = || TemporalError::InvalidDate(caps[0].to_string());

    let day: u32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let year: i32 = caps[3].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn calculate_age(query: &str) -> Result<String, TemporalError> {
    let mut dates = DATE_RE.captures_iter(query);
    let birth = capture_date(&dates.next().ok_or(TemporalError::AgeDatesMissing)?)?;
    let target = capture_date(&dates.next().ok_or(TemporalError::AgeDatesMissing)?)?;

    let mut age = target.year() - birth.year();
    // Not yet had the birthday in the target year
    if (target.month(), target.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }

    Ok(format!("{} years", age))
}

// Month and year arithmetic clamps the day-of-month to 28 so the shifted
// date always exists. Intentionally not calendar-accurate for day > 28.
fn add_months(date: NaiveDate, months: i64) -> Result<NaiveDate, TemporalError> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month()) - 1 + months;
    let year = i32::try_from(total.div_euclid(12)).map_err(|_| TemporalError::DurationOutOfRange)?;
    let month = (total.rem_euclid(12) + 1) as u32;

    NaiveDate::from_ymd_opt(year, month, date.day().min(28))
        .ok_or(TemporalError::DurationOutOfRange)
}

fn shift_date(query: &str, sign: i64) -> Result<String, TemporalError> {
    let caps = DATE_RE.captures(query).ok_or(TemporalError::DateMissing)?;
    let date = capture_date(&caps)?;

    let lower = query.to_lowercase();
    let duration = DURATION_RE
        .captures(&lower)
        .ok_or(TemporalError::DurationMissing)?;
    let amount: i64 = duration[1]
        .parse()
        .map_err(|_| TemporalError::DurationOutOfRange)?;
    let amount = amount
        .checked_mul(sign)
        .ok_or(TemporalError::DurationOutOfRange)?;

    let shifted = match &duration[2] {
        "day" => {
            let delta = Duration::try_days(amount).ok_or(TemporalError::DurationOutOfRange)?;
            date.checked_add_signed(delta)
                .ok_or(TemporalError::DurationOutOfRange)?
        }
        "month" => add_months(date, amount)?,
        "year" => {
            let months = amount
                .checked_mul(12)
                .ok_or(TemporalError::DurationOutOfRange)?;
            add_months(date, months)?
        }
        unit => return Err(TemporalError::UnknownUnit(unit.to_string())),
    };

    Ok(shifted.format("%B %d, %Y").to_string())
}

fn calculate_interval(query: &str) -> Result<String, TemporalError> {
    let mut dates = DATE_RE.captures_iter(query);
    let first = capture_date(&dates.next().ok_or(TemporalError::IntervalDatesMissing)?)?;
    let second = capture_date(&dates.next().ok_or(TemporalError::IntervalDatesMissing)?)?;

    let total = second.signed_duration_since(first).num_days().abs();

    // Approximate decomposition: 365-day years, 30-day months
    let years = total / 365;
    let months = (total % 365) / 30;
    let days = (total % 365) % 30;

    let mut parts = Vec::new();
    if years > 0 {
        parts.push(pluralize(years, "year"));
    }
    if months > 0 {
        parts.push(pluralize(months, "month"));
    }
    if days > 0 || parts.is_empty() {
        parts.push(pluralize(days, "day"));
    }

    Ok(parts.join(", "))
}

fn pluralize(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{} {}s", n, unit)
    } else {
        format!("{} {}", n, unit)
    }
}

fn find_day_of_week(query: &str) -> Result<String, TemporalError> {
    let caps = DATE_RE
        .captures(query)
        .ok_or(TemporalError::WeekdayDateMissing)?;
    let date = capture_date(&caps)?;

    Ok(date.format("%A").to_string())
}

fn check_leap_year(query: &str) -> Result<String, TemporalError> {
    let caps = YEAR_RE.captures(query).ok_or(TemporalError::YearMissing)?;
    let year: i64 = caps[1].parse().map_err(|_| TemporalError::YearMissing)?;

    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let verdict = if leap { "a leap year" } else { "not a leap year" };

    Ok(format!("{} is {}", year, verdict))
}

#[test]
fn test_calculate_age() {
    let result = calculate_age("born 01/01/1990, how old on 01/01/2020").unwrap();
    assert_eq!(result, "30 years");
}

#[test]
fn test_calculate_age_before_birthday() {
    let result = calculate_age("born 15/06/1990, how old on 01/01/2020").unwrap();
    assert_eq!(result, "29 years");
}

#[test]
fn test_calculate_age_needs_two_dates() {
    let err = calculate_age("born 01/01/1990").unwrap_err();
    assert_eq!(err, TemporalError::AgeDatesMissing);
}

#[test]
fn test_add_days() {
    let result = shift_date("what is 10 days after 15/03/2021", 1).unwrap();
    assert_eq!(result, "March 25, 2021");
}

#[test]
fn test_add_months_clamps_month_end() {
    // 31st + 1 month lands on the 28th by design, not on a rolled-over date
    let result = shift_date("1 month after 31/01/2021", 1).unwrap();
    assert_eq!(result, "February 28, 2021");
}

#[test]
fn test_add_years() {
    let result = shift_date("2 years after 29/02/2020", 1).unwrap();
    assert_eq!(result, "February 28, 2022");
}

#[test]
fn test_subtract_days() {
    let result = shift_date("10 days before 25/03/2021", -1).unwrap();
    assert_eq!(result, "March 15, 2021");
}

#[test]
fn test_subtract_months_across_year() {
    let result = shift_date("2 months before 15/01/2021", -1).unwrap();
    assert_eq!(result, "November 15, 2020");
}

#[test]
fn test_shift_requires_date() {
    let err = shift_date("add ten days", 1).unwrap_err();
    assert_eq!(err, TemporalError::DateMissing);
}

#[test]
fn test_shift_requires_duration() {
    let err = shift_date("what comes after 15/03/2021", 1).unwrap_err();
    assert_eq!(err, TemporalError::DurationMissing);
}

#[test]
fn test_interval_mixed_units() {
    let result = calculate_interval("between 01/01/2021 and 15/02/2021").unwrap();
    assert_eq!(result, "1 month, 15 days");
}

#[test]
fn test_interval_single_unit() {
    let result = calculate_interval("between 01/01/2020 and 31/12/2020").unwrap();
    assert_eq!(result, "1 year");
}

#[test]
fn test_interval_same_date() {
    let result = calculate_interval("between 01/01/2020 and 01/01/2020").unwrap();
    assert_eq!(result, "0 day");
}

#[test]
fn test_day_of_week() {
    let result = find_day_of_week("what day of week is 01/01/2021").unwrap();
    assert_eq!(result, "Friday");
}

#[test]
fn test_invalid_month_is_soft_error() {
    let agent = TemporalAgent::new();
    let response = agent.process(&TemporalQuery::new("what is 10 days after 15/13/2021"));

    assert_eq!(response.confidence, 0.0);
    assert!(response.result.unwrap().contains("Error"));
}

#[test]
fn test_process_no_date_zero_confidence() {
    let agent = TemporalAgent::new();
    let response = agent.process(&TemporalQuery::new("add ten days"));

    assert_eq!(response.operation, Operation::DateAddition);
    assert_eq!(response.result.as_deref(), Some("No date found in query"));
    assert_eq!(response.confidence, 0.0);
}

#[test]
fn test_process_contract_shape() {
    let agent = TemporalAgent::new();
    let response = agent.process(&TemporalQuery::new("what is 10 days after 15/03/2021"));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["agent"], "TemporalReasoningAgent");
    assert_eq!(value["operation"], "date_addition");
    assert_eq!(value["result"], "March 25, 2021");
    assert!(value["confidence"].is_f64());
}

#[test]
fn test_score_bonuses() {
    // unit word + digit
    assert!((score("30 years") - 1.0).abs() < 1e-9);
    // digit only
    assert!((score("March 25, 2021") - 0.8).abs() < 1e-9);
    // failure strings always bottom out
    assert_eq!(score("Could not extract year"), 0.0);
    assert_eq!(score("Error in temporal operation: bad"), 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("is 2000 a leap year", "2000 is a leap year" ; "divisible by 400")]
    #[test_case("is 1900 a leap year", "1900 is not a leap year" ; "century not divisible by 400")]
    #[test_case("was 2024 a leap year", "2024 is a leap year" ; "divisible by 4")]
    #[test_case("is 2023 a leap year", "2023 is not a leap year" ; "common year")]
    fn leap_year(query: &str, expected: &str) {
        assert_eq!(check_leap_year(query).unwrap(), expected);
    }

    #[test_case("how old is someone born on 01/01/1990", Operation::AgeCalculation ; "age words outrank forward words")]
    #[test_case("what is 10 days after 15/03/2021", Operation::DateAddition ; "forward words")]
    #[test_case("10 days before 15/03/2021", Operation::DateSubtraction ; "backward words")]
    #[test_case("days between 01/01/2020 and 01/01/2021", Operation::TimeInterval ; "interval words")]
    #[test_case("what weekday is 01/01/2021", Operation::DayOfWeek ; "weekday words")]
    #[test_case("is 2000 a leap year", Operation::LeapYearCheck ; "leap year phrase")]
    #[test_case("tell me about 15/03/2021", Operation::DateAddition ; "no trigger defaults to addition")]
    fn identify(query: &str, expected: Operation) {
        assert_eq!(Operation::identify(query), expected);
    }
}
