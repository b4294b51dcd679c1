//! Declarative field descriptors for the five record forms, and the
//! per-field checks the form engine runs against raw text input.

use chrono::NaiveDate;
use std::borrow::Cow;
use validator::ValidationError;

use crate::gateway::datetime::{parse_hh_mm, parse_ymd};
use crate::models::record::{MealType, RecordKind, Severity, ORDINAL_LEVELS};

const DATE_REQUIRED: &str = "Date is required.";
const INVALID_TIME: &str = "Invalid time format (HH:MM).";

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    RequiredText {
        message: &'static str,
    },
    OptionalText,
    /// Trimmed text parsed as a finite number; blank counts as 0.
    Number {
        min: f64,
        min_message: &'static str,
        max: Option<(f64, &'static str)>,
        whole_message: Option<&'static str>,
    },
    Choice {
        options: &'static [&'static str],
        required_message: &'static str,
    },
    Date {
        required_message: &'static str,
        future_message: Option<&'static str>,
    },
    Time {
        message: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Empty,
    Value(&'static str),
    Today,
    CurrentTime,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: Rule,
    pub default: FieldDefault,
}

const fn field(name: &'static str, rule: Rule, default: FieldDefault) -> FieldSpec {
    FieldSpec {
        name,
        rule,
        default,
    }
}

const RECORDED_AT_DATE: FieldSpec = field(
    "recordedAtDate",
    Rule::Date {
        required_message: DATE_REQUIRED,
        future_message: None,
    },
    FieldDefault::Today,
);

const RECORDED_AT_TIME: FieldSpec = field(
    "recordedAtTime",
    Rule::Time {
        message: INVALID_TIME,
    },
    FieldDefault::CurrentTime,
);

const WORKOUT: [FieldSpec; 5] = [
    field(
        "workoutType",
        Rule::RequiredText {
            message: "Workout type is required.",
        },
        FieldDefault::Empty,
    ),
    field(
        "duration",
        Rule::Number {
            min: 1.0,
            min_message: "Duration must be at least 1 minute.",
            max: None,
            whole_message: None,
        },
        FieldDefault::Value("60"),
    ),
    field(
        "caloriesBurned",
        Rule::Number {
            min: 0.0,
            min_message: "Calories burned must be 0 or more.",
            max: None,
            whole_message: None,
        },
        FieldDefault::Value("300"),
    ),
    RECORDED_AT_DATE,
    RECORDED_AT_TIME,
];

const MEAL: [FieldSpec; 5] = [
    field(
        "description",
        Rule::RequiredText {
            message: "Description is required.",
        },
        FieldDefault::Empty,
    ),
    field(
        "calories",
        Rule::Number {
            min: 0.0,
            min_message: "Calories must be 0 or more.",
            max: Some((i32::MAX as f64, "Calories value is too large.")),
            whole_message: Some("Calories must be a whole number."),
        },
        FieldDefault::Value("0"),
    ),
    field(
        "mealType",
        Rule::Choice {
            options: &MealType::VALUES,
            required_message: "Meal type is required.",
        },
        FieldDefault::Empty,
    ),
    RECORDED_AT_DATE,
    RECORDED_AT_TIME,
];

const SYMPTOM: [FieldSpec; 5] = [
    field(
        "symptomName",
        Rule::RequiredText {
            message: "Symptom name is required.",
        },
        FieldDefault::Empty,
    ),
    field(
        "severity",
        Rule::Choice {
            options: &Severity::VALUES,
            required_message: "Severity is required.",
        },
        FieldDefault::Empty,
    ),
    field("notes", Rule::OptionalText, FieldDefault::Empty),
    RECORDED_AT_DATE,
    RECORDED_AT_TIME,
];

const SLEEP: [FieldSpec; 3] = [
    field(
        "sleepDate",
        Rule::Date {
            required_message: "Date of sleep is required.",
            future_message: Some("Sleep date cannot be in the future."),
        },
        FieldDefault::Today,
    ),
    field(
        "duration",
        Rule::Number {
            min: 0.5,
            min_message: "Duration must be at least 0.5 hours.",
            max: Some((24.0, "Duration cannot exceed 24 hours.")),
            whole_message: None,
        },
        FieldDefault::Value("8"),
    ),
    field(
        "quality",
        Rule::Choice {
            options: &ORDINAL_LEVELS,
            required_message: "Sleep quality is required.",
        },
        FieldDefault::Empty,
    ),
];

const MOOD: [FieldSpec; 4] = [
    field(
        "moodRating",
        Rule::Choice {
            options: &ORDINAL_LEVELS,
            required_message: "Mood rating is required.",
        },
        FieldDefault::Empty,
    ),
    field("notes", Rule::OptionalText, FieldDefault::Empty),
    RECORDED_AT_DATE,
    RECORDED_AT_TIME,
];

impl RecordKind {
    /// Field descriptors in display order.
    pub fn schema(&self) -> &'static [FieldSpec] {
        match self {
            RecordKind::Workout => &WORKOUT,
            RecordKind::Meal => &MEAL,
            RecordKind::Symptom => &SYMPTOM,
            RecordKind::Sleep => &SLEEP,
            RecordKind::Mood => &MOOD,
        }
    }
}

/// A raw value that passed its rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Checked {
    Text(String),
    OptionalText(Option<String>),
    Number(f64),
    Choice(String),
    Date(NaiveDate),
    Time(String),
}

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Rule {
    pub fn check(&self, raw: &str, today: NaiveDate) -> Result<Checked, ValidationError> {
        match *self {
            Rule::RequiredText { message } => {
                if raw.is_empty() {
                    Err(error("required", message))
                } else {
                    Ok(Checked::Text(raw.to_string()))
                }
            }
            Rule::OptionalText => Ok(Checked::OptionalText(
                (!raw.is_empty()).then(|| raw.to_string()),
            )),
            Rule::Number {
                min,
                min_message,
                max,
                whole_message,
            } => {
                let value = coerce_number(raw)
                    .ok_or_else(|| error("invalid_type", "Expected number, received nan"))?;
                if value < min {
                    return Err(error("min", min_message));
                }
                if let Some((max, max_message)) = max {
                    if value > max {
                        return Err(error("max", max_message));
                    }
                }
                if let Some(whole_message) = whole_message {
                    if value.fract() != 0.0 {
                        return Err(error("not_integer", whole_message));
                    }
                }
                Ok(Checked::Number(value))
            }
            Rule::Choice {
                options,
                required_message,
            } => {
                if raw.is_empty() {
                    return Err(error("required", required_message));
                }
                if options.iter().any(|option| *option == raw) {
                    Ok(Checked::Choice(raw.to_string()))
                } else {
                    Err(error(
                        "invalid_enum",
                        format!("Invalid option. Expected one of: {}", options.join(", ")),
                    ))
                }
            }
            Rule::Date {
                required_message,
                future_message,
            } => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Err(error("required", required_message));
                }
                let date = parse_ymd(raw).ok_or_else(|| error("invalid_date", "Invalid date."))?;
                if let Some(future_message) = future_message {
                    if date > today {
                        return Err(error("future_date", future_message));
                    }
                }
                Ok(Checked::Date(date))
            }
            Rule::Time { message } => match parse_hh_mm(raw) {
                Some(_) => Ok(Checked::Time(raw.to_string())),
                None => Err(error("invalid_time", message)),
            },
        }
    }
}
