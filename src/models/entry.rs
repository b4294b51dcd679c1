use chrono::NaiveDate;
use serde::Serialize;

use crate::models::record::{MealType, RecordKind, Severity};

/// Calendar date plus `HH:MM` picked by the user; turned into an instant
/// only at the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedAt {
    #[serde(rename = "recordedAtDate")]
    pub date: NaiveDate,
    #[serde(rename = "recordedAtTime")]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutData {
    pub workout_type: String,
    pub duration: f64,
    pub calories_burned: f64,
    #[serde(flatten)]
    pub recorded: RecordedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealData {
    pub description: String,
    pub calories: i32,
    pub meal_type: MealType,
    #[serde(flatten)]
    pub recorded: RecordedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomData {
    pub symptom_name: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub recorded: RecordedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepLogData {
    pub sleep_date: NaiveDate,
    /// Hours, 0.5..=24
    pub duration: f64,
    /// Ordinal "1".."5"
    pub quality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogData {
    /// Ordinal "1".."5"
    pub mood_rating: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub recorded: RecordedAt,
}

/// A fully validated record, ready for the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordEntry {
    Workout(WorkoutData),
    Meal(MealData),
    Symptom(SymptomData),
    Sleep(SleepLogData),
    Mood(MoodLogData),
}

impl RecordEntry {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordEntry::Workout(_) => RecordKind::Workout,
            RecordEntry::Meal(_) => RecordKind::Meal,
            RecordEntry::Symptom(_) => RecordKind::Symptom,
            RecordEntry::Sleep(_) => RecordKind::Sleep,
            RecordEntry::Mood(_) => RecordKind::Mood,
        }
    }
}
