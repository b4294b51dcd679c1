use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of loggable health events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Workout,
    Meal,
    Symptom,
    Sleep,
    Mood,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Workout,
        RecordKind::Meal,
        RecordKind::Symptom,
        RecordKind::Sleep,
        RecordKind::Mood,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Workout => "workout",
            RecordKind::Meal => "meal",
            RecordKind::Symptom => "symptom",
            RecordKind::Sleep => "sleep",
            RecordKind::Mood => "mood",
        }
    }

    /// Localization key of the selector label, e.g. `recordTypes.sleep`.
    pub fn label_key(&self) -> &'static str {
        match self {
            RecordKind::Workout => "recordTypes.workout",
            RecordKind::Meal => "recordTypes.meal",
            RecordKind::Symptom => "recordTypes.symptom",
            RecordKind::Sleep => "recordTypes.sleep",
            RecordKind::Mood => "recordTypes.mood",
        }
    }

    /// English label shown when no translation is loaded for `label_key`.
    pub fn fallback_label(&self) -> &'static str {
        match self {
            RecordKind::Workout => "Workout",
            RecordKind::Meal => "Meal",
            RecordKind::Symptom => "Symptom",
            RecordKind::Sleep => "Sleep Log",
            RecordKind::Mood => "Mood Log",
        }
    }

    pub fn success_message_key(&self) -> &'static str {
        match self {
            RecordKind::Workout => "forms.workout.successMessage",
            RecordKind::Meal => "forms.meal.successMessage",
            RecordKind::Symptom => "forms.symptom.successMessage",
            RecordKind::Sleep => "forms.sleep.successMessage",
            RecordKind::Mood => "forms.mood.successMessage",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown record kind '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const VALUES: [&'static str; 4] = ["breakfast", "lunch", "dinner", "snack"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("Unknown meal type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const VALUES: [&'static str; 3] = ["mild", "moderate", "severe"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(format!("Unknown severity '{}'", other)),
        }
    }
}

/// Ordinal ratings stay string-typed until the gateway converts them.
pub const ORDINAL_LEVELS: [&str; 5] = ["1", "2", "3", "4", "5"];
