//! One write function per record kind. Each maps validated data onto
//! backend rows and returns a receipt, or the first store error.

use chrono::TimeZone;
use serde::Serialize;
use uuid::Uuid;

use crate::gateway::datetime::combine_date_time;
use crate::gateway::store::{Cell, NewRow, RecordStore, StoreError, StoreErrorKind, StoreResult, Table};
use crate::models::entry::{MealData, MoodLogData, RecordEntry, SleepLogData, SymptomData, WorkoutData};
use crate::models::record::RecordKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteReceipt {
    pub kind: RecordKind,
    pub rows_written: usize,
    pub message: String,
}

impl WriteReceipt {
    fn new(kind: RecordKind, rows_written: usize, message: &str) -> Self {
        Self {
            kind,
            rows_written,
            message: message.to_string(),
        }
    }
}

/// `"Morning  Run"` → `"morning_run"`
pub fn metric_type_slug(workout_type: &str) -> String {
    let lower = workout_type.to_lowercase();
    let mut slug = String::with_capacity(lower.len());
    let mut in_whitespace = false;
    for ch in lower.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            slug.push(ch);
            in_whitespace = false;
        }
    }
    slug
}

fn parse_ordinal(value: &str, field: &str) -> StoreResult<i32> {
    value.parse::<i32>().map_err(|_| {
        StoreError::new(
            StoreErrorKind::InvalidInput,
            format!("{} '{}' is not a number", field, value),
        )
    })
}

pub async fn add_workout<S, Tz>(
    store: &S,
    user_id: Uuid,
    data: &WorkoutData,
    tz: &Tz,
) -> StoreResult<WriteReceipt>
where
    S: RecordStore,
    Tz: TimeZone,
{
    let recorded_at = combine_date_time(tz, data.recorded.date, &data.recorded.time)?;
    let slug = metric_type_slug(&data.workout_type);

    let duration = NewRow::new(Table::HealthMetrics)
        .with("user_id", Cell::Uuid(user_id))
        .with("metric_type", Cell::Text(format!("workout_duration_{}", slug)))
        .with("value", Cell::Float(data.duration))
        .with("unit", Cell::Text("minutes".into()))
        .with("recorded_at", Cell::Timestamp(recorded_at));
    store.insert(duration).await?;

    let calories = NewRow::new(Table::HealthMetrics)
        .with("user_id", Cell::Uuid(user_id))
        .with("metric_type", Cell::Text(format!("workout_calories_{}", slug)))
        .with("value", Cell::Float(data.calories_burned))
        .with("unit", Cell::Text("kcal".into()))
        .with("recorded_at", Cell::Timestamp(recorded_at));
    // No compensating delete: a failure here leaves the duration row behind.
    if let Err(e) = store.insert(calories).await {
        tracing::warn!(
            user_id = %user_id,
            rows_written = 1,
            error = %e,
            "Workout partially persisted"
        );
        return Err(e);
    }

    Ok(WriteReceipt::new(
        RecordKind::Workout,
        2,
        "Workout added successfully",
    ))
}

pub async fn add_meal<S, Tz>(
    store: &S,
    user_id: Uuid,
    data: &MealData,
    tz: &Tz,
) -> StoreResult<WriteReceipt>
where
    S: RecordStore,
    Tz: TimeZone,
{
    let recorded_at = combine_date_time(tz, data.recorded.date, &data.recorded.time)?;

    let row = NewRow::new(Table::Meals)
        .with("user_id", Cell::Uuid(user_id))
        .with("description", Cell::Text(data.description.clone()))
        .with("calories", Cell::Int(data.calories))
        .with("meal_type", Cell::Text(data.meal_type.as_str().into()))
        .with("recorded_at", Cell::Timestamp(recorded_at));
    store.insert(row).await?;

    Ok(WriteReceipt::new(RecordKind::Meal, 1, "Meal added successfully"))
}

pub async fn add_symptom<S, Tz>(
    store: &S,
    user_id: Uuid,
    data: &SymptomData,
    tz: &Tz,
) -> StoreResult<WriteReceipt>
where
    S: RecordStore,
    Tz: TimeZone,
{
    let recorded_at = combine_date_time(tz, data.recorded.date, &data.recorded.time)?;

    let row = NewRow::new(Table::Symptoms)
        .with("user_id", Cell::Uuid(user_id))
        .with("symptom_name", Cell::Text(data.symptom_name.clone()))
        .with("severity", Cell::Text(data.severity.as_str().into()))
        .with("notes", Cell::OptionalText(data.notes.clone()))
        .with("recorded_at", Cell::Timestamp(recorded_at));
    store.insert(row).await?;

    Ok(WriteReceipt::new(
        RecordKind::Symptom,
        1,
        "Symptom added successfully",
    ))
}

/// Sleep logs carry a calendar date only, so no time zone is involved.
pub async fn add_sleep_log<S: RecordStore>(
    store: &S,
    user_id: Uuid,
    data: &SleepLogData,
) -> StoreResult<WriteReceipt> {
    let quality = parse_ordinal(&data.quality, "Sleep quality")?;

    let row = NewRow::new(Table::SleepLogs)
        .with("user_id", Cell::Uuid(user_id))
        .with("date", Cell::Date(data.sleep_date))
        .with("duration_hours", Cell::Float(data.duration))
        .with("quality_rating", Cell::Int(quality));
    store.insert(row).await?;

    Ok(WriteReceipt::new(
        RecordKind::Sleep,
        1,
        "Sleep log added successfully",
    ))
}

pub async fn add_mood_log<S, Tz>(
    store: &S,
    user_id: Uuid,
    data: &MoodLogData,
    tz: &Tz,
) -> StoreResult<WriteReceipt>
where
    S: RecordStore,
    Tz: TimeZone,
{
    let recorded_at = combine_date_time(tz, data.recorded.date, &data.recorded.time)?;
    let rating = parse_ordinal(&data.mood_rating, "Mood rating")?;

    let row = NewRow::new(Table::MoodLogs)
        .with("user_id", Cell::Uuid(user_id))
        .with("mood_rating", Cell::Int(rating))
        .with("notes", Cell::OptionalText(data.notes.clone()))
        .with("recorded_at", Cell::Timestamp(recorded_at));
    store.insert(row).await?;

    Ok(WriteReceipt::new(
        RecordKind::Mood,
        1,
        "Mood log added successfully",
    ))
}

pub async fn submit_entry<S, Tz>(
    store: &S,
    user_id: Uuid,
    entry: &RecordEntry,
    tz: &Tz,
) -> StoreResult<WriteReceipt>
where
    S: RecordStore,
    Tz: TimeZone,
{
    match entry {
        RecordEntry::Workout(data) => add_workout(store, user_id, data, tz).await,
        RecordEntry::Meal(data) => add_meal(store, user_id, data, tz).await,
        RecordEntry::Symptom(data) => add_symptom(store, user_id, data, tz).await,
        RecordEntry::Sleep(data) => add_sleep_log(store, user_id, data).await,
        RecordEntry::Mood(data) => add_mood_log(store, user_id, data, tz).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::InMemoryRecordStore;
    use crate::models::entry::RecordedAt;
    use crate::models::record::{MealType, Severity};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn recorded(time: &str) -> RecordedAt {
        RecordedAt {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: time.into(),
        }
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    #[test]
    fn test_metric_type_slug_collapses_whitespace() {
        assert_eq!(metric_type_slug("Running"), "running");
        assert_eq!(metric_type_slug("Morning  Run"), "morning_run");
        assert_eq!(metric_type_slug("HIIT\t Circuit Training"), "hiit_circuit_training");
    }

    #[tokio::test]
    async fn test_add_workout_writes_two_metric_rows() {
        let store = InMemoryRecordStore::new();
        let user = Uuid::new_v4();
        let data = WorkoutData {
            workout_type: "Weight Lifting".into(),
            duration: 45.0,
            calories_burned: 320.0,
            recorded: recorded("07:05"),
        };

        let receipt = add_workout(&store, user, &data, &Utc).await.unwrap();
        assert_eq!(receipt.rows_written, 2);
        assert_eq!(receipt.message, "Workout added successfully");

        let rows = store.rows();
        assert_eq!(rows.len(), 2);
        let expected_ts = Cell::Timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 7, 5, 0).unwrap());

        assert_eq!(rows[0].table, Table::HealthMetrics);
        assert_eq!(rows[0].get("metric_type"), Some(&text("workout_duration_weight_lifting")));
        assert_eq!(rows[0].get("value"), Some(&Cell::Float(45.0)));
        assert_eq!(rows[0].get("unit"), Some(&text("minutes")));
        assert_eq!(rows[0].get("recorded_at"), Some(&expected_ts));
        assert_eq!(rows[0].get("user_id"), Some(&Cell::Uuid(user)));

        assert_eq!(rows[1].get("metric_type"), Some(&text("workout_calories_weight_lifting")));
        assert_eq!(rows[1].get("value"), Some(&Cell::Float(320.0)));
        assert_eq!(rows[1].get("unit"), Some(&text("kcal")));
        assert_eq!(rows[1].get("recorded_at"), Some(&expected_ts));
    }

    #[tokio::test]
    async fn test_add_workout_second_insert_failure_leaves_first_row() {
        let store = InMemoryRecordStore::new();
        store.fail_on_call(2, StoreError::new(StoreErrorKind::Unknown, "calories insert failed"));
        let data = WorkoutData {
            workout_type: "Running".into(),
            duration: 30.0,
            calories_burned: 250.0,
            recorded: recorded("18:00"),
        };

        let err = add_workout(&store, Uuid::new_v4(), &data, &Utc).await.unwrap_err();
        assert_eq!(err.message, "calories insert failed");
        assert_eq!(store.rows().len(), 1);
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_add_workout_first_insert_failure_skips_second() {
        let store = InMemoryRecordStore::new();
        store.fail_on_call(1, StoreError::new(StoreErrorKind::Unavailable, "down"));
        let data = WorkoutData {
            workout_type: "Running".into(),
            duration: 30.0,
            calories_burned: 250.0,
            recorded: recorded("18:00"),
        };

        assert!(add_workout(&store, Uuid::new_v4(), &data, &Utc).await.is_err());
        assert_eq!(store.calls(), 1);
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_add_meal_maps_columns() {
        let store = InMemoryRecordStore::new();
        let data = MealData {
            description: "Chicken Salad".into(),
            calories: 350,
            meal_type: MealType::Lunch,
            recorded: recorded("12:30"),
        };

        add_meal(&store, Uuid::new_v4(), &data, &Utc).await.unwrap();
        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].table, Table::Meals);
        assert_eq!(rows[0].get("description"), Some(&text("Chicken Salad")));
        assert_eq!(rows[0].get("calories"), Some(&Cell::Int(350)));
        assert_eq!(rows[0].get("meal_type"), Some(&text("lunch")));
    }

    #[tokio::test]
    async fn test_add_symptom_passes_severity_and_notes() {
        let store = InMemoryRecordStore::new();
        let data = SymptomData {
            symptom_name: "Headache".into(),
            severity: Severity::Moderate,
            notes: Some("Started after lunch.".into()),
            recorded: recorded("14:00"),
        };

        add_symptom(&store, Uuid::new_v4(), &data, &Utc).await.unwrap();
        let row = &store.rows()[0];
        assert_eq!(row.table, Table::Symptoms);
        assert_eq!(row.get("severity"), Some(&text("moderate")));
        assert_eq!(
            row.get("notes"),
            Some(&Cell::OptionalText(Some("Started after lunch.".into())))
        );
    }

    #[tokio::test]
    async fn test_add_sleep_log_uses_plain_date_and_integer_quality() {
        let store = InMemoryRecordStore::new();
        let data = SleepLogData {
            sleep_date: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            duration: 7.5,
            quality: "4".into(),
        };

        add_sleep_log(&store, Uuid::new_v4(), &data).await.unwrap();
        let row = &store.rows()[0];
        assert_eq!(row.table, Table::SleepLogs);
        assert_eq!(
            row.get("date"),
            Some(&Cell::Date(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()))
        );
        assert_eq!(row.get("duration_hours"), Some(&Cell::Float(7.5)));
        assert_eq!(row.get("quality_rating"), Some(&Cell::Int(4)));
        assert!(row.get("recorded_at").is_none());
    }

    #[tokio::test]
    async fn test_add_mood_log_converts_rating() {
        let store = InMemoryRecordStore::new();
        let data = MoodLogData {
            mood_rating: "5".into(),
            notes: Some("Feeling great today!".into()),
            recorded: recorded("21:45"),
        };

        let receipt = add_mood_log(&store, Uuid::new_v4(), &data, &Utc).await.unwrap();
        assert_eq!(receipt.kind, RecordKind::Mood);
        let row = &store.rows()[0];
        assert_eq!(row.get("mood_rating"), Some(&Cell::Int(5)));
    }

    #[tokio::test]
    async fn test_store_error_propagates_unchanged() {
        let store = InMemoryRecordStore::new();
        store.fail_on_call(1, StoreError::new(StoreErrorKind::Constraint, "Database unavailable"));
        let data = MoodLogData {
            mood_rating: "3".into(),
            notes: None,
            recorded: recorded("09:00"),
        };

        let err = submit_entry(&store, Uuid::new_v4(), &RecordEntry::Mood(data), &Utc)
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Constraint);
        assert_eq!(err.message, "Database unavailable");
    }
}
