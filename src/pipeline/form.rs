use chrono::{DateTime, FixedOffset, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use validator::{ValidationError, ValidationErrors};

use crate::gateway::{submit_entry, RecordStore, StoreError, WriteReceipt};
use crate::i18n::Localize;
use crate::models::entry::{
    MealData, MoodLogData, RecordEntry, RecordedAt, SleepLogData, SymptomData, WorkoutData,
};
use crate::models::record::RecordKind;
use crate::pipeline::notify::{Notification, NotificationSink};
use crate::pipeline::schema::{Checked, FieldDefault, FieldSpec};
use crate::pipeline::session::Session;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown field '{field}' for {kind} records")]
pub struct UnknownField {
    pub kind: RecordKind,
    pub field: String,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// At least one field failed; nothing was sent.
    Invalid(ValidationErrors),
    /// No signed-in user; nothing was sent.
    Unauthenticated,
    /// The store rejected a write. The form keeps its values for a retry.
    Failed(StoreError),
    Persisted(WriteReceipt),
}

impl SubmitOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, SubmitOutcome::Persisted(_))
    }
}

/// Field name → messages, in a stable order for rendering and responses.
pub fn error_messages(errors: &ValidationErrors) -> BTreeMap<&'static str, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field, messages)
        })
        .collect()
}

/// One mounted record form: raw text per field plus the errors of the last
/// validation. The field set comes from `RecordKind::schema`.
#[derive(Debug, Clone)]
pub struct RecordForm {
    kind: RecordKind,
    values: HashMap<&'static str, String>,
    errors: ValidationErrors,
}

impl RecordForm {
    pub fn new(kind: RecordKind, now: DateTime<FixedOffset>) -> Self {
        let values = kind
            .schema()
            .iter()
            .map(|spec| {
                let value = match spec.default {
                    FieldDefault::Empty => String::new(),
                    FieldDefault::Value(v) => v.to_string(),
                    FieldDefault::Today => now.format("%Y-%m-%d").to_string(),
                    FieldDefault::CurrentTime => now.format("%H:%M").to_string(),
                };
                (spec.name, value)
            })
            .collect();

        Self {
            kind,
            values,
            errors: ValidationErrors::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Current values in schema order.
    pub fn values(&self) -> Vec<(&'static str, &str)> {
        self.kind
            .schema()
            .iter()
            .map(|spec| (spec.name, self.value(spec.name).unwrap_or("")))
            .collect()
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        let spec = self.spec(field).ok_or_else(|| UnknownField {
            kind: self.kind,
            field: field.to_string(),
        })?;
        self.values.insert(spec.name, value.into());
        Ok(())
    }

    /// Errors from the most recent validation, for inline display.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Check every field, keep all failures, and build the typed entry when
    /// none failed.
    pub fn validate(&mut self, today: NaiveDate) -> Result<RecordEntry, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut checked: HashMap<&'static str, Checked> = HashMap::new();

        for spec in self.kind.schema() {
            let raw = self.value(spec.name).unwrap_or("");
            match spec.rule.check(raw, today) {
                Ok(value) => {
                    checked.insert(spec.name, value);
                }
                Err(err) => errors.add(spec.name, err),
            }
        }

        if errors.is_empty() {
            match build_entry(self.kind, &mut checked) {
                Some(entry) => {
                    self.errors = ValidationErrors::new();
                    return Ok(entry);
                }
                None => errors.add("form", ValidationError::new("schema_mismatch")),
            }
        }

        self.errors = errors.clone();
        Err(errors)
    }

    /// Validate, require a user, write through the gateway, and report the
    /// outcome. `on_success` runs only after the store confirmed every row.
    pub async fn submit<S, N, L, F>(
        &mut self,
        session: &Session,
        store: &S,
        notifier: &N,
        localizer: &L,
        on_success: F,
    ) -> SubmitOutcome
    where
        S: RecordStore,
        N: NotificationSink + ?Sized,
        L: Localize + ?Sized,
        F: FnOnce(),
    {
        let today = session.now().date_naive();
        let entry = match self.validate(today) {
            Ok(entry) => entry,
            Err(errors) => {
                tracing::debug!(kind = %self.kind, fields = errors.errors().len(), "Record failed validation");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let Some(user_id) = session.user_id() else {
            notifier.notify(Notification::destructive(
                localizer.t("errors.unauthenticated"),
                localizer.t("errors.signInRequired"),
            ));
            return SubmitOutcome::Unauthenticated;
        };

        match submit_entry(store, user_id, &entry, &session.offset).await {
            Ok(receipt) => {
                tracing::info!(
                    user_id = %user_id,
                    kind = %self.kind,
                    rows_written = receipt.rows_written,
                    "Record persisted"
                );
                notifier.notify(Notification::success(
                    localizer.t("success.recordAdded"),
                    localizer.t(self.kind.success_message_key()),
                ));
                on_success();
                SubmitOutcome::Persisted(receipt)
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, kind = %self.kind, error = %e, "Error adding record");
                notifier.notify(Notification::destructive(
                    localizer.t("errors.genericError"),
                    e.message.clone(),
                ));
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn spec(&self, field: &str) -> Option<&'static FieldSpec> {
        self.kind.schema().iter().find(|spec| spec.name == field)
    }
}

fn text(checked: &mut HashMap<&'static str, Checked>, name: &str) -> Option<String> {
    match checked.remove(name)? {
        Checked::Text(v) | Checked::Choice(v) | Checked::Time(v) => Some(v),
        _ => None,
    }
}

fn optional_text(checked: &mut HashMap<&'static str, Checked>, name: &str) -> Option<Option<String>> {
    match checked.remove(name)? {
        Checked::OptionalText(v) => Some(v),
        _ => None,
    }
}

fn number(checked: &mut HashMap<&'static str, Checked>, name: &str) -> Option<f64> {
    match checked.remove(name)? {
        Checked::Number(v) => Some(v),
        _ => None,
    }
}

fn date(checked: &mut HashMap<&'static str, Checked>, name: &str) -> Option<NaiveDate> {
    match checked.remove(name)? {
        Checked::Date(v) => Some(v),
        _ => None,
    }
}

fn recorded_at(checked: &mut HashMap<&'static str, Checked>) -> Option<RecordedAt> {
    Some(RecordedAt {
        date: date(checked, "recordedAtDate")?,
        time: text(checked, "recordedAtTime")?,
    })
}

fn build_entry(
    kind: RecordKind,
    checked: &mut HashMap<&'static str, Checked>,
) -> Option<RecordEntry> {
    let entry = match kind {
        RecordKind::Workout => RecordEntry::Workout(WorkoutData {
            workout_type: text(checked, "workoutType")?,
            duration: number(checked, "duration")?,
            calories_burned: number(checked, "caloriesBurned")?,
            recorded: recorded_at(checked)?,
        }),
        RecordKind::Meal => RecordEntry::Meal(MealData {
            description: text(checked, "description")?,
            // whole and within i32 range per the schema
            calories: number(checked, "calories")? as i32,
            meal_type: text(checked, "mealType")?.parse().ok()?,
            recorded: recorded_at(checked)?,
        }),
        RecordKind::Symptom => RecordEntry::Symptom(SymptomData {
            symptom_name: text(checked, "symptomName")?,
            severity: text(checked, "severity")?.parse().ok()?,
            notes: optional_text(checked, "notes")?,
            recorded: recorded_at(checked)?,
        }),
        RecordKind::Sleep => RecordEntry::Sleep(SleepLogData {
            sleep_date: date(checked, "sleepDate")?,
            duration: number(checked, "duration")?,
            quality: text(checked, "quality")?,
        }),
        RecordKind::Mood => RecordEntry::Mood(MoodLogData {
            mood_rating: text(checked, "moodRating")?,
            notes: optional_text(checked, "notes")?,
            recorded: recorded_at(checked)?,
        }),
    };
    Some(entry)
}
