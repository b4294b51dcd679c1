//! Request/response types for the record endpoints.
//!
//! Conventions:
//! - `*Request` / `*Query` → deserialized from the client
//! - `*Response` → serialized to the client
//! - Envelope-level checks use `validator` derives; field rules live in
//!   `pipeline::schema`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::gateway::WriteReceipt;
use crate::models::record::RecordKind;
use crate::pipeline::{Notification, RecordTypeOption};

// ============================================================================
// Record types
// ============================================================================

/// GET /api/record-types
#[derive(Debug, Serialize)]
pub struct RecordTypesResponse {
    pub title: String,
    pub description: Option<String>,
    pub placeholder: String,
    pub options: Vec<RecordTypeOption>,
}

// ============================================================================
// Record forms
// ============================================================================

/// Query for GET /api/records/:kind/form
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FormQuery {
    #[validate(range(min = -840, max = 840, message = "Offset must be within ±14 hours"))]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct FormFieldValue {
    pub name: &'static str,
    pub value: String,
}

/// GET /api/records/:kind/form
#[derive(Debug, Serialize)]
pub struct FormTemplateResponse {
    pub kind: RecordKind,
    pub title: String,
    pub fields: Vec<FormFieldValue>,
}

/// POST /api/records/:kind
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRecordRequest {
    /// Raw text per field, exactly as typed. Missing fields keep their
    /// defaults.
    #[serde(default)]
    pub fields: HashMap<String, String>,
    #[validate(range(min = -840, max = 840, message = "Offset must be within ±14 hours"))]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SubmitRecordResponse {
    pub receipt: WriteReceipt,
    pub notifications: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_range_is_checked() {
        let ok: SubmitRecordRequest =
            serde_json::from_str(r#"{"fields":{},"utc_offset_minutes":-300}"#).unwrap();
        assert!(ok.validate().is_ok());

        let bad: SubmitRecordRequest =
            serde_json::from_str(r#"{"utc_offset_minutes":900}"#).unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("utc_offset_minutes"));
    }

    #[test]
    fn test_fields_default_to_empty() {
        let req: SubmitRecordRequest = serde_json::from_str("{}").unwrap();
        assert!(req.fields.is_empty());
        assert!(req.utc_offset_minutes.is_none());
    }

    #[test]
    fn test_query_offset_bounds_are_inclusive() {
        assert!(FormQuery { utc_offset_minutes: Some(840) }.validate().is_ok());
        assert!(FormQuery { utc_offset_minutes: Some(-840) }.validate().is_ok());
        assert!(FormQuery { utc_offset_minutes: Some(-841) }.validate().is_err());
        assert!(FormQuery::default().validate().is_ok());
    }
}
