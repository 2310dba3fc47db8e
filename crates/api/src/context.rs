//! Request bodies that carry an evaluation context.
//!
//! Client devices send numeric fields either as JSON numbers or as numeric
//! strings, and driver/vehicle identifiers as either. Fields are kept as raw
//! JSON until validation so every problem can be reported in one response.

use std::borrow::Cow;

use releasegate_core::release::parse_version_code;
use releasegate_core::rules::{normalize_country, normalize_identifier, EvaluationContext};
use releasegate_core::types::DbId;
use releasegate_core::update_check::ReportedVersion;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::{Validate, ValidationError};

use crate::error::{AppError, FieldError};

/// Body of `POST /api/v1/updates/check`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckUpdateRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_id"))]
    pub app_id: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_country"))]
    pub country: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_integer"))]
    pub company_id: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_identifier"))]
    pub driver_id: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_identifier"))]
    pub vehicle_id: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_text"))]
    pub version_name: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_version_code"))]
    pub version_code: Value,
    /// Opaque passthrough references; logged, never matched.
    #[serde(default)]
    pub company_ref: Option<Value>,
    #[serde(default)]
    pub driver_ref: Option<Value>,
    #[serde(default)]
    pub vehicle_ref: Option<Value>,
}

/// A validated update-check request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCheckInput {
    pub application_id: DbId,
    pub context: EvaluationContext,
    pub current: ReportedVersion,
    /// `companyRef`/`driverRef`/`vehicleRef` as sent.
    pub references: Value,
}

impl CheckUpdateRequest {
    /// Validate every field and convert into typed input.
    pub fn into_input(self) -> Result<UpdateCheckInput, AppError> {
        self.validate()?;

        let application_id = as_integer(&self.app_id).ok_or_else(|| invalid("appId"))?;
        let company_id = as_integer(&self.company_id).ok_or_else(|| invalid("companyId"))?;
        let country = as_text(&self.country).ok_or_else(|| invalid("country"))?;
        let driver_id = as_identifier(&self.driver_id).ok_or_else(|| invalid("driverId"))?;
        let vehicle_id = as_identifier(&self.vehicle_id).ok_or_else(|| invalid("vehicleId"))?;
        let version_name = as_text(&self.version_name).ok_or_else(|| invalid("versionName"))?;
        let version_code =
            as_version_code(&self.version_code).ok_or_else(|| invalid("versionCode"))?;

        Ok(UpdateCheckInput {
            application_id,
            context: EvaluationContext::new()
                .with_country(country)
                .with_company_id(company_id)
                .with_driver_id(driver_id)
                .with_vehicle_id(vehicle_id),
            current: ReportedVersion {
                version_name,
                version_code,
            },
            references: json!({
                "companyRef": self.company_ref,
                "driverRef": self.driver_ref,
                "vehicleRef": self.vehicle_ref
            }),
        })
    }
}

/// Context body for the administrative evaluation endpoints. Every field is
/// optional; an absent field leaves its dimension unset.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextBody {
    #[serde(default)]
    pub country: Value,
    #[serde(default)]
    pub company_id: Value,
    #[serde(default)]
    pub driver_id: Value,
    #[serde(default)]
    pub vehicle_id: Value,
}

impl ContextBody {
    pub fn into_context(self) -> Result<EvaluationContext, AppError> {
        let mut errors = Vec::new();
        let mut context = EvaluationContext::new();

        if !self.country.is_null() {
            match as_text(&self.country) {
                Some(country) => context = context.with_country(country),
                None => errors.push(FieldError::new("country", "must be a non-empty string")),
            }
        }
        if !self.company_id.is_null() {
            match as_integer(&self.company_id) {
                Some(id) => context = context.with_company_id(id),
                None => errors.push(FieldError::new("companyId", "must be an integer")),
            }
        }
        if !self.driver_id.is_null() {
            match as_identifier(&self.driver_id) {
                Some(id) => context = context.with_driver_id(id),
                None => errors.push(FieldError::new("driverId", "must be a string or integer")),
            }
        }
        if !self.vehicle_id.is_null() {
            match as_identifier(&self.vehicle_id) {
                Some(id) => context = context.with_vehicle_id(id),
                None => errors.push(FieldError::new("vehicleId", "must be a string or integer")),
            }
        }

        if errors.is_empty() {
            Ok(context)
        } else {
            Err(AppError::InvalidFields(errors))
        }
    }
}

fn invalid(field: &str) -> AppError {
    AppError::InvalidFields(vec![FieldError::new(field, "is invalid")])
}

// ---------------------------------------------------------------------------
// Lenient scalar parsing
// ---------------------------------------------------------------------------

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Integers become their decimal form; strings are trimmed.
fn as_identifier(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Value::String(s) => normalize_identifier(s),
        _ => None,
    }
}

fn as_version_code(value: &Value) -> Option<u64> {
    let code = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => parse_version_code(s).ok(),
        _ => None,
    }?;
    (code > 0).then_some(code)
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn check(
    value: &Value,
    accepted: bool,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.is_null() {
        Err(failure("required", "is required"))
    } else if accepted {
        Ok(())
    } else {
        Err(failure(code, message))
    }
}

fn validate_id(value: &Value) -> Result<(), ValidationError> {
    let accepted = as_integer(value).is_some_and(|id| id > 0);
    check(value, accepted, "id", "must be a positive integer")
}

fn validate_integer(value: &Value) -> Result<(), ValidationError> {
    check(value, as_integer(value).is_some(), "integer", "must be an integer")
}

fn validate_country(value: &Value) -> Result<(), ValidationError> {
    let accepted = as_text(value).and_then(|c| normalize_country(&c)).is_some();
    check(value, accepted, "country", "must be a non-empty string")
}

fn validate_identifier(value: &Value) -> Result<(), ValidationError> {
    check(
        value,
        as_identifier(value).is_some(),
        "identifier",
        "must be a non-empty string or an integer",
    )
}

fn validate_text(value: &Value) -> Result<(), ValidationError> {
    check(value, as_text(value).is_some(), "text", "must be a non-empty string")
}

fn validate_version_code(value: &Value) -> Result<(), ValidationError> {
    check(
        value,
        as_version_code(value).is_some(),
        "version_code",
        "must be a positive integer",
    )
}
