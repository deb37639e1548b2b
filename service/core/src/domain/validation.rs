// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Input Validation
//!
//! Field checks applied to raw caller input before any storage I/O, built on
//! the `validator` crate. Each check returns a [`ValidationError`] whose code
//! is the rule tag reported to callers:
//!
//! | Check | Tag | Accepts |
//! |-------|-----|---------|
//! | [`validate_required`] | `required` | any non-blank value |
//! | [`validate_cidrv4`] | `cidrv4` | IPv4 CIDR with a plain decimal prefix (`10.0.0.0/24`) |
//! | [`validate_numeric`] | `numeric` | ASCII digits only |
//! | [`validate_access_kind`] | `oneof` | `persistent` or `time-bounded` |
//! | [`required_if`] | `required_if` | non-blank, checked only when a sibling field has a given value |
//!
//! The format checks report a blank value as `required`, so a field carries
//! at most one error. Failures across fields are collected into one
//! [`ValidationErrors`] keyed by wire field name.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

use crate::domain::allow_list::{Ipv4Cidr, KINDS};

pub const REQUIRED: &str = "required";
pub const CIDRV4: &str = "cidrv4";
pub const NUMERIC: &str = "numeric";
pub const ONEOF: &str = "oneof";
pub const REQUIRED_IF: &str = "required_if";

fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(rule_error(REQUIRED, "value is required"));
    }
    Ok(())
}

pub fn validate_cidrv4(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if Ipv4Cidr::parse(value).is_err() {
        return Err(rule_error(CIDRV4, "must be an IPv4 CIDR such as 10.0.0.0/24"));
    }
    Ok(())
}

pub fn validate_numeric(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if !is_numeric(value) {
        return Err(rule_error(NUMERIC, "must contain only digits"));
    }
    Ok(())
}

pub fn validate_access_kind(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if !KINDS.contains(&value) {
        return Err(rule_error(ONEOF, format!("must be one of: {}", KINDS.join(", "))));
    }
    Ok(())
}

/// Error for a value that must be present because `field` is `value`.
pub fn required_if(field: &str, value: &str) -> ValidationError {
    rule_error(REQUIRED_IF, format!("is required when {field} is '{value}'"))
}

pub fn numeric_error() -> ValidationError {
    rule_error(NUMERIC, "must contain only digits")
}

pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Adds the check's error, if any, under `field`.
pub fn check(errors: &mut ValidationErrors, field: &'static str, result: Result<(), ValidationError>) {
    if let Err(e) = result {
        errors.add(field, e);
    }
}

pub fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn single(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// A single failed rule on a single field, as sent to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: String,
    #[serde(default)]
    pub message: String,
}

/// Flattens the errors into violations ordered by field name.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldViolation {
                field: field.to_string(),
                rule: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| format!("{field} {m}"))
                    .unwrap_or_default(),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.rule.cmp(&b.rule)));
    out
}

/// One-line summary such as `accountId (numeric), ip (cidrv4)`.
pub fn summarize(errors: &ValidationErrors) -> String {
    violations(errors)
        .iter()
        .map(|v| format!("{} ({})", v.field, v.rule))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(result: Result<(), ValidationError>) -> Option<String> {
        result.err().map(|e| e.code.to_string())
    }

    #[test]
    fn test_required_rejects_blank() {
        assert_eq!(code(validate_required("")), Some("required".into()));
        assert_eq!(code(validate_required("   ")), Some("required".into()));
        assert_eq!(code(validate_required("alice")), None);
    }

    #[test]
    fn test_cidr_check() {
        assert_eq!(code(validate_cidrv4("10.0.0.0/24")), None);
        assert_eq!(code(validate_cidrv4("192.168.1.7/32")), None);
        assert_eq!(code(validate_cidrv4("")), Some("required".into()));
        for bad in ["10.0.0.0", "10.0.0.0/33", "fd00::/8", "not-an-ip", "10.0.0.0/255.255.255.0"] {
            assert_eq!(code(validate_cidrv4(bad)), Some("cidrv4".into()), "{bad}");
        }
    }

    #[test]
    fn test_numeric_check_accepts_digits_only() {
        assert_eq!(code(validate_numeric("123456789012")), None);
        assert_eq!(code(validate_numeric("")), Some("required".into()));
        for bad in ["-12", "12a", "1.5", "+7"] {
            assert_eq!(code(validate_numeric(bad)), Some("numeric".into()), "{bad}");
        }
    }

    #[test]
    fn test_access_kind_check() {
        assert_eq!(code(validate_access_kind("persistent")), None);
        assert_eq!(code(validate_access_kind("time-bounded")), None);
        assert_eq!(code(validate_access_kind("Persistent")), Some("oneof".into()));
        assert_eq!(code(validate_access_kind("temporary")), Some("oneof".into()));
    }

    #[test]
    fn test_violations_are_ordered_and_prefixed() {
        let mut errors = ValidationErrors::new();
        check(&mut errors, "ip", validate_cidrv4("10.0.0.1"));
        check(&mut errors, "accountId", validate_numeric("12x"));
        check(&mut errors, "approver", validate_required("bob"));

        let list = violations(&errors);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].field, "accountId");
        assert_eq!(list[0].rule, "numeric");
        assert_eq!(list[0].message, "accountId must contain only digits");
        assert_eq!(list[1].field, "ip");

        assert_eq!(summarize(&errors), "accountId (numeric), ip (cidrv4)");
        assert!(into_result(errors).is_err());
        assert!(into_result(ValidationErrors::new()).is_ok());
    }
}
