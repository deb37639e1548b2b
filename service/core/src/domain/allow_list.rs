// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Allow-List Value Objects
//!
//! An allow-list entry ([`IpAllowSpec`]) grants an IPv4 CIDR range to a
//! numeric account, either for good (`persistent`) or until an epoch
//! timestamp (`time-bounded`).
//!
//! Callers submit an [`IpAllowSpecDraft`]: the raw payload with every field
//! as received. Its `Validate` impl reports all invalid fields together, and
//! [`IpAllowSpecDraft::to_spec`] turns a valid draft into a typed
//! [`IpAllowSpec`].
//!
//! ## Wire shape
//!
//! ```json
//! {
//!   "ip": "10.0.0.0/24",
//!   "type": "time-bounded",
//!   "expiry": 1767225600,
//!   "accountId": "123456789012",
//!   "requestor": "alice",
//!   "approver": "bob"
//! }
//! ```
//!
//! `expiry` is only present for `time-bounded` entries.

use std::fmt;
use std::str::FromStr;

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::validation::{
    check, into_result, is_numeric, numeric_error, required_if, single, validate_access_kind, validate_cidrv4,
    validate_numeric, validate_required, CIDRV4,
};

pub const PERSISTENT: &str = "persistent";
pub const TIME_BOUNDED: &str = "time-bounded";

pub const KINDS: &[&str] = &[PERSISTENT, TIME_BOUNDED];

#[derive(Debug, Error)]
#[error("invalid IPv4 CIDR '{0}'")]
pub struct CidrParseError(String);

/// IPv4 network in CIDR notation. The prefix length is mandatory and must be
/// written in plain decimal, so the stored form always matches the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Cidr(Ipv4Network);

impl Ipv4Cidr {
    pub fn parse(raw: &str) -> Result<Self, CidrParseError> {
        let invalid = || CidrParseError(raw.to_string());

        // ipnetwork also takes netmasks and signed or zero-padded prefixes
        let (_, prefix) = raw.split_once('/').ok_or_else(invalid)?;
        let plain_decimal = matches!(prefix.len(), 1 | 2)
            && prefix.bytes().all(|b| b.is_ascii_digit())
            && (prefix == "0" || !prefix.starts_with('0'));
        if !plain_decimal {
            return Err(invalid());
        }

        raw.parse::<Ipv4Network>().map(Self).map_err(|_| invalid())
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.ip(), self.0.prefix())
    }
}

impl FromStr for Ipv4Cidr {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = CidrParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ipv4Cidr> for String {
    fn from(value: Ipv4Cidr) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Error)]
#[error("invalid account id '{0}': expected digits only")]
pub struct AccountIdParseError(String);

/// Numeric account identifier (e.g. a 12-digit cloud account number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(raw: &str) -> Result<Self, AccountIdParseError> {
        if is_numeric(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AccountIdParseError(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

/// How long an allow-list entry lasts. The expiry exists only for
/// time-bounded entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AccessTerm {
    Persistent,
    TimeBounded {
        /// Unix epoch seconds
        expiry: i64,
    },
}

impl AccessTerm {
    pub fn kind(&self) -> &'static str {
        match self {
            AccessTerm::Persistent => PERSISTENT,
            AccessTerm::TimeBounded { .. } => TIME_BOUNDED,
        }
    }

    pub fn expiry(&self) -> Option<i64> {
        match self {
            AccessTerm::Persistent => None,
            AccessTerm::TimeBounded { expiry } => Some(*expiry),
        }
    }

    /// Rebuilds a term from its stored columns.
    pub fn from_parts(kind: &str, expiry: Option<i64>) -> Option<Self> {
        match (kind, expiry) {
            (PERSISTENT, _) => Some(AccessTerm::Persistent),
            (TIME_BOUNDED, Some(expiry)) if expiry > 0 => Some(AccessTerm::TimeBounded { expiry }),
            _ => None,
        }
    }
}

/// Lookup key of the allow-list store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllowListKey {
    pub ip: Ipv4Cidr,
    pub account_id: AccountId,
}

impl AllowListKey {
    pub fn new(ip: Ipv4Cidr, account_id: AccountId) -> Self {
        Self { ip, account_id }
    }

    /// Validates raw lookup parameters, reporting both fields if both are bad.
    pub fn parse(ip: &str, account_id: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check(&mut errors, "ip", validate_cidrv4(ip));
        check(&mut errors, "accountId", validate_numeric(account_id));
        into_result(errors)?;

        Ok(Self {
            ip: parse_cidr("ip", ip)?,
            account_id: parse_account("accountId", account_id)?,
        })
    }
}

impl fmt::Display for AllowListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ip, self.account_id)
    }
}

/// A validated allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAllowSpec {
    pub ip: Ipv4Cidr,
    #[serde(flatten)]
    pub term: AccessTerm,
    pub account_id: AccountId,
    pub requestor: String,
    pub approver: String,
}

impl IpAllowSpec {
    pub fn key(&self) -> AllowListKey {
        AllowListKey::new(self.ip, self.account_id.clone())
    }

    pub fn kind(&self) -> &'static str {
        self.term.kind()
    }

    pub fn expiry(&self) -> Option<i64> {
        self.term.expiry()
    }
}

/// Unvalidated allow-list payload exactly as a caller sent it.
///
/// Also accepts the legacy field names `kind` (for `type`) and
/// `awsAccountId` (for `accountId`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAllowSpecDraft {
    #[serde(default)]
    pub ip: String,

    #[serde(default, rename = "type", alias = "kind")]
    pub kind: String,

    #[serde(default, alias = "awsAccountId")]
    pub account_id: String,

    /// Epoch seconds as a JSON number or a digit string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Value>,

    #[serde(default)]
    pub requestor: String,

    #[serde(default)]
    pub approver: String,
}

impl Validate for IpAllowSpecDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(&mut errors, "ip", validate_cidrv4(&self.ip));
        check(&mut errors, "type", validate_access_kind(&self.kind));
        if self.kind == TIME_BOUNDED {
            check(&mut errors, "expiry", parse_expiry(self.expiry.as_ref()).map(|_| ()));
        }
        check(&mut errors, "accountId", validate_numeric(&self.account_id));
        check(&mut errors, "requestor", validate_required(&self.requestor));
        check(&mut errors, "approver", validate_required(&self.approver));

        into_result(errors)
    }
}

impl IpAllowSpecDraft {
    /// Validates every field and builds the typed entry.
    ///
    /// An `expiry` sent with a `persistent` entry is ignored and dropped.
    pub fn to_spec(&self) -> Result<IpAllowSpec, ValidationErrors> {
        self.validate()?;

        let term = if self.kind == PERSISTENT {
            AccessTerm::Persistent
        } else {
            let expiry = parse_expiry(self.expiry.as_ref()).map_err(|e| single("expiry", e))?;
            AccessTerm::TimeBounded { expiry }
        };

        Ok(IpAllowSpec {
            ip: parse_cidr("ip", &self.ip)?,
            term,
            account_id: parse_account("accountId", &self.account_id)?,
            requestor: self.requestor.clone(),
            approver: self.approver.clone(),
        })
    }
}

impl From<IpAllowSpec> for IpAllowSpecDraft {
    fn from(spec: IpAllowSpec) -> Self {
        Self {
            ip: spec.ip.to_string(),
            kind: spec.kind().to_string(),
            account_id: spec.account_id.to_string(),
            expiry: spec.expiry().map(Value::from),
            requestor: spec.requestor,
            approver: spec.approver,
        }
    }
}

fn parse_cidr(field: &'static str, raw: &str) -> Result<Ipv4Cidr, ValidationErrors> {
    validate_cidrv4(raw).map_err(|e| single(field, e))?;
    Ipv4Cidr::parse(raw).map_err(|_| single(field, ValidationError::new(CIDRV4)))
}

fn parse_account(field: &'static str, raw: &str) -> Result<AccountId, ValidationErrors> {
    validate_numeric(raw).map_err(|e| single(field, e))?;
    AccountId::parse(raw).map_err(|_| single(field, numeric_error()))
}

/// Zero counts as absent, matching how the entry is stored.
fn parse_expiry(raw: Option<&Value>) -> Result<i64, ValidationError> {
    let required = || required_if("type", TIME_BOUNDED);

    let expiry = match raw {
        None | Some(Value::Null) => return Err(required()),
        Some(Value::Number(n)) => n.as_i64().filter(|v| *v >= 0).ok_or_else(numeric_error)?,
        Some(Value::String(s)) if s.trim().is_empty() => return Err(required()),
        Some(Value::String(s)) if is_numeric(s) => s.parse::<i64>().map_err(|_| numeric_error())?,
        Some(_) => return Err(numeric_error()),
    };

    if expiry == 0 {
        return Err(required());
    }
    Ok(expiry)
}
