// crates/drac-rs-wsman/src/result.rs

//! The result record returned by WSMAN operations that are not read-only.

use crate::document::Document;
use crate::error::WsmanError;
use crate::status::{RebootRequired, commit_pending, reboot_policy, reboot_requested};
use serde::Serialize;
use std::fmt;

/// Outcome of a configuration change as reported by the lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    /// Pending values must be committed through a config job.
    pub is_commit_required: bool,
    /// Whether the node must (or may) be rebooted to apply the changes.
    pub is_reboot_required: RebootRequired,
    /// Deprecated. Despite the name, this reports whether a reboot was
    /// requested (`RebootRequired` is "yes").
    pub commit_required: bool,
}

/// A caller-provided `is_reboot_required` value, validated by [`build_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebootValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for RebootValue {
    fn from(value: bool) -> Self {
        RebootValue::Bool(value)
    }
}

impl From<&str> for RebootValue {
    fn from(value: &str) -> Self {
        RebootValue::Text(value.to_string())
    }
}

impl From<String> for RebootValue {
    fn from(value: String) -> Self {
        RebootValue::Text(value)
    }
}

impl From<RebootRequired> for RebootValue {
    fn from(value: RebootRequired) -> Self {
        match value {
            RebootRequired::True => RebootValue::Bool(true),
            RebootRequired::False => RebootValue::Bool(false),
            RebootRequired::Optional => RebootValue::Text("optional".to_string()),
        }
    }
}

impl fmt::Display for RebootValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebootValue::Bool(value) => write!(f, "{}", value),
            RebootValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl TryFrom<&RebootValue> for RebootRequired {
    type Error = WsmanError;

    /// Accepts `true`, `false` and the exact string `"optional"`.
    fn try_from(value: &RebootValue) -> Result<Self, Self::Error> {
        match value {
            RebootValue::Bool(flag) => Ok(RebootRequired::from(*flag)),
            RebootValue::Text(text) if text == "optional" => Ok(RebootRequired::Optional),
            RebootValue::Text(_) => Err(WsmanError::InvalidParameterValue {
                reason: format!(
                    "is_reboot_required_value must be a member of the RebootRequired \
                     enumeration or None.  The passed value was {}",
                    value
                ),
            }),
        }
    }
}

/// Values that replace the ones otherwise read from the response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultOverrides {
    pub is_commit_required: Option<bool>,
    pub is_reboot_required: Option<RebootValue>,
    pub commit_required: Option<bool>,
}

impl ResultOverrides {
    pub fn is_commit_required(mut self, value: bool) -> Self {
        self.is_commit_required = Some(value);
        self
    }

    pub fn is_reboot_required(mut self, value: impl Into<RebootValue>) -> Self {
        self.is_reboot_required = Some(value.into());
        self
    }

    pub fn commit_required(mut self, value: bool) -> Self {
        self.commit_required = Some(value);
        self
    }
}

/// Builds the result record of a non read-only WSMAN operation.
///
/// Each field takes its override when one is given and is read from the
/// response otherwise:
/// * `is_commit_required` from `SetResult` ([`commit_pending`]),
/// * `is_reboot_required` from `RebootRequired` ([`reboot_policy`]),
/// * `commit_required` from `RebootRequired` ([`reboot_requested`]).
///
/// # Errors
/// `InvalidParameterValue` if the `is_reboot_required` override is not
/// `true`, `false` or `"optional"`; this is checked before the document is
/// read. Otherwise any error of the readers above.
pub fn build_result(
    doc: &Document,
    resource_uri: &str,
    overrides: &ResultOverrides,
) -> Result<CommitResult, WsmanError> {
    let reboot_override = overrides
        .is_reboot_required
        .as_ref()
        .map(RebootRequired::try_from)
        .transpose()?;

    let is_commit_required = match overrides.is_commit_required {
        Some(value) => value,
        None => commit_pending(doc, resource_uri)?,
    };

    let is_reboot_required = match reboot_override {
        Some(value) => value,
        None => reboot_policy(doc, resource_uri)?,
    };

    // TODO: drop `commit_required` once callers have moved to `is_reboot_required`.
    let commit_required = match overrides.commit_required {
        Some(value) => value,
        None => reboot_requested(doc, resource_uri)?,
    };

    Ok(CommitResult {
        is_commit_required,
        is_reboot_required,
        commit_required,
    })
}
