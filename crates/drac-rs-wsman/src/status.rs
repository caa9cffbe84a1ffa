// crates/drac-rs-wsman/src/status.rs

//! Interpretation of the well-known status fields of "set" style WSMAN
//! method responses (`SetResult`, `RebootRequired`, `ReturnValue`).

use crate::document::Document;
use crate::error::WsmanError;
use crate::extract::raw_text;
use crate::log::wsman_warn;
use crate::query::Field;
use serde::{Serialize, Serializer};
use std::fmt;

/// Whether the pending changes of a "set" call need a node reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebootRequired {
    True,
    False,
    Optional,
}

impl RebootRequired {
    pub const ALL: [RebootRequired; 3] = [
        RebootRequired::True,
        RebootRequired::False,
        RebootRequired::Optional,
    ];

    /// Lower-case value used by the lifecycle controller in `RebootRequired`.
    pub fn wire_value(self) -> &'static str {
        match self {
            RebootRequired::True => "yes",
            RebootRequired::False => "no",
            RebootRequired::Optional => "optional",
        }
    }

    /// Maps a `RebootRequired` field value, ignoring case.
    ///
    /// # Errors
    /// Returns `UnmappedValue` for anything other than yes/no/optional.
    pub fn from_wire(value: &str) -> Result<Self, WsmanError> {
        let folded = value.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.wire_value() == folded)
            .ok_or_else(|| WsmanError::UnmappedValue {
                field: "RebootRequired",
                value: value.to_string(),
            })
    }
}

impl fmt::Display for RebootRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebootRequired::True => write!(f, "true"),
            RebootRequired::False => write!(f, "false"),
            RebootRequired::Optional => write!(f, "optional"),
        }
    }
}

/// Serialized as JSON `true`, `false` or `"optional"`.
impl Serialize for RebootRequired {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RebootRequired::True => serializer.serialize_bool(true),
            RebootRequired::False => serializer.serialize_bool(false),
            RebootRequired::Optional => serializer.serialize_str("optional"),
        }
    }
}

impl From<bool> for RebootRequired {
    fn from(value: bool) -> Self {
        if value {
            RebootRequired::True
        } else {
            RebootRequired::False
        }
    }
}

/// `ReturnValue` codes of WSMAN method invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnValue {
    Success,
    Error,
    /// The method created a job; see the `Job` reference in the response.
    Created,
}

impl ReturnValue {
    pub const ALL: [ReturnValue; 3] = [
        ReturnValue::Success,
        ReturnValue::Error,
        ReturnValue::Created,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ReturnValue::Success => "0",
            ReturnValue::Error => "2",
            ReturnValue::Created => "4096",
        }
    }

    /// # Errors
    /// Returns `UnmappedValue` for codes other than 0, 2 and 4096.
    pub fn from_code(code: &str) -> Result<Self, WsmanError> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.code() == code)
            .ok_or_else(|| WsmanError::UnmappedValue {
                field: "ReturnValue",
                value: code.to_string(),
            })
    }
}

impl Serialize for ReturnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Checks whether the response asks for a commit of pending values.
///
/// A commit is required when `SetResult` mentions "PendingValue" (any case).
///
/// # Errors
/// `MissingField` / `EmptyField` when `SetResult` is absent or has no text.
pub fn commit_pending(doc: &Document, resource_uri: &str) -> Result<bool, WsmanError> {
    let set_result = raw_text(doc, Field::new(resource_uri, "SetResult"))?;
    Ok(set_result.to_lowercase().contains("pendingvalue"))
}

/// Checks whether the response requests a reboot (`RebootRequired` is "yes").
///
/// A config job followed by a reboot lets the lifecycle controller apply
/// the pending changes.
///
/// # Errors
/// `MissingField` / `EmptyField` when `RebootRequired` is absent or has no text.
pub fn reboot_requested(doc: &Document, resource_uri: &str) -> Result<bool, WsmanError> {
    let reboot = raw_text(doc, Field::new(resource_uri, "RebootRequired"))?;
    Ok(reboot.to_lowercase() == "yes")
}

/// Reads `RebootRequired` as a three-way value.
///
/// # Errors
/// `MissingField` / `EmptyField` when the field is unusable, `UnmappedValue`
/// when it holds something other than yes/no/optional.
pub fn reboot_policy(doc: &Document, resource_uri: &str) -> Result<RebootRequired, WsmanError> {
    let field = Field::new(resource_uri, "RebootRequired");
    let reboot = raw_text(doc, field)?;
    RebootRequired::from_wire(reboot).inspect_err(|_| {
        wsman_warn!(field, "Unexpected RebootRequired value '{}'", reboot);
    })
}

/// Reads the `ReturnValue` of a method response.
pub fn return_value(doc: &Document, resource_uri: &str) -> Result<ReturnValue, WsmanError> {
    let field = Field::new(resource_uri, "ReturnValue");
    let code = raw_text(doc, field)?;
    ReturnValue::from_code(code.trim()).inspect_err(|_| {
        wsman_warn!(field, "Unexpected ReturnValue '{}'", code);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://schemas.dell.com/wbem/wscim/1/cim-schema/2/DCIM_BIOSService";

    fn response(set_result: &str, reboot: &str) -> Document {
        let xml = format!(
            r#"<n1:SetAttributes_OUTPUT xmlns:n1="{NS}">
                 <n1:Message>The command was successful.</n1:Message>
                 <n1:RebootRequired>{reboot}</n1:RebootRequired>
                 <n1:ReturnValue>0</n1:ReturnValue>
                 <n1:SetResult>{set_result}</n1:SetResult>
               </n1:SetAttributes_OUTPUT>"#
        );
        Document::parse(&xml).unwrap()
    }

    #[test]
    fn test_commit_pending() {
        assert!(commit_pending(&response("Configuration PendingValue", "No"), NS).unwrap());
        assert!(commit_pending(&response("set pendingVALUE", "No"), NS).unwrap());
        assert!(!commit_pending(&response("Success", "No"), NS).unwrap());
    }

    #[test]
    fn test_reboot_requested() {
        assert!(reboot_requested(&response("Set PendingValue", "YES"), NS).unwrap());
        assert!(!reboot_requested(&response("Set PendingValue", "No"), NS).unwrap());
        // Exact match only: "optional" is not a reboot request.
        assert!(!reboot_requested(&response("Set PendingValue", "Optional"), NS).unwrap());
    }

    #[test]
    fn test_reboot_policy_table() {
        let cases = [
            ("Yes", RebootRequired::True),
            ("yes", RebootRequired::True),
            ("no", RebootRequired::False),
            ("NO", RebootRequired::False),
            ("Optional", RebootRequired::Optional),
        ];
        for (text, expected) in cases {
            assert_eq!(
                reboot_policy(&response("x", text), NS).unwrap(),
                expected,
                "RebootRequired={text}"
            );
        }
    }

    #[test]
    fn test_reboot_policy_unmapped() {
        let err = reboot_policy(&response("x", "Maybe"), NS).unwrap_err();
        assert!(matches!(
            err,
            WsmanError::UnmappedValue { field: "RebootRequired", ref value } if value == "Maybe"
        ));
    }

    #[test]
    fn test_status_fields_must_be_present() {
        let doc = Document::parse(&format!(r#"<r xmlns:n1="{NS}"><n1:Other/></r>"#)).unwrap();
        assert!(matches!(
            commit_pending(&doc, NS),
            Err(WsmanError::MissingField { .. })
        ));
        assert!(matches!(
            reboot_policy(&doc, NS),
            Err(WsmanError::MissingField { .. })
        ));
        let empty = Document::parse(&format!(
            r#"<r xmlns:n1="{NS}"><n1:RebootRequired/></r>"#
        ))
        .unwrap();
        assert!(matches!(
            reboot_requested(&empty, NS),
            Err(WsmanError::EmptyField { .. })
        ));
    }

    #[test]
    fn test_lookup_tables_cover_every_variant() {
        for variant in RebootRequired::ALL {
            assert_eq!(RebootRequired::from_wire(variant.wire_value()).unwrap(), variant);
        }
        for variant in ReturnValue::ALL {
            assert_eq!(ReturnValue::from_code(variant.code()).unwrap(), variant);
        }
    }

    #[test]
    fn test_return_value() {
        assert_eq!(
            return_value(&response("x", "No"), NS).unwrap(),
            ReturnValue::Success
        );
        assert!(matches!(
            ReturnValue::from_code("1"),
            Err(WsmanError::UnmappedValue { field: "ReturnValue", .. })
        ));
    }
}
