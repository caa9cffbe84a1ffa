// crates/drac-rs-wsman/src/error.rs

use core::fmt;
use quick_xml::Error as XmlError;
use quick_xml::encoding::EncodingError;
use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;

/// Errors that can occur while parsing a WSMAN response or extracting fields from it.
#[derive(Debug)]
pub enum WsmanError {
    /// An error from the underlying `quick-xml` reader (malformed XML, bad escapes, ...).
    XmlParsing(XmlError),

    /// The document ended with open elements, had no root element or had several.
    MalformedDocument { reason: &'static str },

    /// An element or attribute used a namespace prefix that was never declared.
    UnknownPrefix { prefix: String },

    /// A required field was absent from the response document.
    MissingField { attr: String },

    /// A required field was present in the response document but carried no text.
    EmptyField { attr: String },

    /// A caller-supplied value was outside its allowed set.
    InvalidParameterValue { reason: String },

    /// A field value has no entry in a fixed lookup table (e.g. `RebootRequired`).
    UnmappedValue { field: &'static str, value: String },
}

impl From<XmlError> for WsmanError {
    fn from(e: XmlError) -> Self {
        WsmanError::XmlParsing(e)
    }
}

impl From<AttrError> for WsmanError {
    fn from(e: AttrError) -> Self {
        WsmanError::XmlParsing(XmlError::from(e))
    }
}

impl From<EncodingError> for WsmanError {
    fn from(e: EncodingError) -> Self {
        WsmanError::XmlParsing(XmlError::from(e))
    }
}

impl From<EscapeError> for WsmanError {
    fn from(e: EscapeError) -> Self {
        WsmanError::XmlParsing(XmlError::from(e))
    }
}

impl fmt::Display for WsmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WsmanError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            WsmanError::MalformedDocument { reason } => {
                write!(f, "Malformed XML document: {}", reason)
            }
            WsmanError::UnknownPrefix { prefix } => {
                write!(f, "Unknown XML namespace prefix: {}", prefix)
            }
            WsmanError::MissingField { attr } => {
                write!(f, "Attribute {} is missing from the response", attr)
            }
            WsmanError::EmptyField { attr } => {
                write!(f, "Attribute {} is empty in the response", attr)
            }
            WsmanError::InvalidParameterValue { reason } => {
                write!(f, "Invalid parameter value: {}", reason)
            }
            WsmanError::UnmappedValue { field, value } => {
                write!(f, "Unexpected value '{}' for field {}", value, field)
            }
        }
    }
}

impl std::error::Error for WsmanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WsmanError::XmlParsing(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WsmanError;
    use std::error::Error;

    #[test]
    fn test_from_xml_error() {
        let xml_err = quick_xml::Error::Syntax(quick_xml::errors::SyntaxError::UnclosedTag);
        let wsman_err: WsmanError = xml_err.into();
        assert!(matches!(wsman_err, WsmanError::XmlParsing(_)));
        assert!(wsman_err.source().is_some());
    }

    #[test]
    fn test_from_escape_error() {
        let escape_err = quick_xml::escape::unescape("&bogus;").unwrap_err();
        let wsman_err: WsmanError = escape_err.into();
        assert!(matches!(wsman_err, WsmanError::XmlParsing(_)));
    }

    #[test]
    fn test_field_error_messages() {
        let missing = WsmanError::MissingField {
            attr: "JobID".to_string(),
        };
        assert_eq!(
            missing.to_string(),
            "Attribute JobID is missing from the response"
        );

        let empty = WsmanError::EmptyField {
            attr: "JobID".to_string(),
        };
        assert_eq!(empty.to_string(), "Attribute JobID is empty in the response");
        assert!(empty.source().is_none());
    }

    #[test]
    fn test_unmapped_value_message() {
        let err = WsmanError::UnmappedValue {
            field: "RebootRequired",
            value: "sometimes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected value 'sometimes' for field RebootRequired"
        );
    }
}
