// crates/drac-rs-wsman/src/extract.rs

//! Text extraction for fields of a WSMAN resource.

use crate::document::{Document, Element};
use crate::error::WsmanError;
use crate::log::wsman_debug;
use crate::query::{Field, find_all_xml, find_xml, is_non_nil};

/// Controls how a missing or nil field is reported by [`get_attribute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Treat an element carrying `xsi:nil="true"` as "no value" instead of
    /// requiring text.
    pub nullable: bool,
    /// Return `None` instead of `MissingField` when the element is absent.
    pub allow_missing: bool,
}

impl FieldOptions {
    /// Field must be present and must have text.
    pub const REQUIRED: FieldOptions = FieldOptions {
        nullable: false,
        allow_missing: false,
    };

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn allow_missing(mut self) -> Self {
        self.allow_missing = true;
        self
    }
}

/// Reads the value of a resource attribute from a response document.
///
/// # Arguments
/// * `doc` - The parsed response.
/// * `resource_uri` - Resource URI, used as the namespace of the element.
/// * `attr_name` - Name of the attribute element.
/// * `options` - Whether nil values and absent elements are tolerated.
///
/// # Errors
/// * `MissingField` if the element is absent and `allow_missing` is not set.
/// * `EmptyField` if the element has no text and is not a tolerated nil.
///
/// Returns the trimmed text, or `None` for a tolerated absence or nil.
pub fn get_attribute(
    doc: &Document,
    resource_uri: &str,
    attr_name: &str,
    options: FieldOptions,
) -> Result<Option<String>, WsmanError> {
    let field = Field::new(resource_uri, attr_name);

    let Some(item) = find_xml(doc, attr_name, resource_uri) else {
        if options.allow_missing {
            return Ok(None);
        }
        wsman_debug!(field, "Required field is missing from the response");
        return Err(WsmanError::MissingField {
            attr: attr_name.to_string(),
        });
    };

    if options.nullable && !is_non_nil(item) {
        return Ok(None);
    }
    required_text(field, item).map(Some)
}

/// Reads every instance of a resource attribute, in document order.
///
/// With `nullable` set, elements carrying `xsi:nil="true"` are skipped.
///
/// # Errors
/// Returns `EmptyField` if any retained element has no text.
pub fn get_all_attributes(
    doc: &Document,
    resource_uri: &str,
    attr_name: &str,
    nullable: bool,
) -> Result<Vec<String>, WsmanError> {
    let field = Field::new(resource_uri, attr_name);

    find_all_xml(doc, attr_name, resource_uri)
        .into_iter()
        .filter(|item| !nullable || is_non_nil(item))
        .map(|item| required_text(field, item))
        .collect()
}

/// Raw text of the first matching element, failing like a required field.
/// Unlike [`get_attribute`] the text is returned untrimmed.
pub(crate) fn raw_text<'d>(doc: &'d Document, field: Field<'_>) -> Result<&'d str, WsmanError> {
    let item = find_xml(doc, field.name, field.resource_uri).ok_or_else(|| {
        wsman_debug!(field, "Required field is missing from the response");
        WsmanError::MissingField {
            attr: field.name.to_string(),
        }
    })?;
    present_text(field, item)
}

fn required_text(field: Field<'_>, item: &Element) -> Result<String, WsmanError> {
    present_text(field, item).map(|text| text.trim().to_string())
}

fn present_text<'d>(field: Field<'_>, item: &'d Element) -> Result<&'d str, WsmanError> {
    match item.text.as_deref() {
        Some(text) if !text.is_empty() => Ok(text),
        _ => {
            wsman_debug!(field, "Field is present but has no text");
            Err(WsmanError::EmptyField {
                attr: field.name.to_string(),
            })
        }
    }
}
