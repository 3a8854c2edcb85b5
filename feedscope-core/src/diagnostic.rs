//! Validation issues and error-site classification.
//!
//! The validation engine reports each failure as a message, a schema keyword
//! and an instance pointer. [`locate`] turns one of those records into an
//! [`ErrorSite`] describing what to highlight in the source document.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pointer::{self, parse_index};
use crate::JsonValue;

static MISSING_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)required key\s+\[([^\]]+)\]").expect("Invalid missing-key regex")
});

/// One validation failure as produced by the GBFS validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub message: String,
    pub keyword: String,
    pub instance_path: String,
    #[serde(default)]
    pub schema_path: String,
}

impl ValidationIssue {
    pub fn new(
        message: impl Into<String>,
        keyword: impl Into<String>,
        instance_path: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            keyword: keyword.into(),
            instance_path: instance_path.into(),
            schema_path: String::new(),
        }
    }

    pub fn with_schema_path(mut self, schema_path: impl Into<String>) -> Self {
        self.schema_path = schema_path.into();
        self
    }

    pub fn kind(&self) -> IssueKind {
        IssueKind::from_keyword(&self.keyword)
    }
}

/// Classification branch selected by the schema keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    MissingRequired,
    EnumViolation,
    Other,
}

impl IssueKind {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim() {
            "required" => Self::MissingRequired,
            "enum" => Self::EnumViolation,
            _ => Self::Other,
        }
    }
}

/// Where a validation error sits inside its document.
///
/// Paths are unescaped pointer segments from the document root.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSite {
    /// An object is missing a required key. The pointer names the object,
    /// since the key itself cannot be addressed.
    MissingRequiredKey { object: Vec<String>, key: String },
    /// A value outside its allowed set.
    EnumViolation { location: Vec<String>, value: JsonValue },
    /// An element of an array.
    ArrayElement {
        array: Vec<String>,
        index: usize,
        value: JsonValue,
    },
    /// Any other resolved value.
    Leaf { location: Vec<String>, value: JsonValue },
}

impl ErrorSite {
    /// Segments of the offending location. For a missing key this includes
    /// the key name.
    pub fn location(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredKey { object, key } => {
                let mut location = object.clone();
                location.push(key.clone());
                location
            }
            Self::EnumViolation { location, .. } | Self::Leaf { location, .. } => location.clone(),
            Self::ArrayElement { array, index, .. } => {
                let mut location = array.clone();
                location.push(index.to_string());
                location
            }
        }
    }

    /// Pointer form of [`ErrorSite::location`].
    pub fn pointer(&self) -> String {
        pointer::to_pointer(&self.location())
    }

    /// The offending value, if the location exists.
    pub fn value(&self) -> Option<&JsonValue> {
        match self {
            Self::MissingRequiredKey { .. } => None,
            Self::EnumViolation { value, .. }
            | Self::ArrayElement { value, .. }
            | Self::Leaf { value, .. } => Some(value),
        }
    }
}

/// Extract NAME from a "required key [NAME]" message.
///
/// The literal words match case-insensitively; NAME is returned verbatim.
pub fn classify_missing_key(message: &str) -> Option<String> {
    MISSING_KEY_PATTERN
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
}

/// Classify the location of `issue` inside `root`.
///
/// Returns `None` when the instance pointer does not resolve.
pub fn locate(root: &JsonValue, issue: &ValidationIssue) -> Option<ErrorSite> {
    let segments = pointer::segments(&issue.instance_path);
    let target = pointer::resolve_segments(root, &segments)?;
    let kind = issue.kind();

    if kind == IssueKind::MissingRequired && target.is_object() {
        if let Some(key) = classify_missing_key(&issue.message) {
            return Some(ErrorSite::MissingRequiredKey {
                object: segments,
                key,
            });
        }
    }

    if kind == IssueKind::EnumViolation {
        return Some(ErrorSite::EnumViolation {
            location: segments,
            value: target.clone(),
        });
    }

    if let Some((last, parent)) = segments.split_last() {
        let parent_is_array = pointer::resolve_segments(root, parent)
            .map(JsonValue::is_array)
            .unwrap_or(false);
        if let (true, Some(index)) = (parent_is_array, parse_index(last)) {
            return Some(ErrorSite::ArrayElement {
                array: parent.to_vec(),
                index,
                value: target.clone(),
            });
        }
    }

    Some(ErrorSite::Leaf {
        location: segments,
        value: target.clone(),
    })
}
