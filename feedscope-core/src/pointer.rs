//! Pointer parsing and resolution over JSON documents.
//!
//! Pointers arrive from the validation engine in the `#/data/stations/3/name`
//! form. A pointer is split on `/` after dropping one leading `#`, empty
//! segments are discarded, and each segment is unescaped with `~1` -> `/`
//! followed by `~0` -> `~`.
//!
//! Resolution never fails: a location that does not exist is reported as
//! `None`, which is distinct from a location that holds `null`.

use crate::JsonValue;

/// Split a pointer into unescaped segments.
///
/// `"#/a//b/"` yields `["a", "b"]`; `"#"` and `""` yield no segments.
pub fn segments(path: &str) -> Vec<String> {
    let body = path.strip_prefix('#').unwrap_or(path);
    body.split('/')
        .filter(|raw| !raw.is_empty())
        .map(unescape_segment)
        .collect()
}

/// Decode one raw segment.
///
/// Two sequential passes, `~1` first. `"~01"` decodes to `"~1"`, never `"/"`.
pub fn unescape_segment(raw: &str) -> String {
    let slashes = raw.replace("~1", "/");
    slashes.replace("~0", "~")
}

/// Encode a key so it survives [`segments`] unchanged.
pub fn escape_segment(key: &str) -> String {
    let tildes = key.replace('~', "~0");
    tildes.replace('/', "~1")
}

/// Build a `#/...` pointer from unescaped segments.
pub fn to_pointer<S: AsRef<str>>(segments: &[S]) -> String {
    let mut pointer = String::from("#");
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&escape_segment(segment.as_ref()));
    }
    pointer
}

/// Split a pointer into its parent segments and final segment.
///
/// Returns `None` for a pointer to the document root.
pub fn parent(path: &str) -> Option<(Vec<String>, String)> {
    let mut segments = segments(path);
    let last = segments.pop()?;
    Some((segments, last))
}

/// Resolve a pointer against `root`.
pub fn resolve<'a>(root: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    resolve_segments(root, &segments(path))
}

/// Resolve already-split segments against `root`.
pub fn resolve_segments<'a, S: AsRef<str>>(
    root: &'a JsonValue,
    segments: &[S],
) -> Option<&'a JsonValue> {
    segments
        .iter()
        .try_fold(root, |current, segment| step(current, segment.as_ref()))
}

fn step<'a>(current: &'a JsonValue, segment: &str) -> Option<&'a JsonValue> {
    match current {
        JsonValue::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        JsonValue::Object(map) => map.get(segment),
        _ => None,
    }
}

/// Parse an array index segment: ASCII digits only, no sign.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
