//! Bounded, highlighted excerpts around an error site.
//!
//! The excerpt shows the container that holds the offending value (the
//! object missing a key, the array holding a bad element, the object holding
//! a bad field) pretty-printed, with the offending entry's lines marked.

use feedscope_core::{pointer, ErrorSite, ExcerptConfig, JsonValue};

/// One rendered line of an excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptLine {
    /// 1-based line number within the rendered container.
    pub number: usize,
    pub text: String,
    pub highlighted: bool,
}

/// A window of rendered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// Pointer to the rendered container.
    pub container: String,
    pub lines: Vec<ExcerptLine>,
    pub truncated_before: bool,
    pub truncated_after: bool,
    /// Extra context for sites with nothing to point at (a missing key).
    pub note: Option<String>,
}

impl Excerpt {
    pub fn has_highlight(&self) -> bool {
        self.lines.iter().any(|line| line.highlighted)
    }

    /// Plain-text rendering with `>` marking highlighted lines.
    pub fn render(&self) -> String {
        let width = self
            .lines
            .last()
            .map(|line| line.number.to_string().len())
            .unwrap_or(1);
        let mut out = String::new();
        if let Some(note) = &self.note {
            out.push_str(&format!("  {}\n", note));
        }
        if self.truncated_before {
            out.push_str(&format!("  {:>width$} | ...\n", "", width = width));
        }
        for line in &self.lines {
            let marker = if line.highlighted { '>' } else { ' ' };
            out.push_str(&format!(
                "{} {:>width$} | {}\n",
                marker,
                line.number,
                line.text,
                width = width
            ));
        }
        if self.truncated_after {
            out.push_str(&format!("  {:>width$} | ...\n", "", width = width));
        }
        out
    }
}

/// Which part of the container to mark.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mark {
    Nothing,
    Whole,
    Key(String),
    Index(usize),
}

/// Render the excerpt for `site` inside `root`.
///
/// With no site (the pointer did not resolve) the document root is shown
/// without highlighting.
pub fn render_excerpt(
    root: &JsonValue,
    site: Option<&ErrorSite>,
    config: &ExcerptConfig,
) -> Excerpt {
    let (container_path, mark, note) = plan(site);
    let (container_path, container) = match pointer::resolve_segments(root, &container_path) {
        Some(container) => (container_path, container),
        None => (Vec::new(), root),
    };

    let rendered = render_container(container, &mark);
    let lines: Vec<ExcerptLine> = rendered
        .into_iter()
        .enumerate()
        .map(|(i, (text, highlighted))| ExcerptLine {
            number: i + 1,
            text: clip(&text, config.max_line_chars),
            highlighted,
        })
        .collect();

    let (lines, truncated_before, truncated_after) = window(lines, config.max_lines);
    Excerpt {
        container: pointer::to_pointer(&container_path),
        lines,
        truncated_before,
        truncated_after,
        note,
    }
}

fn plan(site: Option<&ErrorSite>) -> (Vec<String>, Mark, Option<String>) {
    match site {
        None => (Vec::new(), Mark::Nothing, None),
        Some(ErrorSite::MissingRequiredKey { object, key }) => (
            object.clone(),
            Mark::Whole,
            Some(format!("missing required key \"{}\"", key)),
        ),
        Some(ErrorSite::ArrayElement { array, index, .. }) => {
            (array.clone(), Mark::Index(*index), None)
        }
        Some(ErrorSite::EnumViolation { location, .. }) | Some(ErrorSite::Leaf { location, .. }) => {
            match location.split_last() {
                Some((last, parent)) => (parent.to_vec(), Mark::Key(last.clone()), None),
                None => (Vec::new(), Mark::Whole, None),
            }
        }
    }
}

fn render_container(container: &JsonValue, mark: &Mark) -> Vec<(String, bool)> {
    match (container, mark) {
        (JsonValue::Object(map), Mark::Key(_)) | (JsonValue::Object(map), Mark::Index(_))
            if !map.is_empty() =>
        {
            let last = map.len() - 1;
            let mut lines = vec![("{".to_string(), false)];
            for (i, (key, value)) in map.iter().enumerate() {
                let marked = matches!(mark, Mark::Key(k) if k == key);
                let label = JsonValue::String(key.clone()).to_string();
                push_member(&mut lines, Some(&label), value, i == last, marked);
            }
            lines.push(("}".to_string(), false));
            lines
        }
        (JsonValue::Array(items), Mark::Index(_)) | (JsonValue::Array(items), Mark::Key(_))
            if !items.is_empty() =>
        {
            let last = items.len() - 1;
            let mut lines = vec![("[".to_string(), false)];
            for (i, value) in items.iter().enumerate() {
                let marked = match mark {
                    Mark::Index(index) => *index == i,
                    Mark::Key(key) => key.parse::<usize>().ok() == Some(i),
                    _ => false,
                };
                push_member(&mut lines, None, value, i == last, marked);
            }
            lines.push(("]".to_string(), false));
            lines
        }
        _ => {
            let marked = *mark == Mark::Whole;
            format!("{:#}", container)
                .lines()
                .map(|line| (line.to_string(), marked))
                .collect()
        }
    }
}

fn push_member(
    lines: &mut Vec<(String, bool)>,
    label: Option<&str>,
    value: &JsonValue,
    is_last: bool,
    marked: bool,
) {
    let pretty = format!("{:#}", value);
    let mut member: Vec<String> = pretty.lines().map(|line| format!("  {}", line)).collect();
    if let (Some(label), Some(first)) = (label, member.first_mut()) {
        *first = format!("  {}: {}", label, first.trim_start());
    }
    if !is_last {
        if let Some(tail) = member.last_mut() {
            tail.push(',');
        }
    }
    lines.extend(member.into_iter().map(|line| (line, marked)));
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push('…');
    clipped
}

fn window(lines: Vec<ExcerptLine>, max_lines: usize) -> (Vec<ExcerptLine>, bool, bool) {
    let total = lines.len();
    let max_lines = max_lines.max(1);
    if total <= max_lines {
        return (lines, false, false);
    }

    let focus = lines.iter().position(|line| line.highlighted).unwrap_or(0);
    let start = focus.saturating_sub(max_lines / 2).min(total - max_lines);
    let end = start + max_lines;
    let window = lines.into_iter().skip(start).take(max_lines).collect();
    (window, start > 0, end < total)
}
