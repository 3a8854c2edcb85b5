//! Validation report input and excerpt output.

use std::io::Write;

use feedscope_context::ErrorContext;
use feedscope_core::ValidationIssue;
use serde::Deserialize;

use crate::error::CliError;

/// Accepted report shapes: a bare issue list, or the validator's
/// `{ "errors": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReportFile {
    Issues(Vec<ValidationIssue>),
    Envelope { errors: Vec<ValidationIssue> },
}

/// Parse report text. `source_name` only labels errors.
pub fn parse_report(text: &str, source_name: &str) -> Result<Vec<ValidationIssue>, CliError> {
    let report: ReportFile = serde_json::from_str(text).map_err(|e| CliError::Report {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(match report {
        ReportFile::Issues(issues) => issues,
        ReportFile::Envelope { errors } => errors,
    })
}

/// Write one block per issue: a header line followed by its excerpt.
pub fn write_contexts<W: Write>(out: &mut W, contexts: &[ErrorContext]) -> std::io::Result<()> {
    for (i, context) in contexts.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        let issue = &context.issue;
        writeln!(
            out,
            "[{}] {}: {}",
            issue.keyword, issue.instance_path, issue.message
        )?;
        match &context.site {
            Some(site) => writeln!(out, "  at {}", site.pointer())?,
            None => writeln!(out, "  location not found in document")?,
        }
        write!(out, "{}", context.excerpt.render())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedscope_context::context_for;
    use feedscope_core::ExcerptConfig;
    use serde_json::json;

    #[test]
    fn test_parse_bare_list() {
        let issues = parse_report(
            r##"[{"message": "m", "keyword": "required", "instancePath": "#/data"}]"##,
            "stdin",
        )
        .expect("report should parse");
        assert_eq!(issues, vec![ValidationIssue::new("m", "required", "#/data")]);
    }

    #[test]
    fn test_parse_envelope() {
        let issues = parse_report(
            r##"{"errors": [{"message": "m", "keyword": "enum", "instancePath": "#/a", "schemaPath": "#/s"}]}"##,
            "report.json",
        )
        .expect("report should parse");
        assert_eq!(issues[0].schema_path, "#/s");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_report("not json", "report.json").unwrap_err();
        assert!(matches!(err, CliError::Report { ref source_name, .. } if source_name == "report.json"));
    }

    #[test]
    fn test_write_contexts() {
        let document = json!({ "ttl": -1 });
        let contexts = vec![
            context_for(
                &document,
                &ValidationIssue::new("-1 is negative", "minimum", "#/ttl"),
                &ExcerptConfig::default(),
            ),
            context_for(
                &document,
                &ValidationIssue::new("gone", "type", "#/data"),
                &ExcerptConfig::default(),
            ),
        ];

        let mut out = Vec::new();
        write_contexts(&mut out, &contexts).expect("write should succeed");
        let text = String::from_utf8(out).expect("output is utf-8");
        assert!(text.contains("[minimum] #/ttl: -1 is negative"));
        assert!(text.contains("  at #/ttl"));
        assert!(text.contains("location not found in document"));
    }
}
