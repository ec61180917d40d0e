//! Audit summaries: per-name totals, per-file counts, text/JSON rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::mapping::Mapping;
use crate::scan::CallSite;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Total calls of one unsafe name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub name: String,
    pub total: usize,
    pub replacement: String,
}

/// Calls found in one file, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCount {
    pub path: String,
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub files_scanned: usize,
    pub total_calls: usize,
    /// Sorted by name.
    pub summary: Vec<SummaryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_file: Option<Vec<FileCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls: Option<Vec<CallSite>>,
}

impl AuditReport {
    /// Build the report for `calls` found across `files_scanned` files.
    #[must_use]
    pub fn build(
        files_scanned: usize,
        calls: &[CallSite],
        mapping: &Mapping,
        per_file: bool,
        verbose: bool,
    ) -> Self {
        let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
        for call in calls {
            *totals.entry(call.name.as_str()).or_default() += 1;
        }
        let summary = totals
            .into_iter()
            .map(|(name, total)| SummaryRow {
                name: name.to_string(),
                total,
                replacement: mapping.replacement(name).unwrap_or("?").to_string(),
            })
            .collect();

        let per_file = per_file.then(|| {
            let mut files: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
            for call in calls {
                *files
                    .entry(call.path.display().to_string())
                    .or_default()
                    .entry(call.name.clone())
                    .or_default() += 1;
            }
            files
                .into_iter()
                .map(|(path, counts)| FileCount {
                    path,
                    total: counts.values().sum(),
                    counts,
                })
                .collect()
        });

        Self {
            files_scanned,
            total_calls: calls.len(),
            summary,
            per_file,
            calls: verbose.then(|| calls.to_vec()),
        }
    }

    /// Render in `format`.
    pub fn render(&self, format: Format) -> Result<String, serde_json::Error> {
        match format {
            Format::Text => Ok(self.to_text()),
            Format::Json => serde_json::to_string_pretty(self),
        }
    }

    /// Plain-text rendering: call lines, per-file counts, aligned summary table.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(calls) = &self.calls {
            for call in calls {
                let _ = writeln!(out, "{}:{}: {}", call.path.display(), call.line, call.name);
            }
            if !calls.is_empty() {
                out.push('\n');
            }
        }
        if let Some(files) = &self.per_file {
            for file in files {
                let _ = writeln!(out, "{}: {} call(s)", file.path, file.total);
                for (name, count) in &file.counts {
                    let _ = writeln!(out, "    {name}: {count}");
                }
            }
            if !files.is_empty() {
                out.push('\n');
            }
        }

        let name_w = self
            .summary
            .iter()
            .map(|r| r.name.len())
            .chain(std::iter::once("Function".len()))
            .max()
            .unwrap_or(0);
        let _ = writeln!(out, "{:<name_w$}  {:>5}  Replacement", "Function", "Count");
        for row in &self.summary {
            let _ = writeln!(out, "{:<name_w$}  {:>5}  {}", row.name, row.total, row.replacement);
        }
        let _ = writeln!(
            out,
            "\n{} unsafe call(s) in {} file(s)",
            self.total_calls, self.files_scanned
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::builtin;
    use std::path::PathBuf;

    fn call(path: &str, line: usize, name: &str) -> CallSite {
        CallSite {
            path: PathBuf::from(path),
            line,
            name: name.to_string(),
        }
    }

    fn sample() -> Vec<CallSite> {
        vec![
            call("b.c", 4, "strcpy"),
            call("a.c", 1, "strcpy"),
            call("a.c", 2, "gets"),
            call("a.c", 9, "strcpy"),
        ]
    }

    #[test]
    fn summary_sorted_by_name_with_replacements() {
        let report = AuditReport::build(2, &sample(), builtin(), false, false);
        assert_eq!(report.total_calls, 4);
        let rows: Vec<_> = report
            .summary
            .iter()
            .map(|r| (r.name.as_str(), r.total, r.replacement.as_str()))
            .collect();
        assert_eq!(rows, vec![("gets", 1, "gets_s"), ("strcpy", 3, "strcpy_s")]);
        assert!(report.per_file.is_none());
        assert!(report.calls.is_none());
    }

    #[test]
    fn per_file_counts() {
        let report = AuditReport::build(2, &sample(), builtin(), true, false);
        let files = report.per_file.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "a.c");
        assert_eq!(files[0].total, 3);
        assert_eq!(files[0].counts["strcpy"], 2);
        assert_eq!(files[1].counts["strcpy"], 1);
    }

    #[test]
    fn text_rendering() {
        let report = AuditReport::build(2, &sample(), builtin(), false, true);
        let text = report.to_text();
        assert!(text.starts_with("b.c:4: strcpy\na.c:1: strcpy\n"));
        assert!(text.contains("Function  Count  Replacement\n"));
        assert!(text.contains("strcpy        3  strcpy_s\n"));
        assert!(text.ends_with("4 unsafe call(s) in 2 file(s)\n"));
    }

    #[test]
    fn json_rendering() {
        let report = AuditReport::build(1, &sample()[..1], builtin(), true, false);
        let json = report.render(Format::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["total_calls"], 1);
        assert_eq!(v["summary"][0]["name"], "strcpy");
        assert_eq!(v["per_file"][0]["counts"]["strcpy"], 1);
        assert!(v.get("calls").is_none());
    }

    #[test]
    fn empty_report() {
        let report = AuditReport::build(3, &[], builtin(), true, true);
        let text = report.to_text();
        assert!(text.starts_with("Function  Count  Replacement\n"));
        assert!(text.ends_with("0 unsafe call(s) in 3 file(s)\n"));
    }
}
