//! # safestr-audit
//!
//! Static auditor for legacy unsafe C string/memory calls.
//!
//! Scans C/C++ sources for calls such as `strcpy(` or `gets(`, counts them,
//! and pairs each name with its bounds-checked replacement from the
//! [`mapping`] table. The scan is purely textual: no preprocessing, no
//! parsing beyond identifier boundaries and `//` comments.

pub mod error;
pub mod mapping;
pub mod report;
pub mod scan;
pub mod structured_log;

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

pub use error::AuditError;
pub use mapping::Mapping;
pub use report::{AuditReport, Format};
pub use scan::{CallSite, collect_files, scan_source};
pub use structured_log::{ArtifactIndex, LogEmitter, LogEntry, LogLevel};

/// Result of scanning a set of roots.
#[derive(Debug, Clone)]
pub struct AuditRun {
    /// Files scanned, in visit order.
    pub files: Vec<PathBuf>,
    /// Every call site, in file then line order.
    pub calls: Vec<CallSite>,
    /// SHA-256 digest of every scanned file.
    pub artifacts: ArtifactIndex,
}

/// Scan every source file reachable from `roots`.
///
/// A file reached through more than one root is scanned once. When `log` is
/// given, one `file_scanned` event per file, one `call_found` event per call
/// and a closing `audit_complete` event are written to it.
pub fn run_audit<W: Write>(
    roots: &[PathBuf],
    recursive: bool,
    mapping: &Mapping,
    run_id: &str,
    mut log: Option<&mut LogEmitter<W>>,
) -> Result<AuditRun, AuditError> {
    let started = Instant::now();
    let mut seen = HashSet::new();
    let mut run = AuditRun {
        files: Vec::new(),
        calls: Vec::new(),
        artifacts: ArtifactIndex::new(run_id),
    };

    for root in roots {
        for path in collect_files(root, recursive)? {
            if !seen.insert(path.clone()) {
                continue;
            }
            let bytes = std::fs::read(&path).map_err(|source| AuditError::Read {
                path: path.clone(),
                source,
            })?;
            let text = String::from_utf8_lossy(&bytes);
            let calls = scan_source(&path, &text, mapping);
            let display = path.display().to_string();
            run.artifacts.add(display.clone(), "source", &bytes);

            if let Some(log) = log.as_deref_mut() {
                let digest = run.artifacts.artifacts.last().map(|a| a.sha256.clone());
                let mut entry = log
                    .entry(LogLevel::Info, "file_scanned")
                    .with_location(display.clone(), None)
                    .with_count(calls.len());
                if let Some(digest) = digest {
                    entry = entry.with_sha256(digest);
                }
                log.emit_entry(&entry)?;
                for call in &calls {
                    let replacement = mapping.replacement(&call.name).unwrap_or_default();
                    let entry = log
                        .entry(LogLevel::Warn, "call_found")
                        .with_location(display.clone(), Some(call.line))
                        .with_symbol(call.name.clone(), replacement);
                    log.emit_entry(&entry)?;
                }
            }

            run.files.push(path);
            run.calls.extend(calls);
        }
    }

    if let Some(log) = log {
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let entry = log
            .entry(LogLevel::Info, "audit_complete")
            .with_count(run.calls.len())
            .with_duration_ms(elapsed)
            .with_details(serde_json::json!({
                "files_scanned": run.files.len(),
                "mapping_entries": mapping.len(),
            }));
        log.emit_entry(&entry)?;
        log.flush()?;
    }
    Ok(run)
}
