//! Unsafe-call mapping table: legacy function name -> bounded replacement.
//!
//! The built-in table is constructed once and shared. A JSON object of the
//! same shape (`{"strcpy": "strcpy_s", ...}`) can extend or override it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::AuditError;

const BUILTIN: &[(&str, &str)] = &[
    ("asctime", "asctime_s"),
    ("bcopy", "memmove_s"),
    ("ctime", "ctime_s"),
    ("gets", "gets_s"),
    ("gmtime", "gmtime_s"),
    ("localtime", "localtime_s"),
    ("memcmp", "memcmp_s"),
    ("memcpy", "memcpy_s"),
    ("memmove", "memmove_s"),
    ("memset", "memset_s"),
    ("sprintf", "sprintf_s"),
    ("strcat", "strcat_s"),
    ("strchr", "strfirstchar_s"),
    ("strcmp", "strcmp_s"),
    ("strcpy", "strcpy_s"),
    ("strerror", "strerror_s"),
    ("strlen", "strnlen_s"),
    ("strncat", "strncat_s"),
    ("strncpy", "strncpy_s"),
    ("strrchr", "strlastchar_s"),
    ("strstr", "strstr_s"),
    ("strtok", "strtok_s"),
    ("vsprintf", "vsprintf_s"),
    ("wcscat", "wcscat_s"),
    ("wcscpy", "wcscpy_s"),
];

/// Name table used by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    entries: BTreeMap<String, String>,
}

static BUILTIN_MAPPING: OnceLock<Mapping> = OnceLock::new();

/// The built-in table.
pub fn builtin() -> &'static Mapping {
    BUILTIN_MAPPING.get_or_init(|| Mapping {
        entries: BUILTIN
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    })
}

fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl Mapping {
    /// Parse a JSON override object.
    pub fn from_json_str(text: &str) -> Result<Self, AuditError> {
        let entries: BTreeMap<String, String> = serde_json::from_str(text)?;
        for (name, replacement) in &entries {
            if !is_identifier(name) {
                return Err(AuditError::InvalidMapping {
                    name: name.clone(),
                    reason: "not a C identifier",
                });
            }
            if replacement.trim().is_empty() {
                return Err(AuditError::InvalidMapping {
                    name: name.clone(),
                    reason: "empty replacement",
                });
            }
        }
        Ok(Self { entries })
    }

    /// Load a JSON override file.
    pub fn from_file(path: &Path) -> Result<Self, AuditError> {
        let text = std::fs::read_to_string(path).map_err(|source| AuditError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Built-in table with `overrides` applied on top.
    #[must_use]
    pub fn builtin_with(overrides: Self) -> Self {
        let mut merged = builtin().clone();
        merged.entries.extend(overrides.entries);
        merged
    }

    /// Suggested replacement for `name`, if it is a tracked unsafe call.
    #[must_use]
    pub fn replacement(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
