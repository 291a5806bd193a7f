//! Syscall catalog: number → name and description
//!
//! Loaded once before tracing from a `number,name,description` file whose
//! first line is a header. Lookups never fail; a number without an entry
//! resolves to `None` and is shown as unknown.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, CatalogRowError};
use crate::syscalls::X86_64_SYSCALLS;

/// Name shown for numbers the catalog does not know
pub const UNKNOWN_NAME: &str = "unknown";
/// Description shown for numbers the catalog does not know
pub const UNKNOWN_DESCRIPTION: &str = "no description";

/// Architecture whose syscall numbering the built-in table follows
pub const BUILTIN_ARCH: &str = "x86_64";

/// Warning to show when the built-in table is used on `target_arch`
///
/// `None` when the numbering matches.
pub fn builtin_mismatch(target_arch: &str) -> Option<String> {
    (target_arch != BUILTIN_ARCH).then(|| {
        format!(
            "built-in syscall table uses {} numbering; names on {} will be wrong",
            BUILTIN_ARCH, target_arch
        )
    })
}

/// One row of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub number: i64,
    pub name: String,
    pub description: String,
}

/// Read-only syscall catalog
#[derive(Debug, Clone, Default)]
pub struct SyscallCatalog {
    entries: Vec<CatalogEntry>,
    /// number → index of the first entry with that number
    index: HashMap<i64, usize>,
}

impl SyscallCatalog {
    /// Catalog with no entries: every lookup is unknown
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog built from the compiled-in x86_64 table
    pub fn builtin() -> Self {
        Self::from_entries(X86_64_SYSCALLS.iter().map(|&(number, name, description)| {
            CatalogEntry {
                number,
                name: name.to_string(),
                description: description.to_string(),
            }
        }))
    }

    /// Build a catalog from entries; on duplicate numbers the first one wins
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let entries: Vec<CatalogEntry> = entries.into_iter().collect();
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.number).or_insert(i);
        }
        Self { entries, index }
    }

    /// Load a catalog file
    ///
    /// Malformed rows are skipped. Fails if the file cannot be read or
    /// yields no usable entries.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::parse_bytes(&bytes);
        if catalog.is_empty() {
            return Err(CatalogError::Empty {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            entries = catalog.len(),
            "syscall catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse catalog text, skipping the header line and any bad rows
    pub fn parse(text: &str) -> Self {
        Self::parse_bytes(text.as_bytes())
    }

    /// Parse raw catalog contents
    ///
    /// Rows are split on `\n` before decoding, so a row that is not UTF-8
    /// is skipped on its own.
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        let entries = bytes
            .split(|&b| b == b'\n')
            .enumerate()
            .skip(1)
            .filter_map(|(i, raw)| {
                let row = std::str::from_utf8(raw)
                    .map_err(|_| CatalogRowError::NotUtf8 { line: i + 1 })
                    .and_then(|line| parse_row(i + 1, line));
                match row {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::debug!("skipping catalog row: {}", e);
                        None
                    }
                }
            });
        Self::from_entries(entries)
    }

    /// Look up a syscall number
    pub fn lookup(&self, number: i64) -> Option<&CatalogEntry> {
        self.index.get(&number).map(|&i| &self.entries[i])
    }

    /// Name for a number, or [`UNKNOWN_NAME`]
    pub fn name_of(&self, number: i64) -> &str {
        self.lookup(number)
            .map(|e| e.name.as_str())
            .unwrap_or(UNKNOWN_NAME)
    }

    /// Description for a number, or [`UNKNOWN_DESCRIPTION`]
    pub fn description_of(&self, number: i64) -> &str {
        self.lookup(number)
            .map(|e| e.description.as_str())
            .unwrap_or(UNKNOWN_DESCRIPTION)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse one data row: `number[,name[,description]]`
///
/// The description keeps any further commas.
pub fn parse_row(line_no: usize, line: &str) -> Result<CatalogEntry, CatalogRowError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(CatalogRowError::Blank { line: line_no });
    }

    let mut fields = line.splitn(3, ',');
    let raw_number = fields.next().unwrap_or_default().trim();
    let number = raw_number
        .parse::<i64>()
        .map_err(|_| CatalogRowError::BadNumber {
            line: line_no,
            value: raw_number.to_string(),
        })?;

    let name = fields.next().unwrap_or_default().trim().to_string();
    let description = fields.next().unwrap_or_default().trim().to_string();

    Ok(CatalogEntry {
        number,
        name,
        description,
    })
}
