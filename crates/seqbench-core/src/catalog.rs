//! The sequence catalogue: ground truth for grading.
//!
//! Loaded from an OEIS `stripped`-format file: one `id,term,term,...` record
//! per line, `#` comments and blank lines ignored. Without it there is
//! nothing to grade against, so load failures are fatal.

use crate::errors::CatalogError;
use crate::model::Sequence;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default)]
pub struct Catalog {
    sequences: BTreeMap<String, Sequence>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                CatalogError::NotFound { path: path.to_path_buf(), source }
            } else {
                CatalogError::Read { path: path.to_path_buf(), source }
            }
        })?;
        Ok(Self::parse(&text, path))
    }

    fn parse(text: &str, origin: &Path) -> Self {
        let mut sequences = BTreeMap::new();
        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split(',');
            let id = fields.next().map(str::trim).unwrap_or_default();
            let terms: Vec<String> = fields
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if id.is_empty() || terms.is_empty() {
                warn!(
                    line = line_number + 1,
                    file = %origin.display(),
                    "malformed catalogue record, skipping"
                );
                continue;
            }
            sequences.insert(id.to_string(), Sequence { id: id.to_string(), terms });
        }
        Self { sequences }
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.sequences.get(id)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
