//! The candidate catalog: the fixed list of people a chip input offers.
//!
//! A catalog is built once at startup, either from the built-in
//! [`Catalog::builtin`] list or from a TOML file, and never changes
//! afterwards. Names are unique within a catalog; that is what lets the
//! filter hide already-chipped people by name.
//!
//! # File format
//!
//! ```toml
//! [[entry]]
//! name = "Terry Doe"
//! email = "terry@abc.com"
//! avatar_url = "https://robohash.org/Terry.png?set=set4"
//!
//! [[entry]]
//! name = "Miles"
//! email = "miles@gmail.com"
//! # avatar_url defaults to a robohash URL keyed by the first name
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Errors from building a catalog out of external data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid catalog TOML.
    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),
    /// The catalog has no entries.
    #[error("catalog has no entries")]
    Empty,
    /// An entry has a blank name.
    #[error("catalog entry {index} has an empty name")]
    EmptyName { index: usize },
    /// Two entries share a name.
    #[error("duplicate catalog name {0:?}")]
    DuplicateName(String),
}

/// One selectable person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

impl CatalogEntry {
    /// Build an entry whose avatar URL is derived from the first name.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let name = name.into();
        let avatar_url = avatar_url_for(&name);
        Self {
            name,
            email: email.into(),
            avatar_url,
        }
    }

    /// Override the avatar URL.
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = url.into();
        self
    }

    /// One-character badge drawn where a browser would show the avatar.
    pub fn initial(&self) -> char {
        initial_of(&self.name)
    }
}

/// First character of `name`, uppercased, or `?` for a blank name.
pub fn initial_of(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

/// The avatar-service URL for a person, keyed by their first name.
pub fn avatar_url_for(name: &str) -> String {
    let first = name.split_whitespace().next().unwrap_or(name);
    format!("https://robohash.org/{first}.png?set=set4")
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(rename = "entry", default)]
    entries: Vec<EntryRecord>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryRecord {
    name: String,
    email: String,
    avatar_url: Option<String>,
}

/// An immutable, ordered list of [`CatalogEntry`] values with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting blank and duplicate names.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { index });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The twelve people the "User List" demo ships with.
    pub fn builtin() -> Self {
        let entries = vec![
            CatalogEntry::new("Terry Doe", "terry@abc.com"),
            CatalogEntry::new("Sheldon Smith", "sldn@abc.com"),
            CatalogEntry::new("Terrill", "terrill@abc.com"),
            CatalogEntry::new("Miles", "miles@gmail.com"),
            CatalogEntry::new("Maven", "maven@abc.com")
                .with_avatar_url("https://robohash.org/Mavis.png?set=set4"),
            CatalogEntry::new("Alison", "alison@abc.com"),
            CatalogEntry::new("Oleta", "oleta@abc.com"),
            CatalogEntry::new("Ewell", "jane@abc.com"),
            CatalogEntry::new("Marcel Wane", "marcel@abc.com"),
            CatalogEntry::new("Enoch", "enc@abc.com"),
            CatalogEntry::new("Arely Sim", "arely@abc.com"),
            CatalogEntry::new("Gust Josh", "gus@abc.com"),
        ];
        Self { entries }
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        let entries = file
            .entries
            .into_iter()
            .map(|record| {
                let entry = CatalogEntry::new(record.name, record.email);
                match record.avatar_url {
                    Some(url) => entry.with_avatar_url(url),
                    None => entry,
                }
            })
            .collect();
        Self::new(entries)
    }

    /// Read and parse a TOML catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), entries = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_twelve_unique_people() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        assert!(Catalog::new(catalog.entries().to_vec()).is_ok());
    }

    #[test]
    fn builtin_keeps_explicit_avatar() {
        let catalog = Catalog::builtin();
        let maven = catalog.get("Maven").unwrap();
        assert_eq!(maven.avatar_url, "https://robohash.org/Mavis.png?set=set4");
        let terry = catalog.get("Terry Doe").unwrap();
        assert_eq!(terry.avatar_url, "https://robohash.org/Terry.png?set=set4");
    }

    #[test]
    fn initial_is_uppercased_first_char() {
        assert_eq!(CatalogEntry::new("ewell", "e@x").initial(), 'E');
        assert_eq!(initial_of("   "), '?');
    }

    #[test]
    fn parses_toml_with_default_avatar() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[entry]]
            name = "Ada Lovelace"
            email = "ada@example.com"

            [[entry]]
            name = "Grace"
            email = "grace@example.com"
            avatar_url = "https://example.com/g.png"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.entries()[0].avatar_url,
            "https://robohash.org/Ada.png?set=set4"
        );
        assert_eq!(catalog.entries()[1].avatar_url, "https://example.com/g.png");
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Catalog::new(vec![
            CatalogEntry::new("Miles", "a@x"),
            CatalogEntry::new("Miles", "b@x"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(ref name) if name == "Miles"));
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert!(matches!(Catalog::from_toml_str(""), Err(CatalogError::Empty)));
        assert!(matches!(
            Catalog::new(vec![CatalogEntry::new("ok", "a@x"), CatalogEntry::new(" ", "b@x")]),
            Err(CatalogError::EmptyName { index: 1 })
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Catalog::from_toml_str(
            r#"
            [[entry]]
            name = "Miles"
            email = "miles@gmail.com"
            phone = "555"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Catalog::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
