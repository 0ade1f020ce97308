//! Font database configuration and resolution.

use crate::error::{Text2ImageError, Text2ImageResult};
use std::collections::HashSet;
use std::path::PathBuf;

/// Font configuration for a rendering session.
///
/// Describes where font data comes from (system fonts and/or explicit font
/// files) and which family to prefer. Resolved once into a fontdb database
/// that is shared read-only across every item in a batch.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font files to register in addition to the system fonts.
    pub font_files: Vec<PathBuf>,
    /// Preferred font family. None selects the database's sans-serif family.
    pub family: Option<String>,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_files: Vec::new(),
            family: None,
            load_system_fonts: true,
        }
    }
}

impl FontConfig {
    /// Resolve this configuration into a concrete font database.
    ///
    /// This performs the expensive work (system font scanning, file loading)
    /// once. An unreadable font file, or a database that ends up empty, is a
    /// fatal [`Text2ImageError::Font`].
    pub fn resolve(&self) -> Text2ImageResult<fontdb::Database> {
        let mut db = fontdb::Database::new();
        if self.load_system_fonts {
            db.load_system_fonts();
        }
        for path in &self.font_files {
            db.load_font_file(path).map_err(|err| {
                Text2ImageError::Font(format!(
                    "could not load font file '{}': {}",
                    path.display(),
                    err
                ))
            })?;
        }
        if db.is_empty() {
            return Err(Text2ImageError::Font(
                "no usable fonts in the font database".to_string(),
            ));
        }

        set_generic_families(&mut db);

        if let Some(family) = &self.family {
            // Missing coverage is tolerated: warn and let shaping fall back.
            let known: HashSet<&str> = db
                .faces()
                .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str()))
                .collect();
            if !known.contains(family.as_str()) {
                log::warn!("font family '{family}' not found, falling back to sans-serif");
            }
        } else if let Some(name) = self.first_file_family(&db) {
            // With explicit font files and no family requested, the files are
            // the font: point the sans-serif fallback at them.
            db.set_sans_serif_family(name);
        }

        Ok(db)
    }

    /// Family name of the first face loaded from one of the configured files.
    fn first_file_family(&self, db: &fontdb::Database) -> Option<String> {
        db.faces().find_map(|face| match &face.source {
            fontdb::Source::File(path) if self.font_files.iter().any(|f| f == path) => {
                face.families.first().map(|(name, _)| name.clone())
            }
            _ => None,
        })
    }
}

/// Map the generic families to whatever common concrete fonts the database
/// actually contains.
fn set_generic_families(db: &mut fontdb::Database) {
    let families: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();

    for family in ["Arial", "Helvetica", "Liberation Sans", "DejaVu Sans"] {
        if families.contains(family) {
            db.set_sans_serif_family(family);
            break;
        }
    }
    for family in [
        "Courier New",
        "Courier",
        "Liberation Mono",
        "DejaVu Sans Mono",
    ] {
        if families.contains(family) {
            db.set_monospace_family(family);
            break;
        }
    }
    for family in [
        "Times New Roman",
        "Times",
        "Liberation Serif",
        "DejaVu Serif",
    ] {
        if families.contains(family) {
            db.set_serif_family(family);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_file_is_fatal() {
        let config = FontConfig {
            font_files: vec![PathBuf::from("/definitely/not/a/font.ttf")],
            ..FontConfig::default()
        };
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, Text2ImageError::Font(_)));
        assert!(err.to_string().contains("/definitely/not/a/font.ttf"));
    }

    #[test]
    fn test_empty_database_is_fatal() {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        assert!(matches!(
            config.resolve().unwrap_err(),
            Text2ImageError::Font(_)
        ));
    }
}
