//! Font discovery in resource directories.
//!
//! Each configured directory is scanned once, non-recursively, the first time
//! any font is asked for. TrueType and OpenType files are named by the
//! PostScript name `fontdb` reads from them. Type 1 metric files (`.afm`,
//! `.pfm`) only count when the outline program (`.pfb`) sits next to them.
//! The first file to claim a lower-cased name keeps it.

use acrofill_traits::{FontError, FontProgram, FontProvider};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, PartialEq)]
enum FontFile {
    OpenType { postscript_name: String, path: PathBuf },
    Type1 { font_name: String },
}

#[derive(Debug)]
pub struct DirectoryFontProvider {
    directories: Vec<PathBuf>,
    /// Lower-cased name to file, in discovery order.
    catalog: OnceLock<Vec<(String, FontFile)>>,
}

impl DirectoryFontProvider {
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            directories: directories
                .into_iter()
                .map(|d| d.as_ref().to_path_buf())
                .collect(),
            catalog: OnceLock::new(),
        }
    }

    fn catalog(&self) -> &[(String, FontFile)] {
        self.catalog.get_or_init(|| scan(&self.directories))
    }
}

fn scan(directories: &[PathBuf]) -> Vec<(String, FontFile)> {
    let mut db = fontdb::Database::new();
    let mut catalog: Vec<(String, FontFile)> = Vec::new();
    for dir in directories {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Fonts directory '{}' not found: {}", dir.display(), e);
                continue;
            }
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        for path in files {
            for (name, file) in describe(&mut db, &path) {
                let key = name.to_lowercase();
                if catalog.iter().any(|(n, _)| *n == key) {
                    log::debug!("Font '{}' from {} shadowed by an earlier file", key, path.display());
                    continue;
                }
                catalog.push((key, file));
            }
        }
        log::debug!("Scanned fonts directory '{}'", dir.display());
    }
    log::info!("Discovered {} resource fonts", catalog.len());
    catalog
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn has_outline_sibling(path: &Path) -> bool {
    path.with_extension("pfb").is_file()
}

/// The fonts a single file provides, by display name.
fn describe(db: &mut fontdb::Database, path: &Path) -> Vec<(String, FontFile)> {
    match extension(path).as_deref() {
        Some("ttf" | "otf") => {
            let ids = db.load_font_source(fontdb::Source::File(path.to_path_buf()));
            let faces: Vec<_> = ids
                .iter()
                .filter_map(|id| db.face(*id))
                .filter(|face| !face.post_script_name.is_empty())
                .map(|face| {
                    (
                        face.post_script_name.clone(),
                        FontFile::OpenType {
                            postscript_name: face.post_script_name.clone(),
                            path: path.to_path_buf(),
                        },
                    )
                })
                .collect();
            if faces.is_empty() {
                log::debug!("No usable face in {}", path.display());
            }
            faces
        }
        Some("afm") if has_outline_sibling(path) => afm_font_name(path)
            .map(|name| {
                vec![(
                    name.clone(),
                    FontFile::Type1 { font_name: name },
                )]
            })
            .unwrap_or_default(),
        Some("pfm") if has_outline_sibling(path) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|stem| {
                vec![(
                    stem.to_string(),
                    FontFile::Type1 {
                        font_name: stem.to_string(),
                    },
                )]
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Reads `FontName` from the header of an Adobe Font Metrics file.
fn afm_font_name(path: &Path) -> Option<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Cannot read font metrics {}: {}", path.display(), e);
            return None;
        }
    };
    text.lines()
        .take_while(|line| !line.starts_with("StartCharMetrics"))
        .find_map(|line| line.strip_prefix("FontName"))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

impl FontProvider for DirectoryFontProvider {
    fn font_names(&self) -> Vec<String> {
        self.catalog().iter().map(|(name, _)| name.clone()).collect()
    }

    fn load_font(&self, name: &str) -> Result<FontProgram, FontError> {
        let file = self
            .catalog()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, file)| file)
            .ok_or_else(|| FontError::NotFound(name.to_string()))?;
        match file {
            FontFile::OpenType {
                postscript_name,
                path,
            } => {
                let data = std::fs::read(path).map_err(|e| FontError::LoadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                Ok(FontProgram::TrueType {
                    postscript_name: postscript_name.clone(),
                    data: Arc::new(data),
                })
            }
            FontFile::Type1 { font_name } => Ok(FontProgram::Type1 {
                font_name: font_name.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "DirectoryFontProvider"
    }
}
