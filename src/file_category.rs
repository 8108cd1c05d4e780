//! File categorization by extension.
//!
//! Maps a file's extension (case-insensitively) to one of a small set of
//! category folders used when sorting files during a rename run.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use tidyname::file_category::{Category, category_of};
//!
//! assert_eq!(category_of(Path::new("a.jpg")), Category::Images);
//! assert_eq!(category_of(Path::new("a.MP3")), Category::Audio);
//! assert_eq!(category_of(Path::new("a.xyz")).dir_name(), "other");
//! ```
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Represents a broad file category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Image files (JPG, PNG, GIF, etc.)
    Images,
    /// Video files (MP4, MKV, MOV, etc.)
    Video,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Archive files (ZIP, 7Z, TAR, etc.)
    Archives,
    /// Document files (PDF, TXT, DOCX, etc.)
    Documents,
    /// Anything without a known extension
    Other,
}

impl Category {
    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyname::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Video.dir_name(), "video");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Documents => "documents",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

static DEFAULT_MAPPER: LazyLock<FileMapper> = LazyLock::new(FileMapper::new);

/// Maps a path to its category using the built-in extension table.
pub fn category_of(path: &Path) -> Category {
    DEFAULT_MAPPER.categorize(path)
}

/// Maps file extensions to categories.
///
/// Starts from the built-in table and can be extended with custom mappings,
/// e.g. from the `[categories]` section of the configuration file.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with all standard mappings.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        let table: [(Category, &[&str]); 5] = [
            (Category::Images, &["jpg", "jpeg", "png", "gif", "webp", "bmp"]),
            (Category::Video, &["mp4", "mov", "mkv", "avi", "webm"]),
            (Category::Audio, &["mp3", "wav", "flac", "aac", "ogg"]),
            (Category::Archives, &["zip", "7z", "rar", "tar", "gz", "bz2"]),
            (
                Category::Documents,
                &["pdf", "txt", "md", "rtf", "doc", "docx", "xls", "xlsx"],
            ),
        ];
        for (category, extensions) in table {
            for ext in extensions {
                self.add_extension_mapping(ext, category);
            }
        }
    }

    /// Adds a file extension to category mapping. A leading dot is ignored.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.extension_map.insert(ext, category);
    }

    /// Maps a file extension (without the dot) to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyname::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.extension_to_category("PDF"), Some(Category::Documents));
    /// assert_eq!(mapper.extension_to_category("xyz"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for a path from its extension, defaulting to
    /// [`Category::Other`].
    pub fn categorize(&self, path: &Path) -> Category {
        path.extension()
            .and_then(|ext| self.extension_to_category(&ext.to_string_lossy()))
            .unwrap_or(Category::Other)
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}
