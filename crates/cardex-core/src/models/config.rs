//! Configuration structures for the card pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::record::{Column, RetryPolicy};

/// Main configuration for the cardex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardexConfig {
    /// OCR text cleanup configuration.
    pub preprocess: PreprocessConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Keyword tables used by the line classifiers.
    pub keywords: KeywordConfig,

    /// Row layout and capture metadata formatting.
    pub store: StoreConfig,

    /// Retry policy for store writes.
    pub retry: RetryPolicy,

    /// OCR engine configuration.
    pub ocr: OcrConfig,
}

/// OCR text cleanup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Replace characters outside printable ASCII with spaces.
    pub strip_non_ascii: bool,

    /// Lines shorter than this (after cleanup) are dropped as noise.
    pub min_line_chars: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            strip_non_ascii: true,
            min_line_chars: 3,
        }
    }
}

/// Contact field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Report every distinct phone number instead of only the first.
    pub collect_all: bool,

    /// Normalize all-caps / all-lowercase names to title case.
    pub title_case_names: bool,

    /// Minimum words for an all-caps line to be taken as the company name.
    pub company_uppercase_min_words: usize,

    /// Maximum words for an all-caps line to be taken as the designation.
    pub designation_uppercase_max_words: usize,

    /// Maximum words on a line considered as a person name.
    pub name_max_words: usize,

    /// Separator for multi-value fields.
    pub list_separator: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            collect_all: true,
            title_case_names: true,
            company_uppercase_min_words: 2,
            designation_uppercase_max_words: 5,
            name_max_words: 4,
            list_separator: ", ".to_string(),
        }
    }
}

/// Keyword tables, matched case-insensitively on whole words.
///
/// A keyword may span several words (`"vice president"`). Retuning these
/// lists is the supported way to adapt extraction to another market.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Legal-entity suffixes and industry words marking the company line.
    pub company: Vec<String>,

    /// Job titles marking the designation line.
    pub designation: Vec<String>,

    /// Locality and structural words marking address lines.
    pub address: Vec<String>,

    /// Tokens marking a WhatsApp number.
    pub whatsapp_markers: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            company: words(&[
                "pvt", "private", "ltd", "limited", "llp", "llc", "inc", "corp",
                "corporation", "company", "industries", "solutions", "technologies",
                "enterprises", "enterprise", "group", "associates", "traders",
                "systems", "services", "consultancy", "agency", "infotech",
            ]),
            designation: words(&[
                "vice president", "general manager", "managing director", "manager",
                "director", "engineer", "founder", "co-founder", "ceo", "cto", "cfo",
                "coo", "executive", "officer", "sales", "marketing", "consultant",
                "supervisor", "admin", "administrator", "partner", "owner",
                "proprietor", "lead", "head", "president", "architect", "analyst",
                "developer", "designer", "chairman", "accountant",
            ]),
            address: words(&[
                "road", "rd", "street", "avenue", "sector", "block", "plot", "building",
                "bldg", "floor", "wing", "phase", "lane", "colony", "society", "nagar",
                "marg", "town", "city", "state", "district", "india", "pin", "pincode",
                "near", "opposite", "opp", "tower", "complex", "estate", "area",
                "village", "highway", "chowk",
            ]),
            whatsapp_markers: words(&["whatsapp", "wa.me", "wa"]),
        }
    }
}

/// Row layout and capture metadata formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Column order of the persistent store.
    pub columns: Vec<Column>,

    /// `chrono` format string for the capture timestamp column.
    pub timestamp_format: String,

    /// File name recorded for camera captures.
    pub camera_file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            columns: Column::default_layout(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            camera_file_name: "Camera Capture".to_string(),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Run OCR at 0/90/180/270 degrees and keep the richest output.
    pub try_rotations: bool,

    /// Keep `[UNK]` tokens emitted by the recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            try_rotations: false,
            keep_unk: false,
        }
    }
}

impl CardexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CardexConfig =
            serde_json::from_str(r#"{ "extraction": { "collect_all": false } }"#).unwrap();

        assert!(!config.extraction.collect_all);
        assert!(config.extraction.title_case_names);
        assert!(config.preprocess.strip_non_ascii);
        assert_eq!(config.store.columns, Column::default_layout());
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CardexConfig::default();
        config.keywords.company = vec!["gmbh".to_string()];
        config.store.columns.push(Column::Whatsapp);
        config.save(&path).unwrap();

        let loaded = CardexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.keywords.company, vec!["gmbh".to_string()]);
        assert_eq!(loaded.store.columns.last(), Some(&Column::Whatsapp));
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CardexConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
