//! OCR engine selection for the CLI.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, warn};

use cardex_core::models::config::OcrConfig;
use cardex_core::{OcrEngine, OcrError, OcrOutput, PureOcrEngine, RotatingEngine};

/// Input kinds the CLI understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Plain text already produced by an OCR run.
    Text,
    /// Card image needing OCR.
    Image,
}

impl InputKind {
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" => Some(InputKind::Text),
            "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => Some(InputKind::Image),
            _ => None,
        }
    }
}

/// The engine handed to the pipeline.
///
/// Models are only loaded when an image input needs them; otherwise
/// recognition reports why no engine is available.
pub enum CliEngine {
    Loaded(Box<dyn OcrEngine>),
    Unavailable(String),
}

impl CliEngine {
    /// Load the OCR models if `needed`.
    pub fn load(config: &OcrConfig, model_dir: Option<&PathBuf>, needed: bool) -> Self {
        if !needed {
            return CliEngine::Unavailable("no image inputs".to_string());
        }

        let mut config = config.clone();
        if let Some(dir) = model_dir {
            config.model_dir = dir.clone();
        }

        match PureOcrEngine::from_config(&config) {
            Ok(engine) if config.try_rotations => {
                debug!("Loaded OCR models with rotation retries");
                CliEngine::Loaded(Box::new(RotatingEngine::new(engine)))
            }
            Ok(engine) => {
                debug!("Loaded OCR models from {}", config.model_dir.display());
                CliEngine::Loaded(Box::new(engine))
            }
            Err(e) => {
                warn!("OCR models unavailable: {}", e);
                CliEngine::Unavailable(format!(
                    "{}. Point --model-dir at a directory containing {}, {} and {}.",
                    e, config.detection_model, config.recognition_model, config.dictionary
                ))
            }
        }
    }
}

impl OcrEngine for CliEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        match self {
            CliEngine::Loaded(engine) => engine.recognize(image),
            CliEngine::Unavailable(reason) => Err(OcrError::ModelLoad(reason.clone())),
        }
    }
}
