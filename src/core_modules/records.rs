use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core_modules::ids;
use crate::core_modules::palette_builder::ColorInfo;

/// A single frozen moment: an encoded still image plus the palette that was
/// live when the user captured it. Immutable once created; live sampling can
/// continue without touching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freeze {
    pub id: u64,
    /// JPEG bytes of the captured still. Empty when the source frame could
    /// not be encoded.
    pub image_data: Vec<u8>,
    pub palette: Vec<ColorInfo>,
    pub created_at: DateTime<Utc>,
}

impl Freeze {
    pub fn new(image_data: Vec<u8>, palette: Vec<ColorInfo>) -> Self {
        Self {
            id: ids::next_id(),
            image_data,
            palette,
            created_at: Utc::now(),
        }
    }
}

/// A named collection of frozen moments, ordered as captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureScene {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub freezes: Vec<Freeze>,
}

impl CaptureScene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ids::next_id(),
            name: name.into(),
            created_at: Utc::now(),
            freezes: Vec::new(),
        }
    }
}
