use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const MAX_IMAGES_PER_REQUEST: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    Vivid,
    Natural,
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Vivid => "vivid",
            ImageStyle::Natural => "natural",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub prompt: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBatchRecord {
    pub paths: Vec<PathBuf>,
    pub prompt: String,
    pub size: String,
}
