use std::fmt;

use serde::Serialize;

/// Logical subdirectory of the data root that holds one family of artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    MealPlan,
    Images,
    Transcripts,
    Logs,
}

impl ArtifactCategory {
    pub const ALL: [ArtifactCategory; 4] = [
        ArtifactCategory::MealPlan,
        ArtifactCategory::Images,
        ArtifactCategory::Transcripts,
        ArtifactCategory::Logs,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            ArtifactCategory::MealPlan => "meal_plan",
            ArtifactCategory::Images => "dalle",
            ArtifactCategory::Transcripts => "whisper",
            ArtifactCategory::Logs => "logs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtifactCategory::MealPlan => "Meal plans",
            ArtifactCategory::Images => "Images",
            ArtifactCategory::Transcripts => "Transcripts",
            ArtifactCategory::Logs => "Audio & summaries",
        }
    }

    /// Resolves a category from its directory name.
    pub fn from_dir_name(name: &str) -> Result<Self, UnknownCategory> {
        Self::ALL
            .into_iter()
            .find(|category| category.dir_name() == name)
            .ok_or_else(|| UnknownCategory(name.to_string()))
    }

    /// How a file with the given extension should be presented in this category.
    /// Unrecognized extensions fall back to text.
    pub fn media_kind(&self, extension: &str) -> MediaKind {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match (self, ext.as_str()) {
            (ArtifactCategory::Images, "png" | "jpg" | "jpeg") => MediaKind::Image,
            (ArtifactCategory::Logs, "mp3" | "wav" | "opus" | "aac" | "flac") => MediaKind::Audio,
            _ => MediaKind::Text,
        }
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown data directory '{0}'.")]
pub struct UnknownCategory(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Text,
    Image,
    Audio,
}
