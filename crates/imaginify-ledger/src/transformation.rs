//! Transformation catalogue and display sizing.

use std::fmt;
use std::str::FromStr;

use imaginify_core::defaults;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// An image transformation a user can pay credits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformationType {
    Restore,
    RemoveBackground,
    Fill,
    Remove,
    Recolor,
}

impl TransformationType {
    pub const ALL: [Self; 5] = [
        Self::Restore,
        Self::RemoveBackground,
        Self::Fill,
        Self::Remove,
        Self::Recolor,
    ];

    /// URL slug, as used in `/transformations/add/<slug>`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::RemoveBackground => "removeBackground",
            Self::Fill => "fill",
            Self::Remove => "remove",
            Self::Recolor => "recolor",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Restore => "Restore Image",
            Self::RemoveBackground => "Background Remove",
            Self::Fill => "Generative Fill",
            Self::Remove => "Object Remove",
            Self::Recolor => "Object Recolor",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Restore => "Refine images by removing noise and imperfections",
            Self::RemoveBackground => "Removes the background of the image using AI",
            Self::Fill => "Enhance an image's dimensions using AI outpainting",
            Self::Remove => "Identify and eliminate objects from images",
            Self::Recolor => "Identify and recolor objects from the image",
        }
    }

    /// Credits charged per use. Always positive.
    pub fn credit_fee(self) -> i64 {
        defaults::DEFAULT_TRANSFORMATION_FEE
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TransformationType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.slug() == s)
            .ok_or_else(|| LedgerError::UnknownTransformation(s.to_string()))
    }
}

/// Output aspect ratios offered for generative fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Square,
    StandardPortrait,
    PhonePortrait,
}

impl AspectRatio {
    /// Parse the ratio key (`"1:1"`, `"3:4"`, `"9:16"`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "1:1" => Some(Self::Square),
            "3:4" => Some(Self::StandardPortrait),
            "9:16" => Some(Self::PhonePortrait),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "Square (1:1)",
            Self::StandardPortrait => "Standard Portrait (3:4)",
            Self::PhonePortrait => "Phone Portrait (9:16)",
        }
    }

    /// `(width, height)` in pixels.
    pub fn size(self) -> (u32, u32) {
        match self {
            Self::Square => (1000, 1000),
            Self::StandardPortrait => (1000, 1334),
            Self::PhonePortrait => (1000, 1778),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

/// Display size of a transformed image along one axis.
///
/// Fill results take their size from the aspect-ratio table; everything else
/// uses the measured size. Unknown ratios and missing or zero measurements
/// fall back to [`DEFAULT_IMAGE_DIMENSION`](defaults::DEFAULT_IMAGE_DIMENSION).
pub fn image_dimension(
    kind: TransformationType,
    aspect_ratio: Option<&str>,
    measured: Option<u32>,
    dim: Dimension,
) -> u32 {
    let resolved = if kind == TransformationType::Fill {
        aspect_ratio.and_then(AspectRatio::from_key).map(|r| {
            let (w, h) = r.size();
            match dim {
                Dimension::Width => w,
                Dimension::Height => h,
            }
        })
    } else {
        measured
    };
    resolved
        .filter(|&v| v > 0)
        .unwrap_or(defaults::DEFAULT_IMAGE_DIMENSION)
}
