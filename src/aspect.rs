//! Crop aspect ratios.
//!
//! Stored as a `width:height` pair of positive integers so the ratio prints back
//! exactly as the user wrote it. The four presets are the ones offered in the
//! ratio selector; any other positive `W:H` pair is accepted as well.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AspectRatioError {
    #[error("aspect ratio must look like W:H, got {0:?}")]
    Malformed(String),
    #[error("aspect ratio sides must be positive, got {0:?}")]
    NonPositive(String),
}

/// A positive width:height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    pub const SQUARE: Self = Self {
        width: 1,
        height: 1,
    };
    pub const FOUR_THREE: Self = Self {
        width: 4,
        height: 3,
    };
    pub const SIXTEEN_NINE: Self = Self {
        width: 16,
        height: 9,
    };
    pub const THREE_TWO: Self = Self {
        width: 3,
        height: 2,
    };

    /// Ratios offered as presets, in selector order.
    pub const PRESETS: [Self; 4] = [
        Self::THREE_TWO,
        Self::SQUARE,
        Self::FOUR_THREE,
        Self::SIXTEEN_NINE,
    ];

    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// The ratio as `width / height`.
    pub fn value(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for AspectRatio {
    /// 3:2, the 6x4 print format.
    fn default() -> Self {
        Self::THREE_TWO
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| AspectRatioError::Malformed(s.to_string()))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| AspectRatioError::Malformed(s.to_string()))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| AspectRatioError::Malformed(s.to_string()))?;
        Self::new(width, height).ok_or_else(|| AspectRatioError::NonPositive(s.to_string()))
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = AspectRatioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(ratio: AspectRatio) -> Self {
        ratio.to_string()
    }
}
