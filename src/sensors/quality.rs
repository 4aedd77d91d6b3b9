//! Categorical air-quality classification.
//!
//! Maps a concentration to an ordered label via six ascending breakpoints
//! supplied by configuration.  A reading exactly at a breakpoint belongs to
//! the tier **above** it: the boundary is the first value that no longer
//! qualifies for the cleaner band.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Ordered air-quality tiers, cleanest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AirQuality {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
    Hazardous,
    Critical,
}

impl AirQuality {
    /// Total number of tiers.
    pub const COUNT: usize = 7;

    /// Classify a concentration against ascending breakpoints.
    ///
    /// `breakpoints[i]` is the lower bound of tier `i + 1`; anything below
    /// `breakpoints[0]` is `Excellent`, anything at or above the last is
    /// `Critical`.
    pub fn from_ppm(ppm: f32, breakpoints: &[f32; 6]) -> Self {
        const TIERS: [AirQuality; AirQuality::COUNT] = [
            AirQuality::Excellent,
            AirQuality::Good,
            AirQuality::Moderate,
            AirQuality::Poor,
            AirQuality::VeryPoor,
            AirQuality::Hazardous,
            AirQuality::Critical,
        ];
        for (i, bp) in breakpoints.iter().enumerate() {
            if ppm < *bp {
                return TIERS[i];
            }
        }
        AirQuality::Critical
    }

    /// Human-readable label, as shown on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Hazardous => "Hazardous",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
