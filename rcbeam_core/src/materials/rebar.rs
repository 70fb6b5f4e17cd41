//! Reinforcing Bar Sizes
//!
//! Standard deformed bar diameters per IS 1786 and their nominal areas.

use serde::{Deserialize, Serialize};

/// All standard bar diameters (mm), ascending.
pub const STANDARD_DIAMETERS: [f64; 11] = [6.0, 8.0, 10.0, 12.0, 16.0, 20.0, 25.0, 28.0, 32.0, 36.0, 40.0];

/// Diameters considered for main longitudinal beam bars (mm), ascending.
///
/// The arrangement selector searches these in order, smallest first.
pub const MAIN_BAR_DIAMETERS: [f64; 5] = [12.0, 16.0, 20.0, 25.0, 32.0];

/// Cross-sectional area of one bar, π·(φ/2)² in mm²
#[inline]
pub fn bar_area(diameter_mm: f64) -> f64 {
    std::f64::consts::PI * (diameter_mm / 2.0).powi(2)
}

/// Total area of `count` bars of one diameter (mm²)
#[inline]
pub fn bars_area(count: u32, diameter_mm: f64) -> f64 {
    count as f64 * bar_area(diameter_mm)
}

/// Whether a diameter is one of the standard sizes (exact match to 0.01 mm)
pub fn is_standard_diameter(diameter_mm: f64) -> bool {
    STANDARD_DIAMETERS
        .iter()
        .any(|d| (d - diameter_mm).abs() < 0.01)
}

/// Surface condition of a bar, which sets its design bond stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BarSurface {
    /// High-yield deformed bars (Fe415, Fe500, ...)
    #[default]
    Deformed,
    /// Plain mild-steel bars
    Plain,
}

impl BarSurface {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BarSurface::Deformed => "Deformed",
            BarSurface::Plain => "Plain",
        }
    }
}

/// Whether the bar being developed or spliced is in tension or compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BarStress {
    #[default]
    Tension,
    Compression,
}
