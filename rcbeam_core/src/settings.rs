//! # Design Settings
//!
//! Run-wide options shared by every beam in a batch: detailing rules, bar
//! preferences and the assumptions used to fill in missing input fields.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes:
//!
//! ```json
//! { "seismic": true, "max_layers": 3 }
//! ```

use serde::{Deserialize, Serialize};

use crate::arrangement::{validate_max_layers, EscalationPolicy, SelectorOptions, DEFAULT_AGGREGATE_SIZE};
use crate::detailing::SIDE_FACE_BAR_DIA;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{is_standard_diameter, BarSurface};

/// Design code label written into reports
pub const DEFAULT_CODE: &str = "IS 456:2000";

/// Settings applied to every beam in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Design code label (e.g., "IS 456:2000")
    pub code: String,

    /// Nominal maximum aggregate size (mm)
    pub aggregate_size: f64,

    /// Maximum layers of main bars
    pub max_layers: u32,

    /// Selector escalation order
    pub escalation: EscalationPolicy,

    /// Main bar diameter tried first (mm)
    pub preferred_dia: Option<f64>,

    /// Surface of the main bars
    pub bar_surface: BarSurface,

    /// Apply IS 13920 ductile detailing
    pub seismic: bool,

    /// Share of bars lapped at one section (%)
    pub splice_percent: f64,

    /// Depth to compression steel centroid d' (mm); derived from cover when absent
    pub d_dash: Option<f64>,

    /// Main bar diameter assumed when deriving d from D (mm)
    pub assumed_main_dia: f64,

    /// Diameter of hanger and side-face bars (mm)
    pub hanger_dia: f64,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            code: DEFAULT_CODE.to_string(),
            aggregate_size: DEFAULT_AGGREGATE_SIZE,
            max_layers: 2,
            escalation: EscalationPolicy::DiameterFirst,
            preferred_dia: None,
            bar_surface: BarSurface::Deformed,
            seismic: false,
            splice_percent: 50.0,
            d_dash: None,
            assumed_main_dia: 16.0,
            hanger_dia: SIDE_FACE_BAR_DIA,
        }
    }
}

impl DesignSettings {
    /// Validate settings before a run.
    pub fn validate(&self) -> CalcResult<()> {
        validate_max_layers(self.max_layers)?;
        if !self.aggregate_size.is_finite() || self.aggregate_size <= 0.0 {
            return Err(CalcError::configuration(
                "aggregate_size",
                self.aggregate_size,
                "Aggregate size must be positive",
            ));
        }
        if !(0.0..=100.0).contains(&self.splice_percent) {
            return Err(CalcError::configuration(
                "splice_percent",
                self.splice_percent,
                "Spliced share must be between 0 and 100 percent",
            ));
        }
        if let Some(dia) = self.preferred_dia {
            if !is_standard_diameter(dia) {
                return Err(CalcError::configuration("preferred_dia", dia, "Not a standard bar diameter"));
            }
        }
        if let Some(d_dash) = self.d_dash {
            if !d_dash.is_finite() || d_dash <= 0.0 {
                return Err(CalcError::dimension("d_dash", d_dash, "Must be positive"));
            }
        }
        for (field, dia) in [("assumed_main_dia", self.assumed_main_dia), ("hanger_dia", self.hanger_dia)] {
            if !is_standard_diameter(dia) {
                return Err(CalcError::configuration(field, dia, "Not a standard bar diameter"));
            }
        }
        Ok(())
    }

    /// Options for the tension-bar selector
    pub fn selector_options(&self) -> SelectorOptions {
        SelectorOptions {
            preferred_dia: self.preferred_dia,
            max_layers: self.max_layers,
            aggregate_size: self.aggregate_size,
            policy: self.escalation,
        }
    }

    /// Builder-style seismic toggle
    pub fn with_seismic(mut self, seismic: bool) -> Self {
        self.seismic = seismic;
        self
    }
}
