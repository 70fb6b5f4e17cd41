//! # Code Tables
//!
//! Static IS 456:2000 lookups: design bond stress, design shear strength τc,
//! maximum shear stress τc,max, compression-steel stress fsc, and the
//! standard bar-area map.
//!
//! ## Grade fallback
//!
//! Every grade-keyed table uses the same **nearest-lower-grade** rule through
//! [`floor_lookup`]: an untabulated grade takes the greatest tabulated grade
//! that does not exceed it (M27 reads as M25, M45 as M40). Values are never
//! rounded up. A grade below the lowest row is a [`CalcError::Material`].
//!
//! ## Sharing
//!
//! The tables are built once into [`IS456_TABLES`] and never mutated. Engine
//! functions take `&CodeTables` so tests can inject their own instance and
//! batch workers can read the static concurrently without locks.
//!
//! ```rust
//! use rcbeam_core::tables::tables;
//! use rcbeam_core::materials::BarSurface;
//!
//! let t = tables();
//! assert_eq!(t.bond_stress(25.0, BarSurface::Deformed).unwrap(), 2.24);
//! assert_eq!(t.max_shear_stress(27.0).unwrap(), 3.1); // M27 reads as M25
//! ```

use once_cell::sync::Lazy;

use crate::errors::{require_positive_strength, CalcError, CalcResult};
use crate::materials::{bar_area, BarSurface, STANDARD_DIAMETERS};

/// Ratio of deformed-bar to plain-bar bond stress (IS 456 26.2.1.1)
pub const DEFORMED_BOND_FACTOR: f64 = 1.6;

/// Percentage-steel breakpoints of Table 19 (100·As/bd)
pub const TAU_C_PT: [f64; 13] = [
    0.15, 0.25, 0.50, 0.75, 1.00, 1.25, 1.50, 1.75, 2.00, 2.25, 2.50, 2.75, 3.00,
];

/// d'/d breakpoints of the compression-steel stress table (SP-16 Table F)
pub const FSC_D_DASH_RATIO: [f64; 4] = [0.05, 0.10, 0.15, 0.20];

/// Process-wide IS 456 tables, constructed on first use.
pub static IS456_TABLES: Lazy<CodeTables> = Lazy::new(CodeTables::is456);

/// Shared read-only access to [`IS456_TABLES`]
pub fn tables() -> &'static CodeTables {
    &IS456_TABLES
}

/// Immutable collection of code tables, keyed by grade in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTables {
    /// Deformed-bar bond stress τbd in tension, by fck
    bond_stress_deformed: Vec<(f64, f64)>,
    /// Table 19 τc rows, by fck
    shear_strength: Vec<(f64, [f64; 13])>,
    /// Table 20 τc,max, by fck
    max_shear_stress: Vec<(f64, f64)>,
    /// fsc rows, by fy
    compression_steel_stress: Vec<(f64, [f64; 4])>,
    /// Standard diameter → area
    bar_areas: Vec<(f64, f64)>,
}

impl CodeTables {
    /// Build the IS 456:2000 tables.
    pub fn is456() -> Self {
        CodeTables {
            bond_stress_deformed: vec![
                // Plain-bar values of 26.2.1.1 (1.0, 1.2, 1.4, 1.5, 1.7, 1.9) × 1.6
                (15.0, 1.60),
                (20.0, 1.92),
                (25.0, 2.24),
                (30.0, 2.40),
                (35.0, 2.72),
                (40.0, 3.04),
            ],
            shear_strength: vec![
                (15.0, [0.28, 0.35, 0.46, 0.54, 0.60, 0.64, 0.68, 0.71, 0.71, 0.71, 0.71, 0.71, 0.71]),
                (20.0, [0.28, 0.36, 0.48, 0.56, 0.62, 0.67, 0.72, 0.75, 0.79, 0.81, 0.82, 0.82, 0.82]),
                (25.0, [0.29, 0.36, 0.49, 0.57, 0.64, 0.70, 0.74, 0.78, 0.82, 0.85, 0.88, 0.90, 0.92]),
                (30.0, [0.29, 0.37, 0.50, 0.59, 0.66, 0.71, 0.76, 0.80, 0.84, 0.88, 0.91, 0.94, 0.96]),
                (35.0, [0.29, 0.37, 0.50, 0.59, 0.67, 0.73, 0.78, 0.82, 0.86, 0.90, 0.93, 0.96, 0.99]),
                (40.0, [0.30, 0.38, 0.51, 0.60, 0.68, 0.74, 0.79, 0.84, 0.88, 0.92, 0.95, 0.98, 1.01]),
            ],
            max_shear_stress: vec![
                (15.0, 2.5),
                (20.0, 2.8),
                (25.0, 3.1),
                (30.0, 3.5),
                (35.0, 3.7),
                (40.0, 4.0),
            ],
            compression_steel_stress: vec![
                (250.0, [217.0, 217.0, 217.0, 217.0]),
                (415.0, [355.0, 353.0, 342.0, 329.0]),
                (500.0, [424.0, 412.0, 395.0, 370.0]),
            ],
            bar_areas: STANDARD_DIAMETERS.iter().map(|&d| (d, bar_area(d))).collect(),
        }
    }

    /// Design bond stress τbd (N/mm²) for bars in tension.
    ///
    /// Plain bars take the deformed value ÷ 1.6.
    pub fn bond_stress(&self, fck: f64, surface: BarSurface) -> CalcResult<f64> {
        let tau_deformed = *self.concrete_row(&self.bond_stress_deformed, fck, "bond stress")?;
        Ok(match surface {
            BarSurface::Deformed => tau_deformed,
            BarSurface::Plain => tau_deformed / DEFORMED_BOND_FACTOR,
        })
    }

    /// Design shear strength τc (N/mm²) for a percentage of tension steel.
    ///
    /// `pt` is clamped to the 0.15–3.00 range of Table 19 and interpolated
    /// linearly between breakpoints.
    pub fn shear_strength(&self, fck: f64, pt: f64) -> CalcResult<f64> {
        if !pt.is_finite() || pt < 0.0 {
            return Err(CalcError::configuration("pt", pt, "Steel percentage must be non-negative"));
        }
        let row = self.concrete_row(&self.shear_strength, fck, "Table 19")?;
        Ok(interpolate(&TAU_C_PT, row, pt))
    }

    /// Maximum shear stress τc,max (N/mm²)
    pub fn max_shear_stress(&self, fck: f64) -> CalcResult<f64> {
        self.concrete_row(&self.max_shear_stress, fck, "Table 20").copied()
    }

    /// Design stress in compression steel fsc (N/mm²) for a given d'/d.
    ///
    /// d'/d is clamped to 0.05–0.20; fy follows the nearest-lower rule over
    /// Fe250/Fe415/Fe500.
    pub fn compression_steel_stress(&self, fy: f64, d_dash_ratio: f64) -> CalcResult<f64> {
        require_positive_strength("fy", fy)?;
        let (_, row) = floor_lookup(&self.compression_steel_stress, fy).ok_or_else(|| {
            CalcError::material("fy", fy, "Below lowest tabulated steel grade Fe250")
        })?;
        Ok(interpolate(&FSC_D_DASH_RATIO, row, d_dash_ratio))
    }

    /// Area of one standard bar (mm²), or `None` for a non-standard diameter
    pub fn standard_bar_area(&self, diameter_mm: f64) -> Option<f64> {
        self.bar_areas
            .iter()
            .find(|(d, _)| (d - diameter_mm).abs() < 0.01)
            .map(|(_, a)| *a)
    }

    /// Lowest concrete grade the tables cover
    pub fn min_concrete_grade(&self) -> f64 {
        self.max_shear_stress.first().map(|(g, _)| *g).unwrap_or(15.0)
    }

    fn concrete_row<'a, V>(&self, table: &'a [(f64, V)], fck: f64, table_name: &str) -> CalcResult<&'a V> {
        require_positive_strength("fck", fck)?;
        floor_lookup(table, fck).map(|(_, v)| v).ok_or_else(|| {
            CalcError::material(
                "fck",
                fck,
                format!("Below lowest tabulated concrete grade in {}", table_name),
            )
        })
    }
}

impl Default for CodeTables {
    fn default() -> Self {
        CodeTables::is456()
    }
}

/// Nearest-lower lookup over entries sorted ascending by key.
///
/// Returns the entry with the greatest key ≤ `key`, or `None` when `key` is
/// below the first entry (or NaN).
///
/// ```rust
/// use rcbeam_core::tables::floor_lookup;
///
/// let rows = [(15.0, 'a'), (20.0, 'b'), (25.0, 'c')];
/// assert_eq!(floor_lookup(&rows, 24.9).map(|r| r.1), Some('b'));
/// assert_eq!(floor_lookup(&rows, 25.0).map(|r| r.1), Some('c'));
/// assert_eq!(floor_lookup(&rows, 14.0), None);
/// ```
pub fn floor_lookup<V>(entries: &[(f64, V)], key: f64) -> Option<&(f64, V)> {
    if key.is_nan() {
        return None;
    }
    // Tolerance keeps 24.9999999 from falling to the row below M25
    let idx = entries.partition_point(|(k, _)| *k <= key + 1e-9);
    if idx == 0 {
        None
    } else {
        entries.get(idx - 1)
    }
}

/// Linear interpolation with the abscissa clamped to the table range.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let i = xs.partition_point(|&k| k <= x).clamp(1, n - 1);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_floor_lookup_rounds_down() {
        let rows = [(15.0, 1), (20.0, 2), (25.0, 3), (30.0, 4)];
        assert_eq!(floor_lookup(&rows, 15.0).unwrap().1, 1);
        assert_eq!(floor_lookup(&rows, 29.99).unwrap().1, 3);
        assert_eq!(floor_lookup(&rows, 100.0).unwrap().1, 4);
        assert!(floor_lookup(&rows, 10.0).is_none());
        assert!(floor_lookup(&rows, f64::NAN).is_none());
        assert!(floor_lookup::<i32>(&[], 20.0).is_none());
    }

    #[test]
    fn test_bond_stress_values() {
        let t = CodeTables::is456();
        assert_abs_diff_eq!(t.bond_stress(20.0, BarSurface::Deformed).unwrap(), 1.92, epsilon = 1e-9);
        assert_abs_diff_eq!(t.bond_stress(25.0, BarSurface::Deformed).unwrap(), 2.24, epsilon = 1e-9);
        assert_abs_diff_eq!(t.bond_stress(25.0, BarSurface::Plain).unwrap(), 1.4, epsilon = 1e-9);
        // M50 falls back to M40
        assert_abs_diff_eq!(t.bond_stress(50.0, BarSurface::Deformed).unwrap(), 3.04, epsilon = 1e-9);
    }

    #[test]
    fn test_grade_below_minimum_is_material_error() {
        let t = CodeTables::is456();
        let err = t.bond_stress(10.0, BarSurface::Deformed).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_ERROR");
        assert!(t.max_shear_stress(0.0).is_err());
        assert!(t.shear_strength(12.0, 1.0).is_err());
        assert!(t.compression_steel_stress(200.0, 0.1).is_err());
    }

    #[test]
    fn test_shear_strength_interpolation() {
        let t = CodeTables::is456();
        assert_abs_diff_eq!(t.shear_strength(25.0, 0.50).unwrap(), 0.49, epsilon = 1e-9);
        assert_abs_diff_eq!(t.shear_strength(25.0, 0.625).unwrap(), 0.53, epsilon = 1e-9);
        // Clamped at both ends
        assert_abs_diff_eq!(t.shear_strength(25.0, 0.05).unwrap(), 0.29, epsilon = 1e-9);
        assert_abs_diff_eq!(t.shear_strength(25.0, 4.0).unwrap(), 0.92, epsilon = 1e-9);
        assert!(t.shear_strength(25.0, -0.1).is_err());
    }

    #[test]
    fn test_untabulated_grade_never_rounds_up() {
        let t = CodeTables::is456();
        assert_eq!(t.max_shear_stress(29.0).unwrap(), t.max_shear_stress(25.0).unwrap());
        assert_eq!(
            t.shear_strength(34.0, 1.0).unwrap(),
            t.shear_strength(30.0, 1.0).unwrap()
        );
    }

    #[test]
    fn test_compression_steel_stress() {
        let t = CodeTables::is456();
        assert_abs_diff_eq!(t.compression_steel_stress(415.0, 0.10).unwrap(), 353.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.compression_steel_stress(500.0, 0.125).unwrap(), 403.5, epsilon = 1e-9);
        assert_abs_diff_eq!(t.compression_steel_stress(500.0, 0.30).unwrap(), 370.0, epsilon = 1e-9);
        // Fe550 reads the Fe500 row
        assert_abs_diff_eq!(t.compression_steel_stress(550.0, 0.05).unwrap(), 424.0, epsilon = 1e-9);
    }

    #[test]
    fn test_standard_bar_area_map() {
        let t = tables();
        assert_abs_diff_eq!(t.standard_bar_area(16.0).unwrap(), 201.06, epsilon = 0.01);
        assert!(t.standard_bar_area(14.0).is_none());
        assert_eq!(t.min_concrete_grade(), 15.0);
    }
}
