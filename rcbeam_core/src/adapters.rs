//! # Input Adapters
//!
//! Analysis programs export forces and geometry in their own formats. Each
//! format is handled by a [`SourceAdapter`]; the [`AdapterRegistry`] asks its
//! adapters in priority order whether they can read a source and uses the
//! first that says yes.
//!
//! Forces and geometry are read as separate record lists and joined on
//! (story, beam_id). When a beam has several force records (one per load
//! combination or station) the governing magnitudes are kept.
//!
//! The built-in [`JsonRecordAdapter`] reads `.json` files holding either a
//! plain array of beam records or an object with `forces` and `geometry`
//! arrays.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::design::{BeamInput, DEFAULT_COVER, DEFAULT_STIRRUP_DIA};
use crate::errors::{CalcError, CalcResult};

/// Factored forces for one beam from one load case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceRecord {
    pub beam_id: String,
    #[serde(default)]
    pub story: String,
    #[serde(rename = "Mu", alias = "mu")]
    pub mu: f64,
    #[serde(rename = "Vu", alias = "vu")]
    pub vu: f64,
    #[serde(rename = "Tu", alias = "tu", default, skip_serializing_if = "Option::is_none")]
    pub tu: Option<f64>,
}

/// Section, materials and span for one beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub beam_id: String,
    #[serde(default)]
    pub story: String,
    pub b: f64,
    #[serde(rename = "D", alias = "overall_depth")]
    pub overall_depth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
    pub fck: f64,
    pub fy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stirrup_dia: Option<f64>,
    pub span: f64,
}

/// A reader for one source format.
pub trait SourceAdapter: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Whether this adapter can read `source`. Must not fail.
    fn can_handle(&self, source: &Path) -> bool;

    fn load_forces(&self, source: &Path) -> CalcResult<Vec<ForceRecord>>;

    fn load_geometry(&self, source: &Path) -> CalcResult<Vec<GeometryRecord>>;
}

/// Adapters in priority order.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        AdapterRegistry { adapters: Vec::new() }
    }

    /// Registry with the built-in adapters
    pub fn with_builtin() -> Self {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(JsonRecordAdapter));
        registry
    }

    /// Add an adapter after those already registered
    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.push(adapter);
    }

    /// Names of registered adapters, in lookup order
    pub fn names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// First adapter that accepts `source`
    pub fn find(&self, source: &Path) -> CalcResult<&dyn SourceAdapter> {
        self.adapters
            .iter()
            .find(|a| a.can_handle(source))
            .map(|a| a.as_ref())
            .ok_or_else(|| CalcError::UnsupportedSource {
                source_name: source.display().to_string(),
            })
    }

    /// Read a source and join its records into beam inputs.
    pub fn load(&self, source: &Path) -> CalcResult<Vec<BeamInput>> {
        let adapter = self.find(source)?;
        let forces = adapter.load_forces(source)?;
        let geometry = adapter.load_geometry(source)?;
        debug!(
            adapter = adapter.name(),
            forces = forces.len(),
            geometry = geometry.len(),
            "source records loaded"
        );
        join_records(&forces, &geometry)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        AdapterRegistry::with_builtin()
    }
}

type BeamKey = (String, String);

fn key(story: &str, beam_id: &str) -> BeamKey {
    (story.to_string(), beam_id.to_string())
}

/// Join forces to geometry on (story, beam_id).
///
/// Beams come back sorted by (story, beam_id). Several force records for one
/// beam collapse to the largest magnitudes of Mu, Vu and Tu. Repeated
/// identical geometry records count once. A force record without geometry, or
/// two differing geometry records for one beam, is a `Configuration` error.
/// Geometry without forces is skipped.
pub fn join_records(forces: &[ForceRecord], geometry: &[GeometryRecord]) -> CalcResult<Vec<BeamInput>> {
    let mut sections: BTreeMap<BeamKey, &GeometryRecord> = BTreeMap::new();
    for record in geometry {
        match sections.entry(key(&record.story, &record.beam_id)) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(existing) if *existing.get() == record => {}
            Entry::Occupied(_) => {
                return Err(CalcError::configuration(
                    "beam_id",
                    format!("{}/{}", record.story, record.beam_id),
                    "Conflicting geometry records",
                ));
            }
        }
    }

    let mut envelopes: BTreeMap<BeamKey, ForceRecord> = BTreeMap::new();
    for record in forces {
        envelopes
            .entry(key(&record.story, &record.beam_id))
            .and_modify(|env| {
                env.mu = governing(env.mu, record.mu);
                env.vu = governing(env.vu, record.vu);
                env.tu = match (env.tu, record.tu) {
                    (Some(a), Some(b)) => Some(governing(a, b)),
                    (a, b) => a.or(b),
                };
            })
            .or_insert_with(|| record.clone());
    }

    envelopes
        .into_iter()
        .map(|(beam_key, force)| {
            let section = sections.get(&beam_key).ok_or_else(|| {
                CalcError::configuration(
                    "beam_id",
                    format!("{}/{}", beam_key.0, beam_key.1),
                    "No geometry record for beam",
                )
            })?;
            Ok(BeamInput {
                beam_id: force.beam_id,
                story: force.story,
                b: section.b,
                overall_depth: section.overall_depth,
                d: section.d,
                fck: section.fck,
                fy: section.fy,
                mu: force.mu,
                vu: force.vu,
                tu: force.tu,
                cover: section.cover.unwrap_or(DEFAULT_COVER),
                stirrup_dia: section.stirrup_dia.unwrap_or(DEFAULT_STIRRUP_DIA),
                span: section.span,
            })
        })
        .collect()
}

/// The value with the larger magnitude, sign kept
fn governing(a: f64, b: f64) -> f64 {
    if b.abs() > a.abs() {
        b
    } else {
        a
    }
}

/// Reads JSON beam records.
///
/// Accepted layouts:
///
/// ```json
/// [ { "beam_id": "B1", "story": "L1", "b": 230, "D": 450, "fck": 25, "fy": 500,
///     "Mu": 75, "Vu": 75, "span": 5000 } ]
/// ```
///
/// ```json
/// { "forces":   [ { "beam_id": "B1", "story": "L1", "Mu": 75, "Vu": 75 } ],
///   "geometry": [ { "beam_id": "B1", "story": "L1", "b": 230, "D": 450,
///                   "fck": 25, "fy": 500, "span": 5000 } ] }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordAdapter;

impl JsonRecordAdapter {
    fn read(&self, source: &Path) -> CalcResult<Value> {
        let contents = fs::read_to_string(source)
            .map_err(|e| CalcError::file_error("read", source.display().to_string(), e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", source.display(), e),
        })
    }

    fn records<T: serde::de::DeserializeOwned>(value: Value, source: &Path) -> CalcResult<Vec<T>> {
        serde_json::from_value(value).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid record in {}: {}", source.display(), e),
        })
    }

    fn section(&self, source: &Path, name: &str) -> CalcResult<Value> {
        match self.read(source)? {
            Value::Object(mut map) => map.remove(name).ok_or_else(|| CalcError::SerializationError {
                reason: format!("Missing '{}' array in {}", name, source.display()),
            }),
            other => Err(CalcError::SerializationError {
                reason: format!("Expected an object in {}, found {}", source.display(), json_kind(&other)),
            }),
        }
    }

    fn beams(&self, source: &Path) -> CalcResult<Option<Vec<BeamInput>>> {
        match self.read(source)? {
            value @ Value::Array(_) => Ok(Some(Self::records(value, source)?)),
            _ => Ok(None),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl SourceAdapter for JsonRecordAdapter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn can_handle(&self, source: &Path) -> bool {
        source
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }

    fn load_forces(&self, source: &Path) -> CalcResult<Vec<ForceRecord>> {
        if let Some(beams) = self.beams(source)? {
            return Ok(beams
                .into_iter()
                .map(|beam| ForceRecord {
                    beam_id: beam.beam_id,
                    story: beam.story,
                    mu: beam.mu,
                    vu: beam.vu,
                    tu: beam.tu,
                })
                .collect());
        }
        Self::records(self.section(source, "forces")?, source)
    }

    fn load_geometry(&self, source: &Path) -> CalcResult<Vec<GeometryRecord>> {
        if let Some(beams) = self.beams(source)? {
            return Ok(beams
                .into_iter()
                .map(|beam| GeometryRecord {
                    beam_id: beam.beam_id,
                    story: beam.story,
                    b: beam.b,
                    overall_depth: beam.overall_depth,
                    d: beam.d,
                    fck: beam.fck,
                    fy: beam.fy,
                    cover: Some(beam.cover),
                    stirrup_dia: Some(beam.stirrup_dia),
                    span: beam.span,
                })
                .collect());
        }
        Self::records(self.section(source, "geometry")?, source)
    }
}
