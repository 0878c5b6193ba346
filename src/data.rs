//! Material Catalog
//!
//! Material records, their qualitative constraint classes, and the ordered
//! catalog the engine reads from. The engine never mutates a catalog; it
//! borrows materials through a [`MaterialLookup`] keyed by id.
//!
//! Catalog files are JSON arrays of [`Material`] records. A built-in reference
//! catalog ships with the crate for tests, benches and the CLI.

use crate::metrics::MetricVector;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const REFERENCE_CATALOG_JSON: &str = include_str!("../data/reference_catalog.json");

/// Name fragments identifying elastomeric fibers
const ELASTOMER_MARKERS: [&str; 4] = ["elastane", "spandex", "lycra", "tpu"];

/// Catalog category (six fiber families)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    #[serde(rename = "MMCF")]
    Mmcf,
    Bast,
    Natural,
    Synthetic,
    BioPolymer,
    Protein,
}

/// Family name used by use-case material preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialFamily {
    Cellulosic,
    Bast,
    Natural,
    Synthetic,
    Biopolymer,
    Protein,
}

impl MaterialCategory {
    pub fn family(self) -> MaterialFamily {
        match self {
            MaterialCategory::Mmcf => MaterialFamily::Cellulosic,
            MaterialCategory::Bast => MaterialFamily::Bast,
            MaterialCategory::Natural => MaterialFamily::Natural,
            MaterialCategory::Synthetic => MaterialFamily::Synthetic,
            MaterialCategory::BioPolymer => MaterialFamily::Biopolymer,
            MaterialCategory::Protein => MaterialFamily::Protein,
        }
    }

    /// Synthetic or bio-based polymer (counts toward synthetic share)
    pub fn is_polymer(self) -> bool {
        matches!(self, MaterialCategory::Synthetic | MaterialCategory::BioPolymer)
    }

    /// Families the generator draws additive components from
    pub fn is_additive_source(self) -> bool {
        matches!(
            self,
            MaterialCategory::BioPolymer | MaterialCategory::Synthetic | MaterialCategory::Mmcf
        )
    }
}

impl MaterialFamily {
    /// Case-insensitive parse of a family name ("cellulosic", "BAST", ...)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "CELLULOSIC" => Some(MaterialFamily::Cellulosic),
            "BAST" => Some(MaterialFamily::Bast),
            "NATURAL" => Some(MaterialFamily::Natural),
            "SYNTHETIC" => Some(MaterialFamily::Synthetic),
            "BIOPOLYMER" => Some(MaterialFamily::Biopolymer),
            "PROTEIN" => Some(MaterialFamily::Protein),
            _ => None,
        }
    }
}

/// Three-level risk class, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClass {
    Low,
    Medium,
    High,
}

impl RiskClass {
    /// Ordinal used by supply-risk averaging (low=1, medium=2, high=3)
    pub fn ordinal(self) -> f64 {
        match self {
            RiskClass::Low => 1.0,
            RiskClass::Medium => 2.0,
            RiskClass::High => 3.0,
        }
    }

    /// Position on the 0-10 circularity microplastic scale (low=2, medium=5, high=9)
    pub fn circularity_scale(self) -> f64 {
        match self {
            RiskClass::Low => 2.0,
            RiskClass::Medium => 5.0,
            RiskClass::High => 9.0,
        }
    }

    /// Class for a numeric 0-10 microplastic ceiling (<=4 low, <=7 medium, else high)
    pub fn from_ceiling(ceiling: f64) -> Self {
        if ceiling <= 4.0 {
            RiskClass::Low
        } else if ceiling <= 7.0 {
            RiskClass::Medium
        } else {
            RiskClass::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskClass::Low => "low",
            RiskClass::Medium => "medium",
            RiskClass::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiodegradabilityClass {
    High,
    Medium,
    Low,
}

/// Life-cycle figures per kg of fiber
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Lca {
    pub co2_kg_per_kg: f64,
    pub water_l_per_kg: f64,
    pub energy_mj_per_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConstraints {
    pub biodegradability_class: BiodegradabilityClass,
    pub microplastic_risk: RiskClass,
    pub animal_fiber: bool,
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub category: MaterialCategory,
    pub properties: MetricVector,
    pub lca: Lca,
    pub constraints: MaterialConstraints,
    pub cost_min: f64,
    pub cost_max: f64,
    /// Technology readiness level (1-9)
    pub trl: f64,
}

impl Material {
    pub fn family(&self) -> MaterialFamily {
        self.category.family()
    }

    /// Midpoint of the EUR/kg cost range
    pub fn mid_cost(&self) -> f64 {
        (self.cost_min + self.cost_max) / 2.0
    }

    /// Elastane / spandex / lycra / TPU, detected by name
    pub fn is_elastomer(&self) -> bool {
        is_elastomer_name(&self.name)
    }
}

pub fn is_elastomer_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    ELASTOMER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// One component of a blend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositionPart {
    pub material_id: String,
    pub name: String,
    /// Integer percentage; a composition's parts sum to 100
    pub pct: i32,
}

impl CompositionPart {
    pub fn new(material: &Material, pct: i32) -> Self {
        Self {
            material_id: material.id.clone(),
            name: material.name.clone(),
            pct,
        }
    }

    /// Percentage as a 0-1 share
    #[inline]
    pub fn share(&self) -> f64 {
        self.pct as f64 / 100.0
    }
}

/// Id → material index over a borrowed slice of materials
///
/// Later entries win when ids repeat.
#[derive(Debug, Clone, Default)]
pub struct MaterialLookup<'a> {
    by_id: FxHashMap<&'a str, &'a Material>,
}

impl<'a> MaterialLookup<'a> {
    pub fn new<I>(materials: I) -> Self
    where
        I: IntoIterator<Item = &'a Material>,
    {
        let by_id = materials.into_iter().map(|m| (m.id.as_str(), m)).collect();
        Self { by_id }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&'a Material> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Ordered, immutable material catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    materials: Vec<Material>,
}

impl Catalog {
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    /// Load a catalog from a JSON file (array of materials)
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;

        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse catalog file: {:?}", path))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json).context("Invalid catalog JSON")?;
        tracing::debug!("Loaded catalog with {} materials", catalog.len());
        Ok(catalog)
    }

    /// Built-in reference catalog of common and emerging textile fibers
    pub fn reference() -> Result<Self> {
        Self::from_json_str(REFERENCE_CATALOG_JSON).context("Reference catalog is malformed")
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn find(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn lookup(&self) -> MaterialLookup<'_> {
        MaterialLookup::new(&self.materials)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl AsRef<[Material]> for Catalog {
    fn as_ref(&self) -> &[Material] {
        &self.materials
    }
}
