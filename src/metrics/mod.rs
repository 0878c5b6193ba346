//! Metric model for blend scoring
//!
//! The 14 standardized 0-100 property scores shared by targets, catalog
//! materials and predictions, split into three groups:
//! - Performance: breathability .. weight_lightness (6)
//! - Sustainability: co2 .. recyclability (6)
//! - Economic: cost, scalability (2)
//!
//! Callers supply sparse maps (`PartialMetrics`); everything past the input
//! boundary works on the dense `MetricVector`.

use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Neutral value used wherever a metric is not supplied
pub const NEUTRAL_VALUE: f64 = 50.0;

/// One of the 14 standardized property scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Breathability,
    Elasticity,
    Durability,
    Softness,
    ThermalRegulation,
    WeightLightness,
    Co2,
    Water,
    Energy,
    Biodegradability,
    MicroplasticRisk,
    Recyclability,
    Cost,
    Scalability,
}

/// Metric family used for group averages and composite scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Performance,
    Sustainability,
    Economic,
}

pub const PERFORMANCE_METRICS: [Metric; 6] = [
    Metric::Breathability,
    Metric::Elasticity,
    Metric::Durability,
    Metric::Softness,
    Metric::ThermalRegulation,
    Metric::WeightLightness,
];

pub const SUSTAINABILITY_METRICS: [Metric; 6] = [
    Metric::Co2,
    Metric::Water,
    Metric::Energy,
    Metric::Biodegradability,
    Metric::MicroplasticRisk,
    Metric::Recyclability,
];

pub const ECONOMIC_METRICS: [Metric; 2] = [Metric::Cost, Metric::Scalability];

impl Metric {
    pub const COUNT: usize = 14;

    /// All metrics in vocabulary order
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Breathability,
        Metric::Elasticity,
        Metric::Durability,
        Metric::Softness,
        Metric::ThermalRegulation,
        Metric::WeightLightness,
        Metric::Co2,
        Metric::Water,
        Metric::Energy,
        Metric::Biodegradability,
        Metric::MicroplasticRisk,
        Metric::Recyclability,
        Metric::Cost,
        Metric::Scalability,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn group(self) -> MetricGroup {
        match self {
            Metric::Breathability
            | Metric::Elasticity
            | Metric::Durability
            | Metric::Softness
            | Metric::ThermalRegulation
            | Metric::WeightLightness => MetricGroup::Performance,
            Metric::Co2
            | Metric::Water
            | Metric::Energy
            | Metric::Biodegradability
            | Metric::MicroplasticRisk
            | Metric::Recyclability => MetricGroup::Sustainability,
            Metric::Cost | Metric::Scalability => MetricGroup::Economic,
        }
    }

    /// Wire name (matches the serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Breathability => "breathability",
            Metric::Elasticity => "elasticity",
            Metric::Durability => "durability",
            Metric::Softness => "softness",
            Metric::ThermalRegulation => "thermal_regulation",
            Metric::WeightLightness => "weight_lightness",
            Metric::Co2 => "co2",
            Metric::Water => "water",
            Metric::Energy => "energy",
            Metric::Biodegradability => "biodegradability",
            Metric::MicroplasticRisk => "microplastic_risk",
            Metric::Recyclability => "recyclability",
            Metric::Cost => "cost",
            Metric::Scalability => "scalability",
        }
    }

    pub fn parse(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MetricGroup {
    pub fn metrics(self) -> &'static [Metric] {
        match self {
            MetricGroup::Performance => &PERFORMANCE_METRICS,
            MetricGroup::Sustainability => &SUSTAINABILITY_METRICS,
            MetricGroup::Economic => &ECONOMIC_METRICS,
        }
    }
}

/// Sparse metric map as supplied by callers (sliders, weights, biases).
///
/// `BTreeMap` keeps iteration and serialization in vocabulary order.
pub type PartialMetrics = BTreeMap<Metric, f64>;

/// Dense value per metric, indexed by [`Metric`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricVector([f64; Metric::COUNT]);

impl MetricVector {
    pub const fn splat(value: f64) -> Self {
        Self([value; Metric::COUNT])
    }

    pub const fn zeros() -> Self {
        Self::splat(0.0)
    }

    /// Every metric at 50
    pub const fn neutral() -> Self {
        Self::splat(NEUTRAL_VALUE)
    }

    /// Dense vector from a sparse map; absent metrics take `default`
    pub fn from_partial(partial: &PartialMetrics, default: f64) -> Self {
        let mut dense = Self::splat(default);
        for (&metric, &value) in partial {
            dense[metric] = value;
        }
        dense
    }

    /// Sparse map holding every metric
    pub fn to_partial(&self) -> PartialMetrics {
        self.iter().collect()
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> f64 {
        self.0[metric.index()]
    }

    #[inline]
    pub fn set(&mut self, metric: Metric, value: f64) {
        self.0[metric.index()] = value;
    }

    /// (metric, value) pairs in vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    pub fn values(&self) -> &[f64; Metric::COUNT] {
        &self.0
    }

    /// New vector with `f(metric, value)` applied per metric
    pub fn map(&self, f: impl Fn(Metric, f64) -> f64) -> Self {
        let mut out = *self;
        for metric in Metric::ALL {
            out[metric] = f(metric, self.get(metric));
        }
        out
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Arithmetic mean over the metrics of one group
    pub fn group_mean(&self, group: MetricGroup) -> f64 {
        let metrics = group.metrics();
        metrics.iter().map(|&m| self.get(m)).sum::<f64>() / metrics.len() as f64
    }
}

impl Default for MetricVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Index<Metric> for MetricVector {
    type Output = f64;

    #[inline]
    fn index(&self, metric: Metric) -> &f64 {
        &self.0[metric.index()]
    }
}

impl IndexMut<Metric> for MetricVector {
    #[inline]
    fn index_mut(&mut self, metric: Metric) -> &mut f64 {
        &mut self.0[metric.index()]
    }
}

// Serialized as a `{ "breathability": 72.0, ... }` object in vocabulary order.
impl Serialize for MetricVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Metric::COUNT))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(&metric, &value)?;
        }
        map.end()
    }
}

// Absent keys take the neutral value; unknown keys are rejected.
impl<'de> Deserialize<'de> for MetricVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetricVectorVisitor;

        impl<'de> Visitor<'de> for MetricVectorVisitor {
            type Value = MetricVector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of metric name to number")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MetricVector, A::Error> {
                let mut vector = MetricVector::neutral();
                while let Some((metric, value)) = access.next_entry::<Metric, f64>()? {
                    vector[metric] = value;
                }
                Ok(vector)
            }
        }

        deserializer.deserialize_map(MetricVectorVisitor)
    }
}
