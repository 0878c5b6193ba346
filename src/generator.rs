//! Candidate composition synthesis
//!
//! Compositions are built from a similarity-ranked "top set" of eligible
//! materials plus a pseudo-randomly drawn additive:
//!
//! - base = top[i % n], secondary = top[(i + 2) % n]
//! - additive = pool[⌊r × |pool|⌋], or top[(i + 3) % n] when the pool is empty
//! - base 50-70%, secondary 20-40% (leaving at least 5%), additive the rest
//!
//! Draw order per composition is fixed (additive, base %, secondary %), so a
//! given seed always yields the same compositions.

use crate::data::{CompositionPart, Material};
use crate::metrics::MetricVector;
use crate::utils::{cosine_similarity, UnitRng};
use std::cmp::Ordering;

/// Materials ordered by cosine similarity to `target`, most similar first
///
/// Ties keep catalog order.
pub fn rank_by_similarity<'a>(materials: &[&'a Material], target: &MetricVector) -> Vec<&'a Material> {
    let mut scored: Vec<(&'a Material, f64)> = materials
        .iter()
        .map(|&m| (m, cosine_similarity(target, &m.properties)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(m, _)| m).collect()
}

/// Materials eligible as the additive component
///
/// Synthetic, bio-polymer and man-made cellulosic fibers; elastomers are left
/// out when `exclude_elastomers` is set.
pub fn additive_pool<'a>(materials: &[&'a Material], exclude_elastomers: bool) -> Vec<&'a Material> {
    materials
        .iter()
        .copied()
        .filter(|m| m.category.is_additive_source())
        .filter(|m| !(exclude_elastomers && m.is_elastomer()))
        .collect()
}

/// Three-part composition with base 50-70% and secondary 20-40%
pub fn make_composition<R: UnitRng + ?Sized>(
    base: &Material,
    secondary: &Material,
    additive: &Material,
    rng: &mut R,
) -> Vec<CompositionPart> {
    let base_pct = 50 + (rng.next_unit() * 21.0).floor() as i32;
    // keep at least 5% for the additive
    let secondary_max = (95 - base_pct).min(40);
    let secondary_min = secondary_max.min(20);
    let secondary_pct =
        secondary_min + (rng.next_unit() * (secondary_max - secondary_min + 1) as f64).floor() as i32;
    let additive_pct = 100 - base_pct - secondary_pct;

    round_composition(vec![
        CompositionPart::new(base, base_pct),
        CompositionPart::new(secondary, secondary_pct),
        CompositionPart::new(additive, additive_pct),
    ])
}

/// Force the percentages to sum to exactly 100 by adjusting the first part
pub fn round_composition(mut parts: Vec<CompositionPart>) -> Vec<CompositionPart> {
    let total: i32 = parts.iter().map(|p| p.pct).sum();
    if let Some(first) = parts.first_mut() {
        first.pct += 100 - total;
    }
    parts
}

/// Merge parts that share a material id, keeping first-occurrence order
///
/// A composition whose three picks coincide collapses to a single 100% part.
pub fn merge_duplicate_parts(parts: Vec<CompositionPart>) -> Vec<CompositionPart> {
    let mut merged: Vec<CompositionPart> = Vec::with_capacity(parts.len());
    for part in parts {
        match merged.iter_mut().find(|p| p.material_id == part.material_id) {
            Some(existing) => existing.pct += part.pct,
            None => merged.push(part),
        }
    }
    round_composition(merged)
}

/// Rotating composition source over a fixed top set and additive pool
#[derive(Debug, Clone)]
pub struct CompositionGenerator<'a> {
    top: Vec<&'a Material>,
    pool: Vec<&'a Material>,
}

impl<'a> CompositionGenerator<'a> {
    /// `eligible` must be non-empty
    ///
    /// The top set holds the `clamp(len, top_min, top_max)` most similar
    /// materials (all of them if fewer exist).
    pub fn new(
        eligible: &[&'a Material],
        target: &MetricVector,
        top_min: usize,
        top_max: usize,
        exclude_elastomers: bool,
    ) -> Self {
        // never empty, so `compose` can rotate through it
        let take = top_min.max(top_max.min(eligible.len())).max(1);
        let top: Vec<&'a Material> = rank_by_similarity(eligible, target).into_iter().take(take).collect();
        let pool = additive_pool(eligible, exclude_elastomers);

        Self { top, pool }
    }

    pub fn top_set(&self) -> &[&'a Material] {
        &self.top
    }

    pub fn pool(&self) -> &[&'a Material] {
        &self.pool
    }

    /// The `index`-th composition; always sums to 100 with distinct ids
    pub fn compose<R: UnitRng + ?Sized>(&self, index: usize, rng: &mut R) -> Vec<CompositionPart> {
        let n = self.top.len();
        let base = self.top[index % n];
        let secondary = self.top[(index + 2) % n];

        // The draw is consumed even when the pool is empty
        let draw = rng.next_unit();
        let additive = if self.pool.is_empty() {
            self.top[(index + 3) % n]
        } else {
            self.pool[(draw * self.pool.len() as f64).floor() as usize]
        };

        merge_duplicate_parts(make_composition(base, secondary, additive, rng))
    }
}
