//! Exact inference by exhaustive enumeration.
//!
//! Every hypothesis consistent with the observed traits is evaluated and its
//! joint probability folded into per-person marginals, which are normalized
//! once enumeration completes. Work can optionally be spread over a rayon
//! pool, one trait subset per task, with partial accumulations merged by
//! addition.

use crate::error::{HeredityError, Result};
use crate::hypothesis::{GenePartitions, Hypothesis, TraitSet, TraitSubsets, MAX_PEOPLE};
use crate::joint::JointEvaluator;
use crate::parameters::ModelParameters;
use crate::pedigree::Pedigree;
use crate::posterior::{Accumulator, Posteriors};
use crate::Population;
use rayon::prelude::*;
use std::ops::Add;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    parallel: bool,
    prune_zero: bool,
    max_people: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            prune_zero: false,
            max_people: 20,
        }
    }
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate trait subsets on the rayon thread pool
    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    /// Skip accumulating hypotheses whose probability is exactly zero
    pub fn prune_zero(&mut self, prune_zero: bool) -> &mut Self {
        self.prune_zero = prune_zero;
        self
    }

    /// Largest population accepted. Capped at `MAX_PEOPLE`.
    pub fn max_people(&mut self, max_people: usize) -> &mut Self {
        self.max_people = max_people.min(MAX_PEOPLE);
        self
    }
}

/// Counters describing one inference run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceStats {
    /// Trait subsets that agree with the evidence
    pub trait_subsets: u64,
    /// Hypotheses evaluated, pruned ones included
    pub hypotheses: u64,
    /// Zero-probability hypotheses left out of the accumulation
    pub pruned: u64,
}

impl Add for InferenceStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            trait_subsets: self.trait_subsets + other.trait_subsets,
            hypotheses: self.hypotheses + other.hypotheses,
            pruned: self.pruned + other.pruned,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Inference {
    evaluator: JointEvaluator,
    config: InferenceConfig,
}

impl Inference {
    pub fn new(params: ModelParameters) -> Result<Self> {
        Self::with_config(params, InferenceConfig::default())
    }

    /// Fails if `params` is not a valid set of probabilities
    pub fn with_config(params: ModelParameters, config: InferenceConfig) -> Result<Self> {
        Ok(Self {
            evaluator: JointEvaluator::new(params)?,
            config,
        })
    }

    pub fn evaluator(&self) -> &JointEvaluator {
        &self.evaluator
    }

    /// Computes every person's posterior gene and trait distribution
    pub fn run(&self, pedigree: &Pedigree) -> Result<(Posteriors, InferenceStats)> {
        if pedigree.len() > self.config.max_people {
            return Err(HeredityError::PopulationTooLarge {
                size: pedigree.len(),
                limit: self.config.max_people,
            });
        }
        let start = Instant::now();
        let subsets = TraitSubsets::new(&pedigree.evidence())?;
        debug!(
            people = pedigree.len(),
            gene_partitions = 3f64.powi(pedigree.len() as i32),
            parallel = self.config.parallel,
            "starting enumeration"
        );

        let (accumulator, stats) = if self.config.parallel {
            subsets
                .collect::<Vec<TraitSet>>()
                .into_par_iter()
                .fold(
                    || self.empty(pedigree),
                    |(mut acc, stats), traits| {
                        let stats = stats + self.fold_trait_subset(pedigree, traits, &mut acc);
                        (acc, stats)
                    },
                )
                .reduce(
                    || self.empty(pedigree),
                    |(left, s), (right, t)| (left.merge(right), s + t),
                )
        } else {
            let (mut acc, mut stats) = self.empty(pedigree);
            for traits in subsets {
                stats = stats + self.fold_trait_subset(pedigree, traits, &mut acc);
            }
            (acc, stats)
        };

        ensure_consistent(&stats)?;
        if stats.pruned > 0 {
            debug!(pruned = stats.pruned, "zero-probability hypotheses skipped");
        }

        let posteriors = accumulator.normalize(pedigree)?;
        info!(
            trait_subsets = stats.trait_subsets,
            hypotheses = stats.hypotheses,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "inference complete"
        );
        Ok((posteriors, stats))
    }

    fn empty(&self, pedigree: &Pedigree) -> (Accumulator, InferenceStats) {
        (Accumulator::new(pedigree.len()), InferenceStats::default())
    }

    /// Evaluates every gene split under one trait subset
    fn fold_trait_subset(
        &self,
        pedigree: &Pedigree,
        traits: TraitSet,
        acc: &mut Accumulator,
    ) -> InferenceStats {
        let mut stats = InferenceStats {
            trait_subsets: 1,
            ..InferenceStats::default()
        };
        for genes in GenePartitions::new(pedigree.len()) {
            let hypothesis = Hypothesis { genes, traits };
            let p = self.evaluator.joint_probability(pedigree, &hypothesis);
            stats.hypotheses += 1;
            if p == 0.0 && self.config.prune_zero {
                stats.pruned += 1;
                continue;
            }
            acc.update(&hypothesis, p);
        }
        stats
    }
}

/// At least one trait assignment must have agreed with the evidence
fn ensure_consistent(stats: &InferenceStats) -> Result<()> {
    if stats.trait_subsets == 0 {
        return Err(HeredityError::ContradictoryEvidence);
    }
    Ok(())
}

/// Validates `population` and runs a sequential inference with `params`
pub fn infer(population: Population, params: ModelParameters) -> Result<Posteriors> {
    let pedigree = Pedigree::new(population)?;
    let (posteriors, _) = Inference::new(params)?.run(&pedigree)?;
    Ok(posteriors)
}
