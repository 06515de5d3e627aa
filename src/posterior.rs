use crate::error::{HeredityError, Result};
use crate::hypothesis::{GeneCount, Hypothesis};
use crate::pedigree::Pedigree;
use crate::PersonIdx;
use ndarray::{Array2, ArrayView1};
use std::fmt;

/// Unnormalized per-person marginals, summed over hypotheses.
///
/// Rows are people. Gene columns are copy counts, trait columns are
/// `[absent, present]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    genes: Array2<f64>,
    traits: Array2<f64>,
    total: f64,
}

impl Accumulator {
    pub fn new(people: usize) -> Self {
        Self {
            genes: Array2::zeros((people, 3)),
            traits: Array2::zeros((people, 2)),
            total: 0.0,
        }
    }

    /// Adds `p` to every person's bucket for their assignment in `hypothesis`
    pub fn update(&mut self, hypothesis: &Hypothesis, p: f64) {
        for (idx, copies) in hypothesis.genes.iter().enumerate() {
            self.genes[[idx, copies.index()]] += p;
            self.traits[[idx, hypothesis.has_trait(idx) as usize]] += p;
        }
        self.total += p;
    }

    /// Combines two partial accumulations over disjoint hypotheses
    pub fn merge(mut self, other: Self) -> Self {
        self.genes += &other.genes;
        self.traits += &other.traits;
        self.total += other.total;
        self
    }

    /// Mass of every hypothesis folded in so far
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn gene_mass(&self, idx: PersonIdx) -> ArrayView1<'_, f64> {
        self.genes.row(idx)
    }

    pub fn trait_mass(&self, idx: PersonIdx) -> ArrayView1<'_, f64> {
        self.traits.row(idx)
    }

    /// Rescales every person's distributions to sum to one.
    ///
    /// A person whose buckets hold no mass has no defined distribution and
    /// fails the whole run.
    pub fn normalize(mut self, pedigree: &Pedigree) -> Result<Posteriors> {
        normalize_rows(&mut self.genes, pedigree, "gene")?;
        normalize_rows(&mut self.traits, pedigree, "trait")?;

        let distributions = (0..pedigree.len())
            .map(|idx| Distribution {
                gene: [
                    self.genes[[idx, 0]],
                    self.genes[[idx, 1]],
                    self.genes[[idx, 2]],
                ],
                traits: [self.traits[[idx, 0]], self.traits[[idx, 1]]],
            })
            .collect();
        Ok(Posteriors {
            names: pedigree.people().iter().map(|p| p.name.clone()).collect(),
            distributions,
        })
    }
}

fn normalize_rows(
    matrix: &mut Array2<f64>,
    pedigree: &Pedigree,
    distribution: &'static str,
) -> Result<()> {
    for (idx, mut row) in matrix.genrows_mut().into_iter().enumerate() {
        let sum = row.sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(HeredityError::Degenerate {
                person: pedigree.person(idx).name.clone(),
                distribution,
            });
        }
        row.mapv_inplace(|mass| mass / sum);
    }
    Ok(())
}

/// One person's posterior over copy count and trait value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub gene: [f64; 3],
    /// `[absent, present]`
    pub traits: [f64; 2],
}

impl Distribution {
    pub fn gene(&self, copies: GeneCount) -> f64 {
        self.gene[copies.index()]
    }

    pub fn has_trait(&self, has_trait: bool) -> f64 {
        self.traits[has_trait as usize]
    }
}

/// Final normalized distributions for every person in the pedigree
#[derive(Debug, Clone, PartialEq)]
pub struct Posteriors {
    names: Vec<String>,
    distributions: Vec<Distribution>,
}

impl Posteriors {
    pub fn get(&self, name: &str) -> Option<&Distribution> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.distributions[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Distribution)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.distributions.iter())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Four decimal places, most copies first, trait present before absent.
impl fmt::Display for Posteriors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, distribution) in self.iter() {
            writeln!(f, "{}:", name)?;
            writeln!(f, "  Gene:")?;
            for &copies in GeneCount::ALL.iter().rev() {
                writeln!(f, "    {}: {:.4}", copies, distribution.gene(copies))?;
            }
            writeln!(f, "  Trait:")?;
            writeln!(f, "    True: {:.4}", distribution.has_trait(true))?;
            writeln!(f, "    False: {:.4}", distribution.has_trait(false))?;
        }
        Ok(())
    }
}
