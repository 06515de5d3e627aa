//! Enumeration of every joint hypothesis over a pedigree.
//!
//! A hypothesis assigns each person a number of gene copies and a trait
//! value. Trait assignments come from the power set of the population,
//! keeping only the subsets that agree with observed traits. For each of
//! those, every split of the population into zero, one and two copy groups
//! is produced, for `3^n` gene assignments per trait assignment.

use crate::error::{HeredityError, Result};
use crate::pedigree::Pedigree;
use crate::PersonIdx;
use std::collections::BTreeSet;
use std::fmt;

/// Trait subsets are bitmasks, which bounds the population size.
pub const MAX_PEOPLE: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneCount {
    Zero,
    One,
    Two,
}

impl GeneCount {
    pub const ALL: [GeneCount; 3] = [GeneCount::Zero, GeneCount::One, GeneCount::Two];

    pub fn index(self) -> usize {
        self as usize
    }

    fn succ(self) -> Option<Self> {
        match self {
            Self::Zero => Some(Self::One),
            Self::One => Some(Self::Two),
            Self::Two => None,
        }
    }
}

impl fmt::Display for GeneCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// People asserted to have the trait; everyone else is asserted not to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TraitSet(u64);

impl TraitSet {
    pub fn contains(self, idx: PersonIdx) -> bool {
        self.0 & (1 << idx) != 0
    }

    pub fn from_indices<I: IntoIterator<Item = PersonIdx>>(indices: I) -> Self {
        Self(indices.into_iter().fold(0, |mask, idx| mask | (1 << idx)))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// The power set of the population, filtered by observed traits
pub struct TraitSubsets {
    required: u64,
    forbidden: u64,
    next: u64,
    end: u64,
}

impl TraitSubsets {
    pub fn new(evidence: &[Option<bool>]) -> Result<Self> {
        if evidence.len() > MAX_PEOPLE {
            return Err(HeredityError::PopulationTooLarge {
                size: evidence.len(),
                limit: MAX_PEOPLE,
            });
        }
        let mut required = 0;
        let mut forbidden = 0;
        for (idx, observed) in evidence.iter().enumerate() {
            match observed {
                Some(true) => required |= 1 << idx,
                Some(false) => forbidden |= 1 << idx,
                None => {}
            }
        }
        Ok(Self {
            required,
            forbidden,
            next: 0,
            end: 1 << evidence.len(),
        })
    }

    fn consistent(&self, mask: u64) -> bool {
        mask & self.required == self.required && mask & self.forbidden == 0
    }
}

impl Iterator for TraitSubsets {
    type Item = TraitSet;

    fn next(&mut self) -> Option<TraitSet> {
        while self.next < self.end {
            let mask = self.next;
            self.next += 1;
            if self.consistent(mask) {
                return Some(TraitSet(mask));
            }
        }
        None
    }
}

/// Every assignment of zero, one or two copies to `n` people.
///
/// Counts like a base-3 odometer, the first person turning fastest.
pub struct GenePartitions {
    current: Option<Vec<GeneCount>>,
}

impl GenePartitions {
    pub fn new(n: usize) -> Self {
        Self {
            current: Some(vec![GeneCount::Zero; n]),
        }
    }
}

impl Iterator for GenePartitions {
    type Item = Vec<GeneCount>;

    fn next(&mut self) -> Option<Vec<GeneCount>> {
        let current = self.current.as_mut()?;
        let item = current.clone();

        let mut wrapped = true;
        for copies in current.iter_mut() {
            match copies.succ() {
                Some(succ) => {
                    *copies = succ;
                    wrapped = false;
                    break;
                }
                None => *copies = GeneCount::Zero,
            }
        }
        if wrapped {
            self.current = None;
        }
        Some(item)
    }
}

/// One fully specified assignment of copies and trait to every person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hypothesis {
    pub genes: Vec<GeneCount>,
    pub traits: TraitSet,
}

impl Hypothesis {
    /// Builds a hypothesis from named sets. People in neither gene set
    /// carry zero copies.
    pub fn from_sets(
        pedigree: &Pedigree,
        one_gene: &[&str],
        two_genes: &[&str],
        have_trait: &[&str],
    ) -> Result<Self> {
        if pedigree.len() > MAX_PEOPLE {
            return Err(HeredityError::PopulationTooLarge {
                size: pedigree.len(),
                limit: MAX_PEOPLE,
            });
        }
        let resolve = |name: &&str| {
            pedigree
                .index_of(name)
                .ok_or_else(|| HeredityError::malformed(format!("{} is not in the pedigree", name)))
        };

        let mut genes = vec![GeneCount::Zero; pedigree.len()];
        for (names, copies) in [(one_gene, GeneCount::One), (two_genes, GeneCount::Two)].iter() {
            for name in names.iter() {
                let idx = resolve(name)?;
                if genes[idx] != GeneCount::Zero && genes[idx] != *copies {
                    return Err(HeredityError::malformed(format!(
                        "{} is in both the one and two copy sets",
                        name
                    )));
                }
                genes[idx] = *copies;
            }
        }
        let traits = TraitSet::from_indices(
            have_trait.iter().map(resolve).collect::<Result<Vec<_>>>()?,
        );
        Ok(Self { genes, traits })
    }

    pub fn copies(&self, idx: PersonIdx) -> GeneCount {
        self.genes[idx]
    }

    pub fn has_trait(&self, idx: PersonIdx) -> bool {
        self.traits.contains(idx)
    }

    /// Indices of everyone assigned `copies`
    pub fn with_copies(&self, copies: GeneCount) -> BTreeSet<PersonIdx> {
        self.genes
            .iter()
            .enumerate()
            .filter(|(_, g)| **g == copies)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Every hypothesis consistent with the observed traits of `pedigree`
pub fn hypotheses(pedigree: &Pedigree) -> Result<impl Iterator<Item = Hypothesis>> {
    let n = pedigree.len();
    Ok(TraitSubsets::new(&pedigree.evidence())?.flat_map(move |traits| {
        GenePartitions::new(n).map(move |genes| Hypothesis { genes, traits })
    }))
}
