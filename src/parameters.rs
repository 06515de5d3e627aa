use crate::error::{HeredityError, Result};
use crate::hypothesis::GeneCount;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const TOLERANCE: f64 = 1e-9;

/// Constant inputs of the inheritance and trait model.
///
/// Fields left out of a parameter file keep their default value:
///
/// ```json
/// { "gene": [0.96, 0.03, 0.01], "trait": [0.01, 0.56, 0.65], "mutation": 0.01 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelParameters {
    /// Unconditional P(copies) for a founder, indexed by copy count
    pub gene: [f64; 3],

    /// P(trait present | copies), indexed by copy count
    #[serde(rename = "trait")]
    pub trait_present: [f64; 3],

    /// Probability that a transmitted copy flips state
    pub mutation: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            gene: [0.96, 0.03, 0.01],
            trait_present: [0.01, 0.56, 0.65],
            mutation: 0.01,
        }
    }
}

impl ModelParameters {
    pub fn new(gene: [f64; 3], trait_present: [f64; 3], mutation: f64) -> Result<Self> {
        let params = Self {
            gene,
            trait_present,
            mutation,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let params: Self = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_reader(BufReader::new(File::open(path)?))
    }

    /// Every entry must be a probability and the prior must sum to one.
    pub fn validate(&self) -> Result<()> {
        let probabilities = self
            .gene
            .iter()
            .chain(self.trait_present.iter())
            .chain(std::iter::once(&self.mutation));
        for p in probabilities {
            if !p.is_finite() || *p < 0.0 || *p > 1.0 {
                return Err(HeredityError::params(format!(
                    "{} is not a probability",
                    p
                )));
            }
        }
        let total: f64 = self.gene.iter().sum();
        if (total - 1.0).abs() > TOLERANCE {
            return Err(HeredityError::params(format!(
                "gene prior sums to {}, expected 1",
                total
            )));
        }
        Ok(())
    }

    pub fn gene_prior(&self, copies: GeneCount) -> f64 {
        self.gene[copies.index()]
    }

    /// P(trait value | copies)
    pub fn trait_likelihood(&self, copies: GeneCount, has_trait: bool) -> f64 {
        let present = self.trait_present[copies.index()];
        if has_trait {
            present
        } else {
            1.0 - present
        }
    }
}
