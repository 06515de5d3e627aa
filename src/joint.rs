use crate::error::Result;
use crate::hypothesis::{GeneCount, Hypothesis};
use crate::parameters::ModelParameters;
use crate::pedigree::Pedigree;
use crate::PersonIdx;

/// Probability of one fully specified hypothesis.
///
/// Each person contributes P(copies) times P(trait | copies). Founders take
/// P(copies) from the prior, everyone else from what their parents pass on.
#[derive(Debug, Clone, Default)]
pub struct JointEvaluator {
    params: ModelParameters,
}

impl JointEvaluator {
    /// Fails if `params` is not a valid set of probabilities
    pub fn new(params: ModelParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Probability that a parent with `copies` passes the gene on
    pub fn transmission_probability(&self, copies: GeneCount) -> f64 {
        match copies {
            GeneCount::Zero => self.params.mutation,
            GeneCount::One => 0.5,
            GeneCount::Two => 1.0 - self.params.mutation,
        }
    }

    /// P(child copies) for every child copy count, given both parents
    pub fn child_gene_distribution(&self, mother: GeneCount, father: GeneCount) -> [f64; 3] {
        let m = self.transmission_probability(mother);
        let f = self.transmission_probability(father);
        [
            (1.0 - m) * (1.0 - f),
            m * (1.0 - f) + (1.0 - m) * f,
            m * f,
        ]
    }

    /// The contribution of one person to the joint probability
    pub fn person_probability(
        &self,
        pedigree: &Pedigree,
        hypothesis: &Hypothesis,
        idx: PersonIdx,
    ) -> f64 {
        let copies = hypothesis.copies(idx);
        let gene = match pedigree.parents(idx) {
            None => self.params.gene_prior(copies),
            Some((mother, father)) => {
                self.child_gene_distribution(hypothesis.copies(mother), hypothesis.copies(father))
                    [copies.index()]
            }
        };
        gene * self.params.trait_likelihood(copies, hypothesis.has_trait(idx))
    }

    /// Product of every person's contribution. Stops as soon as the product
    /// reaches zero.
    pub fn joint_probability(&self, pedigree: &Pedigree, hypothesis: &Hypothesis) -> f64 {
        let mut probability = 1.0;
        for idx in 0..pedigree.len() {
            probability *= self.person_probability(pedigree, hypothesis, idx);
            if probability == 0.0 {
                break;
            }
        }
        probability
    }
}
