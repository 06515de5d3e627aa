pub use crate::error::{HeredityError, Result};
pub use crate::hypothesis::{GeneCount, Hypothesis};
pub use crate::inference::{infer, Inference, InferenceConfig, InferenceStats};
pub use crate::joint::JointEvaluator;
pub use crate::observable::CsvBuilder;
pub use crate::parameters::ModelParameters;
pub use crate::pedigree::{Pedigree, Person};
pub use crate::posterior::{Distribution, Posteriors};
pub use crate::Population;
