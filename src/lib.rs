#![crate_name = "heredity"]
//! Exact inference of gene copies and trait expression over a pedigree.
//!
//! Read a population, validate it into a `Pedigree`, then run an
//! `Inference` to get every person's posterior distributions:
//!
//! ```no_run
//! use heredity::prelude::*;
//! use std::fs::File;
//!
//! # fn main() -> heredity::Result<()> {
//! let mut population = Population::new();
//! population.observe(CsvBuilder::new().from_reader(Box::new(File::open("family.csv")?))?)?;
//! let pedigree = Pedigree::new(population)?;
//! let (posteriors, _) = Inference::new(ModelParameters::default())?.run(&pedigree)?;
//! print!("{}", posteriors);
//! # Ok(())
//! # }
//! ```
pub mod prelude;

pub mod error;
pub mod hypothesis;
pub mod inference;
pub mod joint;
pub mod observable;
pub mod parameters;
pub mod pedigree;
pub mod posterior;

pub use error::{HeredityError, Result};
pub use pedigree::Population;

/// Position of a person in a `Pedigree`
pub type PersonIdx = usize;
