//! Constraint scorers. Each one compares the plans on both sides of a
//! [`Proposal`](crate::Proposal), visiting only the touched districts.

mod compactness;
mod county;
mod population;
mod psi;
mod segregation;
mod similarity;

pub use compactness::{Compactness, CompactnessMetric};
pub use county::county_split_psi;
pub use psi::Psi;
