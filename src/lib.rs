#![doc = "OpenMander constraint scoring API"]
mod constraint;
mod graph;
mod objective;
mod plan;
mod select;

#[doc(inline)]
pub use graph::Graph;

#[doc(inline)]
pub use plan::{Proposal, Side};

#[doc(inline)]
pub use constraint::{county_split_psi, Compactness, CompactnessMetric, Psi};

#[doc(inline)]
pub use objective::{Constraint, ConstraintConfig, ConstraintName, Objective, ObjectiveConfig, UnitData};

#[doc(inline)]
pub use select::{quantile_index_with, select_kth, select_kth_with};
