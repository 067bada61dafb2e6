mod config;
mod constraint;
mod objective;
mod units;

pub use config::{ConstraintConfig, ConstraintName, ObjectiveConfig};
pub use constraint::Constraint;
pub use objective::Objective;
pub use units::UnitData;
