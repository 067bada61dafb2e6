mod proposal;

pub use proposal::{Proposal, Side};
