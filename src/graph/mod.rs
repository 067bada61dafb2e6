mod boundary;
mod graph;

pub use graph::Graph;
