mod build;
mod traverse;
mod types;

pub use types::{ChartEdge, ChartGraph, ChartTree};

#[cfg(test)]
mod tests;
