// Domain layer - Observation models, series math, and chart descriptors
pub mod aggregate;
pub mod align;
pub mod chart;
pub mod metric;
pub mod observation;
pub mod smoothing;
