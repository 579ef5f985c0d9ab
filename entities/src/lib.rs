pub mod dashboard;
pub mod heatmap;
pub mod locations;
