//! HTML pages and plots for the web front-end.
//!
//! Pages are rendered with maud; the importance chart is a plotly bar chart
//! inlined into the results page.
pub mod fields;
pub mod pages;
pub mod plots;

pub use pages::{render_index, render_results, ResultsView};
