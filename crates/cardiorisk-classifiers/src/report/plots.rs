use plotly::common::Orientation;
use plotly::layout::{Axis, Layout, Margin};
use plotly::{Bar, Plot};

use crate::explain::FeatureImportanceRanking;

/// Horizontal bar chart of the combined feature importances, largest on top.
pub fn plot_feature_importances(ranking: &FeatureImportanceRanking, title: &str) -> Plot {
    // plotly draws the first category at the bottom of a horizontal bar chart
    let (names, importances): (Vec<String>, Vec<f64>) = ranking
        .features()
        .iter()
        .rev()
        .map(|f| (f.name.clone(), f.importance))
        .unzip();

    let trace = Bar::new(importances, names)
        .orientation(Orientation::Horizontal)
        .name("Importance");

    let layout = Layout::new()
        .title(title)
        .margin(Margin::new().left(160))
        .x_axis(Axis::new().title("Combined importance"))
        .y_axis(Axis::new().title("Feature"));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}

/// Plot rendered as an HTML fragment; plotly.js must be loaded by the page.
pub fn importance_plot_html(ranking: &FeatureImportanceRanking) -> String {
    plot_feature_importances(ranking, "What drives the prediction")
        .to_inline_html(Some("importance-plot"))
}
