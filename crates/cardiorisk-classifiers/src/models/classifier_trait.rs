use ndarray::ArrayView1;

/// Contract every loaded classifier exposes to the ensemble.
///
/// Inputs are single feature vectors laid out in [`feature_names`] order.
/// Models are immutable once loaded and shared across requests.
///
/// [`feature_names`]: ClassifierModel::feature_names
pub trait ClassifierModel: Send + Sync {
    /// Training-time column names, in the order the model expects them.
    fn feature_names(&self) -> &[String];

    /// Hard class prediction, 0.0 or 1.0.
    fn predict(&self, x: ArrayView1<f64>) -> f64;

    /// Probability of the positive class, or `None` when the model has no
    /// probabilistic output.
    fn predict_proba(&self, x: ArrayView1<f64>) -> Option<f64>;

    /// Per-column importances aligned to [`ClassifierModel::feature_names`].
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }

    /// Short label for logs.
    fn name(&self) -> &str {
        "classifier"
    }
}
