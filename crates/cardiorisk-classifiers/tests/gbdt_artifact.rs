use cardiorisk_classifiers::models::load_model;
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::array;
use serde_json::json;

fn train_and_save(path: &std::path::Path) {
    let mut config = Config::new();
    config.set_feature_size(2);
    config.set_max_depth(2);
    config.set_iterations(30);
    config.set_shrinkage(0.3);
    config.set_loss("LogLikelyhood");

    // label follows the first feature; the second is noise
    let mut train_x = DataVec::new();
    for i in 0..40 {
        let x0 = i as f32 / 4.0;
        let label = if x0 > 5.0 { 1.0 } else { -1.0 };
        let noise = (i % 3) as f32;
        train_x.push(Data::new_training_data(vec![x0, noise], 1.0, label, None));
    }

    let mut gbdt = GBDT::new(&config);
    gbdt.fit(&mut train_x);
    gbdt.save_model(&path.to_string_lossy()).unwrap();
}

#[test]
fn saved_gbdt_model_loads_through_artifact() {
    let dir = tempfile::tempdir().unwrap();
    train_and_save(&dir.path().join("uci.gbdt"));

    let artifact = dir.path().join("model_uci.json");
    std::fs::write(
        &artifact,
        json!({
            "kind": "gbdt",
            "feature_names": ["oldpeak", "resting ecg"],
            "feature_importances": [0.9, 0.1],
            "model_file": "uci.gbdt"
        })
        .to_string(),
    )
    .unwrap();

    let model = load_model(&artifact, "UCI").expect("gbdt artifact loads");
    assert_eq!(model.name(), "gbdt");
    assert_eq!(model.feature_names(), ["oldpeak", "resting ecg"]);
    assert_eq!(model.feature_importances(), Some(&[0.9, 0.1][..]));

    let low = model.predict_proba(array![1.0, 1.0].view()).unwrap();
    let high = model.predict_proba(array![9.0, 1.0].view()).unwrap();
    assert!((0.0..=1.0).contains(&low));
    assert!((0.0..=1.0).contains(&high));
    assert!(high > low, "high={high} low={low}");
}

#[test]
fn missing_gbdt_model_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("model_fram.json");
    std::fs::write(
        &artifact,
        json!({
            "kind": "gbdt",
            "feature_names": ["age"],
            "feature_importances": [1.0],
            "model_file": "absent.gbdt"
        })
        .to_string(),
    )
    .unwrap();

    let err = load_model(&artifact, "Framingham").err().expect("must fail");
    assert!(err.to_string().contains("absent.gbdt"), "{err}");
}
