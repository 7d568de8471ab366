mod common;

use forecast_engine::comparison::ModelComparator;
use forecast_engine::features::FeatureEngineer;
use forecast_engine::models::ModelFamily;
use forecast_engine::timeframe::Timeframe;
use forecast_engine::{EngineConfig, ForecastEngine, ForecastError};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

#[test]
fn test_split_indices_partition_rows() {
    let comparator = ModelComparator::new(42);
    let (train, test) = comparator.split_indices(101);

    assert_eq!(test.len(), 21);
    assert_eq!(train.len(), 80);

    let all: HashSet<usize> = train.iter().chain(&test).copied().collect();
    assert_eq!(all.len(), 101);
    assert!(all.iter().all(|&i| i < 101));
}

#[test]
fn test_split_is_shuffled_and_seeded() {
    let (_, test_a) = ModelComparator::new(42).split_indices(200);
    let (_, test_b) = ModelComparator::new(42).split_indices(200);
    let (_, test_c) = ModelComparator::new(7).split_indices(200);

    assert_eq!(test_a, test_b);
    assert_ne!(test_a, test_c);
    // A chronological split would hold out the last 40 rows
    assert_ne!(test_a, (160..200).collect::<Vec<_>>());
}

#[test]
fn test_all_families_ranked_by_r2() {
    let data = common::wavy_series(300);
    let comparison = ForecastEngine::new().compare_models(&data, "WAVE").unwrap();

    assert_eq!(comparison.symbol, "WAVE");
    assert_eq!(comparison.results.len(), 5);

    let families: HashSet<ModelFamily> = comparison.results.iter().map(|r| r.family).collect();
    assert_eq!(families.len(), 5);

    assert!(comparison
        .results
        .windows(2)
        .all(|w| w[0].metrics.r2 >= w[1].metrics.r2));
    assert_eq!(comparison.best_model, comparison.results[0].name);
    for result in &comparison.results {
        assert_eq!(result.name, result.family.name());
        assert!(result.metrics.rmse >= 0.0);
    }
}

#[test]
fn test_comparison_is_deterministic() {
    let data = common::wavy_series(300);

    let first = ForecastEngine::new().compare_models(&data, "WAVE").unwrap();
    let second = ForecastEngine::new().compare_models(&data, "WAVE").unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_comparison_ignores_model_cache() {
    let data = common::wavy_series(300);
    let engine = ForecastEngine::with_config(EngineConfig::default().with_seed(9));

    engine.compare_models(&data, "WAVE").unwrap();
    assert!(engine.cache().is_empty());
}

#[test]
fn test_comparison_needs_two_rows() {
    let data = common::wavy_series(300);
    let mut table = FeatureEngineer::new(Timeframe::OneMonth)
        .engineer(&data)
        .unwrap();
    table.rows.truncate(1);
    table.targets.truncate(1);
    table.dates.truncate(1);

    let err = ModelComparator::new(42).compare(&table, "WAVE").unwrap_err();
    assert!(matches!(err, ForecastError::InsufficientData(_)));

    // 20 raw rows leave no feature rows at all
    let short = common::wavy_series(20);
    let err = ForecastEngine::new()
        .compare_models(&short, "WAVE")
        .unwrap_err();
    assert!(matches!(err, ForecastError::InsufficientData(_)));
}

#[test]
fn test_result_serialization_flattens_metrics() {
    let data = common::wavy_series(200);
    let comparison = ForecastEngine::new().compare_models(&data, "WAVE").unwrap();

    let json = serde_json::to_value(&comparison).unwrap();
    let first = &json["results"][0];
    assert!(first["name"].is_string());
    assert!(first["rmse"].is_number());
    assert!(first["r2"].is_number());
    assert!(json["bestModel"].is_string());
}
