mod common;

use forecast_engine::cache::{ModelCache, ModelKey};
use forecast_engine::config::EngineConfig;
use forecast_engine::features::{FeatureEngineer, FeatureTable};
use forecast_engine::timeframe::Timeframe;
use forecast_engine::trainer::{ModelTrainer, TrainedModel};
use forecast_engine::ForecastEngine;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn short_table() -> FeatureTable {
    FeatureEngineer::new(Timeframe::OneMonth)
        .engineer(&common::wavy_series(120))
        .unwrap()
}

fn train(table: &FeatureTable) -> Option<TrainedModel> {
    ModelTrainer::new(Timeframe::OneMonth, EngineConfig::default())
        .train(table, "WAVE")
        .unwrap()
        .model
}

#[test]
fn test_concurrent_callers_share_one_training() {
    let cache = ModelCache::new();
    let table = short_table();
    let key = ModelKey::for_horizon("WAVE", Timeframe::OneMonth);
    let trainings = AtomicUsize::new(0);

    let models: Vec<Arc<TrainedModel>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    cache
                        .get_or_train(&key, || {
                            trainings.fetch_add(1, Ordering::SeqCst);
                            Ok(train(&table))
                        })
                        .unwrap()
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(trainings.load(Ordering::SeqCst), 1);
    assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_distinct_keys_train_independently() {
    let cache = ModelCache::new();
    let table = short_table();
    let trainings = AtomicUsize::new(0);

    thread::scope(|scope| {
        for symbol in ["AAA", "BBB"] {
            let (cache, table, trainings) = (&cache, &table, &trainings);
            scope.spawn(move || {
                let key = ModelKey::for_horizon(symbol, Timeframe::OneMonth);
                cache
                    .get_or_train(&key, || {
                        trainings.fetch_add(1, Ordering::SeqCst);
                        Ok(train(table))
                    })
                    .unwrap();
            });
        }
    });

    assert_eq!(trainings.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_failed_training_stores_nothing() {
    let cache = ModelCache::new();
    let key = ModelKey::for_horizon("WAVE", Timeframe::OneMonth);

    let model = cache.get_or_train(&key, || Ok(None)).unwrap();
    assert!(model.is_none());
    assert!(!cache.contains(&key));

    // The next caller trains again
    let table = short_table();
    let model = cache.get_or_train(&key, || Ok(train(&table))).unwrap();
    assert!(model.is_some());
    assert!(cache.contains(&key));
}

#[test]
fn test_retrain_overwrites_stored_model() {
    let cache = ModelCache::new();
    let table = short_table();
    let key = ModelKey::for_horizon("WAVE", Timeframe::OneMonth);

    let first = cache
        .get_or_train(&key, || Ok(train(&table)))
        .unwrap()
        .unwrap();
    let output = cache
        .retrain(&key, || Ok(("done", train(&table))))
        .unwrap();
    let second = cache.get(&key).unwrap();

    assert_eq!(output, "done");
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_key_follows_horizon_family() {
    let short = ModelKey::for_horizon("WAVE", Timeframe::SixMonths);
    let long = ModelKey::for_horizon("WAVE", Timeframe::FiveYears);

    assert_eq!(short.family, Timeframe::SixMonths.config().family);
    assert_eq!(long.family, Timeframe::FiveYears.config().family);
    assert_ne!(short, long);
}

#[test]
fn test_shared_engine_trains_once_per_key() {
    let engine = Arc::new(ForecastEngine::new());
    let data = Arc::new(common::wavy_series(200));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let data = Arc::clone(&data);
            thread::spawn(move || engine.forecast(&data, "WAVE", Timeframe::OneMonth).unwrap())
        })
        .collect();
    let forecasts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(forecasts.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(engine.cache().len(), 1);
}
