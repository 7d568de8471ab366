//! In-process cache of trained models with per-key single-flight training

use crate::error::Result;
use crate::models::ModelFamily;
use crate::timeframe::Timeframe;
use crate::trainer::TrainedModel;
use dashmap::DashMap;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cache key: one model per symbol, horizon and family
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub family: ModelFamily,
}

impl ModelKey {
    /// Key for the family the horizon trains
    pub fn for_horizon(symbol: &str, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.to_string(),
            timeframe,
            family: timeframe.config().family,
        }
    }
}

type Slot = Arc<Mutex<Option<Arc<TrainedModel>>>>;

/// Trained models keyed by [`ModelKey`].
///
/// Each key owns a slot mutex. Training for a key runs while holding that
/// slot, so concurrent callers for the same key wait and then share the
/// stored model; other keys are unaffected. The map itself is only locked
/// long enough to fetch the slot.
#[derive(Debug, Default)]
pub struct ModelCache {
    slots: DashMap<ModelKey, Slot>,
}

fn lock(slot: &Slot) -> MutexGuard<'_, Option<Arc<TrainedModel>>> {
    // A panic mid-training leaves the slot as it was before, so the data is still usable
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &ModelKey) -> Slot {
        Arc::clone(self.slots.entry(key.clone()).or_default().value())
    }

    /// Stored model for `key`, waiting if it is being trained
    pub fn get(&self, key: &ModelKey) -> Option<Arc<TrainedModel>> {
        let slot = self.slots.get(key).map(|entry| Arc::clone(entry.value()))?;
        let guard = lock(&slot);
        guard.clone()
    }

    /// Return the stored model, or run `train` once and store what it produces.
    ///
    /// `train` returning `None` stores nothing, so a later call tries again.
    pub fn get_or_train<F>(&self, key: &ModelKey, train: F) -> Result<Option<Arc<TrainedModel>>>
    where
        F: FnOnce() -> Result<Option<TrainedModel>>,
    {
        let slot = self.slot(key);
        let mut guard = lock(&slot);

        if let Some(model) = guard.as_ref() {
            debug!("model cache hit for {:?}", key);
            return Ok(Some(Arc::clone(model)));
        }

        debug!("model cache miss for {:?}, training", key);
        let trained = train()?.map(Arc::new);
        if let Some(model) = &trained {
            *guard = Some(Arc::clone(model));
        }
        Ok(trained)
    }

    /// Run `train` under the key's slot and overwrite any stored model with
    /// the one it produces. Returns `train`'s other output.
    pub fn retrain<F, T>(&self, key: &ModelKey, train: F) -> Result<T>
    where
        F: FnOnce() -> Result<(T, Option<TrainedModel>)>,
    {
        let slot = self.slot(key);
        let mut guard = lock(&slot);

        let (output, model) = train()?;
        if let Some(model) = model {
            *guard = Some(Arc::new(model));
        }
        Ok(output)
    }

    /// Whether a trained model is stored for `key`
    pub fn contains(&self, key: &ModelKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored models
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self
            .slots
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored model
    pub fn clear(&self) {
        self.slots.clear();
    }
}
