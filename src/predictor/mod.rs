//! Optional learned override of the heuristic score
//!
//! The model is loaded lazily, at most once per cache. If loading fails the
//! cache stays disabled and every caller falls back to the heuristic; there
//! is no retry. Prediction errors fall back for that call only.

pub mod features;
pub mod forest;
pub mod train;

pub use features::{feature_names, FeatureVector, FEATURE_COUNT};
pub use forest::{RegressionForest, RegressionTree, TreeNode};
pub use train::{ForestTrainer, TrainingSet};

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::{OptimizerError, Result};

/// A trained scorer
pub trait ScoreModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}

/// Where the model lives and whether to look for it at all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub enabled: bool,
    pub model_path: PathBuf,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_path: PathBuf::from("data/score_model.json"),
        }
    }
}

type Loader = Box<dyn Fn() -> Result<Arc<dyn ScoreModel>> + Send + Sync>;

enum CacheState {
    Unloaded,
    Ready(Arc<dyn ScoreModel>),
    Disabled,
}

/// Lazily loaded model with at-most-once initialisation
pub struct PredictorCache {
    loader: Loader,
    state: Mutex<CacheState>,
}

impl PredictorCache {
    /// Cache backed by an arbitrary loader
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ScoreModel>> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            state: Mutex::new(CacheState::Unloaded),
        }
    }

    /// Cache that reads a forest file on first use
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::with_loader(move || {
            let forest = RegressionForest::load(&path)?;
            Ok(Arc::new(forest) as Arc<dyn ScoreModel>)
        })
    }

    pub fn from_config(cfg: &PredictorConfig) -> Self {
        if cfg.enabled {
            Self::from_path(cfg.model_path.clone())
        } else {
            Self::disabled()
        }
    }

    /// Cache that never produces a model
    pub fn disabled() -> Self {
        Self {
            loader: Box::new(|| -> Result<Arc<dyn ScoreModel>> {
                Err(OptimizerError::ModelError("predictor disabled".into()))
            }),
            state: Mutex::new(CacheState::Disabled),
        }
    }

    /// Cache with a model already in hand
    pub fn preloaded(model: Arc<dyn ScoreModel>) -> Self {
        let reload = model.clone();
        Self {
            loader: Box::new(move || -> Result<Arc<dyn ScoreModel>> { Ok(reload.clone()) }),
            state: Mutex::new(CacheState::Ready(model)),
        }
    }

    /// The model, loading it on first call. `None` once loading has failed.
    pub fn model(&self) -> Option<Arc<dyn ScoreModel>> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &*state {
            CacheState::Ready(model) => return Some(model.clone()),
            CacheState::Disabled => return None,
            CacheState::Unloaded => {}
        }
        // lock is held across the load so concurrent callers wait for it
        match (self.loader)() {
            Ok(model) => {
                *state = CacheState::Ready(model.clone());
                Some(model)
            }
            Err(e) => {
                tracing::warn!(error = %e, "score model unavailable, using heuristic scores");
                *state = CacheState::Disabled;
                None
            }
        }
    }

    /// Predicted score, or `None` when the heuristic should be used
    pub fn predict(&self, features: &FeatureVector) -> Option<f64> {
        let model = self.model()?;
        match model.predict(features) {
            Ok(score) if score.is_finite() => Some(score),
            Ok(score) => {
                tracing::warn!(score, "non-finite prediction, using heuristic");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "prediction failed, using heuristic");
                None
            }
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(|e| e.into_inner()),
            CacheState::Disabled
        )
    }

    /// Forget the loaded or failed state so the next call loads again
    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = CacheState::Unloaded;
    }
}

impl std::fmt::Debug for PredictorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match *self.state.lock().unwrap_or_else(|e| e.into_inner()) {
            CacheState::Unloaded => "unloaded",
            CacheState::Ready(_) => "ready",
            CacheState::Disabled => "disabled",
        };
        f.debug_struct("PredictorCache").field("state", &state).finish()
    }
}

// === GLOBAL PREDICTOR ACCESS ===

static PREDICTOR: OnceLock<PredictorCache> = OnceLock::new();

/// Process-wide predictor, configured from the global config on first use
pub fn global_predictor() -> &'static PredictorCache {
    PREDICTOR.get_or_init(|| PredictorCache::from_config(&config().predictor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BuildGoal, Resistances};
    use crate::gear::ArtifactStats;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Constant(f64);

    impl ScoreModel for Constant {
        fn predict(&self, _: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn features() -> FeatureVector {
        FeatureVector::build(&Resistances::default(), &ArtifactStats::new(), BuildGoal::Balanced)
    }

    #[test]
    fn test_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cache = PredictorCache::with_loader(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Constant(7.0)) as Arc<dyn ScoreModel>)
        });
        assert_eq!(cache.predict(&features()), Some(7.0));
        assert_eq!(cache.predict(&features()), Some(7.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_stays_disabled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cache = PredictorCache::with_loader(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(OptimizerError::ModelError("corrupt".into()))
        });
        assert_eq!(cache.predict(&features()), None);
        assert_eq!(cache.predict(&features()), None);
        assert!(cache.is_disabled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.reset();
        assert!(!cache.is_disabled());
        assert_eq!(cache.predict(&features()), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_file_disables() {
        let cache = PredictorCache::from_path("definitely/not/here.json");
        assert!(cache.model().is_none());
        assert!(cache.is_disabled());
    }

    #[test]
    fn test_non_finite_prediction_falls_back() {
        let cache = PredictorCache::preloaded(Arc::new(Constant(f64::NAN)));
        assert_eq!(cache.predict(&features()), None);
        // one bad prediction does not disable the cache
        assert!(!cache.is_disabled());
    }

    #[test]
    fn test_concurrent_callers_share_one_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cache = Arc::new(PredictorCache::with_loader(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(Arc::new(Constant(1.0)) as Arc<dyn ScoreModel>)
        }));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.predict(&features()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(1.0));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
