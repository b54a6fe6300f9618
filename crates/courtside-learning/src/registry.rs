//! The set of models a comparison runs, in evaluation order.

use crate::config::ComparisonConfig;
use crate::error::{LearningError, Result};
use crate::models::{LinearRegressor, RandomForestRegressor, Regressor};

/// One registry entry: a name, a build-time availability check and a
/// constructor.
#[derive(Clone, Copy)]
pub struct ModelSpec {
    pub name: &'static str,
    pub is_available: fn() -> bool,
    pub build: fn(&ComparisonConfig) -> Result<Box<dyn Regressor>>,
}

impl std::fmt::Debug for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSpec")
            .field("name", &self.name)
            .field("available", &(self.is_available)())
            .finish()
    }
}

fn always() -> bool {
    true
}

fn boosting_compiled() -> bool {
    cfg!(feature = "boosting")
}

fn build_forest(config: &ComparisonConfig) -> Result<Box<dyn Regressor>> {
    Ok(Box::new(RandomForestRegressor::new(config.n_trees, config.random_seed)))
}

fn build_linear(_: &ComparisonConfig) -> Result<Box<dyn Regressor>> {
    Ok(Box::new(LinearRegressor))
}

#[cfg(feature = "boosting")]
fn build_boosting(config: &ComparisonConfig) -> Result<Box<dyn Regressor>> {
    Ok(Box::new(crate::models::GradientBoostingRegressor {
        rounds: config.boosting_rounds,
        learning_rate: config.learning_rate,
        max_depth: config.boosting_max_depth,
    }))
}

#[cfg(not(feature = "boosting"))]
fn build_boosting(_: &ComparisonConfig) -> Result<Box<dyn Regressor>> {
    Err(LearningError::ModelUnavailable("GradientBoosting".to_string()))
}

/// RandomForest, LinearRegression, GradientBoosting. GradientBoosting is
/// listed in every build; its availability reflects the `boosting` feature.
pub fn default_registry() -> Vec<ModelSpec> {
    vec![
        ModelSpec {
            name: "RandomForest",
            is_available: always,
            build: build_forest,
        },
        ModelSpec {
            name: "LinearRegression",
            is_available: always,
            build: build_linear,
        },
        ModelSpec {
            name: "GradientBoosting",
            is_available: boosting_compiled,
            build: build_boosting,
        },
    ]
}

/// Look up an available model by name and construct it.
pub fn build_model(name: &str, config: &ComparisonConfig) -> Result<Box<dyn Regressor>> {
    let spec = default_registry()
        .into_iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| LearningError::InvalidConfig(format!("unknown model '{name}'")))?;
    if !(spec.is_available)() {
        return Err(LearningError::ModelUnavailable(name.to_string()));
    }
    (spec.build)(config)
}
