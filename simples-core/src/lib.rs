pub mod calculations;
pub mod models;

pub use calculations::{
    CalculationError, RegimeSelector, select_best_regime, select_best_regime_traced,
};
pub use models::*;
