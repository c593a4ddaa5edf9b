//! 연속형 컬럼 스케일러 (학습 시 적합된 통계만 적용, 재적합 없음)

use crate::core::error::ArtifactError;
use serde::{Deserialize, Serialize};

/// 컬럼별 스케일링 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scaler", rename_all = "snake_case")]
pub enum ColumnScaler {
    /// (x - mean) / scale
    Standard { mean: f64, scale: f64 },
    /// x * scale + min
    MinMax { min: f64, scale: f64 },
    Passthrough,
}

impl ColumnScaler {
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            ColumnScaler::Standard { mean, scale } => (x - mean) / scale,
            ColumnScaler::MinMax { min, scale } => x * scale + min,
            ColumnScaler::Passthrough => x,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ColumnScaler::Standard { .. } => "standard",
            ColumnScaler::MinMax { .. } => "min_max",
            ColumnScaler::Passthrough => "passthrough",
        }
    }

    pub(crate) fn validate(&self, column: &str) -> Result<(), ArtifactError> {
        let (offset, scale) = match *self {
            ColumnScaler::Standard { mean, scale } => (mean, scale),
            ColumnScaler::MinMax { min, scale } => (min, scale),
            ColumnScaler::Passthrough => return Ok(()),
        };

        if !offset.is_finite() || !scale.is_finite() {
            return Err(ArtifactError::invalid(
                format!("scaler for '{column}'"),
                "statistics must be finite",
            ));
        }
        if scale == 0.0 {
            return Err(ArtifactError::invalid(
                format!("scaler for '{column}'"),
                "scale must be non-zero",
            ));
        }
        Ok(())
    }
}

/// 전처리 아티팩트의 연속형 컬럼 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumnParams {
    pub column: String,
    #[serde(flatten)]
    pub scaler: ColumnScaler,
}
