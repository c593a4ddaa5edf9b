//! # 물성 예측기
//!
//! 특징 벡터 하나로 9개 물성을 한 번에 계산하는 다중 출력 회귀 모델.
//! 선형, MLP, 트리 앙상블 파라미터를 지원하며 모두 같은 `MultiOutputRegressor` 경계를 따른다.

pub mod forest;
pub mod linear;
pub mod mlp;

pub use forest::{ForestModel, ForestParams, NodeParams, TreeParams};
pub use linear::{LinearModel, LinearParams};
pub use mlp::{Activation, DenseLayerParams, MlpModel, MlpParams};

use crate::core::error::{ArtifactError, PredictError, Result};
use crate::core::features::FeatureVector;
use crate::core::types::{PropertyKind, PropertyPrediction, PROPERTY_COUNT};
use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

pub const MODEL_FORMAT_VERSION: u32 = 1;

/// 학습된 다중 출력 회귀 모델의 순전파
pub trait MultiOutputRegressor: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> &'static str;
    fn input_width(&self) -> usize;
    fn output_width(&self) -> usize;
    /// `x.len() == input_width()`가 보장된 상태에서만 호출됨
    fn forward(&self, x: ArrayView1<'_, f64>) -> Array1<f64>;
}

/// 모델 종류별 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelParams {
    Linear(LinearParams),
    Mlp(MlpParams),
    Forest(ForestParams),
}

/// 모델 아티팩트 (직렬화 형식)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub pipeline_id: String,
    pub input_width: usize,
    /// 출력 라벨, 고정 순서와 일치해야 함
    pub targets: Vec<String>,
    pub model: ModelParams,
}

/// 로드된 예측기
#[derive(Debug)]
pub struct PropertyPredictor {
    pipeline_id: String,
    regressor: Box<dyn MultiOutputRegressor>,
}

impl PropertyPredictor {
    /// 아티팩트 검증 후 생성
    ///
    /// MLP의 `weights_file`은 이미 인라인 레이어로 풀려 있어야 한다.
    pub fn from_artifact(artifact: ModelArtifact) -> std::result::Result<Self, ArtifactError> {
        if artifact.format_version != MODEL_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                artifact: "model",
                found: artifact.format_version,
                supported: MODEL_FORMAT_VERSION,
            });
        }
        check_targets(&artifact.targets)?;

        let regressor: Box<dyn MultiOutputRegressor> = match artifact.model {
            ModelParams::Linear(params) => Box::new(LinearModel::from_params(params)?),
            ModelParams::Mlp(params) => Box::new(MlpModel::from_params(params)?),
            ModelParams::Forest(params) => Box::new(ForestModel::from_params(
                params,
                artifact.input_width,
                PROPERTY_COUNT,
            )?),
        };

        Self::from_regressor(artifact.pipeline_id, artifact.input_width, regressor)
    }

    /// 임의의 회귀기로 생성 (입출력 폭 검증 포함)
    pub fn from_regressor(
        pipeline_id: impl Into<String>,
        input_width: usize,
        regressor: Box<dyn MultiOutputRegressor>,
    ) -> std::result::Result<Self, ArtifactError> {
        if regressor.input_width() != input_width {
            return Err(ArtifactError::invalid(
                "model",
                format!(
                    "declares input width {input_width} but parameters take {}",
                    regressor.input_width()
                ),
            ));
        }
        if regressor.output_width() != PROPERTY_COUNT {
            return Err(ArtifactError::invalid(
                "model",
                format!(
                    "produces {} outputs, expected {PROPERTY_COUNT}",
                    regressor.output_width()
                ),
            ));
        }

        Ok(Self {
            pipeline_id: pipeline_id.into(),
            regressor,
        })
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn kind(&self) -> &'static str {
        self.regressor.kind()
    }

    pub fn input_width(&self) -> usize {
        self.regressor.input_width()
    }

    /// 순전파 한 번으로 9개 물성 예측
    pub fn predict(&self, features: &FeatureVector) -> Result<PropertyPrediction> {
        let expected = self.input_width();
        if features.len() != expected {
            return Err(PredictError::ShapeMismatch {
                expected,
                actual: features.len(),
            });
        }

        let output = self.regressor.forward(features.view());
        let mut values = [0.0; PROPERTY_COUNT];
        for (slot, v) in values.iter_mut().zip(output.iter()) {
            *slot = *v;
        }

        debug!("{} model produced {:?}", self.kind(), values);
        Ok(PropertyPrediction::from_array(values))
    }
}

fn check_targets(targets: &[String]) -> std::result::Result<(), ArtifactError> {
    if targets.len() != PROPERTY_COUNT {
        return Err(ArtifactError::invalid(
            "model targets",
            format!("{} targets, expected {PROPERTY_COUNT}", targets.len()),
        ));
    }
    for (index, (kind, found)) in PropertyKind::ALL.iter().zip(targets).enumerate() {
        if kind.label() != found.as_str() {
            return Err(ArtifactError::TargetOrder {
                index,
                expected: kind.label(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}

/// 행 목록을 직사각 행렬로 변환
pub(crate) fn matrix_from_rows(
    rows: Vec<Vec<f64>>,
    what: &str,
) -> std::result::Result<Array2<f64>, ArtifactError> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if nrows == 0 || ncols == 0 {
        return Err(ArtifactError::invalid(what, "empty matrix"));
    }

    let mut data = Vec::with_capacity(nrows * ncols);
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != ncols {
            return Err(ArtifactError::invalid(
                what,
                format!("row {i} has {} columns, expected {ncols}", row.len()),
            ));
        }
        data.extend(row);
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::invalid(what, "contains non-finite values"));
    }

    Array2::from_shape_vec((nrows, ncols), data)
        .map_err(|e| ArtifactError::invalid(what, e.to_string()))
}

pub(crate) fn vector_from(
    values: Vec<f64>,
    what: &str,
) -> std::result::Result<Array1<f64>, ArtifactError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::invalid(what, "contains non-finite values"));
    }
    Ok(Array1::from(values))
}

#[cfg(test)]
mod __tests__;
