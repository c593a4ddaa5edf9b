//! 완전연결 신경망 회귀기
//!
//! 은닉층에는 설정된 활성화 함수를, 출력층에는 항등 함수를 적용한다.
//! 가중치는 (out_features, in_features) 순서.

use super::{matrix_from_rows, vector_from, MultiOutputRegressor};
use crate::core::error::ArtifactError;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 은닉층 활성화 함수
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Relu,
    Tanh,
    Logistic,
    Identity,
}

impl Activation {
    fn apply(self, z: &mut Array1<f64>) {
        match self {
            Activation::Relu => z.mapv_inplace(|v| v.max(0.0)),
            Activation::Tanh => z.mapv_inplace(f64::tanh),
            Activation::Logistic => z.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp())),
            Activation::Identity => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayerParams {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpParams {
    #[serde(default)]
    pub activation: Activation,
    /// 인라인 가중치
    #[serde(default)]
    pub layers: Vec<DenseLayerParams>,
    /// safetensors 가중치 파일 (모델 아티팩트 기준 상대 경로)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights_file: Option<PathBuf>,
    /// `weights_file` 사용 시 레이어 개수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_count: Option<usize>,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct MlpModel {
    layers: Vec<DenseLayer>,
    activation: Activation,
}

impl MlpModel {
    /// 인라인 레이어로 생성 (`weights_file`은 로더가 미리 풀어둬야 함)
    pub fn from_params(params: MlpParams) -> Result<Self, ArtifactError> {
        if params.layers.is_empty() {
            return Err(ArtifactError::invalid("mlp", "no layers"));
        }

        let mut layers: Vec<DenseLayer> = Vec::with_capacity(params.layers.len());
        for (i, layer) in params.layers.into_iter().enumerate() {
            let weights = matrix_from_rows(layer.weights, &format!("mlp layer {i} weights"))?;
            let bias = vector_from(layer.bias, &format!("mlp layer {i} bias"))?;

            if bias.len() != weights.nrows() {
                return Err(ArtifactError::invalid(
                    format!("mlp layer {i}"),
                    format!("bias length {} vs {} output units", bias.len(), weights.nrows()),
                ));
            }
            if let Some(prev) = layers.last() {
                if prev.weights.nrows() != weights.ncols() {
                    return Err(ArtifactError::invalid(
                        format!("mlp layer {i}"),
                        format!(
                            "expects {} inputs but previous layer has {} outputs",
                            weights.ncols(),
                            prev.weights.nrows()
                        ),
                    ));
                }
            }
            layers.push(DenseLayer { weights, bias });
        }

        Ok(Self {
            layers,
            activation: params.activation,
        })
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

impl MultiOutputRegressor for MlpModel {
    fn kind(&self) -> &'static str {
        "mlp"
    }

    fn input_width(&self) -> usize {
        self.layers.first().map_or(0, |l| l.weights.ncols())
    }

    fn output_width(&self) -> usize {
        self.layers.last().map_or(0, |l| l.weights.nrows())
    }

    fn forward(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        let last = self.layers.len() - 1;
        let mut hidden = x.to_owned();

        for (i, layer) in self.layers.iter().enumerate() {
            let mut z = layer.weights.dot(&hidden) + &layer.bias;
            if i != last {
                self.activation.apply(&mut z);
            }
            hidden = z;
        }
        hidden
    }
}
