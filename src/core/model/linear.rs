//! 다중 출력 선형 회귀: y = W·x + b

use super::{matrix_from_rows, vector_from, MultiOutputRegressor};
use crate::core::error::ArtifactError;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// (출력 수, 입력 폭) 행렬, 행 단위
    pub coefficients: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    coefficients: Array2<f64>,
    intercept: Array1<f64>,
}

impl LinearModel {
    pub fn from_params(params: LinearParams) -> Result<Self, ArtifactError> {
        let coefficients = matrix_from_rows(params.coefficients, "linear coefficients")?;
        let intercept = vector_from(params.intercept, "linear intercept")?;

        if intercept.len() != coefficients.nrows() {
            return Err(ArtifactError::invalid(
                "linear intercept",
                format!(
                    "length {} does not match {} coefficient rows",
                    intercept.len(),
                    coefficients.nrows()
                ),
            ));
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl MultiOutputRegressor for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn input_width(&self) -> usize {
        self.coefficients.ncols()
    }

    fn output_width(&self) -> usize {
        self.coefficients.nrows()
    }

    fn forward(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        self.coefficients.dot(&x) + &self.intercept
    }
}
