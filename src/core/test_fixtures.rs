//! 단위 테스트용 아티팩트

use crate::core::artifacts::TrainedArtifacts;
use crate::core::features::{
    CategoricalParams, ColumnScaler, FeatureTransformer, NumericColumnParams, PreprocessorParams,
    UnknownCategoryPolicy, PREPROCESSOR_FORMAT_VERSION,
};
use crate::core::model::{
    LinearParams, ModelArtifact, ModelParams, PropertyPredictor, MODEL_FORMAT_VERSION,
};
use crate::core::types::{DomainPolicy, PropertyKind};

pub(crate) const PIPELINE_ID: &str = "fabric-test-001";
pub(crate) const FEATURE_WIDTH: usize = 10;

/// (컬럼, 평균, 표준편차)
pub(crate) const SCALING: [(&str, f64, f64); 5] = [
    ("Warp Count", 32.4, 12.6),
    ("Weft Count", 27.8, 11.9),
    ("EPI", 78.5, 21.3),
    ("PPI", 64.2, 17.8),
    ("GSM", 176.0, 58.4),
];

/// 학습 시 정렬된 어휘 순서
pub(crate) const VOCABULARY: [&str; 5] = ["Broken Twill", "Others", "Plain", "Satin", "Twill"];

pub(crate) fn preprocessor_params() -> PreprocessorParams {
    PreprocessorParams {
        format_version: PREPROCESSOR_FORMAT_VERSION,
        pipeline_id: PIPELINE_ID.to_string(),
        numeric: SCALING
            .iter()
            .map(|&(column, mean, scale)| NumericColumnParams {
                column: column.to_string(),
                scaler: ColumnScaler::Standard { mean, scale },
            })
            .collect(),
        categorical: CategoricalParams {
            column: "Weave Type".to_string(),
            categories: VOCABULARY.iter().map(|s| s.to_string()).collect(),
            handle_unknown: UnknownCategoryPolicy::Error,
        },
    }
}

pub(crate) fn transformer(policy: DomainPolicy) -> FeatureTransformer {
    FeatureTransformer::from_params(preprocessor_params(), policy).unwrap()
}

pub(crate) fn target_labels() -> Vec<String> {
    PropertyKind::labels().iter().map(|s| s.to_string()).collect()
}

/// coef[i][j] = 0.1·(i+1) − 0.05·j, intercept[i] = 10·(i+1)
pub(crate) fn linear_params() -> LinearParams {
    LinearParams {
        coefficients: (0..9)
            .map(|i| {
                (0..FEATURE_WIDTH)
                    .map(|j| 0.1 * (i + 1) as f64 - 0.05 * j as f64)
                    .collect()
            })
            .collect(),
        intercept: (0..9).map(|i| 10.0 * (i + 1) as f64).collect(),
    }
}

pub(crate) fn model_artifact(model: ModelParams) -> ModelArtifact {
    ModelArtifact {
        format_version: MODEL_FORMAT_VERSION,
        pipeline_id: PIPELINE_ID.to_string(),
        input_width: FEATURE_WIDTH,
        targets: target_labels(),
        model,
    }
}

pub(crate) fn linear_predictor() -> PropertyPredictor {
    PropertyPredictor::from_artifact(model_artifact(ModelParams::Linear(linear_params()))).unwrap()
}

pub(crate) fn artifacts(policy: DomainPolicy) -> TrainedArtifacts {
    TrainedArtifacts::from_parts(transformer(policy), linear_predictor()).unwrap()
}

/// 선형 픽스처의 기대 출력 (직접 계산)
pub(crate) fn expected_linear(features: &[f64]) -> Vec<f64> {
    let params = linear_params();
    params
        .coefficients
        .iter()
        .zip(&params.intercept)
        .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
        .collect()
}
