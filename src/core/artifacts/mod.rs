//! # 학습 아티팩트
//!
//! 전처리기와 모델을 한 쌍으로 로드한다. 둘 중 하나라도 실패하거나 서로 짝이 맞지 않으면
//! 서비스 가능한 핸들은 만들어지지 않는다.

pub mod loader;
pub mod tensor_file;

pub use loader::{load_model, load_preprocessor, read_json};
pub use tensor_file::read_dense_layers;

use crate::core::config::PredictorConfig;
use crate::core::error::ArtifactError;
use crate::core::features::FeatureTransformer;
use crate::core::model::PropertyPredictor;
use crate::core::types::DomainPolicy;
use serde::Serialize;
use std::path::Path;

/// 짝이 검증된 전처리기 + 모델 (로드 후 불변)
#[derive(Debug)]
pub struct TrainedArtifacts {
    transformer: FeatureTransformer,
    predictor: PropertyPredictor,
}

/// 아티팩트 요약 (inspect 출력용)
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub pipeline_id: String,
    pub model_kind: &'static str,
    pub feature_width: usize,
    pub feature_names: Vec<String>,
    pub weave_vocabulary: Vec<String>,
    pub domain_policy: DomainPolicy,
}

impl TrainedArtifacts {
    /// 설정에 지정된 경로에서 로드
    pub fn load(config: &PredictorConfig) -> Result<Self, ArtifactError> {
        Self::load_from(
            &config.preprocessor_path(),
            &config.model_path(),
            config.domain_policy,
        )
    }

    pub fn load_from(
        preprocessor_path: &Path,
        model_path: &Path,
        policy: DomainPolicy,
    ) -> Result<Self, ArtifactError> {
        let transformer = load_preprocessor(preprocessor_path, policy)?;
        let predictor = load_model(model_path)?;
        Self::from_parts(transformer, predictor)
    }

    /// 짝 검증: 파이프라인 ID와 특징 폭이 모두 같아야 함
    pub fn from_parts(
        transformer: FeatureTransformer,
        predictor: PropertyPredictor,
    ) -> Result<Self, ArtifactError> {
        if transformer.pipeline_id() != predictor.pipeline_id() {
            return Err(ArtifactError::PairingMismatch {
                preprocessor: transformer.pipeline_id().to_string(),
                model: predictor.pipeline_id().to_string(),
            });
        }
        if transformer.width() != predictor.input_width() {
            return Err(ArtifactError::WidthMismatch {
                transformer_width: transformer.width(),
                model_width: predictor.input_width(),
            });
        }

        Ok(Self {
            transformer,
            predictor,
        })
    }

    pub fn transformer(&self) -> &FeatureTransformer {
        &self.transformer
    }

    pub fn predictor(&self) -> &PropertyPredictor {
        &self.predictor
    }

    pub fn describe(&self) -> ArtifactSummary {
        ArtifactSummary {
            pipeline_id: self.predictor.pipeline_id().to_string(),
            model_kind: self.predictor.kind(),
            feature_width: self.transformer.width(),
            feature_names: self.transformer.feature_names(),
            weave_vocabulary: self
                .transformer
                .encoder()
                .categories()
                .iter()
                .map(|w| w.label().to_string())
                .collect(),
            domain_policy: self.transformer.policy(),
        }
    }
}
