//! 직물 물성 예측 라이브러리
//!
//! 직물 사양 6개 필드(경사/위사 번수, EPI, PPI, GSM, 직조 유형)를 학습된 전처리기로 변환하고
//! 다중 출력 회귀 모델로 9개 물성을 한 번에 예측한다.
//!
//! ```no_run
//! use fabric_props::{FabricPredictor, FabricSpecification, PredictorConfig};
//!
//! let predictor = FabricPredictor::load(&PredictorConfig::with_artifact_dir("models"))?;
//! let prediction = predictor.predict_properties(&FabricSpecification::default())?;
//! print!("{prediction}");
//! # Ok::<(), fabric_props::PredictError>(())
//! ```

pub mod core;

// 핵심 모듈들 재수출
pub use crate::core::{
    // 입력 / 출력
    DomainPolicy, FabricField, FabricSpecification, PropertyKind, PropertyPrediction,
    RawFabricRecord, WeaveType, PROPERTY_COUNT,
    // 파이프라인
    FabricPredictor, FeatureTransformer, FeatureVector, PropertyPredictor, TrainedArtifacts,
    // 설정 / 오류
    ArtifactError, PredictError, PredictorConfig,
};

/// 변환과 예측을 한 번에 수행
pub fn predict_properties(
    artifacts: &TrainedArtifacts,
    spec: &FabricSpecification,
) -> crate::core::Result<PropertyPrediction> {
    let features = artifacts.transformer().transform(spec)?;
    artifacts.predictor().predict(&features)
}
