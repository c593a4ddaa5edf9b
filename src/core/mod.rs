//! # 직물 물성 예측 핵심 모듈
//!
//! 특징 변환기 → 물성 예측기 파이프라인과 아티팩트 로딩

pub mod artifacts;
pub mod batch;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod service;
pub mod types;

// 주요 타입들 재수출
pub use artifacts::{ArtifactSummary, TrainedArtifacts};
pub use batch::{run_batch, BatchReport};
pub use config::PredictorConfig;
pub use error::{ArtifactError, PredictError, Result};
pub use features::{FeatureTransformer, FeatureVector, OneHotEncoder, UnknownCategoryPolicy};
pub use model::{MultiOutputRegressor, PropertyPredictor};
pub use service::FabricPredictor;
pub use types::*;

#[cfg(test)]
pub(crate) mod test_fixtures;
