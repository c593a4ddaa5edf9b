//! 예측 파이프라인 오류 타입
//!
//! 요청 단위 오류(`InvalidInput`, `UnknownCategory`)와
//! 서비스 전체를 멈춰야 하는 시스템 오류(`ShapeMismatch`, `ArtifactLoad`, `ServingHalted`)를 구분한다.

use crate::core::types::FabricField;
use std::path::PathBuf;
use thiserror::Error;

/// 파이프라인 결과 타입
pub type Result<T> = std::result::Result<T, PredictError>;

/// 변환/예측 호출에서 발생하는 오류
#[derive(Error, Debug)]
pub enum PredictError {
    /// 연속형 필드가 없거나, 유한하지 않거나, 도메인 범위를 벗어남
    #[error("invalid value for '{}': {reason}", field.column())]
    InvalidInput { field: FabricField, reason: String },

    /// 학습된 어휘에 없는 직조 유형
    #[error("unknown weave type '{value}' (known: {})", known.join(", "))]
    UnknownCategory { value: String, known: Vec<String> },

    /// 특징 벡터 폭이 모델 입력 폭과 다름
    #[error("feature vector has width {actual}, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// 아티팩트 로딩 실패
    #[error("failed to load trained artifacts: {0}")]
    ArtifactLoad(#[from] ArtifactError),

    /// 이전 형상 불일치로 서비스가 중단된 상태 (`actual`은 중단을 일으킨 폭)
    #[error("serving halted after shape mismatch (width {actual}, model expects {expected})")]
    ServingHalted { expected: usize, actual: usize },
}

impl PredictError {
    /// 프로세스 수준에서 복구 불가능한 오류인지 여부
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PredictError::ShapeMismatch { .. }
                | PredictError::ArtifactLoad(_)
                | PredictError::ServingHalted { .. }
        )
    }

    pub(crate) fn invalid(field: FabricField, reason: impl Into<String>) -> Self {
        PredictError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// 아티팩트 로딩/검증 오류
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid safetensors file {path}: {message}")]
    Safetensors { path: PathBuf, message: String },

    #[error("{artifact} has format version {found}, supported version is {supported}")]
    UnsupportedVersion {
        artifact: &'static str,
        found: u32,
        supported: u32,
    },

    /// 전처리기와 모델이 서로 다른 학습 실행에서 나옴
    #[error("preprocessor pipeline '{preprocessor}' is not paired with model pipeline '{model}'")]
    PairingMismatch { preprocessor: String, model: String },

    #[error("preprocessor produces {transformer_width} features, model expects {model_width}")]
    WidthMismatch {
        transformer_width: usize,
        model_width: usize,
    },

    #[error("model target #{index} is '{found}', expected '{expected}'")]
    TargetOrder {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("invalid {what}: {message}")]
    Invalid { what: String, message: String },
}

impl ArtifactError {
    pub(crate) fn invalid(what: impl Into<String>, message: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            what: what.into(),
            message: message.into(),
        }
    }
}
