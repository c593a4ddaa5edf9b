//! 예측기 설정

use crate::core::types::DomainPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PREPROCESSOR_FILE: &str = "preprocessing_pipeline.json";
pub const DEFAULT_MODEL_FILE: &str = "fabric_property_predictor.json";

/// 아티팩트 위치와 입력 정책
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// 아티팩트 디렉토리
    pub artifact_dir: PathBuf,
    pub preprocessor_file: String,
    pub model_file: String,
    /// 도메인 범위 밖 입력 처리
    pub domain_policy: DomainPolicy,
    /// 배치 예측 병렬 처리 여부
    pub parallel_batch: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("models"),
            preprocessor_file: DEFAULT_PREPROCESSOR_FILE.to_string(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            domain_policy: DomainPolicy::Enforce,
            parallel_batch: true,
        }
    }
}

impl PredictorConfig {
    pub fn with_artifact_dir(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            ..Self::default()
        }
    }

    /// JSON 설정 파일 로드 (빠진 항목은 기본값)
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("설정 파일을 열 수 없습니다: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("설정 파일 파싱 실패: {}", path.display()))
    }

    pub fn preprocessor_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.preprocessor_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }
}
