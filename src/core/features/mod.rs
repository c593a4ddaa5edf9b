//! # 특징 변환기
//!
//! `FabricSpecification` → `FeatureVector`.
//! 연속형 5개 컬럼을 학습 시 순서대로 스케일링한 뒤, 직조 유형 원-핫 블록을 이어 붙인다.
//! 통계와 어휘는 로드된 아티팩트에서만 가져오며 호출마다 변하지 않는다.

pub mod encoder;
pub mod scaler;

pub use encoder::*;
pub use scaler::*;

use crate::core::error::{ArtifactError, Result};
use crate::core::types::{DomainPolicy, FabricField, FabricSpecification};
use log::{debug, warn};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// 지원하는 아티팩트 형식 버전
pub const PREPROCESSOR_FORMAT_VERSION: u32 = 1;

/// 전처리 아티팩트 (직렬화 형식)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorParams {
    pub format_version: u32,
    pub pipeline_id: String,
    /// 출력 순서 = 이 배열 순서
    pub numeric: Vec<NumericColumnParams>,
    pub categorical: CategoricalParams,
}

/// 모델 입력용 고정 길이 특징 벡터
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    /// 외부에서 조립한 벡터 (폭 검사는 예측기가 수행)
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            values: Array1::from(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }
}

/// 적합된 전처리 파이프라인
#[derive(Debug, Clone)]
pub struct FeatureTransformer {
    pipeline_id: String,
    columns: Vec<(FabricField, ColumnScaler)>,
    encoder: OneHotEncoder,
    policy: DomainPolicy,
}

impl FeatureTransformer {
    /// 아티팩트 파라미터 검증 후 생성
    pub fn from_params(
        params: PreprocessorParams,
        policy: DomainPolicy,
    ) -> std::result::Result<Self, ArtifactError> {
        if params.format_version != PREPROCESSOR_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                artifact: "preprocessor",
                found: params.format_version,
                supported: PREPROCESSOR_FORMAT_VERSION,
            });
        }

        let mut columns: Vec<(FabricField, ColumnScaler)> = Vec::with_capacity(params.numeric.len());
        for entry in params.numeric {
            let field = FabricField::from_column(&entry.column).ok_or_else(|| {
                ArtifactError::invalid("numeric columns", format!("unknown column '{}'", entry.column))
            })?;
            if columns.iter().any(|(f, _)| *f == field) {
                return Err(ArtifactError::invalid(
                    "numeric columns",
                    format!("duplicate column '{}'", entry.column),
                ));
            }
            entry.scaler.validate(&entry.column)?;
            columns.push((field, entry.scaler));
        }

        if let Some(missing) = FabricField::ALL
            .into_iter()
            .find(|f| !columns.iter().any(|(c, _)| c == f))
        {
            return Err(ArtifactError::invalid(
                "numeric columns",
                format!("missing column '{}'", missing.column()),
            ));
        }

        let encoder = OneHotEncoder::from_params(&params.categorical)?;

        Ok(Self {
            pipeline_id: params.pipeline_id,
            columns,
            encoder,
            policy,
        })
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn policy(&self) -> DomainPolicy {
        self.policy
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    /// 출력 특징 벡터 폭
    pub fn width(&self) -> usize {
        self.columns.len() + self.encoder.width()
    }

    /// 원-핫 블록 시작 위치
    pub fn category_offset(&self) -> usize {
        self.columns.len()
    }

    /// 특징 이름 (출력 순서)
    pub fn feature_names(&self) -> Vec<String> {
        let numeric = self.columns.iter().map(|(f, _)| f.column().to_string());
        let categorical = self
            .encoder
            .categories()
            .iter()
            .map(|w| format!("{}={}", WEAVE_COLUMN, w.label()));
        numeric.chain(categorical).collect()
    }

    /// 사양을 특징 벡터로 변환
    pub fn transform(&self, spec: &FabricSpecification) -> Result<FeatureVector> {
        for field in spec.validate(self.policy)? {
            warn!(
                "{} = {} is outside [{}, {}], passing through unclamped",
                field,
                spec.value(field),
                field.bounds().min,
                field.bounds().max
            );
        }

        let mut values = vec![0.0; self.width()];
        for (slot, (field, scaler)) in values.iter_mut().zip(&self.columns) {
            *slot = scaler.apply(spec.value(*field));
        }
        let offset = self.category_offset();
        self.encoder.encode_into(spec.weave_type, &mut values[offset..])?;

        debug!("transformed {:?} into {} features", spec.weave_type, values.len());
        Ok(FeatureVector::from_values(values))
    }
}
