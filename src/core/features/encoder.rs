//! 직조 유형 원-핫 인코더

use crate::core::error::{ArtifactError, PredictError, Result};
use crate::core::types::WeaveType;
use serde::{Deserialize, Serialize};

pub const WEAVE_COLUMN: &str = "Weave Type";

/// 어휘 밖 범주 처리 방식 (학습된 인코더 설정을 그대로 따름)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// `UnknownCategory` 오류
    #[default]
    Error,
    /// 지시자 블록 전체를 0으로
    Ignore,
}

/// 전처리 아티팩트의 범주형 컬럼 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalParams {
    pub column: String,
    /// 학습 시 컬럼 순서 그대로
    pub categories: Vec<String>,
    #[serde(default)]
    pub handle_unknown: UnknownCategoryPolicy,
}

/// 적합된 어휘 기반 원-핫 인코더
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    categories: Vec<WeaveType>,
    handle_unknown: UnknownCategoryPolicy,
}

impl OneHotEncoder {
    pub fn from_params(params: &CategoricalParams) -> std::result::Result<Self, ArtifactError> {
        if params.column != WEAVE_COLUMN {
            return Err(ArtifactError::invalid(
                "categorical column",
                format!("expected '{WEAVE_COLUMN}', found '{}'", params.column),
            ));
        }
        if params.categories.is_empty() {
            return Err(ArtifactError::invalid("weave vocabulary", "no categories"));
        }

        let mut categories = Vec::with_capacity(params.categories.len());
        for name in &params.categories {
            // 어휘는 닫힌 집합의 부분집합이어야 함
            let weave = WeaveType::ALL
                .into_iter()
                .find(|w| w.label() == name.as_str())
                .ok_or_else(|| {
                    ArtifactError::invalid("weave vocabulary", format!("unexpected category '{name}'"))
                })?;
            if categories.contains(&weave) {
                return Err(ArtifactError::invalid(
                    "weave vocabulary",
                    format!("duplicate category '{name}'"),
                ));
            }
            categories.push(weave);
        }

        Ok(Self {
            categories,
            handle_unknown: params.handle_unknown,
        })
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self) -> &[WeaveType] {
        &self.categories
    }

    pub fn handle_unknown(&self) -> UnknownCategoryPolicy {
        self.handle_unknown
    }

    pub fn position(&self, weave: WeaveType) -> Option<usize> {
        self.categories.iter().position(|&w| w == weave)
    }

    /// `out`은 `width()` 길이의 0으로 채워진 슬라이스
    pub fn encode_into(&self, weave: WeaveType, out: &mut [f64]) -> Result<()> {
        debug_assert_eq!(out.len(), self.width());

        match (self.position(weave), self.handle_unknown) {
            (Some(pos), _) => {
                out[pos] = 1.0;
                Ok(())
            }
            (None, UnknownCategoryPolicy::Ignore) => Ok(()),
            (None, UnknownCategoryPolicy::Error) => Err(PredictError::UnknownCategory {
                value: weave.label().to_string(),
                known: self.categories.iter().map(|w| w.label().to_string()).collect(),
            }),
        }
    }
}
