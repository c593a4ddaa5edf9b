//! 변환 → 예측 서비스 핸들
//!
//! 아티팩트는 `Arc`로 공유되어 여러 스레드에서 잠금 없이 읽힌다.
//! 형상 불일치가 한 번이라도 발생하면 모든 복제 핸들이 함께 중단 상태가 되고,
//! 이후 오류에는 처음 불일치를 일으킨 폭이 기록된다.

use crate::core::artifacts::{ArtifactSummary, TrainedArtifacts};
use crate::core::config::PredictorConfig;
use crate::core::error::{PredictError, Result};
use crate::core::features::FeatureVector;
use crate::core::types::{FabricSpecification, PropertyPrediction, RawFabricRecord};
use log::error;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 중단되지 않은 상태 표시값
const SERVING: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct FabricPredictor {
    artifacts: Arc<TrainedArtifacts>,
    /// 중단을 일으킨 특징 폭, 서비스 중이면 `SERVING`
    halted_width: Arc<AtomicUsize>,
    parallel_batch: bool,
}

impl FabricPredictor {
    /// 설정 경로에서 아티팩트를 로드해 서비스 준비
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        let artifacts = TrainedArtifacts::load(config)?;
        Ok(Self::new(Arc::new(artifacts)).with_parallel_batch(config.parallel_batch))
    }

    pub fn new(artifacts: Arc<TrainedArtifacts>) -> Self {
        Self {
            artifacts,
            halted_width: Arc::new(AtomicUsize::new(SERVING)),
            parallel_batch: true,
        }
    }

    pub fn with_parallel_batch(mut self, parallel: bool) -> Self {
        self.parallel_batch = parallel;
        self
    }

    pub fn artifacts(&self) -> &TrainedArtifacts {
        &self.artifacts
    }

    pub fn describe(&self) -> ArtifactSummary {
        self.artifacts.describe()
    }

    /// 중단 상태가 아니면 true
    pub fn is_serving(&self) -> bool {
        self.halted_width.load(Ordering::Acquire) == SERVING
    }

    fn ensure_serving(&self) -> Result<()> {
        match self.halted_width.load(Ordering::Acquire) {
            SERVING => Ok(()),
            actual => Err(PredictError::ServingHalted {
                expected: self.artifacts.predictor().input_width(),
                actual,
            }),
        }
    }

    pub fn transform(&self, spec: &FabricSpecification) -> Result<FeatureVector> {
        self.artifacts.transformer().transform(spec)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PropertyPrediction> {
        self.ensure_serving()?;

        match self.artifacts.predictor().predict(features) {
            Err(err @ PredictError::ShapeMismatch { actual, .. }) => {
                // 먼저 기록된 폭 유지
                let _ = self.halted_width.compare_exchange(
                    SERVING,
                    actual,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
                error!("{err}; refusing further predictions until artifacts are corrected");
                Err(err)
            }
            other => other,
        }
    }

    /// 변환과 예측을 한 번에
    ///
    /// 중단 상태면 입력 검증 전에 `ServingHalted`를 돌려준다.
    pub fn predict_properties(&self, spec: &FabricSpecification) -> Result<PropertyPrediction> {
        self.ensure_serving()?;
        let features = self.transform(spec)?;
        self.predict(&features)
    }

    /// 여러 사양 예측 (결과 순서 = 입력 순서)
    pub fn predict_batch(&self, specs: &[FabricSpecification]) -> Vec<Result<PropertyPrediction>> {
        if self.parallel_batch {
            specs.par_iter().map(|s| self.predict_properties(s)).collect()
        } else {
            specs.iter().map(|s| self.predict_properties(s)).collect()
        }
    }

    /// 원시 레코드 예측: 레코드 변환 오류도 해당 행의 결과로 돌려준다
    pub fn predict_records(&self, records: &[RawFabricRecord]) -> Vec<Result<PropertyPrediction>> {
        let run = |raw: &RawFabricRecord| self.predict_record(raw);
        if self.parallel_batch {
            records.par_iter().map(run).collect()
        } else {
            records.iter().map(run).collect()
        }
    }

    /// 이미 해석된 행 예측 (해석 실패 행은 그 오류를 그대로 결과로)
    pub fn predict_parsed(
        &self,
        rows: Vec<Result<RawFabricRecord>>,
    ) -> Vec<Result<PropertyPrediction>> {
        let run = |row: Result<RawFabricRecord>| {
            self.ensure_serving()?;
            row.and_then(|raw| self.predict_record(&raw))
        };
        if self.parallel_batch {
            rows.into_par_iter().map(run).collect()
        } else {
            rows.into_iter().map(run).collect()
        }
    }

    fn predict_record(&self, raw: &RawFabricRecord) -> Result<PropertyPrediction> {
        self.ensure_serving()?;
        let spec = FabricSpecification::try_from(raw.clone())?;
        self.predict_properties(&spec)
    }
}

#[cfg(test)]
mod __tests__;
