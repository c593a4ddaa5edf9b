//! 직물 사양 입력 타입
//!
//! 학습 시 사용된 컬럼 이름("Warp Count", ..., "Weave Type")을 그대로 유지한다.

use crate::core::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 연속형 입력 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FabricField {
    WarpCount,
    WeftCount,
    Epi,
    Ppi,
    Gsm,
}

impl FabricField {
    pub const ALL: [FabricField; 5] = [
        FabricField::WarpCount,
        FabricField::WeftCount,
        FabricField::Epi,
        FabricField::Ppi,
        FabricField::Gsm,
    ];

    /// 학습 데이터의 컬럼 이름
    pub fn column(self) -> &'static str {
        match self {
            FabricField::WarpCount => "Warp Count",
            FabricField::WeftCount => "Weft Count",
            FabricField::Epi => "EPI",
            FabricField::Ppi => "PPI",
            FabricField::Gsm => "GSM",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == column)
    }

    /// 허용 도메인 (양 끝 포함)
    pub fn bounds(self) -> FieldBounds {
        match self {
            FabricField::WarpCount | FabricField::WeftCount => FieldBounds::new(5.0, 100.0),
            FabricField::Epi | FabricField::Ppi => FieldBounds::new(10.0, 120.0),
            FabricField::Gsm => FieldBounds::new(50.0, 400.0),
        }
    }
}

impl fmt::Display for FabricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// 닫힌 구간 [min, max]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
}

impl FieldBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// 범위 밖 값 처리 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainPolicy {
    /// 범위 밖 값은 `InvalidInput`으로 거부
    #[default]
    Enforce,
    /// 범위 밖 값도 스케일러로 그대로 전달 (경고 로그만 남김)
    PassThrough,
}

/// 직조 유형 (닫힌 집합)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaveType {
    Plain,
    Twill,
    Satin,
    #[serde(rename = "Broken Twill")]
    BrokenTwill,
    Others,
}

impl WeaveType {
    pub const ALL: [WeaveType; 5] = [
        WeaveType::Plain,
        WeaveType::Twill,
        WeaveType::Satin,
        WeaveType::BrokenTwill,
        WeaveType::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeaveType::Plain => "Plain",
            WeaveType::Twill => "Twill",
            WeaveType::Satin => "Satin",
            WeaveType::BrokenTwill => "Broken Twill",
            WeaveType::Others => "Others",
        }
    }

    fn known_labels() -> Vec<String> {
        Self::ALL.iter().map(|w| w.label().to_string()).collect()
    }
}

impl fmt::Display for WeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeaveType {
    type Err = PredictError;

    /// 앞뒤 공백 제거 후 대소문자 무시 비교
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| PredictError::UnknownCategory {
                value: s.to_string(),
                known: Self::known_labels(),
            })
    }
}

/// 직물 사양 (모델 입력 6개 필드)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FabricSpecification {
    pub warp_count: f64,
    pub weft_count: f64,
    pub epi: f64,
    pub ppi: f64,
    pub gsm: f64,
    pub weave_type: WeaveType,
}

impl Default for FabricSpecification {
    fn default() -> Self {
        Self {
            warp_count: 30.0,
            weft_count: 20.0,
            epi: 60.0,
            ppi: 55.0,
            gsm: 200.0,
            weave_type: WeaveType::Plain,
        }
    }
}

impl FabricSpecification {
    pub fn new(
        warp_count: f64,
        weft_count: f64,
        epi: f64,
        ppi: f64,
        gsm: f64,
        weave_type: WeaveType,
    ) -> Self {
        Self {
            warp_count,
            weft_count,
            epi,
            ppi,
            gsm,
            weave_type,
        }
    }

    pub fn value(&self, field: FabricField) -> f64 {
        match field {
            FabricField::WarpCount => self.warp_count,
            FabricField::WeftCount => self.weft_count,
            FabricField::Epi => self.epi,
            FabricField::Ppi => self.ppi,
            FabricField::Gsm => self.gsm,
        }
    }

    /// 연속형 필드 검증
    ///
    /// 비유한 값은 정책과 무관하게 거부한다. 범위 검사는 `Enforce`일 때만 오류가 된다.
    /// 반환값은 범위를 벗어났지만 통과시킨 필드 목록.
    pub fn validate(&self, policy: DomainPolicy) -> Result<Vec<FabricField>> {
        let mut out_of_domain = Vec::new();

        for field in FabricField::ALL {
            let value = self.value(field);
            if !value.is_finite() {
                return Err(PredictError::invalid(field, format!("{value} is not finite")));
            }

            let bounds = field.bounds();
            if !bounds.contains(value) {
                match policy {
                    DomainPolicy::Enforce => {
                        return Err(PredictError::invalid(
                            field,
                            format!("{value} is outside [{}, {}]", bounds.min, bounds.max),
                        ));
                    }
                    DomainPolicy::PassThrough => out_of_domain.push(field),
                }
            }
        }

        Ok(out_of_domain)
    }
}

/// 느슨한 타입의 입력 행 (CSV/JSON 배치 입력용)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFabricRecord {
    #[serde(rename = "Warp Count")]
    pub warp_count: Option<f64>,
    #[serde(rename = "Weft Count")]
    pub weft_count: Option<f64>,
    #[serde(rename = "EPI")]
    pub epi: Option<f64>,
    #[serde(rename = "PPI")]
    pub ppi: Option<f64>,
    #[serde(rename = "GSM")]
    pub gsm: Option<f64>,
    #[serde(rename = "Weave Type")]
    pub weave_type: Option<String>,
}

impl TryFrom<RawFabricRecord> for FabricSpecification {
    type Error = PredictError;

    fn try_from(raw: RawFabricRecord) -> Result<Self> {
        let require = |field: FabricField, value: Option<f64>| {
            value.ok_or_else(|| PredictError::invalid(field, "missing"))
        };

        let weave_type = match raw.weave_type.as_deref() {
            Some(name) => name.parse::<WeaveType>()?,
            None => {
                return Err(PredictError::UnknownCategory {
                    value: String::new(),
                    known: WeaveType::known_labels(),
                })
            }
        };

        Ok(Self {
            warp_count: require(FabricField::WarpCount, raw.warp_count)?,
            weft_count: require(FabricField::WeftCount, raw.weft_count)?,
            epi: require(FabricField::Epi, raw.epi)?,
            ppi: require(FabricField::Ppi, raw.ppi)?,
            gsm: require(FabricField::Gsm, raw.gsm)?,
            weave_type,
        })
    }
}

impl From<&FabricSpecification> for RawFabricRecord {
    fn from(spec: &FabricSpecification) -> Self {
        Self {
            warp_count: Some(spec.warp_count),
            weft_count: Some(spec.weft_count),
            epi: Some(spec.epi),
            ppi: Some(spec.ppi),
            gsm: Some(spec.gsm),
            weave_type: Some(spec.weave_type.label().to_string()),
        }
    }
}
