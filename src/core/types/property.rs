//! 예측 대상 물성과 예측 결과

use serde::{Deserialize, Serialize};
use std::fmt;

/// 예측 물성 개수
pub const PROPERTY_COUNT: usize = 9;

/// 예측 대상 물성 (순서가 곧 모델 출력 순서)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    TensileStrengthWarp,
    TensileStrengthWeft,
    TearingStrengthWarp,
    TearingStrengthWeft,
    WashFastnessColourChange,
    RubbingFastnessDryLengthwise,
    DimensionalStabilityLength,
    DimensionalStabilityWidth,
    Spirality,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; PROPERTY_COUNT] = [
        PropertyKind::TensileStrengthWarp,
        PropertyKind::TensileStrengthWeft,
        PropertyKind::TearingStrengthWarp,
        PropertyKind::TearingStrengthWeft,
        PropertyKind::WashFastnessColourChange,
        PropertyKind::RubbingFastnessDryLengthwise,
        PropertyKind::DimensionalStabilityLength,
        PropertyKind::DimensionalStabilityWidth,
        PropertyKind::Spirality,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PropertyKind::TensileStrengthWarp => "Tensile Strength (Warp)",
            PropertyKind::TensileStrengthWeft => "Tensile Strength (Weft)",
            PropertyKind::TearingStrengthWarp => "Tearing Strength (Warp)",
            PropertyKind::TearingStrengthWeft => "Tearing Strength (Weft)",
            PropertyKind::WashFastnessColourChange => "Wash Fastness (Colour Change)",
            PropertyKind::RubbingFastnessDryLengthwise => "Rubbing Fastness (Dry and Lengthwise)",
            PropertyKind::DimensionalStabilityLength => "Dimensional Stability (Length)",
            PropertyKind::DimensionalStabilityWidth => "Dimensional Stability (Width)",
            PropertyKind::Spirality => "Spirality",
        }
    }

    /// 출력 벡터 내 위치
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn labels() -> [&'static str; PROPERTY_COUNT] {
        Self::ALL.map(PropertyKind::label)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 라벨이 붙은 예측값 (직렬화용)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub property: String,
    pub value: f64,
}

/// 9개 물성 예측 결과
///
/// 소비자는 위치로 라벨을 매칭하므로 `values[i]`는 항상 `PropertyKind::ALL[i]`에 대응한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyPrediction {
    values: [f64; PROPERTY_COUNT],
}

impl PropertyPrediction {
    pub(crate) fn from_array(values: [f64; PROPERTY_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; PROPERTY_COUNT] {
        &self.values
    }

    pub fn get(&self, kind: PropertyKind) -> f64 {
        self.values[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyKind, f64)> + '_ {
        PropertyKind::ALL.into_iter().zip(self.values.iter().copied())
    }

    pub fn labeled(&self) -> Vec<LabeledValue> {
        self.iter()
            .map(|(kind, value)| LabeledValue {
                property: kind.label().to_string(),
                value,
            })
            .collect()
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl Serialize for PropertyPrediction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.labeled().serialize(serializer)
    }
}

impl fmt::Display for PropertyPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, value) in self.iter() {
            writeln!(f, "{}: {:.3}", kind.label(), value)?;
        }
        Ok(())
    }
}
