//! PropertyPredictor 테스트

use crate::core::error::{ArtifactError, PredictError};
use crate::core::features::FeatureVector;
use crate::core::model::{ModelArtifact, ModelParams, PropertyPredictor};
use crate::core::test_fixtures::{self, FEATURE_WIDTH};
use crate::core::types::{DomainPolicy, FabricSpecification, PropertyKind, WeaveType};
use approx::assert_relative_eq;

#[test]
fn 선형_모델_순전파() {
    let predictor = test_fixtures::linear_predictor();
    assert_eq!(predictor.kind(), "linear");
    assert_eq!(predictor.input_width(), FEATURE_WIDTH);

    let x: Vec<f64> = (0..FEATURE_WIDTH).map(|j| 0.25 * j as f64 - 1.0).collect();
    let prediction = predictor.predict(&FeatureVector::from_values(x.clone())).unwrap();
    let expected = test_fixtures::expected_linear(&x);

    for (i, (kind, value)) in prediction.iter().enumerate() {
        assert_eq!(kind, PropertyKind::ALL[i]);
        assert_relative_eq!(value, expected[i], epsilon = 1e-9);
    }
}

#[test]
fn 예측은_결정적() {
    let transformer = test_fixtures::transformer(DomainPolicy::Enforce);
    let predictor = test_fixtures::linear_predictor();

    for weave in WeaveType::ALL {
        let spec = FabricSpecification {
            weave_type: weave,
            ..FabricSpecification::default()
        };
        let features = transformer.transform(&spec).unwrap();
        let first = predictor.predict(&features).unwrap();
        let second = predictor.predict(&features).unwrap();

        let a: Vec<u64> = first.values().iter().map(|v| v.to_bits()).collect();
        let b: Vec<u64> = second.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(a, b, "{} 에서 비트 단위로 달라짐", weave);
    }
}

#[test]
fn 폭이_다른_벡터는_shape_mismatch() {
    let predictor = test_fixtures::linear_predictor();

    for width in [0, FEATURE_WIDTH - 1, FEATURE_WIDTH + 1, 2 * FEATURE_WIDTH] {
        match predictor.predict(&FeatureVector::from_values(vec![0.5; width])) {
            Err(err @ PredictError::ShapeMismatch { .. }) => {
                assert!(err.is_fatal());
                if let PredictError::ShapeMismatch { expected, actual } = err {
                    assert_eq!(expected, FEATURE_WIDTH);
                    assert_eq!(actual, width);
                }
            }
            other => panic!("폭 {} 에서 ShapeMismatch 기대, 실제: {:?}", width, other),
        }
    }
}

#[test]
fn 타깃_라벨_순서_검증() {
    let mut artifact = test_fixtures::model_artifact(ModelParams::Linear(test_fixtures::linear_params()));
    artifact.targets.swap(0, 1);

    match PropertyPredictor::from_artifact(artifact) {
        Err(ArtifactError::TargetOrder { index, expected, found }) => {
            assert_eq!(index, 0);
            assert_eq!(expected, "Tensile Strength (Warp)");
            assert_eq!(found, "Tensile Strength (Weft)");
        }
        other => panic!("TargetOrder 기대, 실제: {:?}", other),
    }

    let mut short = test_fixtures::model_artifact(ModelParams::Linear(test_fixtures::linear_params()));
    short.targets.pop();
    assert!(PropertyPredictor::from_artifact(short).is_err());
}

#[test]
fn 선언된_입력폭과_파라미터_불일치_거부() {
    let mut artifact = test_fixtures::model_artifact(ModelParams::Linear(test_fixtures::linear_params()));
    artifact.input_width = FEATURE_WIDTH + 2;
    assert!(matches!(
        PropertyPredictor::from_artifact(artifact),
        Err(ArtifactError::Invalid { .. })
    ));
}

#[test]
fn 출력이_9개가_아니면_거부() {
    let mut params = test_fixtures::linear_params();
    params.coefficients.pop();
    params.intercept.pop();
    let artifact = test_fixtures::model_artifact(ModelParams::Linear(params));
    assert!(PropertyPredictor::from_artifact(artifact).is_err());
}

#[test]
fn 모델_버전_검증() {
    let mut artifact = test_fixtures::model_artifact(ModelParams::Linear(test_fixtures::linear_params()));
    artifact.format_version = 2;
    assert!(matches!(
        PropertyPredictor::from_artifact(artifact),
        Err(ArtifactError::UnsupportedVersion { found: 2, .. })
    ));
}

#[test]
fn 비직사각_계수_거부() {
    let mut params = test_fixtures::linear_params();
    params.coefficients[3].push(1.0);
    let artifact = test_fixtures::model_artifact(ModelParams::Linear(params));
    assert!(PropertyPredictor::from_artifact(artifact).is_err());

    let mut params = test_fixtures::linear_params();
    params.intercept[0] = f64::INFINITY;
    let artifact = test_fixtures::model_artifact(ModelParams::Linear(params));
    assert!(PropertyPredictor::from_artifact(artifact).is_err());
}

#[test]
fn 모델_아티팩트_json_태그() {
    let artifact = test_fixtures::model_artifact(ModelParams::Linear(test_fixtures::linear_params()));
    let json = serde_json::to_value(&artifact).unwrap();
    assert_eq!(json["model"]["kind"], "linear");
    assert_eq!(json["targets"][8], "Spirality");

    let back: ModelArtifact = serde_json::from_value(json).unwrap();
    assert_eq!(back.targets, artifact.targets);
    assert!(matches!(back.model, ModelParams::Linear(_)));
    assert!(PropertyPredictor::from_artifact(back).is_ok());
}
