//! FabricPredictor 서비스 핸들 테스트

use crate::core::error::PredictError;
use crate::core::features::FeatureVector;
use crate::core::service::FabricPredictor;
use crate::core::test_fixtures::{self, FEATURE_WIDTH};
use crate::core::types::{
    DomainPolicy, FabricField, FabricSpecification, PropertyKind, RawFabricRecord, WeaveType,
};
use approx::assert_relative_eq;
use std::sync::Arc;

fn 서비스_생성() -> FabricPredictor {
    FabricPredictor::new(Arc::new(test_fixtures::artifacts(DomainPolicy::Enforce)))
}

#[test]
fn 기본_사양_예측() {
    let service = 서비스_생성();
    let spec = FabricSpecification::default();

    let features = service.transform(&spec).unwrap();
    let prediction = service.predict_properties(&spec).unwrap();

    assert!(prediction.is_finite());
    let expected = test_fixtures::expected_linear(&features.to_vec());
    for kind in PropertyKind::ALL {
        assert_relative_eq!(prediction.get(kind), expected[kind.index()], epsilon = 1e-9);
    }
    assert!(service.is_serving());
}

#[test]
fn 요청_오류는_서비스를_멈추지_않음() {
    let service = 서비스_생성();

    let bad = FabricSpecification {
        gsm: 900.0,
        ..FabricSpecification::default()
    };
    match service.predict_properties(&bad) {
        Err(PredictError::InvalidInput { field, .. }) => assert_eq!(field, FabricField::Gsm),
        other => panic!("InvalidInput 기대, 실제: {:?}", other),
    }

    assert!(service.is_serving());
    assert!(service.predict_properties(&FabricSpecification::default()).is_ok());
}

#[test]
fn 형상_불일치_후_모든_복제본_중단() {
    let service = 서비스_생성();
    let other = service.clone();

    let short = FeatureVector::from_values(vec![0.0; FEATURE_WIDTH - 1]);
    match service.predict(&short) {
        Err(PredictError::ShapeMismatch { expected, actual }) => {
            assert_eq!(expected, FEATURE_WIDTH);
            assert_eq!(actual, FEATURE_WIDTH - 1);
        }
        other => panic!("ShapeMismatch 기대, 실제: {:?}", other),
    }

    assert!(!service.is_serving());
    assert!(!other.is_serving());

    // 올바른 입력도 더 이상 처리하지 않음
    let result = other.predict_properties(&FabricSpecification::default());
    assert!(matches!(result, Err(PredictError::ServingHalted { .. })));
    assert!(result.unwrap_err().is_fatal());

    // 새로 만든 핸들은 영향 없음
    assert!(서비스_생성().is_serving());
}

#[test]
fn 배치_결과는_입력_순서() {
    let specs: Vec<FabricSpecification> = (0..64)
        .map(|i| FabricSpecification {
            warp_count: 10.0 + i as f64,
            gsm: if i % 10 == 3 { 5000.0 } else { 150.0 + i as f64 },
            weave_type: WeaveType::ALL[i % WeaveType::ALL.len()],
            ..FabricSpecification::default()
        })
        .collect();

    let parallel = 서비스_생성().predict_batch(&specs);
    let sequential = 서비스_생성().with_parallel_batch(false).predict_batch(&specs);
    assert_eq!(parallel.len(), specs.len());

    let single = 서비스_생성();
    for ((spec, p), s) in specs.iter().zip(&parallel).zip(&sequential) {
        match (p, s) {
            (Ok(p), Ok(s)) => {
                assert_eq!(p, s);
                assert_eq!(p, &single.predict_properties(spec).unwrap());
            }
            (Err(PredictError::InvalidInput { .. }), Err(PredictError::InvalidInput { .. })) => {
                assert!(spec.gsm > 400.0);
            }
            other => panic!("병렬/순차 결과 불일치: {:?}", other),
        }
    }
}

#[test]
fn 원시_레코드_예측() {
    let service = 서비스_생성();
    let good = RawFabricRecord::from(&FabricSpecification::default());
    let records = vec![
        good.clone(),
        RawFabricRecord {
            weave_type: Some(" twill ".to_string()),
            ..good.clone()
        },
        RawFabricRecord {
            epi: None,
            ..good.clone()
        },
        RawFabricRecord {
            weave_type: Some("Herringbone".to_string()),
            ..good.clone()
        },
        RawFabricRecord {
            weave_type: None,
            ..good
        },
    ];

    let results = service.predict_records(&records);
    assert_eq!(results.len(), 5);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert_ne!(results[0].as_ref().unwrap(), results[1].as_ref().unwrap());
    assert!(matches!(
        &results[2],
        Err(PredictError::InvalidInput { field: FabricField::Epi, .. })
    ));
    match &results[3] {
        Err(PredictError::UnknownCategory { value, known }) => {
            assert_eq!(value, "Herringbone");
            assert_eq!(known.len(), 5);
        }
        other => panic!("UnknownCategory 기대, 실제: {:?}", other),
    }
    assert!(matches!(&results[4], Err(PredictError::UnknownCategory { .. })));
    assert!(service.is_serving());
}

#[test]
fn 통과_정책은_범위밖_값도_예측() {
    let service = FabricPredictor::new(Arc::new(test_fixtures::artifacts(DomainPolicy::PassThrough)));
    let spec = FabricSpecification {
        warp_count: 150.0,
        ..FabricSpecification::default()
    };

    let prediction = service.predict_properties(&spec).unwrap();
    assert!(prediction.is_finite());
    assert_eq!(service.describe().domain_policy, DomainPolicy::PassThrough);

    // 비유한 값은 정책과 무관하게 거부
    let nan = FabricSpecification {
        ppi: f64::NAN,
        ..FabricSpecification::default()
    };
    assert!(service.predict_properties(&nan).is_err());
}

#[test]
fn 중단_오류는_원인이_된_폭을_보고() {
    let service = 서비스_생성();
    let _ = service.predict(&FeatureVector::from_values(vec![0.0; 3]));
    // 이후 다른 폭의 불일치가 나도 처음 폭 유지
    let _ = service.predict(&FeatureVector::from_values(vec![0.0; 7]));

    let correct = service.transform(&FabricSpecification::default()).unwrap();
    assert_eq!(correct.len(), FEATURE_WIDTH);

    let err = service.predict(&correct).unwrap_err();
    assert!(err.to_string().contains("width 3"), "{err}");
    match err {
        PredictError::ServingHalted { expected, actual } => {
            assert_eq!(expected, FEATURE_WIDTH);
            assert_eq!(actual, 3);
        }
        other => panic!("ServingHalted 기대, 실제: {:?}", other),
    }
}

#[test]
fn 중단_상태에서는_잘못된_요청도_중단_오류() {
    let service = 서비스_생성();
    let _ = service.predict(&FeatureVector::from_values(vec![0.0; 2]));

    let out_of_range = FabricSpecification {
        gsm: 900.0,
        ..FabricSpecification::default()
    };
    assert!(matches!(
        service.predict_properties(&out_of_range),
        Err(PredictError::ServingHalted { actual: 2, .. })
    ));

    let unknown = RawFabricRecord {
        weave_type: Some("Herringbone".to_string()),
        ..RawFabricRecord::from(&FabricSpecification::default())
    };
    let results = service.predict_records(&[unknown]);
    assert!(matches!(&results[0], Err(PredictError::ServingHalted { .. })));

    let parsed = service.predict_parsed(vec![Err(PredictError::InvalidInput {
        field: FabricField::Epi,
        reason: "'abc' is not a number".to_string(),
    })]);
    assert!(matches!(&parsed[0], Err(PredictError::ServingHalted { .. })));
}

#[test]
fn 해석된_행_예측은_순서와_오류를_유지() {
    let service = 서비스_생성();
    let good = RawFabricRecord::from(&FabricSpecification::default());
    let rows = vec![
        Ok(good.clone()),
        Err(PredictError::InvalidInput {
            field: FabricField::WarpCount,
            reason: "'thirty' is not a number".to_string(),
        }),
        Ok(good),
    ];

    let results = service.predict_parsed(rows);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(
        &results[1],
        Err(PredictError::InvalidInput { field: FabricField::WarpCount, .. })
    ));
    assert_eq!(results[0].as_ref().unwrap(), results[2].as_ref().unwrap());
    assert!(service.is_serving());
}
