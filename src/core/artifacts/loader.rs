//! JSON 아티팩트 로더

use super::tensor_file::read_dense_layers;
use crate::core::error::ArtifactError;
use crate::core::features::{FeatureTransformer, PreprocessorParams};
use crate::core::model::{ModelArtifact, ModelParams, PropertyPredictor};
use crate::core::types::DomainPolicy;
use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 전처리 아티팩트 로드
pub fn load_preprocessor(
    path: &Path,
    policy: DomainPolicy,
) -> Result<FeatureTransformer, ArtifactError> {
    let params: PreprocessorParams = read_json(path)?;
    let transformer = FeatureTransformer::from_params(params, policy)?;

    info!(
        "전처리기 로드: {} (pipeline '{}', {} features)",
        path.display(),
        transformer.pipeline_id(),
        transformer.width()
    );
    Ok(transformer)
}

/// 모델 아티팩트 로드
///
/// MLP 가중치가 별도 safetensors 파일이면 아티팩트 파일 기준 상대 경로로 읽는다.
pub fn load_model(path: &Path) -> Result<PropertyPredictor, ArtifactError> {
    let mut artifact: ModelArtifact = read_json(path)?;

    if let ModelParams::Mlp(mlp) = &mut artifact.model {
        if let Some(weights_file) = mlp.weights_file.take() {
            if !mlp.layers.is_empty() {
                return Err(ArtifactError::invalid(
                    "mlp",
                    "both inline layers and weights_file are given",
                ));
            }
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            mlp.layers = read_dense_layers(&base.join(weights_file), mlp.layer_count)?;
        }
    }

    let predictor = PropertyPredictor::from_artifact(artifact)?;
    info!(
        "모델 로드: {} (pipeline '{}', {} model, input width {})",
        path.display(),
        predictor.pipeline_id(),
        predictor.kind(),
        predictor.input_width()
    );
    Ok(predictor)
}
