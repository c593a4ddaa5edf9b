//! safetensors 형식 MLP 가중치 로더
//!
//! 텐서 이름 규칙: `layers.{i}.weight` (out, in), `layers.{i}.bias` (out).

use crate::core::error::ArtifactError;
use crate::core::model::DenseLayerParams;
use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use safetensors::{Dtype, SafeTensors};
use std::fs::File;
use std::path::Path;

/// 가중치 파일에서 밀집 레이어 읽기
///
/// `layer_count`가 없으면 `layers.0.weight`부터 연속된 레이어를 모두 읽는다.
pub fn read_dense_layers(
    path: &Path,
    layer_count: Option<usize>,
) -> Result<Vec<DenseLayerParams>, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // 파일은 로딩 동안만 매핑되고 결과는 소유 벡터로 복사됨
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tensors = SafeTensors::deserialize(&mmap).map_err(|e| safetensors_error(path, e))?;

    let count = match layer_count {
        Some(n) => n,
        None => (0..)
            .take_while(|i| tensors.tensor(&format!("layers.{i}.weight")).is_ok())
            .count(),
    };
    if count == 0 {
        return Err(ArtifactError::Safetensors {
            path: path.to_path_buf(),
            message: "no 'layers.0.weight' tensor".to_string(),
        });
    }

    let mut layers = Vec::with_capacity(count);
    for i in 0..count {
        let (weights, shape) = read_tensor(&tensors, &format!("layers.{i}.weight"), path)?;
        let &[rows, cols] = shape.as_slice() else {
            return Err(ArtifactError::Safetensors {
                path: path.to_path_buf(),
                message: format!("layers.{i}.weight must be 2-d, got shape {shape:?}"),
            });
        };
        let (bias, bias_shape) = read_tensor(&tensors, &format!("layers.{i}.bias"), path)?;
        if bias_shape.len() != 1 {
            return Err(ArtifactError::Safetensors {
                path: path.to_path_buf(),
                message: format!("layers.{i}.bias must be 1-d, got shape {bias_shape:?}"),
            });
        }

        debug_assert_eq!(weights.len(), rows * cols);
        layers.push(DenseLayerParams {
            weights: weights.chunks(cols.max(1)).map(<[f64]>::to_vec).collect(),
            bias,
        });
    }

    Ok(layers)
}

fn read_tensor(
    tensors: &SafeTensors<'_>,
    name: &str,
    path: &Path,
) -> Result<(Vec<f64>, Vec<usize>), ArtifactError> {
    let view = tensors.tensor(name).map_err(|e| safetensors_error(path, e))?;
    let shape = view.shape().to_vec();
    let count: usize = shape.iter().product();
    let bytes = view.data();

    let width = match view.dtype() {
        Dtype::F64 => 8,
        Dtype::F32 => 4,
        Dtype::F16 => 2,
        other => {
            return Err(ArtifactError::Safetensors {
                path: path.to_path_buf(),
                message: format!("tensor '{name}' has unsupported dtype {other:?}"),
            })
        }
    };
    if bytes.len() != count * width {
        return Err(ArtifactError::Safetensors {
            path: path.to_path_buf(),
            message: format!("tensor '{name}' has {} bytes for shape {shape:?}", bytes.len()),
        });
    }

    let values = match view.dtype() {
        Dtype::F64 => {
            let mut out = vec![0.0f64; count];
            LittleEndian::read_f64_into(bytes, &mut out);
            out
        }
        Dtype::F32 => {
            let mut out = vec![0.0f32; count];
            LittleEndian::read_f32_into(bytes, &mut out);
            out.into_iter().map(f64::from).collect()
        }
        _ => {
            let mut bits = vec![0u16; count];
            LittleEndian::read_u16_into(bytes, &mut bits);
            bits.into_iter()
                .map(|b| half::f16::from_bits(b).to_f64())
                .collect()
        }
    };

    Ok((values, shape))
}

fn safetensors_error(path: &Path, e: safetensors::SafeTensorError) -> ArtifactError {
    ArtifactError::Safetensors {
        path: path.to_path_buf(),
        message: format!("{e:?}"),
    }
}
