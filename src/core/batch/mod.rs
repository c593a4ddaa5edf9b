//! CSV 배치 예측
//!
//! 입력 컬럼은 학습 데이터 컬럼명 그대로("Warp Count", ..., "Weave Type").
//! 출력은 입력 6개 + 물성 9개 + `error` 컬럼. 행 단위 오류는 `error`에 기록하고 계속 진행하며,
//! 시스템 오류는 배치 전체를 중단한다.

use crate::core::error::{PredictError, Result as PredictResult};
use crate::core::features::WEAVE_COLUMN;
use crate::core::service::FabricPredictor;
use crate::core::types::{FabricField, PropertyKind, PropertyPrediction, RawFabricRecord};
use anyhow::{anyhow, Context, Result};
use log::info;
use serde::Serialize;
use std::io::{Read, Write};

/// 배치 처리 결과 집계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// 입력 한 행: 입력 컬럼 순서의 원본 셀과 해석 결과
#[derive(Debug)]
pub struct BatchRow {
    pub cells: Vec<String>,
    pub record: PredictResult<RawFabricRecord>,
}

/// CSV 입력 읽기
///
/// 숫자가 아닌 셀은 해당 행의 `InvalidInput`이 된다.
/// 입력 컬럼 누락이나 필드 수가 다른 행처럼 CSV 구조 자체가 깨진 경우만 전체 오류.
pub fn read_rows<R: Read>(input: R) -> Result<Vec<BatchRow>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().context("CSV 헤더를 읽을 수 없습니다")?.clone();

    let mut columns = Vec::with_capacity(FabricField::ALL.len() + 1);
    for name in input_columns() {
        let index = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow!("입력 CSV에 '{name}' 컬럼이 없습니다"))?;
        columns.push(index);
    }

    reader
        .records()
        .enumerate()
        .map(|(i, row)| -> Result<BatchRow> {
            // 헤더가 1행이므로 데이터는 2행부터
            let row = row.with_context(|| format!("CSV {}행 파싱 실패", i + 2))?;
            let cells: Vec<String> = columns
                .iter()
                .map(|&c| row.get(c).unwrap_or_default().to_string())
                .collect();
            let record = parse_cells(&cells);
            Ok(BatchRow { cells, record })
        })
        .collect()
}

fn input_columns() -> impl Iterator<Item = &'static str> {
    FabricField::ALL
        .into_iter()
        .map(FabricField::column)
        .chain(std::iter::once(WEAVE_COLUMN))
}

/// 빈 셀은 누락(None), 숫자가 아니면 오류
fn numeric_cell(field: FabricField, cell: &str) -> PredictResult<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| PredictError::invalid(field, format!("'{cell}' is not a number")))
}

fn parse_cells(cells: &[String]) -> PredictResult<RawFabricRecord> {
    let mut values = [None; 5];
    for (slot, (field, cell)) in values.iter_mut().zip(FabricField::ALL.into_iter().zip(cells)) {
        *slot = numeric_cell(field, cell)?;
    }
    let [warp_count, weft_count, epi, ppi, gsm] = values;

    let weave = cells.get(FabricField::ALL.len()).map(|c| c.trim()).unwrap_or_default();
    Ok(RawFabricRecord {
        warp_count,
        weft_count,
        epi,
        ppi,
        gsm,
        weave_type: (!weave.is_empty()).then(|| weave.to_string()),
    })
}

pub fn output_header() -> Vec<String> {
    input_columns()
        .map(str::to_string)
        .chain(PropertyKind::ALL.iter().map(|k| k.label().to_string()))
        .chain(std::iter::once("error".to_string()))
        .collect()
}

fn output_row(cells: &[String], outcome: &PredictResult<PropertyPrediction>) -> Vec<String> {
    let mut row = cells.to_vec();
    match outcome {
        Ok(prediction) => {
            row.extend(prediction.values().iter().map(|v| v.to_string()));
            row.push(String::new());
        }
        Err(err) => {
            row.extend(std::iter::repeat(String::new()).take(PropertyKind::ALL.len()));
            row.push(err.to_string());
        }
    }
    row
}

/// CSV를 읽어 예측하고 결과 CSV를 쓴다
pub fn run_batch<R: Read, W: Write>(
    predictor: &FabricPredictor,
    input: R,
    output: W,
) -> Result<BatchReport> {
    let (cells, records): (Vec<Vec<String>>, Vec<PredictResult<RawFabricRecord>>) = read_rows(input)?
        .into_iter()
        .map(|row| (row.cells, row.record))
        .unzip();
    let mut outcomes = predictor.predict_parsed(records);

    if let Some(pos) = outcomes
        .iter()
        .position(|o| matches!(o, Err(e) if e.is_fatal()))
    {
        if let Err(err) = outcomes.swap_remove(pos) {
            return Err(err).with_context(|| format!("배치 {}번째 행에서 중단", pos + 1));
        }
    }

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(output_header())?;

    let mut report = BatchReport {
        total: cells.len(),
        ..BatchReport::default()
    };
    for (row, outcome) in cells.iter().zip(&outcomes) {
        if outcome.is_ok() {
            report.succeeded += 1;
        } else {
            report.failed += 1;
        }
        writer.write_record(output_row(row, outcome))?;
    }
    writer.flush()?;

    info!(
        "배치 완료: {}행 중 {} 성공, {} 실패",
        report.total, report.succeeded, report.failed
    );
    Ok(report)
}
