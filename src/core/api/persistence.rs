//! 평탄한 내보내기 레코드의 파일 입출력
//!
//! CSV 는 행마다 쉼표로 구분한 값이며, f64 는 최단 왕복 표현으로 씁니다.
//! 벡터는 한 줄에 값 하나입니다.

use std::fs;
use std::path::Path;

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::core::error::{PolyRoundError, Result};
use crate::core::polytope::record::matrix_rows;
use crate::core::polytope::{Polytope, PolytopeRecord};

pub const CSV_FILES: [&str; 6] = [
    "A.csv",
    "b.csv",
    "S.csv",
    "h.csv",
    "transformation.csv",
    "shift.csv",
];

fn matrix_to_csv(m: &DMatrix<f64>) -> String {
    let mut out = String::new();
    for row in matrix_rows(m) {
        let line: Vec<String> = row.iter().map(|v| format!("{:?}", v)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn vector_to_csv(v: &DVector<f64>) -> String {
    v.iter().map(|x| format!("{:?}\n", x)).collect()
}

fn parse_csv(text: &str, file: &str) -> Result<Vec<Vec<f64>>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.split(',')
                .map(|field| {
                    field.trim().parse::<f64>().map_err(|e| PolyRoundError::CsvParse {
                        file: file.to_string(),
                        line: i + 1,
                        message: e.to_string(),
                    })
                })
                .collect()
        })
        .collect()
}

fn read_csv(dir: &Path, file: &str) -> Result<Vec<Vec<f64>>> {
    let text = fs::read_to_string(dir.join(file))?;
    parse_csv(&text, file)
}

fn read_vector(dir: &Path, file: &str) -> Result<Vec<f64>> {
    let rows = read_csv(dir, file)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row.as_slice() {
            [v] => Ok(*v),
            _ => Err(PolyRoundError::CsvParse {
                file: file.to_string(),
                line: i + 1,
                message: format!("값 1개를 기대했지만 {}개", row.len()),
            }),
        })
        .collect()
}

/// `A, b, S, h, transformation, shift` 를 디렉터리에 CSV 6개로 저장
pub fn polytope_to_csvs(polytope: &Polytope, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    fs::write(dir.join("A.csv"), matrix_to_csv(polytope.a()))?;
    fs::write(dir.join("b.csv"), vector_to_csv(polytope.b()))?;
    fs::write(dir.join("S.csv"), matrix_to_csv(polytope.s()))?;
    fs::write(dir.join("h.csv"), vector_to_csv(polytope.h()))?;
    fs::write(
        dir.join("transformation.csv"),
        matrix_to_csv(polytope.transformation()),
    )?;
    fs::write(dir.join("shift.csv"), vector_to_csv(polytope.shift()))?;
    debug!("CSV 저장: {}", dir.display());
    Ok(())
}

/// `polytope_to_csvs` 로 저장한 디렉터리에서 복원
///
/// 작업 차원은 transformation 의 열 수에서 읽습니다. CSV 에는 라벨이 없으므로
/// 변수 이름은 `x0, x1, ...`, 행 라벨은 `0..rows(A)` 로 다시 매겨집니다.
/// 라벨까지 보존하려면 `polytope_to_json` 을 쓰세요.
pub fn polytope_from_csvs(dir: impl AsRef<Path>) -> Result<Polytope> {
    let dir = dir.as_ref();
    let transformation = read_csv(dir, "transformation.csv")?;
    let dimension = transformation.first().map(|r| r.len()).unwrap_or(0);
    let record = PolytopeRecord {
        dimension,
        a: read_csv(dir, "A.csv")?,
        b: read_vector(dir, "b.csv")?,
        s: read_csv(dir, "S.csv")?,
        h: read_vector(dir, "h.csv")?,
        transformation,
        shift: read_vector(dir, "shift.csv")?,
        column_labels: Vec::new(),
        row_labels: Vec::new(),
    };
    record.into_polytope()
}

/// 행렬, 아핀 사상, 행/열 라벨을 JSON 한 파일로 저장
pub fn polytope_to_json(polytope: &Polytope, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, PolytopeRecord::from(polytope).to_json()?)?;
    Ok(())
}

/// `polytope_to_json` 으로 저장한 파일에서 라벨까지 그대로 복원
pub fn polytope_from_json(path: impl AsRef<Path>) -> Result<Polytope> {
    let text = fs::read_to_string(path)?;
    PolytopeRecord::from_json(&text)?.into_polytope()
}
