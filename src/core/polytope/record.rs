//! 평탄한 내보내기 레코드 `{A, b, S, h, transformation, shift}`
//!
//! serde_json 의 `float_roundtrip` 기능으로 f64 가 손실 없이 왕복합니다.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::affine_map::AffineMap;
use super::polytope::Polytope;
use crate::core::error::{PolyRoundError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolytopeRecord {
    /// 작업 차원 (행이 0개인 행렬의 열 수를 보존)
    pub dimension: usize,
    #[serde(rename = "A")]
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    #[serde(rename = "S")]
    pub s: Vec<Vec<f64>>,
    pub h: Vec<f64>,
    pub transformation: Vec<Vec<f64>>,
    pub shift: Vec<f64>,
    /// 원래 변수 이름. 비어 있으면 `x0, x1, ...`
    #[serde(default)]
    pub column_labels: Vec<String>,
    /// A 의 각 행이 원래 몇 번째 부등식이었는지. 비어 있으면 `0..rows(A)`
    #[serde(default)]
    pub row_labels: Vec<usize>,
}

pub(crate) fn matrix_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|r| r.iter().cloned().collect()).collect()
}

fn matrix_from_rows(rows: &[Vec<f64>], ncols: usize, context: &'static str) -> Result<DMatrix<f64>> {
    for row in rows {
        PolyRoundError::check_dim(context, ncols, row.len())?;
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

impl From<&Polytope> for PolytopeRecord {
    fn from(p: &Polytope) -> Self {
        Self {
            dimension: p.dimension(),
            a: matrix_rows(p.a()),
            b: p.b().iter().cloned().collect(),
            s: matrix_rows(p.s()),
            h: p.h().iter().cloned().collect(),
            transformation: matrix_rows(p.transformation()),
            shift: p.shift().iter().cloned().collect(),
            column_labels: p.column_labels().to_vec(),
            row_labels: p.row_labels().to_vec(),
        }
    }
}

impl PolytopeRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// 레코드에서 폴리토프 복원 (누적된 아핀 사상과 라벨 포함)
    pub fn into_polytope(self) -> Result<Polytope> {
        let n = self.dimension;
        let a = matrix_from_rows(&self.a, n, "PolytopeRecord: A")?;
        let s = matrix_from_rows(&self.s, n, "PolytopeRecord: S")?;
        let original = self.shift.len();
        PolyRoundError::check_dim("PolytopeRecord: rows(transformation)", original, self.transformation.len())?;
        let transformation = matrix_from_rows(&self.transformation, n, "PolytopeRecord: transformation")?;

        let mut p = Polytope::with_equalities(
            a,
            DVector::from_vec(self.b),
            s,
            DVector::from_vec(self.h),
        )?;
        p.set_affine_map(AffineMap {
            transformation,
            shift: DVector::from_vec(self.shift),
        })?;
        if !self.row_labels.is_empty() {
            p.set_row_labels(self.row_labels)?;
        }
        if self.column_labels.is_empty() {
            Ok(p)
        } else {
            p.with_column_labels(self.column_labels)
        }
    }
}
