//! # 폴리토프 데이터 모델
//!
//! `{x : A·x <= b, S·x = h}` 와 원래 좌표계로 돌아가는 아핀 사상을 함께 보관합니다.
//! `apply_shift` / `apply_transformation` / `normalize` 는 제자리(in place) 변경이고,
//! 행 선택/등식 승격처럼 구조를 바꾸는 연산은 새 `Polytope` 를 돌려줍니다.

use nalgebra::{DMatrix, DVector};

use super::affine_map::AffineMap;
use crate::core::error::{PolyRoundError, Result};

/// 행 노름이 이 값보다 작으면 0행으로 취급
pub const ZERO_ROW_TOL: f64 = 1e-14;

#[derive(Debug, Clone)]
pub struct Polytope {
    a: DMatrix<f64>,
    b: DVector<f64>,
    /// 등식 시스템 (없으면 0행)
    s: DMatrix<f64>,
    h: DVector<f64>,
    map: AffineMap,
    /// A의 각 행이 원래 몇 번째 부등식이었는지
    row_labels: Vec<usize>,
    /// 원래 좌표계의 변수 이름
    column_labels: Vec<String>,
}

impl Polytope {
    /// 부등식만 있는 폴리토프
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Result<Self> {
        let n = a.ncols();
        Self::with_equalities(a, b, DMatrix::zeros(0, n), DVector::zeros(0))
    }

    pub fn with_equalities(
        a: DMatrix<f64>,
        b: DVector<f64>,
        s: DMatrix<f64>,
        h: DVector<f64>,
    ) -> Result<Self> {
        PolyRoundError::check_dim("Polytope: len(b) == rows(A)", a.nrows(), b.len())?;
        PolyRoundError::check_dim("Polytope: len(h) == rows(S)", s.nrows(), h.len())?;
        let n = a.ncols();
        let s = if s.nrows() == 0 {
            DMatrix::zeros(0, n)
        } else {
            PolyRoundError::check_dim("Polytope: cols(S) == cols(A)", n, s.ncols())?;
            s
        };

        Ok(Self {
            row_labels: (0..a.nrows()).collect(),
            column_labels: (0..n).map(|j| format!("x{}", j)).collect(),
            map: AffineMap::identity(n),
            a,
            b,
            s,
            h,
        })
    }

    /// 원래 변수 이름 지정 (원래 차원과 길이가 같아야 함)
    pub fn with_column_labels(mut self, labels: Vec<String>) -> Result<Self> {
        PolyRoundError::check_dim(
            "Polytope::with_column_labels",
            self.map.output_dim(),
            labels.len(),
        )?;
        self.column_labels = labels;
        Ok(self)
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn s(&self) -> &DMatrix<f64> {
        &self.s
    }

    pub fn h(&self) -> &DVector<f64> {
        &self.h
    }

    pub fn transformation(&self) -> &DMatrix<f64> {
        &self.map.transformation
    }

    pub fn shift(&self) -> &DVector<f64> {
        &self.map.shift
    }

    pub fn affine_map(&self) -> &AffineMap {
        &self.map
    }

    pub fn row_labels(&self) -> &[usize] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// 현재 작업 차원 = cols(A)
    pub fn dimension(&self) -> usize {
        self.a.ncols()
    }

    /// 원래 좌표계 차원
    pub fn original_dimension(&self) -> usize {
        self.map.output_dim()
    }

    pub fn num_inequalities(&self) -> usize {
        self.a.nrows()
    }

    pub fn num_equalities(&self) -> usize {
        self.s.nrows()
    }

    pub fn inequality_only(&self) -> bool {
        self.s.nrows() == 0
    }

    /// 작업 좌표를 v만큼 평행 이동 (새 원점 = 옛 좌표의 v)
    pub fn apply_shift(&mut self, v: &DVector<f64>) -> Result<()> {
        PolyRoundError::check_dim("Polytope::apply_shift", self.dimension(), v.len())?;
        self.b -= &self.a * v;
        if !self.inequality_only() {
            self.h -= &self.s * v;
        }
        self.map.then_shift(v)
    }

    /// 작업 좌표 변경 x = T·x'
    pub fn apply_transformation(&mut self, t: &DMatrix<f64>) -> Result<()> {
        PolyRoundError::check_dim("Polytope::apply_transformation", self.dimension(), t.nrows())?;
        self.a = &self.a * t;
        self.s = &self.s * t;
        self.map.then_transform(t)
    }

    /// 작업 좌표의 점들(열)을 원래 좌표로
    pub fn back_transform(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.map.apply_batch(points)
    }

    pub fn back_transform_point(&self, point: &DVector<f64>) -> Result<DVector<f64>> {
        self.map.apply(point)
    }

    /// 원래 좌표의 점들(열)을 작업 좌표로
    pub fn forward_transform(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.map.invert_apply_batch(points)
    }

    pub fn forward_transform_point(&self, point: &DVector<f64>) -> Result<DVector<f64>> {
        self.map.invert_apply(point)
    }

    /// min_i (b_i − A_i·x). 실행 불가능하면 음수, 부등식이 없으면 +∞
    pub fn border_distance(&self, x: &DVector<f64>) -> Result<f64> {
        PolyRoundError::check_dim("Polytope::border_distance", self.dimension(), x.len())?;
        let slack = &self.b - &self.a * x;
        Ok(slack.iter().cloned().fold(f64::INFINITY, f64::min))
    }

    pub fn is_interior(&self, x: &DVector<f64>) -> Result<bool> {
        Ok(self.border_distance(x)? > 0.0)
    }

    /// 각 부등식 행을 ||A_i||₂ = 1 로 정규화 (0행은 그대로)
    pub fn normalize(&mut self) {
        for i in 0..self.a.nrows() {
            let norm = self.a.row(i).norm();
            if norm > ZERO_ROW_TOL {
                self.a.row_mut(i).unscale_mut(norm);
                self.b[i] /= norm;
            }
        }
    }

    /// 부등식 행 i를 factors[i] 로 나눔 (행 스케일링; 영역은 변하지 않음)
    pub fn scale_rows(&mut self, factors: &DVector<f64>) -> Result<()> {
        PolyRoundError::check_dim("Polytope::scale_rows", self.num_inequalities(), factors.len())?;
        if factors.iter().any(|&f| !(f > 0.0) || !f.is_finite()) {
            return Err(PolyRoundError::LinearAlgebra(
                "행 스케일은 양의 유한값이어야 합니다".to_string(),
            ));
        }
        for (i, &f) in factors.iter().enumerate() {
            self.a.row_mut(i).unscale_mut(f);
            self.b[i] /= f;
        }
        Ok(())
    }

    /// 주어진 부등식 행만 남긴 새 폴리토프 (순서 유지)
    pub fn select_inequalities(&self, keep: &[usize]) -> Polytope {
        let a = self.a.select_rows(keep.iter());
        let b = DVector::from_iterator(keep.len(), keep.iter().map(|&i| self.b[i]));
        Polytope {
            a,
            b,
            s: self.s.clone(),
            h: self.h.clone(),
            map: self.map.clone(),
            row_labels: keep.iter().map(|&i| self.row_labels[i]).collect(),
            column_labels: self.column_labels.clone(),
        }
    }

    /// `keep` 행은 부등식으로 남기고 `promote` 행은 등식 시스템 끝에 붙인 새 폴리토프
    pub fn restructure(&self, keep: &[usize], promote: &[usize]) -> Polytope {
        let mut reduced = self.select_inequalities(keep);
        if promote.is_empty() {
            return reduced;
        }

        let n = self.dimension();
        let old_eq = self.num_equalities();
        let mut s = DMatrix::zeros(old_eq + promote.len(), n);
        let mut h = DVector::zeros(old_eq + promote.len());
        s.rows_mut(0, old_eq).copy_from(&self.s);
        h.rows_mut(0, old_eq).copy_from(&self.h);
        for (k, &i) in promote.iter().enumerate() {
            s.row_mut(old_eq + k).copy_from(&self.a.row(i));
            h[old_eq + k] = self.b[i];
        }
        reduced.s = s;
        reduced.h = h;
        reduced
    }

    /// 저장된 아핀 사상 교체 (레코드 복원용)
    pub(crate) fn set_affine_map(&mut self, map: AffineMap) -> Result<()> {
        PolyRoundError::check_dim("Polytope::set_affine_map", self.dimension(), map.input_dim())?;
        PolyRoundError::check_dim(
            "Polytope::set_affine_map",
            map.output_dim(),
            map.shift.len(),
        )?;
        if self.column_labels.len() != map.output_dim() {
            self.column_labels = (0..map.output_dim()).map(|j| format!("x{}", j)).collect();
        }
        self.map = map;
        Ok(())
    }

    /// 행 라벨 교체 (레코드 복원용)
    pub(crate) fn set_row_labels(&mut self, labels: Vec<usize>) -> Result<()> {
        PolyRoundError::check_dim("Polytope::set_row_labels", self.num_inequalities(), labels.len())?;
        self.row_labels = labels;
        Ok(())
    }

    /// 등식 시스템 제거 (null space 투영 이후 호출)
    pub fn drop_equalities(&mut self) {
        self.s = DMatrix::zeros(0, self.dimension());
        self.h = DVector::zeros(0);
    }
}
