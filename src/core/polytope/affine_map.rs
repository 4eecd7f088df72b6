//! 작업 좌표 → 원래 좌표 아핀 사상
//!
//! original = T · w + s
//! 단계마다 `then_shift` / `then_transform` 으로 누적합니다.

use nalgebra::{DMatrix, DVector};

use crate::core::error::{PolyRoundError, Result};

/// 의사역행렬 계산 시 0으로 간주할 특이값 한계
const PINV_EPS: f64 = 1e-12;

/// 아핀 사상 `w ↦ T·w + s`
#[derive(Debug, Clone, PartialEq)]
pub struct AffineMap {
    /// 현재 작업 좌표 → 원래 좌표 선형 부분 (원래 차원 × 작업 차원)
    pub transformation: DMatrix<f64>,
    /// 원래 좌표계에서의 평행 이동
    pub shift: DVector<f64>,
}

impl AffineMap {
    pub fn identity(n: usize) -> Self {
        Self {
            transformation: DMatrix::identity(n, n),
            shift: DVector::zeros(n),
        }
    }

    /// 작업 좌표 차원
    pub fn input_dim(&self) -> usize {
        self.transformation.ncols()
    }

    /// 원래 좌표 차원
    pub fn output_dim(&self) -> usize {
        self.transformation.nrows()
    }

    /// 점 하나를 원래 좌표로
    pub fn apply(&self, w: &DVector<f64>) -> Result<DVector<f64>> {
        PolyRoundError::check_dim("AffineMap::apply", self.input_dim(), w.len())?;
        Ok(&self.transformation * w + &self.shift)
    }

    /// 열 단위로 쌓인 점들을 원래 좌표로
    pub fn apply_batch(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        PolyRoundError::check_dim("AffineMap::apply_batch", self.input_dim(), points.nrows())?;
        let mut out = &self.transformation * points;
        for mut col in out.column_iter_mut() {
            col += &self.shift;
        }
        Ok(out)
    }

    /// 역사상: T⁺ (p - s)
    ///
    /// T가 정사각이 아니면 최소제곱 해를 돌려줍니다. 사상의 상(image) 위에 있는
    /// 점에 대해서는 `apply` 의 정확한 역입니다.
    pub fn invert_apply(&self, p: &DVector<f64>) -> Result<DVector<f64>> {
        PolyRoundError::check_dim("AffineMap::invert_apply", self.output_dim(), p.len())?;
        let rhs = p - &self.shift;
        let svd = self.transformation.clone().svd(true, true);
        svd.solve(&rhs, PINV_EPS)
            .map_err(|e| PolyRoundError::LinearAlgebra(e.to_string()))
    }

    pub fn invert_apply_batch(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        PolyRoundError::check_dim(
            "AffineMap::invert_apply_batch",
            self.output_dim(),
            points.nrows(),
        )?;
        let mut rhs = points.clone();
        for mut col in rhs.column_iter_mut() {
            col -= &self.shift;
        }
        let svd = self.transformation.clone().svd(true, true);
        svd.solve(&rhs, PINV_EPS)
            .map_err(|e| PolyRoundError::LinearAlgebra(e.to_string()))
    }

    /// 작업 좌표를 v만큼 옮김: w = w' + v 이므로 s ← s + T·v
    pub fn then_shift(&mut self, v: &DVector<f64>) -> Result<()> {
        PolyRoundError::check_dim("AffineMap::then_shift", self.input_dim(), v.len())?;
        self.shift += &self.transformation * v;
        Ok(())
    }

    /// 작업 좌표를 선형 변환: w = M·w' 이므로 T ← T·M
    pub fn then_transform(&mut self, m: &DMatrix<f64>) -> Result<()> {
        PolyRoundError::check_dim("AffineMap::then_transform", self.input_dim(), m.nrows())?;
        self.transformation = &self.transformation * m;
        Ok(())
    }

    /// 합성 `self ∘ inner`: w ↦ T₁(T₂w + s₂) + s₁
    pub fn compose(&self, inner: &AffineMap) -> Result<AffineMap> {
        PolyRoundError::check_dim("AffineMap::compose", self.input_dim(), inner.output_dim())?;
        Ok(AffineMap {
            transformation: &self.transformation * &inner.transformation,
            shift: &self.transformation * &inner.shift + &self.shift,
        })
    }
}
