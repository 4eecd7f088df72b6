//! 독립 LP 작업 분배
//!
//! 작업 i 의 결과는 항상 출력의 i 번째 자리에 놓입니다 (완료 순서와 무관).

use rayon::prelude::*;

use crate::core::error::Result;

/// `0..count` 작업을 병렬(rayon) 또는 순차로 실행하고 첫 오류를 전파
pub fn solve_indexed<T, F>(count: usize, parallel: bool, task: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync + Send,
{
    if parallel && count > 1 {
        (0..count).into_par_iter().map(task).collect()
    } else {
        (0..count).map(task).collect()
    }
}
