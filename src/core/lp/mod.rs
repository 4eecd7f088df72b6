pub mod backend;
pub mod minilp_backend;
pub mod pool;
pub mod registry;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use backend::{LpBackend, LpProblem, LpSolution, LpStatus, Sense, SolverOptions};
pub use minilp_backend::MinilpBackend;
pub use pool::solve_indexed;
pub use registry::BackendRegistry;
