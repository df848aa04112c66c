pub mod cholesky;
pub mod kernels;
