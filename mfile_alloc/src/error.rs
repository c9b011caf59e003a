//! Error types for mfile_alloc
//! mfile_alloc 错误类型

use std::alloc::LayoutError;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("invalid layout: {0}")]
  InvalidLayout(#[from] LayoutError),

  #[error("alloc failed: {0} bytes")]
  AllocFailed(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
