//! Error types shared by reader and writer
//! 读写器共享的错误类型

use std::{
  fmt::{self, Display, Formatter},
  io,
  path::{Path, PathBuf},
};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Captured OS error: kind plus raw code for logging
/// 捕获的系统错误：类型和原始错误码（用于日志）
///
/// `io::Error` is not `Clone`, a reader must replay its first failure on
/// every later call, so only the comparable parts are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsErr {
  pub kind: io::ErrorKind,
  pub code: Option<i32>,
}

impl From<&io::Error> for OsErr {
  fn from(e: &io::Error) -> Self {
    Self {
      kind: e.kind(),
      code: e.raw_os_error(),
    }
  }
}

impl From<io::Error> for OsErr {
  fn from(e: io::Error) -> Self {
    (&e).into()
  }
}

impl From<io::ErrorKind> for OsErr {
  fn from(kind: io::ErrorKind) -> Self {
    Self { kind, code: None }
  }
}

impl Display for OsErr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self.code {
      Some(code) => write!(f, "{} (os error {code})", self.kind),
      None => write!(f, "{}", self.kind),
    }
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("open {path}: {err}")]
  Open { path: PathBuf, err: OsErr },

  #[error("alloc: {0}")]
  Alloc(#[from] mfile_alloc::Error),

  #[error("attach: no completion runtime on this thread")]
  Attach,

  #[error("seek {pos} out of range, file size {size}")]
  SeekOutOfRange { pos: u64, size: u64 },

  #[error("read at {pos}: {err}")]
  Read { pos: u64, err: OsErr },

  #[error("write at {pos}: {err}")]
  Write { pos: u64, err: OsErr },

  #[error("path: {0}")]
  PathResolution(Box<str>),

  #[error("conf: {0}")]
  Conf(Box<str>),

  #[error("sys: {0}")]
  Sys(OsErr),
}

impl From<io::Error> for Error {
  fn from(e: io::Error) -> Self {
    Self::Sys(e.into())
  }
}

impl Error {
  #[inline]
  pub fn open(path: &Path, e: &io::Error) -> Self {
    Self::Open {
      path: path.into(),
      err: e.into(),
    }
  }

  #[inline]
  pub fn path(msg: impl Into<Box<str>>) -> Self {
    Self::PathResolution(msg.into())
  }

  #[inline]
  pub fn conf(msg: impl Into<Box<str>>) -> Self {
    Self::Conf(msg.into())
  }

  /// OS error code if any / 系统错误码
  pub fn code(&self) -> Option<i32> {
    match self {
      Self::Open { err, .. } | Self::Read { err, .. } | Self::Write { err, .. } | Self::Sys(err) => {
        err.code
      }
      _ => None,
    }
  }
}
