//! Writer configuration / 写入器配置

use mfile_base::{
  Error, Result,
  consts::{OUT_BUF_SIZE, OUT_PREALLOC},
  size::{parse_bool, parse_size},
};

/// Writer configuration options / 写入器配置选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conf {
  /// Accumulator size / 累积缓冲区大小
  BufSize(usize),
  /// First preallocation step, 0 disables / 首次预分配步长，0 为禁用
  Prealloc(u64),
  /// Double the step after each preallocation / 每次预分配后步长翻倍
  PreallocGrow(bool),
  /// Remove the file if closed before the last chunk / 未写完最后一块即关闭时删除文件
  DeleteOnAbort(bool),
}

impl Conf {
  /// Parse a `key = value` option / 解析 `键 = 值` 选项
  pub fn kv(key: &str, val: &str) -> Result<Self> {
    let size = || parse_size(val).ok_or_else(|| Error::conf(format!("{key}: bad size {val}")));
    let flag = || parse_bool(val).ok_or_else(|| Error::conf(format!("{key}: bad bool {val}")));
    Ok(match key {
      "buffer_size" => match usize::try_from(size()?) {
        Ok(n) if n != 0 => Self::BufSize(n),
        _ => return Err(Error::conf(format!("{key}: bad size {val}"))),
      },
      "preallocate" => Self::Prealloc(size()?),
      "preallocate_grow" => Self::PreallocGrow(flag()?),
      "delete_on_abort" => Self::DeleteOnAbort(flag()?),
      _ => return Err(Error::conf(format!("unknown key {key}"))),
    })
  }
}

/// Parsed config / 解析后的配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConf {
  pub buf_size: usize,
  pub prealloc: u64,
  pub prealloc_grow: bool,
  pub delete_on_abort: bool,
}

impl Default for ParsedConf {
  fn default() -> Self {
    Self::parse(&[])
  }
}

impl ParsedConf {
  pub fn parse(conf: &[Conf]) -> Self {
    let mut c = Self {
      buf_size: OUT_BUF_SIZE,
      prealloc: OUT_PREALLOC as u64,
      prealloc_grow: true,
      delete_on_abort: true,
    };
    for item in conf {
      match *item {
        Conf::BufSize(v) => c.buf_size = v,
        Conf::Prealloc(v) => c.prealloc = v,
        Conf::PreallocGrow(v) => c.prealloc_grow = v,
        Conf::DeleteOnAbort(v) => c.delete_on_abort = v,
      }
    }
    c.buf_size = c.buf_size.max(1);
    c
  }
}
