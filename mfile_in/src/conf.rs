//! Reader configuration / 读取器配置

use mfile_alloc::align_up;
use mfile_base::{
  Error, Result,
  consts::{IN_ALIGN, IN_BUF_COUNT, IN_BUF_SIZE},
  size::{parse_bool, parse_size},
};

/// Reader configuration options / 读取器配置选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conf {
  /// Bytes per read buffer / 每个读缓冲区字节数
  BufSize(usize),
  /// Number of read buffers / 读缓冲区数量
  BufCount(usize),
  /// Buffer and file offset alignment / 缓冲区与文件偏移对齐
  Align(usize),
  /// Bypass the page cache / 绕过页缓存
  DirectIo(bool),
  /// Publish input mtime for the writer / 发布输入文件修改时间供写入器使用
  PreserveMtime(bool),
}

impl Conf {
  /// Parse a `key = value` option / 解析 `键 = 值` 选项
  pub fn kv(key: &str, val: &str) -> Result<Self> {
    let size = || {
      parse_size(val)
        .filter(|&n| n != 0)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| Error::conf(format!("{key}: bad size {val}")))
    };
    let flag = || parse_bool(val).ok_or_else(|| Error::conf(format!("{key}: bad bool {val}")));
    Ok(match key {
      "buffer_size" => Self::BufSize(size()?),
      "buffers" | "buffer_count" => Self::BufCount(size()?),
      "align" | "alignment" => Self::Align(size()?),
      "direct_io" => Self::DirectIo(flag()?),
      "preserve_mtime" | "preserve_date" => Self::PreserveMtime(flag()?),
      _ => return Err(Error::conf(format!("unknown key {key}"))),
    })
  }
}

/// Parsed config / 解析后的配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConf {
  pub buf_size: usize,
  pub buf_count: usize,
  pub align: usize,
  pub direct_io: bool,
  pub preserve_mtime: bool,
}

impl Default for ParsedConf {
  fn default() -> Self {
    Self::parse(&[])
  }
}

impl ParsedConf {
  /// Apply `conf` over defaults / 在默认值上应用 `conf`
  ///
  /// Alignment is raised to a power of two and buffer size to a multiple of
  /// it, so every read after the first starts on an aligned offset.
  /// 对齐提升为 2 的幂，缓冲区大小提升为其倍数，使首次之后的读都从对齐偏移开始。
  pub fn parse(conf: &[Conf]) -> Self {
    let mut c = Self {
      buf_size: IN_BUF_SIZE,
      buf_count: IN_BUF_COUNT,
      align: IN_ALIGN,
      direct_io: true,
      preserve_mtime: false,
    };
    for item in conf {
      match *item {
        Conf::BufSize(v) => c.buf_size = v,
        Conf::BufCount(v) => c.buf_count = v,
        Conf::Align(v) => c.align = v,
        Conf::DirectIo(v) => c.direct_io = v,
        Conf::PreserveMtime(v) => c.preserve_mtime = v,
      }
    }
    c.align = c.align.max(1).next_power_of_two();
    c.buf_size = align_up(c.buf_size.max(1), c.align);
    c.buf_count = c.buf_count.max(1);
    c
  }
}
