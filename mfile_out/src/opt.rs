use std::time::{Duration, SystemTime, UNIX_EPOCH};

use mfile_base::{Track, key};

/// Per-file open options / 单个文件的打开选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Opt {
  /// Replace an existing file instead of failing / 覆盖已存在的文件而非报错
  pub overwrite: bool,
  /// Expected output size, preallocated once at open / 预期输出大小，打开时一次性预分配
  pub size: Option<u64>,
  /// Modification time set on close / 关闭时设置的修改时间
  pub mtime: Option<SystemTime>,
}

impl Opt {
  /// Mtime published by the reader in `output_time` (microseconds)
  /// 读取器在 `output_time` 中发布的修改时间（微秒）
  pub fn track_mtime<T: Track + ?Sized>(track: &T) -> Option<SystemTime> {
    let us = track.get(key::OUTPUT_TIME)?.parse::<u64>().ok()?;
    UNIX_EPOCH.checked_add(Duration::from_micros(us))
  }
}

/// Result of a write / 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Put {
  /// More data expected / 还需更多数据
  More,
  /// Last chunk flushed, file finalized / 最后一块已刷盘，文件已完成
  Done,
}

/// Writer counters / 写入器计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
  /// Writes absorbed by the accumulator / 被累积缓冲吸收的写入
  pub mem_write: u32,
  pub file_write: u32,
  pub prealloc: u32,
}
