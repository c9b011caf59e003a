//! Buffer ring / 缓冲环
//!
//! Filled slots are kept in file order. A buffer lives in exactly one place:
//! the free list, a filled slot, the in-flight read, or the consumer.
//! 已填充槽按文件顺序排列。缓冲区只在一处：空闲表、已填充槽、进行中的读或消费者手中。

use std::collections::VecDeque;

use mfile_alloc::AlignedBuf;
use mfile_base::Result;

/// Filled buffer, `off` leading bytes already consumed or padding
/// 已填充缓冲区，前 `off` 字节已消费或为对齐填充
#[derive(Debug)]
pub struct Slot {
  pub buf: AlignedBuf,
  pub off: usize,
}

impl Slot {
  /// Unconsumed bytes / 未消费字节
  #[inline]
  pub fn data(&self) -> &[u8] {
    &self.buf[self.off..]
  }
}

#[derive(Debug, Default)]
pub struct Ring {
  filled: VecDeque<Slot>,
  free: Vec<AlignedBuf>,
}

impl Ring {
  /// Allocate `n` buffers of `size` aligned to `align`
  /// 分配 `n` 个按 `align` 对齐、大小为 `size` 的缓冲区
  pub fn new(n: usize, size: usize, align: usize) -> Result<Self> {
    let mut free = Vec::with_capacity(n);
    for _ in 0..n {
      free.push(AlignedBuf::with_cap(size, align)?);
    }
    Ok(Self {
      filled: VecDeque::with_capacity(n),
      free,
    })
  }

  /// No buffer left to read into / 无可读入的缓冲区
  #[inline]
  pub fn is_full(&self) -> bool {
    self.free.is_empty()
  }

  /// No filled slot / 无已填充槽
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.filled.is_empty()
  }

  /// Bytes held by filled slots, padding included
  /// 已填充槽持有的字节数，含对齐填充
  pub fn buffered(&self) -> u64 {
    self.filled.iter().map(|s| s.buf.len() as u64).sum()
  }

  #[inline]
  pub fn take_free(&mut self) -> Option<AlignedBuf> {
    self.free.pop()
  }

  #[inline]
  pub fn push_free(&mut self, mut buf: AlignedBuf) {
    buf.clear();
    self.free.push(buf);
  }

  /// Append a buffer just read, `pad` leading bytes skipped
  /// 追加刚读入的缓冲区，跳过前 `pad` 字节
  #[inline]
  pub fn push_filled_slot(&mut self, buf: AlignedBuf, pad: usize) {
    self.filled.push_back(Slot { buf, off: pad });
  }

  /// Recycle the front slot, return its unconsumed byte count
  /// 回收首个槽，返回其未消费字节数
  pub fn pop_filled_slot(&mut self) -> usize {
    match self.filled.pop_front() {
      Some(s) => {
        let n = s.buf.len() - s.off;
        self.push_free(s.buf);
        n
      }
      None => 0,
    }
  }

  /// Detach the front slot (lend it out) / 取出首个槽（借出）
  #[inline]
  pub fn take_front(&mut self) -> Option<Slot> {
    self.filled.pop_front()
  }

  /// Put a lent slot back in front / 将借出的槽放回首位
  #[inline]
  pub fn unshift(&mut self, slot: Slot) {
    self.filled.push_front(slot);
  }

  /// Mark every filled byte unconsumed / 将所有已填充字节标记为未消费
  pub fn rewind(&mut self) {
    for s in &mut self.filled {
      s.off = 0;
    }
  }

  /// Consume `n` bytes from the front, recycling exhausted slots
  /// 从头消费 `n` 字节，回收耗尽的槽
  pub fn skip(&mut self, mut n: u64) {
    while n != 0 {
      let Some(s) = self.filled.front_mut() else {
        return;
      };
      let left = (s.buf.len() - s.off) as u64;
      if n < left {
        s.off += n as usize;
        return;
      }
      n -= left;
      self.pop_filled_slot();
    }
  }

  /// Drop all filled data / 丢弃所有已填充数据
  pub fn reset(&mut self) {
    while let Some(s) = self.filled.pop_front() {
      self.push_free(s.buf);
    }
  }

  /// Free every buffer held / 释放持有的全部缓冲区
  pub fn release(&mut self) {
    self.filled = VecDeque::new();
    self.free = Vec::new();
  }
}
