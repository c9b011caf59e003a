#![cfg_attr(docsrs, feature(doc_cfg))]

//! Aligned owning buffers for direct I/O
//! 直接 I/O 的对齐缓冲区（拥有所有权）
//!
//! The alignment is chosen per buffer at runtime, so one process can serve
//! devices with different sector sizes.
//! 对齐在运行时按缓冲区指定，同一进程可服务不同扇区大小的设备。

mod error;

use std::{
  alloc::{Layout, alloc, dealloc},
  fmt::{Debug, Formatter, Result as FmtResult},
  ops::Deref,
  ptr::{NonNull, copy_nonoverlapping},
  slice::from_raw_parts,
};

use Error::AllocFailed;
use compio_buf::{IoBuf, IoBufMut, SetBufInit};
pub use error::{Error, Result};

/// Round `n` down to a multiple of `align` (power of 2)
/// 向下对齐到 `align`（2 的幂）
#[inline(always)]
pub const fn align_down(n: u64, align: usize) -> u64 {
  n & !(align as u64 - 1)
}

/// Round `n` up to a multiple of `align` (power of 2)
/// 向上对齐到 `align`（2 的幂）
#[inline(always)]
pub const fn align_up(n: usize, align: usize) -> usize {
  (n + align - 1) & !(align - 1)
}

/// Aligned buffer for direct I/O (owns memory)
/// 拥有所有权的对齐缓冲区，Drop 时释放内存
pub struct AlignedBuf {
  ptr: NonNull<u8>,
  len: usize,
  cap: usize,
  align: usize,
}

unsafe impl Send for AlignedBuf {}
unsafe impl Sync for AlignedBuf {}

impl AlignedBuf {
  /// Create with capacity (uninitialized memory), capacity rounded up to `align`
  /// 创建指定容量（未初始化内存），容量向上对齐到 `align`
  #[inline]
  pub fn with_cap(cap: usize, align: usize) -> Result<Self> {
    let (lo, cap) = layout(cap, align)?;
    let ptr = unsafe { alloc(lo) };
    let ptr = NonNull::new(ptr).ok_or(AllocFailed(cap))?;
    Ok(Self {
      ptr,
      len: 0,
      cap,
      align: lo.align(),
    })
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline(always)]
  pub fn cap(&self) -> usize {
    self.cap
  }

  #[inline(always)]
  pub fn align(&self) -> usize {
    self.align
  }

  /// Free space left / 剩余空间
  #[inline(always)]
  pub fn remain(&self) -> usize {
    self.cap - self.len
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline(always)]
  pub fn is_full(&self) -> bool {
    self.len == self.cap
  }

  #[inline(always)]
  pub fn as_ptr(&self) -> *const u8 {
    self.ptr.as_ptr()
  }

  #[inline(always)]
  pub fn clear(&mut self) {
    self.len = 0;
  }

  /// Append as much of `data` as fits, return bytes taken
  /// 尽量追加 `data`，返回已取字节数
  #[inline]
  pub fn fill_from(&mut self, data: &[u8]) -> usize {
    let n = data.len().min(self.remain());
    unsafe { copy_nonoverlapping(data.as_ptr(), self.ptr.as_ptr().add(self.len), n) };
    self.len += n;
    n
  }
}

/// Layout with capacity rounded up to alignment, never zero-sized
/// 容量向上对齐的布局，且不为零
#[inline(always)]
fn layout(size: usize, align: usize) -> Result<(Layout, usize)> {
  let lo = Layout::from_size_align(size.max(1), align)?.pad_to_align();
  Ok((lo, lo.size()))
}

impl Drop for AlignedBuf {
  fn drop(&mut self) {
    // cap/align were validated by Layout::from_size_align at construction
    unsafe {
      dealloc(
        self.ptr.as_ptr(),
        Layout::from_size_align_unchecked(self.cap, self.align),
      )
    }
  }
}

impl Deref for AlignedBuf {
  type Target = [u8];

  #[inline]
  fn deref(&self) -> &[u8] {
    unsafe { from_raw_parts(self.ptr.as_ptr(), self.len) }
  }
}

impl Debug for AlignedBuf {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("AlignedBuf")
      .field("len", &self.len)
      .field("cap", &self.cap)
      .field("align", &self.align)
      .finish()
  }
}

// --- Compio Traits ---

unsafe impl IoBuf for AlignedBuf {
  #[inline(always)]
  fn as_buf_ptr(&self) -> *const u8 {
    self.ptr.as_ptr()
  }

  #[inline(always)]
  fn buf_len(&self) -> usize {
    self.len
  }

  #[inline(always)]
  fn buf_capacity(&self) -> usize {
    self.cap
  }
}

unsafe impl IoBufMut for AlignedBuf {
  #[inline(always)]
  fn as_buf_mut_ptr(&mut self) -> *mut u8 {
    self.ptr.as_ptr()
  }
}

impl SetBufInit for AlignedBuf {
  #[inline(always)]
  unsafe fn set_buf_init(&mut self, len: usize) {
    self.len = len;
  }
}
