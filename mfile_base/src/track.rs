//! Track control handle
//! 轨道控制句柄
//!
//! The host pipeline owns tracks; reader and writer only wake a suspended
//! stage and read/write string values through this trait.
//! 宿主管线拥有轨道；读写器只通过此 trait 唤醒挂起的阶段并读写字符串值。

use std::{
  cell::{Cell, RefCell},
  collections::HashMap,
  rc::Rc,
};

/// Track control handle / 轨道控制句柄
pub trait Track {
  /// Resume a suspended pipeline stage / 恢复挂起的管线阶段
  fn wake(&self) {}

  /// Track value / 轨道值
  fn get(&self, _key: &str) -> Option<String> {
    None
  }

  /// Set track value / 设置轨道值
  fn set(&self, _key: &str, _val: String) {}

  /// Metadata value (tags of the media being processed) / 元数据值
  fn meta(&self, _key: &str) -> Option<String> {
    None
  }
}

/// No-op handle / 空句柄
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrack;

impl Track for NoTrack {}

impl<T: Track + ?Sized> Track for Rc<T> {
  #[inline]
  fn wake(&self) {
    (**self).wake()
  }

  #[inline]
  fn get(&self, key: &str) -> Option<String> {
    (**self).get(key)
  }

  #[inline]
  fn set(&self, key: &str, val: String) {
    (**self).set(key, val)
  }

  #[inline]
  fn meta(&self, key: &str) -> Option<String> {
    (**self).meta(key)
  }
}

impl<T: Track + ?Sized> Track for &T {
  #[inline]
  fn wake(&self) {
    (**self).wake()
  }

  #[inline]
  fn get(&self, key: &str) -> Option<String> {
    (**self).get(key)
  }

  #[inline]
  fn set(&self, key: &str, val: String) {
    (**self).set(key, val)
  }

  #[inline]
  fn meta(&self, key: &str) -> Option<String> {
    (**self).meta(key)
  }
}

/// In-memory track: value and metadata maps plus a wake counter
/// 内存轨道：值表、元数据表与唤醒计数
#[derive(Debug, Default)]
pub struct MemTrack {
  val: RefCell<HashMap<String, String>>,
  meta: RefCell<HashMap<String, String>>,
  wakes: Cell<usize>,
}

impl MemTrack {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_val(self, key: impl Into<String>, val: impl Into<String>) -> Self {
    self.val.borrow_mut().insert(key.into(), val.into());
    self
  }

  pub fn with_meta(self, key: impl Into<String>, val: impl Into<String>) -> Self {
    self.meta.borrow_mut().insert(key.into(), val.into());
    self
  }

  /// Times `wake` was called / `wake` 被调用次数
  pub fn wakes(&self) -> usize {
    self.wakes.get()
  }
}

impl Track for MemTrack {
  fn wake(&self) {
    self.wakes.set(self.wakes.get() + 1);
  }

  fn get(&self, key: &str) -> Option<String> {
    self.val.borrow().get(key).cloned()
  }

  fn set(&self, key: &str, val: String) {
    self.val.borrow_mut().insert(key.into(), val);
  }

  fn meta(&self, key: &str) -> Option<String> {
    self.meta.borrow().get(key).cloned()
  }
}
