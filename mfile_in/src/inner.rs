//! Reader state shared with the fill task
//! 与填充任务共享的读取器状态

use std::{
  cell::RefCell,
  io,
  mem,
  path::{Path, PathBuf},
  rc::Rc,
  task::Waker,
};

use compio::fs::File;
use log::{debug, error};
use mfile_alloc::{AlignedBuf, align_down};
use mfile_base::{Error, Track};

use crate::Ring;

/// Reader lifecycle / 读取器生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Open,
  /// Closed with a read outstanding, buffers freed when it completes
  /// 关闭时仍有读操作未完成，完成后释放缓冲区
  Closing,
  Closed,
}

/// Who to resume once data arrives / 数据到达后恢复谁
#[derive(Debug, Default)]
pub(crate) enum Wait {
  #[default]
  None,
  Track,
  Task(Waker),
}

pub(crate) struct Shared<T> {
  pub inner: RefCell<Inner>,
  pub track: T,
  pub path: PathBuf,
}

impl<T: Track> Shared<T> {
  pub fn wake(&self, wait: Wait) {
    match wait {
      Wait::None => {}
      Wait::Track => self.track.wake(),
      Wait::Task(w) => w.wake(),
    }
  }
}

pub(crate) struct Inner {
  pub file: Option<Rc<File>>,
  pub size: u64,
  pub ring: Ring,
  pub align: usize,
  /// File offset the next read continues from / 下次读取的文件偏移
  pub file_off: u64,
  /// Logical offset of the front slot's first unconsumed byte
  /// 首槽首个未消费字节的逻辑偏移
  pub app_off: u64,
  /// Hard seek waiting for the in-flight read / 等待进行中读操作的硬定位
  pub seek: Option<u64>,
  pub done: bool,
  pub stopped: bool,
  pub err: Option<Error>,
  pub wait: Wait,
  pub in_flight: bool,
  pub state: State,
  pub reads: u64,
}

impl Inner {
  /// Move to `pos`, within the buffered window without I/O
  /// 定位到 `pos`，在已缓冲窗口内则不产生 I/O
  pub fn seek_to(&mut self, pos: u64) {
    let start = self.file_off - self.ring.buffered();
    if pos >= start && pos < self.file_off {
      debug!("shifting {} bytes", pos - start);
      self.ring.rewind();
      self.ring.skip(pos - start);
      self.app_off = pos;
      return;
    }

    self.ring.reset();
    self.done = false;
    if self.in_flight {
      self.seek = Some(pos);
    } else {
      self.file_off = pos;
      self.app_off = pos;
    }
  }

  /// Take a buffer for the next read, `None` ends the fill task
  /// 为下次读取取缓冲区，返回 `None` 则填充任务结束
  pub fn next_read(&mut self) -> Option<(Rc<File>, AlignedBuf, u64)> {
    if self.state == State::Closing {
      self.finish_close();
      return None;
    }
    if let Some(pos) = self.seek.take() {
      self.file_off = pos;
      self.app_off = pos;
    }
    if self.state != State::Open || self.stopped || self.done || self.err.is_some() {
      self.in_flight = false;
      return None;
    }
    let (Some(file), Some(mut buf)) = (self.file.clone(), self.ring.take_free()) else {
      self.in_flight = false;
      return None;
    };
    buf.clear();
    self.reads += 1;
    Some((file, buf, align_down(self.file_off, self.align)))
  }

  /// Account a finished read at `pos`, return who to wake
  /// 处理在 `pos` 完成的读操作，返回需唤醒者
  pub fn complete(
    &mut self,
    path: &Path,
    buf: AlignedBuf,
    pos: u64,
    res: io::Result<usize>,
  ) -> Wait {
    if self.state != State::Open {
      drop(buf);
      self.finish_close();
      return Wait::None;
    }

    if let Some(seek) = self.seek.take() {
      self.file_off = seek;
      self.app_off = seek;
      self.ring.push_free(buf);
      return Wait::None;
    }

    match res {
      Err(e) => {
        error!("read {} at {pos}: {e}", path.display());
        self.err = Some(Error::Read {
          pos,
          err: (&e).into(),
        });
        self.ring.push_free(buf);
      }
      Ok(n) => {
        let pad = (self.file_off - pos) as usize;
        if n < buf.cap() {
          debug!("{}: reading's done", path.display());
          self.done = true;
        }
        if n > pad {
          debug!("read {} bytes at offset {}", n - pad, self.file_off);
          self.file_off = pos + n as u64;
          self.ring.push_filled_slot(buf, pad);
        } else {
          self.ring.push_free(buf);
        }
      }
    }
    mem::take(&mut self.wait)
  }

  pub fn finish_close(&mut self) {
    self.ring.release();
    self.file = None;
    self.wait = Wait::None;
    self.in_flight = false;
    self.state = State::Closed;
  }
}
