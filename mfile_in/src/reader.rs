//! Buffered reader / 缓冲读取器

use std::{
  cell::RefCell,
  future::poll_fn,
  path::{Path, PathBuf},
  rc::Rc,
  task::Poll,
  time::UNIX_EPOCH,
};

use compio::runtime::{Runtime, spawn};
use log::{debug, error};
use mfile_base::{Error, NoTrack, Result, Track, key, os};

use crate::{
  ParsedConf, Ring, Slot, State,
  fill::fill,
  inner::{Inner, Shared, Wait},
};

/// Bytes handed to the consumer, `off` is their logical file offset
/// 交给消费者的数据，`off` 为其逻辑文件偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Data<'a> {
  pub data: &'a [u8],
  pub off: u64,
}

/// Result of [`Reader::get_data`] / [`Reader::get_data`] 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Got<'a> {
  Data(Data<'a>),
  /// Nothing buffered yet, the track is woken when data arrives
  /// 暂无数据，数据到达时唤醒轨道
  Suspend,
  Done,
}

enum Step {
  Ready(u64),
  Suspend,
  Done,
}

/// Buffered file reader / 缓冲文件读取器
///
/// The slice returned by [`get_data`](Self::get_data) stays valid until the
/// next call, which recycles its buffer.
/// [`get_data`](Self::get_data) 返回的切片在下次调用前有效，下次调用会回收其缓冲区。
pub struct Reader<T: Track + 'static = NoTrack> {
  sh: Rc<Shared<T>>,
  lent: Option<Slot>,
}

impl<T: Track + 'static> Reader<T> {
  /// Open `path` and start reading ahead / 打开 `path` 并开始预读
  pub async fn open(path: impl Into<PathBuf>, conf: &ParsedConf, track: T) -> Result<Self> {
    let path = path.into();
    if Runtime::try_with_current(|_| ()).is_err() {
      return Err(Error::Attach);
    }

    let file = os::open_read(&path, conf.direct_io).await.map_err(|e| {
      error!("open {}: {e}", path.display());
      Error::open(&path, &e)
    })?;
    let meta = file.metadata().await.map_err(|e| {
      error!("get file info {}: {e}", path.display());
      Error::open(&path, &e)
    })?;
    let size = meta.len();
    debug!("opened {} ({} kbytes)", path.display(), size / 1024);

    let ring = Ring::new(conf.buf_count, conf.buf_size, conf.align).inspect_err(|e| {
      error!("{}: {e}", path.display());
    })?;

    track.set(key::INPUT_SIZE, size.to_string());
    if conf.preserve_mtime
      && let Ok(t) = meta.modified()
      && let Ok(d) = t.duration_since(UNIX_EPOCH)
    {
      track.set(key::OUTPUT_TIME, d.as_micros().to_string());
    }

    let sh = Rc::new(Shared {
      inner: RefCell::new(Inner {
        file: Some(Rc::new(file)),
        size,
        ring,
        align: conf.align,
        file_off: 0,
        app_off: 0,
        seek: None,
        done: false,
        stopped: false,
        err: None,
        wait: Wait::None,
        in_flight: true,
        state: State::Open,
        reads: 0,
      }),
      track,
      path,
    });
    spawn(fill(sh.clone())).detach();
    Ok(Self { sh, lent: None })
  }

  /// Open the path stored in the track's `input` value
  /// 打开轨道 `input` 值中的路径
  pub async fn open_input(conf: &ParsedConf, track: T) -> Result<Self> {
    let Some(path) = track.get(key::INPUT) else {
      return Err(Error::path("no input"));
    };
    Self::open(path, conf, track).await
  }

  /// Next chunk, optionally seeking first / 取下一块数据，可先定位
  ///
  /// `Suspend` asks the caller to wait for [`Track::wake`] and call again.
  /// 返回 `Suspend` 时调用者应等待 [`Track::wake`] 后再次调用。
  pub fn get_data(&mut self, seek: Option<u64>) -> Result<Got<'_>> {
    Ok(match self.advance(seek, || Wait::Track)? {
      Step::Ready(off) => Got::Data(self.view(off)),
      Step::Suspend => Got::Suspend,
      Step::Done => Got::Done,
    })
  }

  /// Next chunk, awaiting the read instead of suspending; `None` at end
  /// 取下一块数据，等待读取而非挂起；结束时返回 `None`
  pub async fn next(&mut self, seek: Option<u64>) -> Result<Option<Data<'_>>> {
    let mut seek = seek;
    let step = poll_fn(|cx| match self.advance(seek.take(), || Wait::Task(cx.waker().clone())) {
      Ok(Step::Suspend) => Poll::Pending,
      r => Poll::Ready(r),
    })
    .await?;
    Ok(match step {
      Step::Ready(off) => Some(self.view(off)),
      _ => None,
    })
  }

  fn view(&self, off: u64) -> Data<'_> {
    Data {
      data: self.lent.as_ref().map_or(&[][..], Slot::data),
      off,
    }
  }

  fn advance(&mut self, seek: Option<u64>, wait: impl FnOnce() -> Wait) -> Result<Step> {
    let mut g = self.sh.inner.borrow_mut();
    if let Some(e) = &g.err {
      return Err(e.clone());
    }
    if g.stopped || g.state != State::Open {
      return Ok(Step::Done);
    }

    let had = match self.lent.take() {
      Some(slot) => {
        g.ring.unshift(slot);
        true
      }
      None => false,
    };

    if let Some(pos) = seek {
      if pos >= g.size {
        error!("too big seek position {pos}");
        if had {
          self.lent = g.ring.take_front();
        }
        return Err(Error::SeekOutOfRange { pos, size: g.size });
      }
      g.seek_to(pos);
    } else if had {
      let n = g.ring.pop_filled_slot();
      g.app_off += n as u64;
      if g.done && g.ring.is_empty() {
        return Ok(Step::Done);
      }
    }

    let kick = !g.in_flight && !g.done && !g.ring.is_full();
    if kick {
      g.in_flight = true;
    }

    let step = if g.ring.is_empty() {
      if g.done {
        Step::Done
      } else {
        g.wait = wait();
        Step::Suspend
      }
    } else {
      self.lent = g.ring.take_front();
      Step::Ready(g.app_off)
    };
    drop(g);

    if kick {
      spawn(fill(self.sh.clone())).detach();
    }
    if let Step::Ready(off) = step {
      self.sh.track.set(key::INPUT_OFF, off.to_string());
    }
    Ok(step)
  }

  /// Stop reading: later calls return `Done`, no more reads are issued
  /// 停止读取：之后的调用返回 `Done`，不再发起读操作
  pub fn stop(&mut self) {
    let mut g = self.sh.inner.borrow_mut();
    g.stopped = true;
    g.wait = Wait::None;
  }

  /// Close the file, freeing buffers now or once the pending read completes
  /// 关闭文件，立即释放缓冲区，或在未完成的读操作结束后释放
  pub fn close(&mut self) {
    self.lent = None;
    let mut g = self.sh.inner.borrow_mut();
    if g.state != State::Open {
      return;
    }
    if g.in_flight {
      g.state = State::Closing;
      g.file = None;
    } else {
      g.finish_close();
    }
  }

  pub fn path(&self) -> &Path {
    &self.sh.path
  }

  pub fn track(&self) -> &T {
    &self.sh.track
  }

  /// File size at open / 打开时的文件大小
  pub fn size(&self) -> u64 {
    self.sh.inner.borrow().size
  }

  /// Logical offset of the next unconsumed byte
  /// 下一个未消费字节的逻辑偏移
  pub fn offset(&self) -> u64 {
    let g = self.sh.inner.borrow();
    g.app_off + self.lent.as_ref().map_or(0, |s| s.data().len() as u64)
  }

  /// Bytes read ahead and not yet handed out / 已预读未交付的字节数
  pub fn buffered(&self) -> u64 {
    let g = self.sh.inner.borrow();
    g.ring.buffered()
  }

  /// End of file reached by the fill task / 填充任务已读到文件末尾
  pub fn is_done(&self) -> bool {
    self.sh.inner.borrow().done
  }

  /// Disk reads issued / 已发起的磁盘读次数
  pub fn reads(&self) -> u64 {
    self.sh.inner.borrow().reads
  }

  pub fn state(&self) -> State {
    self.sh.inner.borrow().state
  }
}

impl<T: Track + 'static> Drop for Reader<T> {
  fn drop(&mut self) {
    self.close();
  }
}
