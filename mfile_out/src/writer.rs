//! Buffered writer / 缓冲写入器

use std::{
  fs, io,
  path::{Path, PathBuf},
  time::SystemTime,
};

use compio::{
  BufResult,
  buf::IoBuf,
  fs::{File, OpenOptions},
  io::AsyncWriteAt,
};
use log::{debug, error, info};
use mfile_alloc::AlignedBuf;
use mfile_base::{Error, Result, Track, key, os};

use crate::{Opt, ParsedConf, Put, Stat};

async fn open_file(path: &Path, overwrite: bool) -> io::Result<File> {
  let mut o = OpenOptions::new();
  o.write(true);
  if overwrite {
    o.create(true).truncate(true);
  } else {
    o.create_new(true);
  }
  o.open(path).await
}

/// Buffered file writer / 缓冲文件写入器
///
/// Dropping without a last chunk counts as abort.
/// 未写入最后一块即丢弃视为中止。
pub struct Writer {
  file: Option<File>,
  path: PathBuf,
  buf: Option<AlignedBuf>,
  written: u64,
  preallocated: u64,
  prealloc_by: u64,
  grow: bool,
  delete_on_abort: bool,
  mtime: Option<SystemTime>,
  finalized: bool,
  stat: Stat,
}

impl Writer {
  /// Resolve `tpl` against `track` and create the file
  /// 按 `track` 展开 `tpl` 并创建文件
  ///
  /// The resolved name is stored back as the track's `output` value, the
  /// `output_time` value supplies the mtime when `opt` has none.
  /// 展开后的名字写回轨道 `output` 值；`opt` 未指定修改时间时取 `output_time`。
  pub async fn open<T: Track + ?Sized>(
    tpl: &str,
    track: &T,
    conf: &ParsedConf,
    mut opt: Opt,
  ) -> Result<Self> {
    let name = mfile_tpl::resolve(tpl, track).inspect_err(|e| error!("{tpl}: {e}"))?;
    track.set(key::OUTPUT, name.clone());
    if opt.mtime.is_none() {
      opt.mtime = Opt::track_mtime(track);
    }
    Self::create(name, conf, opt).await
  }

  /// Create the file at `path`, no template expansion
  /// 在 `path` 创建文件，不展开模板
  pub async fn create(path: impl Into<PathBuf>, conf: &ParsedConf, opt: Opt) -> Result<Self> {
    let path = path.into();
    // Plain buffered writes, the accumulator needs no alignment
    // 普通缓冲写，累积缓冲无需对齐
    let buf = AlignedBuf::with_cap(conf.buf_size, 1).inspect_err(|e| {
      error!("{}: {e}", path.display());
    })?;

    let file = match open_file(&path, opt.overwrite).await {
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        if let Some(dir) = path.parent()
          && !dir.as_os_str().is_empty()
          && let Err(e) = compio::fs::create_dir_all(dir).await
        {
          error!("make dir for {}: {e}", path.display());
          return Err(Error::open(&path, &e));
        }
        open_file(&path, opt.overwrite).await
      }
      r => r,
    }
    .map_err(|e| {
      error!("open {}: {e}", path.display());
      Error::open(&path, &e)
    })?;

    let mut stat = Stat::default();
    let mut preallocated = 0;
    if let Some(size) = opt.size {
      match os::truncate(&file, size) {
        Ok(()) => {
          preallocated = size;
          stat.prealloc += 1;
        }
        Err(e) => debug!("{}: preallocate {size}: {e}", path.display()),
      }
    }

    Ok(Self {
      file: Some(file),
      path,
      buf: Some(buf),
      written: 0,
      preallocated,
      prealloc_by: conf.prealloc,
      grow: conf.prealloc_grow,
      delete_on_abort: conf.delete_on_abort,
      mtime: opt.mtime,
      finalized: false,
      stat,
    })
  }

  /// Append `data`; with `last` flush everything and finalize
  /// 追加 `data`；`last` 为真时全部刷盘并完成
  pub async fn write(&mut self, mut data: &[u8], last: bool) -> Result<Put> {
    loop {
      let Some(buf) = self.buf.as_mut() else {
        return Err(closed(self.written));
      };
      let n = buf.fill_from(data);
      data = &data[n..];
      if !buf.is_full() {
        self.stat.mem_write += 1;
        break;
      }
      self.flush().await?;
    }

    if !last {
      return Ok(Put::More);
    }
    self.flush().await?;
    self.finalized = true;
    Ok(Put::Done)
  }

  /// Write `data` at `pos` bypassing the accumulator, later appends go on at
  /// the end of the file
  /// 绕过累积缓冲在 `pos` 写入 `data`，之后的追加从文件末尾继续
  pub async fn write_at(&mut self, pos: u64, data: &[u8]) -> Result<()> {
    self.flush().await?;
    let Some(file) = self.file.as_mut() else {
      return Err(closed(pos));
    };
    let len = data.len() as u64;
    let BufResult(res, _) = file.write_at(data.to_vec(), pos).await;
    check(&self.path, pos, len, res)?;
    self.stat.file_write += 1;
    debug!("written {len} bytes at offset {pos}");
    self.written = self.written.max(pos + len);
    Ok(())
  }

  /// Write the accumulator to disk / 累积缓冲刷盘
  pub async fn flush(&mut self) -> Result<()> {
    let Some(buf) = self.buf.take() else {
      return Ok(());
    };
    if buf.is_empty() {
      self.buf = Some(buf);
      return Ok(());
    }
    let (res, mut buf) = self.write_data(buf).await;
    buf.clear();
    self.buf = Some(buf);
    res
  }

  async fn write_data<B: IoBuf>(&mut self, buf: B) -> (Result<()>, B) {
    let pos = self.written;
    let len = buf.buf_len() as u64;
    self.prealloc(pos + len);

    let Some(file) = self.file.as_mut() else {
      return (Err(closed(pos)), buf);
    };
    let BufResult(res, buf) = file.write_at(buf, pos).await;
    if let Err(e) = check(&self.path, pos, len, res) {
      return (Err(e), buf);
    }
    self.stat.file_write += 1;
    debug!("written {len} bytes at offset {pos}");
    self.written += len;
    (Ok(()), buf)
  }

  /// Extend the file ahead of `end`, failure only skips the step
  /// 预先将文件扩展到 `end` 之后，失败仅跳过本次
  fn prealloc(&mut self, end: u64) {
    if self.prealloc_by == 0 || end <= self.preallocated {
      return;
    }
    let Some(file) = self.file.as_ref() else {
      return;
    };
    let n = end.div_ceil(self.prealloc_by) * self.prealloc_by;
    match os::truncate(file, n) {
      Ok(()) => {
        if self.grow {
          self.prealloc_by = self.prealloc_by.saturating_mul(2);
        }
        self.preallocated = n;
        self.stat.prealloc += 1;
      }
      Err(e) => debug!("{}: preallocate {n}: {e}", self.path.display()),
    }
  }

  /// Cut to written size, then delete (aborted) or keep the file
  /// 截断到已写大小，然后删除（中止时）或保留文件
  pub fn close(&mut self) {
    let Some(file) = self.file.take() else {
      return;
    };
    self.buf = None;

    if let Err(e) = os::truncate(&file, self.written) {
      error!("truncate {}: {e}", self.path.display());
    }

    if !self.finalized && self.delete_on_abort {
      drop(file);
      match fs::remove_file(&self.path) {
        Ok(()) => debug!("removed file {}", self.path.display()),
        Err(e) => error!("remove {}: {e}", self.path.display()),
      }
    } else {
      if let Some(t) = self.mtime
        && let Err(e) = os::set_mtime(&file, t)
      {
        error!("set mtime {}: {e}", self.path.display());
      }
      drop(file);
      info!(
        "saved file {}, {} kbytes",
        self.path.display(),
        self.written / 1024
      );
    }

    let s = &self.stat;
    debug!(
      "mem write#:{}  file write#:{}  prealloc#:{}",
      s.mem_write, s.file_write, s.prealloc
    );
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Bytes on disk, the logical file size / 已落盘字节数，即逻辑文件大小
  pub fn written(&self) -> u64 {
    self.written
  }

  /// Bytes waiting in the accumulator / 累积缓冲中待写字节数
  pub fn pending(&self) -> usize {
    self.buf.as_ref().map_or(0, AlignedBuf::len)
  }

  pub fn preallocated(&self) -> u64 {
    self.preallocated
  }

  /// Next preallocation step / 下次预分配步长
  pub fn prealloc_by(&self) -> u64 {
    self.prealloc_by
  }

  pub fn is_finalized(&self) -> bool {
    self.finalized
  }

  pub fn stat(&self) -> Stat {
    self.stat
  }
}

impl Drop for Writer {
  fn drop(&mut self) {
    self.close();
  }
}

fn closed(pos: u64) -> Error {
  Error::Write {
    pos,
    err: io::ErrorKind::BrokenPipe.into(),
  }
}

fn check(path: &Path, pos: u64, len: u64, res: io::Result<usize>) -> Result<()> {
  match res {
    Ok(n) if n as u64 == len => Ok(()),
    Ok(n) => {
      error!("write {}: {n} of {len} bytes at {pos}", path.display());
      Err(Error::Write {
        pos,
        err: io::ErrorKind::WriteZero.into(),
      })
    }
    Err(e) => {
      error!("write {} at {pos}: {e}", path.display());
      Err(Error::Write {
        pos,
        err: (&e).into(),
      })
    }
  }
}
