//! Windows specific implementations

use std::{
  fs,
  io,
  mem::ManuallyDrop,
  os::windows::io::{AsRawHandle, FromRawHandle},
  path::Path,
  time::SystemTime,
};

use compio::fs::{File, OpenOptions};
use log::debug;
use windows_sys::Win32::{
  Foundation::ERROR_INVALID_PARAMETER, Storage::FileSystem::FILE_FLAG_NO_BUFFERING,
};

/// Open for read, unbuffered if asked
/// 只读打开，按需无缓冲
pub async fn open_read(path: &Path, direct: bool) -> io::Result<File> {
  if direct {
    match OpenOptions::new()
      .read(true)
      .custom_flags(FILE_FLAG_NO_BUFFERING)
      .open(path)
      .await
    {
      Err(e) if e.raw_os_error() == Some(ERROR_INVALID_PARAMETER as i32) => {
        debug!("{}: no direct I/O, fall back to buffered", path.display());
      }
      r => return r,
    }
  }
  OpenOptions::new().read(true).open(path).await
}

/// Borrow the handle as a std file without taking ownership
/// 以 std 文件借用句柄，不获取所有权
fn with_std<R>(file: &File, f: impl FnOnce(&fs::File) -> io::Result<R>) -> io::Result<R> {
  let std = ManuallyDrop::new(unsafe { fs::File::from_raw_handle(file.as_raw_handle()) });
  f(&std)
}

/// Set file length / 设置文件长度
pub fn truncate(file: &File, len: u64) -> io::Result<()> {
  with_std(file, |f| f.set_len(len))
}

/// Set modification time / 设置修改时间
pub fn set_mtime(file: &File, t: SystemTime) -> io::Result<()> {
  with_std(file, |f| f.set_modified(t))
}
