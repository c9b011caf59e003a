//! Background fill task / 后台填充任务

use std::rc::Rc;

use compio::{BufResult, io::AsyncReadAt};
use log::trace;
use mfile_base::Track;

use crate::inner::Shared;

/// Read until the ring is full, the file ends, or the reader stops
/// 读取直到缓冲环满、文件结束或读取器停止
pub(crate) async fn fill<T: Track>(sh: Rc<Shared<T>>) {
  loop {
    let Some((file, buf, pos)) = sh.inner.borrow_mut().next_read() else {
      return;
    };
    trace!("async read, offset:{pos:#x}");
    let BufResult(res, buf) = file.read_at(buf, pos).await;
    drop(file);
    let wait = sh.inner.borrow_mut().complete(&sh.path, buf, pos, res);
    sh.wake(wait);
  }
}
