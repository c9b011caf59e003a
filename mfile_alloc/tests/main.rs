use aok::{OK, Void};
use compio_buf::{IoBuf, SetBufInit};
use mfile_alloc::{AlignedBuf, Error, align_down, align_up};

const SECTOR: usize = 4096;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_with_cap() -> Void {
  let buf = AlignedBuf::with_cap(1024, SECTOR)?;
  assert_eq!(buf.len(), 0);
  assert_eq!(buf.cap(), SECTOR);
  assert!(buf.is_empty());
  assert_eq!(buf.as_ptr() as usize % SECTOR, 0);
  OK
}

#[test]
fn test_custom_align() -> Void {
  for align in [512usize, 4096, 16384] {
    let buf = AlignedBuf::with_cap(align * 3 + 1, align)?;
    assert_eq!(buf.align(), align);
    assert_eq!(buf.cap(), align * 4);
    assert_eq!(buf.as_ptr() as usize % align, 0);
  }
  OK
}

#[test]
fn test_bad_align() {
  let r = AlignedBuf::with_cap(4096, 3000);
  assert!(matches!(r, Err(Error::InvalidLayout(_))));
}

#[test]
fn test_fill_from() -> Void {
  let mut buf = AlignedBuf::with_cap(8, 8)?;
  assert_eq!(buf.fill_from(b"hello"), 5);
  assert_eq!(buf.remain(), 3);
  // Only 3 bytes fit
  // 只能放下 3 字节
  assert_eq!(buf.fill_from(b"world"), 3);
  assert!(buf.is_full());
  assert_eq!(&buf[..], b"hellowor");
  assert_eq!(buf.fill_from(b"x"), 0);

  buf.clear();
  assert!(buf.is_empty());
  assert_eq!(buf.fill_from(b"x"), 1);
  assert_eq!(&buf[..], b"x");
  OK
}

#[test]
fn test_io_buf_init() -> Void {
  let mut buf = AlignedBuf::with_cap(512, 512)?;
  buf.fill_from(b"abc");
  assert_eq!(buf.buf_len(), 3);
  assert_eq!(buf.buf_capacity(), 512);
  // A completed read reports its length back through set_buf_init
  // 读完成后通过 set_buf_init 回报长度
  unsafe { buf.set_buf_init(200) };
  assert_eq!(buf.len(), 200);
  assert_eq!(&buf[..3], b"abc");
  OK
}

#[test]
fn test_zero_cap() -> Void {
  let buf = AlignedBuf::with_cap(0, 512)?;
  assert_eq!(buf.cap(), 512);
  assert!(!buf.is_full());
  OK
}

#[test]
fn test_align_math() {
  assert_eq!(align_down(10000, 4096), 8192);
  assert_eq!(align_down(8192, 4096), 8192);
  assert_eq!(align_down(5, 1), 5);
  assert_eq!(align_up(1, 512), 512);
  assert_eq!(align_up(1024, 512), 1024);
}
