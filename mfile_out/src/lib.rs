#![cfg_attr(docsrs, feature(doc_cfg))]

//! mfile_out - Buffered file writer
//! mfile_out - 缓冲文件写入器
//!
//! Output is gathered in one buffer and flushed in full chunks. The file is
//! extended ahead of the data in geometrically growing steps and cut to the
//! exact size on close.
//! 输出先汇集到一个缓冲区，按整块刷盘。文件按几何增长的步长预先扩展，关闭时截断到准确大小。

mod conf;
mod opt;
mod writer;

pub use conf::{Conf, ParsedConf};
pub use mfile_base::{Error, MemTrack, NoTrack, Result, Track};
pub use opt::{Opt, Put, Stat};
pub use writer::Writer;
