#![cfg_attr(docsrs, feature(doc_cfg))]

//! mfile - Async buffered file input/output for media pipelines
//! mfile - 媒体管线的异步缓冲文件输入输出

mod pipe;

pub use mfile_alloc::{self as alloc, AlignedBuf};
pub use mfile_base::{Error, MemTrack, NoTrack, OsErr, Result, Track, key};
pub use mfile_in::{self as input, Reader};
pub use mfile_out::{self as output, Opt, Put, Writer};
pub use mfile_tpl as tpl;
pub use pipe::{copy, pipe};
