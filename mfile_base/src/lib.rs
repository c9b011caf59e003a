#![cfg_attr(docsrs, feature(doc_cfg))]

//! mfile_base - Shared pieces of the media file reader/writer
//! mfile_base - 媒体文件读写的公共部分

pub mod consts {
  //! Build-time defaults, override with `MFILE_*` env vars
  //! 编译期默认值，可用 `MFILE_*` 环境变量覆盖
  include!(concat!(env!("OUT_DIR"), "/consts.rs"));
}

pub mod error;
pub mod key;
pub mod os;
pub mod size;
pub mod track;

pub use error::{Error, OsErr, Result};
pub use track::{MemTrack, NoTrack, Track};
