#![cfg_attr(docsrs, feature(doc_cfg))]

//! mfile_in - Buffered async file reader
//! mfile_in - 异步缓冲文件读取器
//!
//! A ring of aligned buffers is kept full by a background read task while the
//! consumer takes one buffer at a time; seeks inside the buffered window cost
//! no disk I/O.
//! 后台读任务保持对齐缓冲环填满，消费者每次取一个缓冲区；
//! 在已缓冲窗口内定位不产生磁盘 I/O。

mod conf;
mod fill;
mod inner;
mod reader;
mod ring;

pub use conf::{Conf, ParsedConf};
pub use inner::State;
pub use mfile_base::{Error, MemTrack, NoTrack, Result, Track};
pub use reader::{Data, Got, Reader};
pub use ring::{Ring, Slot};
