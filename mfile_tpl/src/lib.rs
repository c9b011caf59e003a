#![cfg_attr(docsrs, feature(doc_cfg))]

//! mfile_tpl - Output filename templates
//! mfile_tpl - 输出文件名模板
//!
//! `$name` / `${name}` expand to a variable, `$$` is a literal `$`.
//! `$name` / `${name}` 展开为变量，`$$` 为字面量 `$`。

mod render;
mod sanitize;
mod var;

pub use render::{Val, render};
pub use sanitize::{sanitize, sanitize_into};
pub use var::{Vars, resolve};
