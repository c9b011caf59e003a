use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};

const KB: usize = 1024;

/// Env var, default. Generated constant drops the `MFILE_` prefix.
const DEFAULTS: &[(&str, usize)] = &[
  ("MFILE_IN_BUF_SIZE", 64 * KB),
  ("MFILE_IN_BUF_COUNT", 2),
  ("MFILE_IN_ALIGN", 4096),
  ("MFILE_OUT_BUF_SIZE", 64 * KB),
  ("MFILE_OUT_PREALLOC", 1024 * KB),
];

fn value(key: &str, default: usize) -> Result<usize> {
  println!("cargo:rerun-if-env-changed={key}");
  match env::var(key) {
    Ok(v) => v
      .trim()
      .parse()
      .with_context(|| format!("{key} must be a number, got {v:?}")),
    Err(_) => Ok(default),
  }
}

fn main() -> Result<()> {
  let mut out = String::new();
  for &(key, default) in DEFAULTS {
    let name = key.trim_start_matches("MFILE_");
    out += &format!("pub const {name}: usize = {};\n", value(key, default)?);
  }

  let dest = PathBuf::from(env::var_os("OUT_DIR").context("OUT_DIR unset")?).join("consts.rs");
  if fs::read_to_string(&dest).is_ok_and(|cur| cur == out) {
    return Ok(());
  }
  fs::write(&dest, out).with_context(|| format!("write {}", dest.display()))
}
