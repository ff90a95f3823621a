/* Copyright (C) 2022 Antmicro
 * 
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * 
 *     https://www.apache.org/licenses/LICENSE-2.0
 * 
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Deref;
use std::path::Path;
use memmap2::Mmap;
use flate2::read::GzDecoder;

use crate::error::{Error, Result};

pub mod device;
pub mod netlist;

/// Contents of an input file, either mapped in place or decompressed into memory.
pub enum InputBuffer {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for InputBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(m) => &m[..],
            Self::Owned(v) => &v[..],
        }
    }
}

pub fn is_gzipped<P>(path: P) -> bool where P: AsRef<Path> {
    path.as_ref().extension().map_or(false, |ext| ext == "gz")
}

pub fn open<P>(path: P) -> Result<InputBuffer> where P: AsRef<Path> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::CantOpenFile(format!("{}: {}", path.display(), e)))?;

    if is_gzipped(path) {
        let mut data = Vec::new();
        BufReader::new(GzDecoder::new(file)).read_to_end(&mut data)
            .map_err(|e| Error::CantOpenFile(
                format!("{}: gzip decompression failed, {}", path.display(), e)
            ))?;
        return Ok(InputBuffer::Owned(data));
    }

    let len = file.metadata()
        .map_err(|e| Error::CantOpenFile(format!("{}: {}", path.display(), e)))?
        .len();
    /* Zero-length mappings are rejected on some platforms */
    if len == 0 {
        return Ok(InputBuffer::Owned(Vec::new()));
    }

    /* UNSAFE DUE TO A POTENTIAL UB WHEN A FILE IS CHANGED! */
    let mmapped = unsafe { Mmap::map(&file) }
        .map_err(|e| Error::CantOpenFile(format!("{}: mmap failed, {}", path.display(), e)))?;

    Ok(InputBuffer::Mapped(mmapped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    const TEXT: &[u8] = br#"{ "modules": { "top": { "netnames": {}, "cells": {} } } }"#;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pnr2dcp-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_plain_and_gzipped_inputs() {
        let plain = scratch_path("top.json");
        std::fs::write(&plain, TEXT).unwrap();

        let packed = scratch_path("top.json.gz");
        let mut encoder = GzEncoder::new(File::create(&packed).unwrap(), Compression::default());
        encoder.write_all(TEXT).unwrap();
        encoder.finish().unwrap();

        assert_eq!(&open(&plain).unwrap()[..], TEXT);
        assert_eq!(&open(&packed).unwrap()[..], TEXT);
        assert_eq!(netlist::load(&packed, None).unwrap().name, "top");

        std::fs::remove_file(plain).unwrap();
        std::fs::remove_file(packed).unwrap();
    }

    #[test]
    fn test_empty_file() {
        let path = scratch_path("empty.json");
        std::fs::write(&path, b"").unwrap();

        assert!(open(&path).unwrap().is_empty());
        assert!(matches!(netlist::load(&path, None), Err(Error::Parse(_))));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(open("/nonexistent/pnr2dcp.json"), Err(Error::CantOpenFile(_))));
    }
}
