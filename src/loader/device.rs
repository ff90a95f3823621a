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

use std::path::{Path, PathBuf};

#[allow(unused)]
use crate::log::*;
use crate::device::{Device, DeviceFile};
use crate::error::{Error, Result};

pub const DEVICE_DIR_VAR: &'static str = "PNR2DCP_DEVICE_DIR";
pub const DEFAULT_DEVICE_DIR: &'static str = "devices";

/// Device database path used when none is given explicitly:
/// `$PNR2DCP_DEVICE_DIR/<part>.yaml`.
pub fn default_path(part: &str) -> PathBuf {
    let dir = std::env::var(DEVICE_DIR_VAR)
        .unwrap_or(DEFAULT_DEVICE_DIR.to_string());
    Path::new(&dir).join(format!("{}.yaml", part))
}

fn is_json(path: &Path) -> bool {
    /* Look past a trailing `.gz` */
    let path = if super::is_gzipped(path) {
        path.file_stem().map(Path::new).unwrap_or(path)
    } else {
        path
    };
    path.extension().map_or(false, |ext| ext == "json")
}

pub fn parse(text: &[u8], json: bool) -> Result<Device> {
    let file: DeviceFile = if json {
        serde_json::from_slice(text)?
    } else {
        serde_yaml::from_slice(text)?
    };
    Device::from_file(file)
}

pub fn load<P>(path: P) -> Result<Device> where P: AsRef<Path> {
    let path = path.as_ref();
    let buffer = super::open(path).map_err(|e| match e {
        Error::CantOpenFile(msg) => Error::DeviceLookup(msg),
        e => e,
    })?;
    let device = parse(&buffer, is_json(path))?;

    dbg_log!(
        DBG_INFO,
        "Loaded device {} with {} tiles from {}",
        device.part(),
        device.tile_count(),
        path.display()
    );

    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_device() {
        let text = b"
part: xc7a35tcsg324-1
tiles:
  - name: INT_L_X0Y0
    wire_count: 3000
  - name: CLBLL_L_X2Y0
    wire_count: 120
sites: [SLICE_X0Y0]
";
        let device = parse(text, false).unwrap();

        assert_eq!(device.part(), "xc7a35tcsg324-1");
        assert_eq!(device.tile("CLBLL_L_X2Y0").unwrap().wire_count(), 120);
        assert!(device.has_site("SLICE_X0Y0"));
        assert!(!device.has_site("SLICE_X1Y0"));
        assert!(device.has_primitive("LUT6"));
    }

    #[test]
    fn test_json_device() {
        let text = br#"{ "part": "xc7a35t", "tiles": [{ "name": "T", "wire_count": 4 }] }"#;
        let device = parse(text, true).unwrap();
        assert_eq!(device.tile("T").unwrap().wire_count(), 4);
    }

    #[test]
    fn test_bad_device() {
        assert!(matches!(parse(b"part: [", false), Err(Error::Parse(_))));
        assert!(matches!(parse(b"tiles: []", false), Err(Error::Parse(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert!(is_json(Path::new("dev/xc7a35t.json")));
        assert!(is_json(Path::new("dev/xc7a35t.json.gz")));
        assert!(!is_json(Path::new("dev/xc7a35t.yaml.gz")));
        assert!(!is_json(Path::new("dev/xc7a35t.yaml")));
    }

    #[test]
    fn test_missing_file() {
        let res = load("/nonexistent/pnr2dcp/device.yaml");
        assert!(matches!(res, Err(Error::DeviceLookup(_))));
    }
}
