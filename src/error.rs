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

use std::fmt;

/// Fatal conditions. Every variant aborts the run; skipped cells, unmapped
/// pins and dropped routing hops are never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    CantOpenFile(String),
    /// Malformed or structurally incomplete input document.
    Parse(String),
    UnknownDirection {
        cell: String,
        port: String,
        value: String,
    },
    /// A cell connection refers to a net bit that no `netnames` entry declares.
    MissingNetReference {
        cell: String,
        port: String,
        bit: u64,
    },
    DeviceLookup(String),
    /// Raised by the primitive library or the checkpoint writer.
    Emission(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CantOpenFile(msg) => write!(f, "can't open file: {}", msg),
            Self::Parse(msg) => write!(f, "parse error: {}", msg),
            Self::UnknownDirection { cell, port, value } => write!(
                f,
                "bad port direction \"{}\" on port {}.{}",
                value, cell, port
            ),
            Self::MissingNetReference { cell, port, bit } => write!(
                f,
                "port {}.{} refers to undeclared net bit {}",
                cell, port, bit
            ),
            Self::DeviceLookup(msg) => write!(f, "device lookup failed: {}", msg),
            Self::Emission(msg) => write!(f, "emission failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("{}", e))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(format!("{}", e))
    }
}
