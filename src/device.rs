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

use std::collections::{HashMap, HashSet};
use serde::Deserialize;
use crate::error::{Error, Result};

/// On-disk layout of a device database (YAML or JSON).
#[derive(Deserialize, Debug)]
pub struct DeviceFile {
    pub part: String,
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub primitives: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    name: String,
    wire_count: u32,
}

/// A programmable interconnect point inside one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pip<'d> {
    pub tile: &'d Tile,
    pub src_wire: u32,
    pub dst_wire: u32,
}

impl Tile {
    pub fn new<S>(name: S, wire_count: u32) -> Self where S: ToString {
        Self { name: name.to_string(), wire_count }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_count(&self) -> u32 {
        self.wire_count
    }

    /// Returns `None` if either wire index falls outside the tile.
    pub fn pip<'d>(&'d self, src_wire: u32, dst_wire: u32) -> Option<Pip<'d>> {
        (src_wire < self.wire_count && dst_wire < self.wire_count)
            .then(|| Pip { tile: self, src_wire, dst_wire })
    }
}

pub struct Device {
    part: String,
    tiles: Vec<Tile>,
    tile_ids: HashMap<String, usize>,
    sites: HashSet<String>,
    primitives: HashSet<String>,
}

impl Device {
    pub fn new<S>(part: S, tiles: Vec<Tile>) -> Result<Self> where S: ToString {
        Self::from_file(DeviceFile {
            part: part.to_string(),
            tiles,
            sites: Vec::new(),
            primitives: Vec::new(),
        })
    }

    pub fn from_file(file: DeviceFile) -> Result<Self> {
        let mut tile_ids = HashMap::with_capacity(file.tiles.len());
        for (idx, tile) in file.tiles.iter().enumerate() {
            if tile_ids.insert(tile.name.clone(), idx).is_some() {
                return Err(Error::Parse(
                    format!("tile {} is declared more than once", tile.name)
                ));
            }
        }

        Ok(Self {
            part: file.part,
            tiles: file.tiles,
            tile_ids,
            sites: file.sites.into_iter().collect(),
            primitives: file.primitives.into_iter().collect(),
        })
    }

    pub fn with_sites<I, S>(mut self, sites: I) -> Self where
        I: IntoIterator<Item = S>,
        S: ToString
    {
        self.sites.extend(sites.into_iter().map(|s| s.to_string()));
        self
    }

    pub fn with_primitives<I, S>(mut self, primitives: I) -> Self where
        I: IntoIterator<Item = S>,
        S: ToString
    {
        self.primitives.extend(primitives.into_iter().map(|s| s.to_string()));
        self
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn check_part(&self, part: &str) -> Result<()> {
        if self.part != part {
            return Err(Error::DeviceLookup(format!(
                "device database describes part {}, but {} was requested",
                self.part, part
            )));
        }
        Ok(())
    }

    pub fn tile(&self, name: &str) -> Result<&Tile> {
        self.tile_ids.get(name)
            .map(|idx| &self.tiles[*idx])
            .ok_or_else(|| Error::DeviceLookup(format!("no tile named {}", name)))
    }

    /* An empty site list means the database does not constrain placement. */
    pub fn has_site(&self, site: &str) -> bool {
        self.sites.is_empty() || self.sites.contains(site)
    }

    pub fn has_primitive(&self, prim: &str) -> bool {
        self.primitives.is_empty() || self.primitives.contains(prim)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}
