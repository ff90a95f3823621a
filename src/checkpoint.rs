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
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;

#[allow(unused)]
use crate::log::*;
use crate::device::Device;
use crate::emitter::TargetDesign;
use crate::error::{Error, Result};
use crate::routing::RoutingHop;

pub struct WriteOpts {
    pub raw: bool,
    pub compression_level: u32,
}

impl Default for WriteOpts {
    fn default() -> Self {
        Self {
            raw: false,
            compression_level: 6,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PlacedCell {
    pub name: String,
    pub prim: String,
    pub site: String,
    pub bel: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PinRef {
    pub cell: String,
    pub pin: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckpointNet {
    pub name: String,
    pub pins: Vec<PinRef>,
    pub pips: Vec<RoutingHop>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CellIdx(usize);

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct NetIdx(usize);

/// Placed and routed design, validated against the device as it is built.
#[derive(Serialize)]
pub struct Checkpoint<'d> {
    name: String,
    part: String,
    cells: Vec<PlacedCell>,
    nets: Vec<CheckpointNet>,
    #[serde(skip)]
    device: &'d Device,
    #[serde(skip)]
    cell_names: HashMap<String, CellIdx>,
    #[serde(skip)]
    occupied_bels: HashSet<String>,
    #[serde(skip)]
    net_names: HashSet<String>,
    #[serde(skip)]
    opts: WriteOpts,
}

impl<'d> Checkpoint<'d> {
    pub fn new<S>(name: S, device: &'d Device, opts: WriteOpts) -> Self where S: ToString {
        Self {
            name: name.to_string(),
            part: device.part().to_string(),
            cells: Vec::new(),
            nets: Vec::new(),
            device,
            cell_names: HashMap::new(),
            occupied_bels: HashSet::new(),
            net_names: HashSet::new(),
            opts,
        }
    }

    pub fn cells(&self) -> &[PlacedCell] {
        &self.cells
    }

    pub fn nets(&self) -> &[CheckpointNet] {
        &self.nets
    }

    pub fn cell_by_name(&self, name: &str) -> Option<&PlacedCell> {
        self.cell_names.get(name).map(|idx| &self.cells[idx.0])
    }

    pub fn net_by_name(&self, name: &str) -> Option<&CheckpointNet> {
        self.nets.iter().find(|net| net.name == name)
    }

    fn write_to<W>(&self, writer: W) -> std::io::Result<()> where W: Write {
        if self.opts.raw {
            let mut writer = BufWriter::new(writer);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()
        } else {
            let mut encoder = GzEncoder::new(
                BufWriter::new(writer),
                Compression::new(self.opts.compression_level)
            );
            serde_json::to_writer(&mut encoder, self)?;
            encoder.finish()?.flush()
        }
    }
}

impl<'d> TargetDesign for Checkpoint<'d> {
    type CellHandle = CellIdx;
    type NetHandle = NetIdx;

    fn create_and_place_cell(&mut self, name: &str, prim: &str, bel: &str)
        -> Result<CellIdx>
    {
        if !self.device.has_primitive(prim) {
            return Err(Error::Emission(
                format!("cell {}: {} is not a primitive of {}", name, prim, self.part)
            ));
        }
        let (site, bel_name) = bel.split_once('/')
            .filter(|(site, bel)| !site.is_empty() && !bel.is_empty())
            .ok_or_else(|| Error::Emission(
                format!("cell {} has no valid placement (\"{}\")", name, bel)
            ))?;
        if !self.device.has_site(site) {
            return Err(Error::Emission(
                format!("cell {}: no site {} in {}", name, site, self.part)
            ));
        }
        if self.cell_names.contains_key(name) {
            return Err(Error::Emission(format!("cell {} created twice", name)));
        }
        if !self.occupied_bels.insert(bel.to_string()) {
            return Err(Error::Emission(
                format!("cell {}: BEL {} is already occupied", name, bel)
            ));
        }

        let idx = CellIdx(self.cells.len());
        self.cell_names.insert(name.to_string(), idx);
        self.cells.push(PlacedCell {
            name: name.to_string(),
            prim: prim.to_string(),
            site: site.to_string(),
            bel: bel_name.to_string(),
        });

        Ok(idx)
    }

    fn create_net(&mut self, name: &str) -> Result<NetIdx> {
        if !self.net_names.insert(name.to_string()) {
            return Err(Error::Emission(format!("net {} created twice", name)));
        }

        let idx = NetIdx(self.nets.len());
        self.nets.push(CheckpointNet {
            name: name.to_string(),
            pins: Vec::new(),
            pips: Vec::new(),
        });

        Ok(idx)
    }

    fn connect(&mut self, net: NetIdx, cell: CellIdx, pin: &str) -> Result<()> {
        let cell = self.cells.get(cell.0)
            .ok_or_else(|| Error::Emission(format!("connection to unplaced cell #{}", cell.0)))?
            .name.clone();
        let net = self.nets.get_mut(net.0)
            .ok_or_else(|| Error::Emission(format!("connection to unknown net #{}", net.0)))?;

        net.pins.push(PinRef { cell, pin: pin.to_string() });
        Ok(())
    }

    fn add_pip(&mut self, net: NetIdx, hop: &RoutingHop) -> Result<()> {
        let net = self.nets.get_mut(net.0)
            .ok_or_else(|| Error::Emission(format!("pip added to unknown net #{}", net.0)))?;

        net.pips.push(hop.clone());
        Ok(())
    }

    fn write_checkpoint(&mut self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| Error::Emission(format!("can't create {}: {}", path.display(), e)))?;

        self.write_to(file)
            .map_err(|e| Error::Emission(format!("failed to write {}: {}", path.display(), e)))?;

        dbg_log!(
            DBG_INFO,
            "Wrote checkpoint with {} cells and {} nets to {}",
            self.cells.len(),
            self.nets.len(),
            path.display()
        );

        Ok(())
    }
}
