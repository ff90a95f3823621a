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

use std::path::Path;

#[allow(unused)]
use crate::log::*;
use crate::common::escape_name;
use crate::device::Device;
use crate::error::Result;
use crate::netlist::{CellId, Netlist, PortRef};
use crate::reconcile::{self, CellDisposition, PinMapping};
use crate::routing::{self, RoutingHop};

#[cfg(test)]
mod tests;

/// Target design model: primitive library and checkpoint writer.
pub trait TargetDesign {
    type CellHandle: Copy;
    type NetHandle: Copy;

    fn create_and_place_cell(&mut self, name: &str, prim: &str, bel: &str)
        -> Result<Self::CellHandle>;

    fn create_net(&mut self, name: &str) -> Result<Self::NetHandle>;

    fn connect(&mut self, net: Self::NetHandle, cell: Self::CellHandle, pin: &str)
        -> Result<()>;

    fn add_pip(&mut self, net: Self::NetHandle, hop: &RoutingHop) -> Result<()>;

    fn write_checkpoint(&mut self, path: &Path) -> Result<()>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmissionReport {
    pub cells_placed: usize,
    pub cells_skipped: usize,
    pub nets: usize,
    pub connections: usize,
    pub connections_omitted: usize,
    pub pips: usize,
    pub pips_skipped: usize,
}

struct Emitter<'a, T> where T: TargetDesign {
    netlist: &'a Netlist,
    device: &'a Device,
    target: &'a mut T,
    /* Target handles indexed by `CellId`, `None` for skipped cells */
    cell_handles: Vec<Option<T::CellHandle>>,
    report: EmissionReport,
}

impl<'a, T> Emitter<'a, T> where T: TargetDesign {
    fn place_cells(&mut self) -> Result<()> {
        let netlist = self.netlist;
        for (_, cell) in netlist.cells() {
            let handle = match reconcile::cell_disposition(cell) {
                CellDisposition::Emit { orig_type, bel } => {
                    dbg_log!(DBG_EXTRA, "Placing {} ({}) at {}", cell.name, orig_type, bel);
                    self.report.cells_placed += 1;
                    Some(self.target.create_and_place_cell(&cell.name, orig_type, bel)?)
                },
                CellDisposition::Skip(reason) => {
                    dbg_log!(DBG_EXTRA, "Skipping cell {}: {:?}", cell.name, reason);
                    self.report.cells_skipped += 1;
                    None
                },
            };
            self.cell_handles.push(handle);
        }
        Ok(())
    }

    fn cell_handle(&self, cell: CellId) -> Option<T::CellHandle> {
        self.cell_handles.get(cell.0).copied().flatten()
    }

    fn connect_endpoint(&mut self, net: T::NetHandle, port: &PortRef) -> Result<()> {
        let handle = match self.cell_handle(port.cell) {
            Some(handle) => handle,
            None => return Ok(()),
        };

        match reconcile::endpoint_mapping(self.netlist, port) {
            PinMapping::Connect(pin) => {
                self.target.connect(net, handle, pin)?;
                self.report.connections += 1;
            },
            PinMapping::Omit => {
                dbg_log!(
                    DBG_EXTRA,
                    "No original pin for {}.{}",
                    self.netlist.cell(port.cell).name,
                    port.port
                );
                self.report.connections_omitted += 1;
            },
        }
        Ok(())
    }

    fn emit_nets(&mut self) -> Result<()> {
        let netlist = self.netlist;
        for (_, net) in netlist.nets() {
            let handle = self.target.create_net(&escape_name(&net.name))?;
            self.report.nets += 1;

            for port in net.driver.iter().chain(net.users.iter()) {
                self.connect_endpoint(handle, port)?;
            }

            let route = match net.routing() {
                Some(routing) => routing::decode_route(routing, self.device)?,
                None => Default::default(),
            };
            for hop in &route.hops {
                self.target.add_pip(handle, hop)?;
            }
            self.report.pips += route.hops.len();
            self.report.pips_skipped += route.skipped.len();
        }
        Ok(())
    }
}

/// Walks the finished netlist once: places every eligible cell, then creates
/// each net with its reconciled connections and decoded route.
pub fn emit<T>(netlist: &Netlist, device: &Device, target: &mut T) -> Result<EmissionReport>
where
    T: TargetDesign
{
    let mut emitter = Emitter {
        netlist,
        device,
        target,
        cell_handles: Vec::with_capacity(netlist.cell_count()),
        report: Default::default(),
    };

    emitter.place_cells()?;
    emitter.emit_nets()?;

    Ok(emitter.report)
}
