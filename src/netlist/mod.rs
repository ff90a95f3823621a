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

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Error;

mod builder;

pub use self::builder::build;

#[derive(Copy, Clone, Hash, PartialEq, Eq, Debug)]
pub enum PinDir {
    Inout,
    Input,
    Output,
}

impl FromStr for PinDir {
    type Err = Error;

    /* The error carries no cell/port context; the builder fills it in. */
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            "inout" => Ok(Self::Inout),
            _ => Err(Error::UnknownDirection {
                cell: String::new(),
                port: String::new(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct NetId(pub usize);

#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct CellId(pub usize);

/// Relation from a net to one of its endpoints. Nets do not own ports.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct PortRef {
    pub cell: CellId,
    pub port: String,
}

#[derive(Debug)]
pub struct Net {
    pub name: String,
    /// First element of the `bits` array; wider signals are not modeled.
    pub bit: u64,
    pub attrs: HashMap<String, String>,
    pub driver: Option<PortRef>,
    pub users: Vec<PortRef>,
}

impl Net {
    pub fn new<S>(name: S, bit: u64) -> Self where S: ToString {
        Self {
            name: name.to_string(),
            bit,
            attrs: HashMap::new(),
            driver: None,
            users: Vec::new(),
        }
    }

    /// Output ports drive the net, everything else (inout included) uses it.
    /// A second driver replaces the first one.
    fn link(&mut self, port: PortRef, dir: PinDir) {
        match dir {
            PinDir::Output => self.driver = Some(port),
            PinDir::Input | PinDir::Inout => self.users.push(port),
        }
    }

    pub fn routing(&self) -> Option<&str> {
        self.attrs.get("ROUTING").map(String::as_str)
    }
}

#[derive(Debug)]
pub struct Port {
    pub name: String,
    pub dir: PinDir,
    pub net: Option<NetId>,
}

#[derive(Debug)]
pub struct Cell {
    pub name: String,
    pub cell_type: String,
    pub ports: HashMap<String, Port>,
    pub attrs: HashMap<String, String>,
    /// Raw string values; numeric encodings are not decoded.
    pub params: HashMap<String, String>,
}

impl Cell {
    pub fn new<N, T>(name: N, cell_type: T) -> Self where
        N: ToString,
        T: ToString
    {
        Self {
            name: name.to_string(),
            cell_type: cell_type.to_string(),
            ports: HashMap::new(),
            attrs: HashMap::new(),
            params: HashMap::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// Netlist graph. Nets and cells live in central tables and refer to each
/// other by index, so the graph is read-only once `build` returns.
#[derive(Debug, Default)]
pub struct Netlist {
    pub name: String,
    nets: Vec<Net>,
    net_ids: HashMap<u64, NetId>,
    cells: Vec<Cell>,
    cell_ids: HashMap<String, CellId>,
}

impl Netlist {
    pub fn new<S>(name: S) -> Self where S: ToString {
        Self { name: name.to_string(), ..Default::default() }
    }

    /* Re-declaring a bit replaces the earlier net in place. */
    fn add_net(&mut self, net: Net) -> NetId {
        match self.net_ids.get(&net.bit) {
            Some(&id) => {
                self.nets[id.0] = net;
                id
            },
            None => {
                let id = NetId(self.nets.len());
                self.net_ids.insert(net.bit, id);
                self.nets.push(net);
                id
            }
        }
    }

    fn add_cell(&mut self, cell: Cell) -> CellId {
        let id = CellId(self.cells.len());
        self.cell_ids.insert(cell.name.clone(), id);
        self.cells.push(cell);
        id
    }

    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.0]
    }

    fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.0]
    }

    pub fn net_by_bit(&self, bit: u64) -> Option<NetId> {
        self.net_ids.get(&bit).copied()
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn cell_by_name(&self, name: &str) -> Option<CellId> {
        self.cell_ids.get(name).copied()
    }

    pub fn port(&self, port: &PortRef) -> Option<&Port> {
        self.cell(port.cell).ports.get(&port.port)
    }

    pub fn nets<'a>(&'a self) -> impl Iterator<Item = (NetId, &'a Net)> + 'a {
        self.nets.iter().enumerate().map(|(idx, net)| (NetId(idx), net))
    }

    pub fn cells<'a>(&'a self) -> impl Iterator<Item = (CellId, &'a Cell)> + 'a {
        self.cells.iter().enumerate().map(|(idx, cell)| (CellId(idx), cell))
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
