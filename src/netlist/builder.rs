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

use serde_json::{Map, Value};

#[allow(unused)]
use crate::log::*;
use crate::common::{JsonStr, string_map};
use crate::error::{Error, Result};
use crate::loader::netlist::TopModule;
use super::*;

fn as_object<'v>(value: &'v Value, what: &str) -> Result<&'v Map<String, Value>> {
    value.as_object()
        .ok_or_else(|| Error::Parse(format!("{} is not an object", what)))
}

/* Optional sub-trees may be absent, but must be objects when present. */
fn sub_object<'v>(data: &'v Map<String, Value>, key: &str, what: &str)
    -> Result<Option<&'v Map<String, Value>>>
{
    data.get(key)
        .map(|v| as_object(v, &format!("\"{}\" of {}", key, what)))
        .transpose()
}

fn bit_index(bit: &Value, what: &str) -> Result<u64> {
    bit.as_u64()
        .ok_or_else(|| Error::Parse(format!("{} has a non-integer bit {}", what, bit)))
}

fn build_net(name: &str, data: &Value) -> Result<Net> {
    let what = format!("net {}", name);
    let data = as_object(data, &what)?;

    let first_bit = data.get("bits")
        .and_then(Value::as_array)
        .and_then(|bits| bits.first())
        .ok_or_else(|| Error::Parse(format!("{} has no bits", what)))?;

    let mut net = Net::new(name, bit_index(first_bit, &what)?);
    net.attrs = string_map(sub_object(data, "attributes", &what)?);

    Ok(net)
}

/// Resolves the net a connection entry refers to. String bits are constant
/// drivers which are not part of the graph.
fn connection_net(
    netlist: &Netlist,
    cell: &str,
    port: &str,
    bits: &Value
) -> Result<Option<NetId>> {
    let what = format!("connection {}.{}", cell, port);
    let bits = bits.as_array()
        .ok_or_else(|| Error::Parse(format!("{} is not an array", what)))?;

    match bits.first() {
        None => Ok(None),
        Some(Value::String(constant)) => {
            dbg_log!(DBG_EXTRA, "Port {}.{} tied to constant {}", cell, port, constant);
            Ok(None)
        },
        Some(bit) => {
            let bit = bit_index(bit, &what)?;
            netlist.net_by_bit(bit)
                .map(Some)
                .ok_or_else(|| Error::MissingNetReference {
                    cell: cell.to_string(),
                    port: port.to_string(),
                    bit,
                })
        },
    }
}

/* A port-to-net link, applied once the owning cell has an id. */
struct PendingLink {
    port: String,
    dir: PinDir,
    net: NetId,
}

fn build_cell(netlist: &Netlist, name: &str, data: &Value)
    -> Result<(Cell, Vec<PendingLink>)>
{
    let what = format!("cell {}", name);
    let data = as_object(data, &what)?;

    let cell_type = data.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Parse(format!("{} has no type", what)))?;

    let mut cell = Cell::new(name, cell_type);

    for (port, dir) in sub_object(data, "port_directions", &what)?.into_iter().flatten() {
        let dir = dir.json_str().parse::<PinDir>().map_err(|e| match e {
            Error::UnknownDirection { value, .. } => Error::UnknownDirection {
                cell: name.to_string(),
                port: port.clone(),
                value,
            },
            e => e,
        })?;
        cell.ports.insert(port.clone(), Port { name: port.clone(), dir, net: None });
    }

    let mut links = Vec::new();
    for (port_name, bits) in sub_object(data, "connections", &what)?.into_iter().flatten() {
        let net = connection_net(netlist, name, port_name, bits)?;
        let port = cell.ports.get_mut(port_name)
            .ok_or_else(|| Error::Parse(format!(
                "{} connects port {} which has no declared direction",
                what, port_name
            )))?;
        port.net = net;
        if let Some(net) = net {
            links.push(PendingLink { port: port_name.clone(), dir: port.dir, net });
        }
    }

    cell.attrs = string_map(sub_object(data, "attributes", &what)?);
    cell.params = string_map(sub_object(data, "parameters", &what)?);

    Ok((cell, links))
}

/// Builds the netlist graph. All nets are created before any cell, since
/// connections refer to nets by bit index.
pub fn build(module: &TopModule) -> Result<Netlist> {
    let mut netlist = Netlist::new(&module.name);

    for (name, data) in &module.netnames {
        let net = build_net(name, data)?;
        let bit = net.bit;
        let id = netlist.add_net(net);
        dbg_log!(DBG_EXTRA, "Net {} -> bit {} ({:?})", name, bit, id);
    }

    for (name, data) in &module.cells {
        let (cell, links) = build_cell(&netlist, name, data)?;
        let cell_id = netlist.add_cell(cell);

        for link in links {
            let port = PortRef { cell: cell_id, port: link.port };
            netlist.net_mut(link.net).link(port, link.dir);
        }
    }

    dbg_log!(
        DBG_INFO,
        "Built netlist {}: {} nets, {} cells",
        netlist.name,
        netlist.net_count(),
        netlist.cell_count()
    );

    Ok(netlist)
}
