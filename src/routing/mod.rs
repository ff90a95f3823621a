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

/* Decoder for the `ROUTING` net attribute written by nextpnr.
 *
 * The attribute is a flat list of `;`-separated fields read in groups of
 * three: the wire reached, the pip used to reach it and a strength field
 * which is not needed here. Only tile pips are kept, site pips are implied
 * by placement.
 */

use serde::Serialize;

use crate::device::{Device, Pip};
use crate::error::{Error, Result};
#[allow(unused)]
use crate::log::*;

#[cfg(test)]
mod tests;

pub const SITEPIP_MARKER: &'static str = "SITEPIP";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoutingHop {
    pub tile: String,
    pub src_wire: u32,
    pub dst_wire: u32,
}

impl<'d> From<Pip<'d>> for RoutingHop {
    fn from(pip: Pip<'d>) -> Self {
        Self {
            tile: pip.tile.name().to_string(),
            src_wire: pip.src_wire,
            dst_wire: pip.dst_wire,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopSkip {
    EmptyPip,
    SitePip,
    /// The database tile has fewer wires than the netlist assumes.
    OutOfBounds {
        tile: String,
        src_wire: u32,
        dst_wire: u32,
        wire_count: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopDecision {
    Keep(RoutingHop),
    Skip(HopSkip),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGroup<'r> {
    pub wire: &'r str,
    pub pip: &'r str,
}

/// Splits a routing attribute into (wire, pip) groups. A truncated trailing
/// group gets an empty pip.
pub fn route_groups<'r>(routing: &'r str) -> impl Iterator<Item = RouteGroup<'r>> + 'r {
    let fields: Vec<&'r str> = routing.split(';').collect();
    (0 .. fields.len()).step_by(3).map(move |idx| RouteGroup {
        wire: fields[idx],
        pip: fields.get(idx + 1).copied().unwrap_or(""),
    })
}

/// Splits `<tile>/<src>.<dst>`.
pub fn parse_pip<'r>(desc: &'r str) -> Result<(&'r str, u32, u32)> {
    let bad = || Error::Parse(format!("malformed pip descriptor \"{}\"", desc));

    let (tile, wires) = desc.split_once('/').ok_or_else(bad)?;
    let (src, dst) = wires.split_once('.').ok_or_else(bad)?;
    let src = src.parse::<u32>().map_err(|_| bad())?;
    let dst = dst.parse::<u32>().map_err(|_| bad())?;

    Ok((tile, src, dst))
}

pub fn decide_hop(pip: &str, device: &Device) -> Result<HopDecision> {
    if pip.is_empty() {
        return Ok(HopDecision::Skip(HopSkip::EmptyPip));
    }
    if pip.starts_with(SITEPIP_MARKER) {
        return Ok(HopDecision::Skip(HopSkip::SitePip));
    }

    let (tile_name, src_wire, dst_wire) = parse_pip(pip)?;
    let tile = device.tile(tile_name)?;

    Ok(match tile.pip(src_wire, dst_wire) {
        Some(pip) => HopDecision::Keep(pip.into()),
        None => HopDecision::Skip(HopSkip::OutOfBounds {
            tile: tile_name.to_string(),
            src_wire,
            dst_wire,
            wire_count: tile.wire_count(),
        }),
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodedRoute {
    /// Tile pips in attribute order.
    pub hops: Vec<RoutingHop>,
    pub skipped: Vec<HopSkip>,
}

pub fn decode_route(routing: &str, device: &Device) -> Result<DecodedRoute> {
    let mut route = DecodedRoute::default();

    for group in route_groups(routing) {
        match decide_hop(group.pip, device)? {
            HopDecision::Keep(hop) => route.hops.push(hop),
            HopDecision::Skip(skip) => {
                if let HopSkip::OutOfBounds { .. } = &skip {
                    dbg_log!(
                        DBG_WARN,
                        "Dropping pip {} reaching wire {}: {:?}",
                        group.pip,
                        group.wire,
                        skip
                    );
                }
                route.skipped.push(skip);
            },
        }
    }

    Ok(route)
}
