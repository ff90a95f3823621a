use super::*;
use crate::checkpoint::{Checkpoint, PinRef, WriteOpts};
use crate::device::Tile;
use crate::error::Error;
use crate::loader::netlist::parse;
use crate::netlist;

/* Records every request in order */
#[derive(Default)]
struct Recorder {
    log: Vec<String>,
}

impl TargetDesign for Recorder {
    type CellHandle = usize;
    type NetHandle = usize;

    fn create_and_place_cell(&mut self, name: &str, prim: &str, bel: &str) -> Result<usize> {
        self.log.push(format!("cell {} {} {}", name, prim, bel));
        Ok(self.log.len())
    }

    fn create_net(&mut self, name: &str) -> Result<usize> {
        self.log.push(format!("net {}", name));
        Ok(self.log.len())
    }

    fn connect(&mut self, _net: usize, _cell: usize, pin: &str) -> Result<()> {
        self.log.push(format!("connect {}", pin));
        Ok(())
    }

    fn add_pip(&mut self, _net: usize, hop: &RoutingHop) -> Result<()> {
        self.log.push(format!("pip {}/{}.{}", hop.tile, hop.src_wire, hop.dst_wire));
        Ok(())
    }

    fn write_checkpoint(&mut self, _path: &Path) -> Result<()> {
        self.log.push("write".into());
        Ok(())
    }
}

fn device() -> Device {
    Device::new("xc7a35t", vec![Tile::new("TILE1", 10)]).unwrap()
}

fn netlist(text: &str) -> Netlist {
    netlist::build(&parse(text.as_bytes(), None).unwrap()).unwrap()
}

const SCENARIO: &str = r#"{
    "modules": { "top": {
        "netnames": {
            "q": { "bits": [3], "attributes": { "ROUTING": "w0;TILE1/0.1;r0;w1;SITEPIP:X;r1" } }
        },
        "cells": {
            "A": {
                "type": "SLICE_FFX",
                "port_directions": { "Q": "output" },
                "connections": { "Q": [3] },
                "attributes": {
                    "X_ORIG_TYPE": "FDRE",
                    "NEXTPNR_BEL": "SLICE_X0Y0/AFF",
                    "X_ORIG_PORT_Q": "O"
                }
            },
            "B": {
                "type": "SLICE_FFX",
                "port_directions": { "D": "input" },
                "connections": { "D": [3] },
                "attributes": {
                    "X_ORIG_TYPE": "FDRE",
                    "NEXTPNR_BEL": "SLICE_X0Y0/BFF"
                }
            }
        }
    } }
}"#;

#[test]
fn test_driver_and_unmapped_user() {
    let netlist = netlist(SCENARIO);
    let device = device();
    let mut ckpt = Checkpoint::new("top", &device, WriteOpts::default());

    let report = emit(&netlist, &device, &mut ckpt).unwrap();
    let net = ckpt.net_by_name("q").unwrap();

    assert_eq!(net.pins, vec![PinRef { cell: "A".into(), pin: "O".into() }]);
    assert_eq!(net.pips, vec![RoutingHop { tile: "TILE1".into(), src_wire: 0, dst_wire: 1 }]);
    assert_eq!(report, EmissionReport {
        cells_placed: 2,
        cells_skipped: 0,
        nets: 1,
        connections: 1,
        connections_omitted: 1,
        pips: 1,
        pips_skipped: 1,
    });
}

#[test]
fn test_request_order() {
    let netlist = netlist(SCENARIO);
    let mut rec = Recorder::default();

    emit(&netlist, &device(), &mut rec).unwrap();

    assert_eq!(rec.log, vec![
        "cell A FDRE SLICE_X0Y0/AFF",
        "cell B FDRE SLICE_X0Y0/BFF",
        "net q",
        "connect O",
        "pip TILE1/0.1",
    ]);
}

#[test]
fn test_skipped_cells_get_no_connections() {
    let text = r#"{ "modules": { "top": {
        "netnames": { "\\io/pad": { "bits": [2] } },
        "cells": {
            "obuf": {
                "type": "IOB_OUTBUF",
                "port_directions": { "O": "output" },
                "connections": { "O": [2] },
                "attributes": { "X_ORIG_TYPE": "OBUF", "NEXTPNR_BEL": "IOB_X0Y0/OUTBUF",
                                "X_ORIG_PORT_O": "O" }
            },
            "gnd": {
                "type": "PSEUDO_GND",
                "port_directions": { "Y": "input" },
                "connections": { "Y": [2] },
                "attributes": { "X_ORIG_PORT_Y": "G" }
            }
        }
    } } }"#;
    let netlist = netlist(text);
    let mut rec = Recorder::default();

    let report = emit(&netlist, &device(), &mut rec).unwrap();

    assert_eq!(rec.log, vec!["net __io_pad"]);
    assert_eq!(report.cells_skipped, 2);
    assert_eq!(report.connections, 0);
    assert_eq!(report.connections_omitted, 0);
}

#[test]
fn test_unknown_tile_aborts() {
    let text = r#"{ "modules": { "top": {
        "netnames": { "n": { "bits": [2], "attributes": { "ROUTING": "w;ELSEWHERE/0.1;1" } } },
        "cells": {}
    } } }"#;
    let netlist = netlist(text);
    let mut rec = Recorder::default();

    let res = emit(&netlist, &device(), &mut rec);

    assert!(matches!(res, Err(Error::DeviceLookup(_))));
    assert!(!rec.log.contains(&"write".to_string()));
}

#[test]
fn test_net_without_routing() {
    let text = r#"{ "modules": { "top": {
        "netnames": { "n": { "bits": [2] } },
        "cells": {}
    } } }"#;
    let netlist = netlist(text);
    let mut rec = Recorder::default();

    let report = emit(&netlist, &device(), &mut rec).unwrap();

    assert_eq!(rec.log, vec!["net n"]);
    assert_eq!(report.pips, 0);
}

#[test]
fn test_placement_failure_is_fatal() {
    let text = r#"{ "modules": { "top": {
        "netnames": {},
        "cells": { "lut": { "type": "SLICE_LUTX", "attributes": { "X_ORIG_TYPE": "LUT6" } } }
    } } }"#;
    let netlist = netlist(text);
    let device = device();
    let mut ckpt = Checkpoint::new("top", &device, WriteOpts::default());

    assert!(matches!(emit(&netlist, &device, &mut ckpt), Err(Error::Emission(_))));
}
