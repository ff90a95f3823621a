use super::*;
use crate::device::Tile;

fn device() -> Device {
    Device::new("xc7a35t", vec![
        Tile::new("TILE1", 10),
        Tile::new("INT_L_X2Y10", 3000),
    ]).unwrap()
}

fn hop(tile: &str, src_wire: u32, dst_wire: u32) -> RoutingHop {
    RoutingHop { tile: tile.into(), src_wire, dst_wire }
}

#[test]
fn test_single_hop() {
    let route = decode_route("wireA;TILE1/3.5;X", &device()).unwrap();
    assert_eq!(route.hops, vec![hop("TILE1", 3, 5)]);
}

#[test]
fn test_decoding_is_repeatable() {
    let device = device();
    let first = decode_route("wireA;TILE1/3.5;X", &device).unwrap();
    let second = decode_route("wireA;TILE1/3.5;X", &device).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_out_of_bounds_hop_is_dropped() {
    let route = decode_route("wireA;TILE1/3.99;X", &device()).unwrap();

    assert!(route.hops.is_empty());
    assert_eq!(route.skipped, vec![HopSkip::OutOfBounds {
        tile: "TILE1".into(),
        src_wire: 3,
        dst_wire: 99,
        wire_count: 10,
    }]);
}

#[test]
fn test_wire_count_is_exclusive() {
    let route = decode_route("a;TILE1/10.0;1;b;TILE1/9.9;1", &device()).unwrap();
    assert_eq!(route.hops, vec![hop("TILE1", 9, 9)]);
}

#[test]
fn test_site_and_empty_pips() {
    let routing = "w0;;1;w1;SITEPIP/SLICE_X0Y0/AFFMUX/D6;1;w2;INT_L_X2Y10/120.2048;1";
    let route = decode_route(routing, &device()).unwrap();

    assert_eq!(route.hops, vec![hop("INT_L_X2Y10", 120, 2048)]);
    assert_eq!(route.skipped, vec![HopSkip::EmptyPip, HopSkip::SitePip]);
}

#[test]
fn test_hop_order_is_preserved() {
    let routing = "a;TILE1/1.2;1;b;INT_L_X2Y10/7.8;1;c;TILE1/2.3;1";
    let route = decode_route(routing, &device()).unwrap();

    assert_eq!(route.hops, vec![
        hop("TILE1", 1, 2),
        hop("INT_L_X2Y10", 7, 8),
        hop("TILE1", 2, 3),
    ]);
}

#[test]
fn test_truncated_groups() {
    assert!(decode_route("", &device()).unwrap().hops.is_empty());

    let route = decode_route("a;TILE1/1.2;1;b", &device()).unwrap();
    assert_eq!(route.hops, vec![hop("TILE1", 1, 2)]);
    assert_eq!(route.skipped, vec![HopSkip::EmptyPip]);

    let route = decode_route("a;TILE1/1.2", &device()).unwrap();
    assert_eq!(route.hops, vec![hop("TILE1", 1, 2)]);
}

#[test]
fn test_unknown_tile() {
    let res = decode_route("a;NOWHERE/1.2;1", &device());
    assert!(matches!(res, Err(Error::DeviceLookup(_))));
}

#[test]
fn test_malformed_pips() {
    for pip in ["TILE1", "TILE1/12", "TILE1/a.b", "TILE1/-1.2"] {
        assert!(matches!(parse_pip(pip), Err(Error::Parse(_))), "{}", pip);
    }
    assert_eq!(parse_pip("TILE1/0.1").unwrap(), ("TILE1", 0, 1));
}
