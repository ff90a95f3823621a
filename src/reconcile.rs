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

use crate::netlist::{Cell, Netlist, PortRef};

pub const ATTR_ORIG_TYPE: &'static str = "X_ORIG_TYPE";
pub const ATTR_BEL: &'static str = "NEXTPNR_BEL";
pub const ATTR_ORIG_PORT_PREFIX: &'static str = "X_ORIG_PORT_";

/// I/O buffer wrappers whose function is already absorbed into placement.
pub const WRAPPER_TYPES: &'static [&'static str] = &["IOB_OUTBUF", "IOB_IBUFCTRL"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellSkip {
    NoOrigType,
    Wrapper,
}

/// Outcome of the emission eligibility check for a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellDisposition<'n> {
    Emit {
        orig_type: &'n str,
        /// Empty when the cell carries no placement, left for the
        /// primitive library to reject.
        bel: &'n str,
    },
    Skip(CellSkip),
}

pub fn cell_disposition<'n>(cell: &'n Cell) -> CellDisposition<'n> {
    let orig_type = match cell.attr(ATTR_ORIG_TYPE) {
        Some(t) => t,
        None => return CellDisposition::Skip(CellSkip::NoOrigType),
    };
    if WRAPPER_TYPES.contains(&cell.cell_type.as_str()) {
        return CellDisposition::Skip(CellSkip::Wrapper);
    }

    CellDisposition::Emit {
        orig_type,
        bel: cell.attr(ATTR_BEL).unwrap_or(""),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinMapping<'n> {
    Connect(&'n str),
    /// The mapped port has no counterpart on the original primitive.
    Omit,
}

pub fn pin_mapping<'n>(cell: &'n Cell, port: &str) -> PinMapping<'n> {
    cell.attrs.get(&format!("{}{}", ATTR_ORIG_PORT_PREFIX, port))
        .map_or(PinMapping::Omit, |orig| PinMapping::Connect(orig.as_str()))
}

/* Convenience for walking net endpoints */
pub fn endpoint_mapping<'n>(netlist: &'n Netlist, port: &PortRef) -> PinMapping<'n> {
    pin_mapping(netlist.cell(port.cell), &port.port)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(cell_type: &str, attrs: &[(&str, &str)]) -> Cell {
        let mut cell = Cell::new("c", cell_type);
        cell.attrs = attrs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        cell
    }

    #[test]
    fn test_lut_is_emitted() {
        let c = cell("SLICE_LUTX", &[
            ("X_ORIG_TYPE", "LUT6"),
            ("NEXTPNR_BEL", "SLICE_X0Y0/A6LUT"),
        ]);

        assert_eq!(
            cell_disposition(&c),
            CellDisposition::Emit { orig_type: "LUT6", bel: "SLICE_X0Y0/A6LUT" }
        );
    }

    #[test]
    fn test_wrappers_are_skipped() {
        for wrapper in WRAPPER_TYPES {
            let c = cell(wrapper, &[("X_ORIG_TYPE", "OBUF"), ("NEXTPNR_BEL", "IOB_X0Y0/OUTBUF")]);
            assert_eq!(cell_disposition(&c), CellDisposition::Skip(CellSkip::Wrapper));
        }
    }

    #[test]
    fn test_unmapped_cell_is_skipped() {
        let c = cell("PSEUDO_GND", &[("NEXTPNR_BEL", "TIEOFF_X0Y0/GND")]);
        assert_eq!(cell_disposition(&c), CellDisposition::Skip(CellSkip::NoOrigType));
    }

    #[test]
    fn test_missing_bel() {
        let c = cell("SLICE_FFX", &[("X_ORIG_TYPE", "FDRE")]);
        assert_eq!(cell_disposition(&c), CellDisposition::Emit { orig_type: "FDRE", bel: "" });
    }

    #[test]
    fn test_pin_mapping() {
        let c = cell("SLICE_FFX", &[("X_ORIG_PORT_Q", "Q"), ("X_ORIG_PORT_D", "D")]);

        assert_eq!(pin_mapping(&c, "Q"), PinMapping::Connect("Q"));
        assert_eq!(pin_mapping(&c, "CLK"), PinMapping::Omit);
    }
}
