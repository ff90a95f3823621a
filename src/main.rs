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

use clap::Parser;
use std::path::{Path, PathBuf};

use pnr2dcp::checkpoint::{Checkpoint, WriteOpts};
use pnr2dcp::emitter::{self, TargetDesign};
use pnr2dcp::loader;
use pnr2dcp::netlist;
use pnr2dcp::Result;

#[derive(Parser, Debug)]
#[clap(
    author = "Antmicro",
    version = "0.0.1",
    about = "PNR2DCP - nextpnr JSON netlist to design checkpoint converter",
    long_about = None
)]
struct Args {
    #[clap(help = "Part name, eg. xczu2cg-sbva484-1-e")]
    part: String,
    #[clap(help = "Routed netlist written by nextpnr (.json or .json.gz)")]
    netlist: PathBuf,
    #[clap(help = "Checkpoint output file")]
    checkpoint: PathBuf,
    #[clap(
        long,
        help = "Device database file (default: $PNR2DCP_DEVICE_DIR/<part>.yaml)"
    )]
    device_db: Option<PathBuf>,
    #[clap(long, help = "Name of the top module (default: first module)")]
    top: Option<String>,
    #[clap(long, help = "Write a raw (uncompressed) checkpoint")]
    raw: bool,
    #[clap(long, default_value = "6", help = "Gzip compression level (0-9)")]
    compression_level: u32,
}

fn run(args: Args) -> Result<()> {
    let device_path = args.device_db.clone()
        .unwrap_or_else(|| loader::device::default_path(&args.part));
    let device = loader::device::load(&device_path)?;
    device.check_part(&args.part)?;

    let module = loader::netlist::load(&args.netlist, args.top.as_deref())?;
    let netlist = netlist::build(&module)?;

    let mut checkpoint = Checkpoint::new(
        &netlist.name,
        &device,
        WriteOpts {
            raw: args.raw,
            compression_level: args.compression_level.min(9),
        }
    );
    let report = emitter::emit(&netlist, &device, &mut checkpoint)?;
    checkpoint.write_checkpoint(Path::new(&args.checkpoint))?;

    println!(concat!(
        "Design {} ({}):\n",
        "    Cells placed:                 {}\n",
        "    Cells skipped:                {}\n",
        "    Nets:                         {}\n",
        "    Connections made:             {}\n",
        "    Connections without orig pin: {}\n",
        "    PIPs:                         {}\n",
        "    Routing entries skipped:      {}"
        ),
        netlist.name,
        args.part,
        report.cells_placed,
        report.cells_skipped,
        report.nets,
        report.connections,
        report.connections_omitted,
        report.pips,
        report.pips_skipped
    );

    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
