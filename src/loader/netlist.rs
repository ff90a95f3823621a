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
use std::path::Path;

#[allow(unused)]
use crate::log::*;
use crate::error::{Error, Result};

/// Structural tree of the module that gets translated. Nothing beyond the
/// presence of the `netnames` and `cells` sections is validated here.
#[derive(Debug)]
pub struct TopModule {
    pub name: String,
    pub netnames: Map<String, Value>,
    pub cells: Map<String, Value>,
}

fn take_section(module: &mut Map<String, Value>, module_name: &str, key: &str)
    -> Result<Map<String, Value>>
{
    match module.remove(key) {
        Some(Value::Object(section)) => Ok(section),
        Some(_) => Err(Error::Parse(
            format!("section \"{}\" of module {} is not an object", key, module_name)
        )),
        None => Err(Error::Parse(
            format!("module {} has no \"{}\" section", module_name, key)
        )),
    }
}

/// Extracts the top module from a netlist document. Without `top` the first
/// module in document order is used.
pub fn parse(text: &[u8], top: Option<&str>) -> Result<TopModule> {
    let doc: Value = serde_json::from_slice(text)?;

    let mut modules = match doc {
        Value::Object(mut root) => match root.remove("modules") {
            Some(Value::Object(modules)) => modules,
            Some(_) => return Err(Error::Parse("\"modules\" is not an object".into())),
            None => return Err(Error::Parse("document has no \"modules\" section".into())),
        },
        _ => return Err(Error::Parse("document root is not an object".into())),
    };

    let name = match top {
        Some(name) => {
            if !modules.contains_key(name) {
                return Err(Error::Parse(format!("no module named {}", name)));
            }
            name.to_string()
        },
        None => modules.keys().next().cloned()
            .ok_or_else(|| Error::Parse("document contains no modules".into()))?,
    };

    if modules.len() > 1 {
        dbg_log!(DBG_WARN, "Netlist has {} modules, using {}", modules.len(), name);
    }

    let mut module = match modules.remove(&name) {
        Some(Value::Object(module)) => module,
        _ => return Err(Error::Parse(format!("module {} is not an object", name))),
    };

    let netnames = take_section(&mut module, &name, "netnames")?;
    let cells = take_section(&mut module, &name, "cells")?;

    Ok(TopModule { name, netnames, cells })
}

pub fn load<P>(path: P, top: Option<&str>) -> Result<TopModule> where P: AsRef<Path> {
    let buffer = super::open(path)?;
    parse(&buffer, top)
}
