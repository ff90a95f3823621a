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
use serde_json::{Map, Value};

/// String form of a loosely-typed JSON scalar. Strings are taken verbatim,
/// anything else is rendered as its JSON text.
pub trait JsonStr {
    fn json_str(&self) -> String;
}

impl JsonStr for Value {
    fn json_str(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/* Copies an optional `attributes`/`parameters` object into a string map. */
pub fn string_map(obj: Option<&Map<String, Value>>) -> HashMap<String, String> {
    obj.into_iter()
        .flat_map(|m| m.iter())
        .map(|(k, v)| (k.clone(), v.json_str()))
        .collect()
}

/// Makes a netlist name acceptable as a checkpoint identifier.
pub fn escape_name(name: &str) -> String {
    name.replace('\\', "__").replace('/', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name("\\cpu/alu/sum"), "__cpu_alu_sum");
        assert_eq!(escape_name("plain"), "plain");
    }

    #[test]
    fn test_scalar_coercion() {
        let obj = json!({ "A": "str", "B": 12, "C": true, "D": "00000001" });
        let map = string_map(obj.as_object());

        assert_eq!(map["A"], "str");
        assert_eq!(map["B"], "12");
        assert_eq!(map["C"], "true");
        assert_eq!(map["D"], "00000001");
    }

    #[test]
    fn test_missing_object_is_empty() {
        assert!(string_map(None).is_empty());
    }
}
