//! Turn `data/*_CODES.json` into `builtins.rs` in `OUT_DIR`.

use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::{env, fs};

#[derive(Deserialize)]
struct DictionaryFile {
    name: String,
    marker_size: usize,
    max_correction_bits: u8,
    codes: Vec<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    println!("cargo:rerun-if-changed={}", data_dir.display());

    let mut files: Vec<PathBuf> = fs::read_dir(&data_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_CODES.json"))
        })
        .collect();
    files.sort();

    let mut out = String::new();
    let mut names = Vec::new();
    for path in &files {
        println!("cargo:rerun-if-changed={}", path.display());
        let dict: DictionaryFile = serde_json::from_str(&fs::read_to_string(path)?)?;
        let bits = dict.marker_size * dict.marker_size;
        if bits > 64 {
            return Err(format!("{}: {bits} bits do not fit in u64", dict.name).into());
        }
        if let Some(bad) = dict.codes.iter().find(|&&c| bits < 64 && c >> bits != 0) {
            return Err(format!("{}: code {bad:#x} exceeds {bits} bits", dict.name).into());
        }

        writeln!(out, "pub const {}: Dictionary = Dictionary {{", dict.name)?;
        writeln!(out, "    name: {:?},", dict.name)?;
        writeln!(out, "    marker_size: {},", dict.marker_size)?;
        writeln!(out, "    max_correction_bits: {},", dict.max_correction_bits)?;
        writeln!(out, "    codes: &[")?;
        for chunk in dict.codes.chunks(6) {
            let row: Vec<String> = chunk.iter().map(|c| format!("{c:#011x}")).collect();
            writeln!(out, "        {},", row.join(", "))?;
        }
        writeln!(out, "    ],")?;
        writeln!(out, "}};\n")?;
        names.push(dict.name);
    }

    writeln!(out, "/// Names of every embedded dictionary.")?;
    writeln!(out, "pub const BUILTIN_DICTIONARY_NAMES: &[&str] = &{names:?};\n")?;
    writeln!(out, "/// Look up an embedded dictionary by name.")?;
    writeln!(
        out,
        "pub fn builtin_dictionary(name: &str) -> Option<Dictionary> {{"
    )?;
    writeln!(out, "    match name {{")?;
    for name in &names {
        writeln!(out, "        {name:?} => Some({name}),")?;
    }
    writeln!(out, "        _ => None,")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    let out_path = PathBuf::from(env::var("OUT_DIR")?).join("builtins.rs");
    fs::write(out_path, out)?;
    Ok(())
}
