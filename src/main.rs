//! gpxsplit cli - split one GPX file into a waypoints file and per-track files

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::info;

use gpxsplit::model::Gpx;
use gpxsplit::{parser, splitter, writer};

/// Split a GPX file into basename-WPT and one basename-N file per track
#[argopt::cmd]
fn main(
    /// GPX file to read; stdin when omitted
    input: Option<PathBuf>,
) -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (xml, base, ext) = read_input(input.as_deref())?;

    let document = parser::parse_gpx(&xml).map_err(|e| e.to_string())?;

    let mut outputs: Vec<(String, Gpx)> =
        vec![(format!("{base}-WPT{ext}"), splitter::waypoints_only(&document))];
    for (i, derived) in splitter::per_track(&document).into_iter().enumerate() {
        outputs.push((format!("{base}-{i}{ext}"), derived));
    }

    if let Some(path) = input.as_deref() {
        for (name, _) in &outputs {
            if Path::new(name) == path {
                return Err(format!("output {name} would overwrite the input"));
            }
        }
    }

    for (name, derived) in &outputs {
        info!("writing {name}");
        write_output(name, derived)?;
    }

    Ok(())
}

/// Read the whole source and derive the output basename and extension.
fn read_input(input: Option<&Path>) -> Result<(String, String, String), String> {
    match input {
        Some(path) => {
            info!("reading from {}", path.display());
            let xml = fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            let base = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "gpx".to_string());
            let ext = path
                .extension()
                .map(|s| format!(".{}", s.to_string_lossy()))
                .unwrap_or_default();
            Ok((xml, base, ext))
        }
        None => {
            info!("reading from stdin");
            let mut xml = String::new();
            io::stdin()
                .read_to_string(&mut xml)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok((xml, "stdin".to_string(), String::new()))
        }
    }
}

fn write_output(name: &str, derived: &Gpx) -> Result<(), String> {
    let file = fs::File::create(name).map_err(|e| format!("failed to create {name}: {e}"))?;
    let mut sink = BufWriter::new(file);
    writer::write_gpx(derived, &mut sink).map_err(|e| format!("failed to write {name}: {e}"))?;
    sink.flush().map_err(|e| format!("failed to write {name}: {e}"))
}
