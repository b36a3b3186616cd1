//! Entry point for objpair.
//! Loads an OBJ file and reports (or dumps) the upload buffers.

use std::path::PathBuf;

use anyhow::{Result, anyhow};

fn is_on(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

fn parse_flag_arg(args: &[String], name: &str) -> bool {
    // --name[=on|off], по умолчанию off
    let prefix = format!("--{name}=");
    for arg in args {
        if arg.strip_prefix("--") == Some(name) {
            return true;
        }
        if let Some(val) = arg.strip_prefix(prefix.as_str()) {
            return is_on(val);
        }
    }
    false
}

fn parse_input_arg(args: &[String]) -> Option<PathBuf> {
    // Accept: --input=<path> or the first positional argument.
    let mut positional = None;
    for arg in args {
        if let Some(val) = arg.strip_prefix("--input=") {
            return Some(PathBuf::from(val));
        }
        if positional.is_none() && !arg.starts_with("--") {
            positional = Some(PathBuf::from(arg));
        }
    }
    positional
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = parse_input_arg(&args)
        .ok_or_else(|| anyhow!("Usage: objpair [--dump] [--bytes] <file.obj | --input=file.obj>"))?;
    let dump = parse_flag_arg(&args, "dump");
    let bytes = parse_flag_arg(&args, "bytes");
    log::info!("Starting objpair. input={}, dump={}, bytes={}", input.display(), dump, bytes);

    let mesh = asset::load_obj_from_path(&input)?;

    if let Some(name) = &mesh.object_name {
        log::info!("Object: {}", name);
    }
    if let Some(lib) = &mesh.material_library {
        log::info!("Material library: {}", lib);
    }
    if bytes {
        log::info!(
            "Upload sizes: positions={}B, texcoords={}B, indices={}B",
            mesh.position_bytes().len(),
            mesh.texcoord_bytes().len(),
            mesh.index_bytes().len()
        );
    }
    if dump {
        println!("positions: {:?}", mesh.positions);
        println!("texcoords: {:?}", mesh.texcoords);
        println!("indices: {:?}", mesh.indices);
    }

    Ok(())
}
