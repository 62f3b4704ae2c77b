//! Test fixtures for building agent archives.

use serde_json::{Value, json};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Contents of `agent.py` in [`agent_zip`].
#[allow(dead_code)]
pub const AGENT_SOURCE: &[u8] = b"def act(obs):\n    return 'hold'\n";

/// Build an in-memory zip from `(name, contents)` pairs, stored uncompressed.
#[allow(dead_code)]
pub fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in files {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Zip containing a single `agent.py`.
#[allow(dead_code)]
pub fn agent_zip() -> Vec<u8> {
    build_zip(&[("agent.py", AGENT_SOURCE)])
}

/// [`agent_zip`] with one payload byte flipped so the CRC check fails.
#[allow(dead_code)]
pub fn corrupt_agent_zip() -> Vec<u8> {
    let mut data = agent_zip();
    let offset = data
        .windows(AGENT_SOURCE.len())
        .position(|w| w == AGENT_SOURCE)
        .expect("payload present in archive");
    data[offset] ^= 0xff;
    data
}

/// Upload metadata for an agent.
#[allow(dead_code)]
pub fn agent_metadata(name: &str, load: &str) -> Value {
    json!({
        "name": name,
        "load": load,
        "side": "red",
        "param_schema": {},
        "supported_env_templates": [1001],
    })
}
