//! In-memory archive construction shared by the integration tests.

#![allow(dead_code)]

use std::io::Read;

pub const STORED: u16 = 0;
pub const DEFLATED: u16 = 8;

const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
const CENTRAL_DIRECTORY_HEADER_SIGNATURE: u32 = 0x02014b50;
const CENTRAL_DIRECTORY_END_SIGNATURE: u32 = 0x06054b50;

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::read::DeflateEncoder::new(data, flate2::Compression::default());
    let mut out = Vec::new();
    encoder.read_to_end(&mut out).unwrap();
    out
}

fn payload_for(data: &[u8], method: u16) -> Vec<u8> {
    match method {
        DEFLATED => deflate(data),
        _ => data.to_vec(),
    }
}

/// Local file header followed by the payload.
pub fn local_entry(name: &[u8], data: &[u8], method: u16) -> Vec<u8> {
    let payload = payload_for(data, method);
    let mut out = Vec::new();
    out.extend_from_slice(&LOCAL_FILE_HEADER_SIGNATURE.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&method.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(&payload);
    out
}

/// Central directory header for an entry written by [`local_entry`].
pub fn central_header(name: &[u8], data: &[u8], method: u16, header_start: u32) -> Vec<u8> {
    central_header_with_extra(name, data, method, header_start, &[])
}

pub fn central_header_with_extra(
    name: &[u8],
    data: &[u8],
    method: u16,
    header_start: u32,
    extra: &[u8],
) -> Vec<u8> {
    let payload = payload_for(data, method);
    let mut out = Vec::new();
    out.extend_from_slice(&CENTRAL_DIRECTORY_HEADER_SIGNATURE.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&method.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&(extra.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&header_start.to_le_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(extra);
    out
}

/// End-of-central-directory record.
pub fn end_record(count: u16, cd_size: u32, cd_offset: u32, comment: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&CENTRAL_DIRECTORY_END_SIGNATURE.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
    out.extend_from_slice(comment);
    out
}

/// A complete well-formed archive: `(name, contents, method)` triples plus a
/// trailer comment.
pub fn build_archive(entries: &[(&[u8], &[u8], u16)], comment: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();
    for &(name, data, method) in entries {
        let header_start = out.len() as u32;
        out.extend_from_slice(&local_entry(name, data, method));
        central.extend_from_slice(&central_header(name, data, method, header_start));
    }
    let cd_offset = out.len() as u32;
    out.extend_from_slice(&central);
    out.extend_from_slice(&end_record(
        entries.len() as u16,
        central.len() as u32,
        cd_offset,
        comment,
    ));
    out
}
