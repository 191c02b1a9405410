//! Minimal RIFF/WAVE codec for the fixed recording format.

use super::{AudioError, BITS_PER_SAMPLE, BYTES_PER_FRAME, CHANNELS, SAMPLE_RATE};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

const FORMAT_PCM: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
const HEADER_LEN: usize = 44;

/// Wraps raw PCM in a 44-byte canonical WAV header. A trailing partial frame is dropped.
pub fn encode(pcm: &[u8]) -> Vec<u8> {
    let pcm = &pcm[..pcm.len() - pcm.len() % BYTES_PER_FRAME];
    let data_len = pcm.len() as u32;
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = SAMPLE_RATE * block_align as u32;

    let mut out = Vec::with_capacity(HEADER_LEN + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}

/// Extracts the PCM payload, rejecting anything but mono 16-bit 44.1 kHz PCM.
/// Chunks other than `fmt ` and `data` are skipped.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>, AudioError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(AudioError::UnsupportedFormat("missing RIFF/WAVE header".to_string()));
    }

    let mut pos = 12;
    let mut seen_format = false;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = read_u32(bytes, pos + 4) as usize;
        let body_start = pos + 8;
        let body_end = body_start
            .checked_add(size)
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| AudioError::UnsupportedFormat("truncated chunk".to_string()))?;
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => {
                check_format(body)?;
                seen_format = true;
            }
            b"data" if seen_format => return Ok(body.to_vec()),
            b"data" => {
                return Err(AudioError::UnsupportedFormat("data chunk before fmt chunk".to_string()));
            }
            _ => {}
        }
        // chunks are word aligned
        pos = body_end + (size & 1);
    }
    Err(AudioError::UnsupportedFormat("no data chunk".to_string()))
}

fn check_format(body: &[u8]) -> Result<(), AudioError> {
    if body.len() < FMT_CHUNK_LEN as usize {
        return Err(AudioError::UnsupportedFormat("short fmt chunk".to_string()));
    }
    let format = read_u16(body, 0);
    let channels = read_u16(body, 2);
    let rate = read_u32(body, 4);
    let bits = read_u16(body, 14);
    if format != FORMAT_PCM || channels != CHANNELS || rate != SAMPLE_RATE || bits != BITS_PER_SAMPLE {
        return Err(AudioError::UnsupportedFormat(format!(
            "expected mono 16-bit {} Hz PCM, got format {} with {} channel(s), {}-bit, {} Hz",
            SAMPLE_RATE, format, channels, bits, rate
        )));
    }
    Ok(())
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Writes a WAV file, replacing any previous recording in one step.
pub fn write_wav(path: &Path, pcm: &[u8]) -> Result<(), AudioError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&encode(pcm))?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn read_wav(path: &Path) -> Result<Vec<u8>, AudioError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AudioError::NoRecording(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    decode(&bytes)
}
