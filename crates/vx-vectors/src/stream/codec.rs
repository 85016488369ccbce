//! Binary framing for staged batches.
//!
//! Format (little-endian):
//! header: magic `VXST` | version(u16)
//! frame:  count(u32) | dim(u32) | [id | vector(f32 * dim) | metadata] * count
//! id:     tag(u8) 0 => i64, 1 => len(u32) + utf-8 bytes
//! meta:   flag(u8) 0 => none, 1 => len(u32) + json bytes

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use vx_core::RecordId;

use crate::batch::{Batch, BatchEntry};
use crate::error::{Result, VectorsError};

pub(crate) const MAGIC: &[u8; 4] = b"VXST";
pub(crate) const VERSION: u16 = 1;

const ID_INT: u8 = 0;
const ID_TEXT: u8 = 1;

const META_NONE: u8 = 0;
const META_JSON: u8 = 1;

// Upper bound for up-front allocations driven by values read from disk.
const PREALLOC_LIMIT: usize = 1 << 16;

pub(crate) fn write_header<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(MAGIC)?;
    w.write_u16::<LittleEndian>(VERSION)
}

pub(crate) fn read_header<R: Read>(r: &mut R) -> Result<()> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)
        .map_err(|_| VectorsError::Corrupt("missing stream header".into()))?;
    if &magic != MAGIC {
        return Err(VectorsError::Corrupt("bad magic".into()));
    }
    let version = r
        .read_u16::<LittleEndian>()
        .map_err(|_| VectorsError::Corrupt("missing stream version".into()))?;
    if version != VERSION {
        return Err(VectorsError::Corrupt(format!("unsupported version {version}")));
    }
    Ok(())
}

/// Encode one batch into a frame. Every vector must share the batch dimension.
pub(crate) fn encode_batch(batch: &Batch) -> Result<Vec<u8>> {
    let dim = batch.dimension();
    let mut buf = Vec::with_capacity(8 + batch.len() * (dim * 4 + 16));
    buf.write_u32::<LittleEndian>(batch.len() as u32)?;
    buf.write_u32::<LittleEndian>(dim as u32)?;
    for entry in &batch.entries {
        if entry.vector.len() != dim {
            return Err(VectorsError::DimensionMismatch {
                id: entry.id.clone(),
                expected: dim,
                got: entry.vector.len(),
            });
        }
        write_id(&mut buf, &entry.id)?;
        for &v in &entry.vector {
            buf.write_f32::<LittleEndian>(v)?;
        }
        match &entry.metadata {
            None => buf.push(META_NONE),
            Some(meta) => {
                let bytes = serde_json::to_vec(meta).map_err(io::Error::other)?;
                buf.push(META_JSON);
                buf.write_u32::<LittleEndian>(bytes.len() as u32)?;
                buf.write_all(&bytes)?;
            }
        }
    }
    Ok(buf)
}

/// Decode the next frame. `Ok(None)` on a clean end of stream.
pub(crate) fn read_batch<R: Read>(r: &mut R) -> Result<Option<Batch>> {
    let mut head = [0u8; 4];
    match read_fully(r, &mut head)? {
        0 => return Ok(None),
        4 => {}
        n => return Err(VectorsError::Corrupt(format!("truncated frame header ({n} bytes)"))),
    }
    let count = u32::from_le_bytes(head) as usize;
    let dim = r.read_u32::<LittleEndian>().map_err(truncated)? as usize;
    if count == 0 || dim == 0 {
        return Err(VectorsError::Corrupt(format!("empty frame (count={count}, dim={dim})")));
    }

    let mut entries = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for _ in 0..count {
        let id = read_id(r)?;
        let mut vector = Vec::with_capacity(dim.min(PREALLOC_LIMIT));
        for _ in 0..dim {
            vector.push(r.read_f32::<LittleEndian>().map_err(truncated)?);
        }
        let metadata = match r.read_u8().map_err(truncated)? {
            META_NONE => None,
            META_JSON => {
                let bytes = read_len_prefixed(r)?;
                Some(
                    serde_json::from_slice(&bytes)
                        .map_err(|e| VectorsError::Corrupt(format!("metadata: {e}")))?,
                )
            }
            flag => return Err(VectorsError::Corrupt(format!("unknown metadata flag {flag}"))),
        };
        entries.push(BatchEntry { id, vector, metadata });
    }
    Ok(Some(Batch::new(entries)))
}

fn write_id(buf: &mut Vec<u8>, id: &RecordId) -> io::Result<()> {
    match id {
        RecordId::Int(v) => {
            buf.push(ID_INT);
            buf.write_i64::<LittleEndian>(*v)
        }
        RecordId::Text(s) => {
            buf.push(ID_TEXT);
            buf.write_u32::<LittleEndian>(s.len() as u32)?;
            buf.write_all(s.as_bytes())
        }
    }
}

fn read_id<R: Read>(r: &mut R) -> Result<RecordId> {
    match r.read_u8().map_err(truncated)? {
        ID_INT => Ok(RecordId::Int(r.read_i64::<LittleEndian>().map_err(truncated)?)),
        ID_TEXT => {
            let bytes = read_len_prefixed(r)?;
            String::from_utf8(bytes)
                .map(RecordId::Text)
                .map_err(|e| VectorsError::Corrupt(format!("id: {e}")))
        }
        tag => Err(VectorsError::Corrupt(format!("unknown id tag {tag}"))),
    }
}

fn read_len_prefixed<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let len = r.read_u32::<LittleEndian>().map_err(truncated)? as u64;
    let mut bytes = Vec::new();
    r.by_ref().take(len).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != len {
        return Err(VectorsError::Corrupt("truncated field".into()));
    }
    Ok(bytes)
}

fn read_fully<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn truncated(e: io::Error) -> VectorsError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        VectorsError::Corrupt("truncated frame".into())
    } else {
        VectorsError::Io(e)
    }
}
