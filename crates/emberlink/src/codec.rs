//! Fixed-width big-endian encode/decode of the 24-byte segment header.
//!
//! Layout (offset, width): conv(0,4) cmd(4,1) frg(5,1) wnd(6,2) ts(8,4)
//! sn(12,4) una(16,4) len(20,4). No length prefixes beyond `len`.

use crate::error::CodecError;
use crate::segment::Command;
use emberlink_binary::{BinaryReader, BinaryWriter};

/// Header size in bytes, on the wire.
pub const HEADER_SIZE: usize = 24;

/// A decoded header, before the payload (still sitting in the caller's
/// buffer) has been sliced off.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub conv: u32,
    pub cmd: Command,
    pub frg: u8,
    pub wnd: u16,
    pub ts: u32,
    pub sn: u32,
    pub una: u32,
    pub len: u32,
}

/// Decodes one header from the front of `reader`. Does not touch the
/// payload bytes that follow; the caller is responsible for checking
/// `reader.remaining() >= header.len` and slicing those off separately,
/// since "not enough payload bytes" is a protocol-level condition
/// (`InputError::Truncated`), not a codec error.
pub fn decode_header(reader: &mut impl BinaryReader) -> Result<Header, CodecError> {
    let conv = decode_conv(reader)?;
    decode_header_after_conv(reader, conv)
}

/// Decodes just the leading `conv` field. Split out from `decode_header` so
/// callers (`Session::input`) can reject a `conv` mismatch (spec §4.3.1 step
/// 1) before the `cmd` byte — read in `decode_header_after_conv` — is even
/// considered for validity (step 2), matching the reference implementation's
/// check order.
pub fn decode_conv(reader: &mut impl BinaryReader) -> Result<u32, CodecError> {
    Ok(reader.read_u32_be()?)
}

/// Decodes the remainder of a header (everything after `conv`, which the
/// caller has already read and is passing back in).
pub fn decode_header_after_conv(reader: &mut impl BinaryReader, conv: u32) -> Result<Header, CodecError> {
    let cmd_byte = reader.read_u8()?;
    let cmd = Command::from_u8(cmd_byte).ok_or(CodecError::UnknownCommand(cmd_byte))?;
    let frg = reader.read_u8()?;
    let wnd = reader.read_u16_be()?;
    let ts = reader.read_u32_be()?;
    let sn = reader.read_u32_be()?;
    let una = reader.read_u32_be()?;
    let len = reader.read_u32_be()?;
    Ok(Header {
        conv,
        cmd,
        frg,
        wnd,
        ts,
        sn,
        una,
        len,
    })
}

/// Encodes a header (and nothing else — the payload is appended separately
/// by the caller) into `writer`.
#[allow(clippy::too_many_arguments)]
pub fn encode_header(
    writer: &mut impl BinaryWriter,
    conv: u32,
    cmd: Command,
    frg: u8,
    wnd: u16,
    ts: u32,
    sn: u32,
    una: u32,
    len: u32,
) {
    writer.write_u32_be(conv);
    writer.write_u8(cmd as u8);
    writer.write_u8(frg);
    writer.write_u16_be(wnd);
    writer.write_u32_be(ts);
    writer.write_u32_be(sn);
    writer.write_u32_be(una);
    writer.write_u32_be(len);
}
