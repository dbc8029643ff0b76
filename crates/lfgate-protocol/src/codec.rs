//! Byte-level reading and writing for the LFG wire format.
//!
//! The format is the game client's: fixed-width little-endian integers
//! and null-terminated strings, no self-describing framing. That means
//! the *shape* of a message lives in the code that reads or writes it,
//! so every read goes through [`WireReader`], which refuses to run past
//! the end of the buffer instead of panicking.
//!
//! Writing goes the other way: each server message knows its exact
//! size up front ([`ServerMessage::wire_size`]) and
//! [`WorldPacket::build`] reserves exactly that much before encoding.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{Malformed, Opcode};

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// A bounds-checked cursor over a message body.
///
/// Wraps a borrowed slice; `&[u8]` implements [`Buf`], so each read
/// advances the slice itself and `remaining()` is just its length.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    len: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            len: buf.len(),
        }
    }

    /// Byte offset of the next read, relative to the start of the body.
    pub fn position(&self) -> usize {
        self.len - self.buf.remaining()
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), Malformed> {
        if self.buf.remaining() < needed {
            return Err(Malformed::Truncated {
                offset: self.position(),
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, Malformed> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u32(&mut self) -> Result<u32, Malformed> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_i32(&mut self) -> Result<i32, Malformed> {
        self.ensure(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_u64(&mut self) -> Result<u64, Malformed> {
        self.ensure(8)?;
        Ok(self.buf.get_u64_le())
    }

    /// Skips `n` bytes whose content the protocol reserves but never uses.
    pub fn skip(&mut self, n: usize) -> Result<(), Malformed> {
        self.ensure(n)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Reads a null-terminated string and consumes the terminator.
    pub fn read_cstring(&mut self) -> Result<String, Malformed> {
        let offset = self.position();
        let end = self
            .buf
            .iter()
            .position(|&b| b == 0)
            .ok_or(Malformed::UnterminatedString { offset })?;

        let value = std::str::from_utf8(&self.buf[..end])
            .map_err(|_| Malformed::InvalidUtf8 { offset })?
            .to_owned();
        self.buf.advance(end + 1);
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Number of bytes [`put_cstring`] writes for `s`.
///
/// The wire string ends at the first NUL, so anything after an embedded
/// NUL is not sent.
pub fn cstring_size(s: &str) -> usize {
    cstring_bytes(s).len() + 1
}

/// Writes `s` as a null-terminated string.
pub fn put_cstring(buf: &mut impl BufMut, s: &str) {
    buf.put_slice(cstring_bytes(s));
    buf.put_u8(0);
}

fn cstring_bytes(s: &str) -> &[u8] {
    let bytes = s.as_bytes();
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// A message the server sends to a client.
///
/// Implementors describe one packet layout. `wire_size` must return
/// exactly the number of bytes `encode` writes. Sizes are computed
/// from element counts, never by encoding twice.
pub trait ServerMessage {
    /// The opcode this message is sent under.
    fn opcode(&self) -> Opcode;

    /// Exact encoded body size in bytes.
    fn wire_size(&self) -> usize;

    /// Appends the body to `buf`.
    fn encode(&self, buf: &mut BytesMut);
}

// ---------------------------------------------------------------------------
// WorldPacket
// ---------------------------------------------------------------------------

/// An opcode plus an encoded body: the unit exchanged with the session
/// transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldPacket {
    opcode: Opcode,
    body: Bytes,
}

impl WorldPacket {
    /// Wraps an already encoded body, typically one read off a connection.
    pub fn new(opcode: Opcode, body: impl Into<Bytes>) -> Self {
        Self {
            opcode,
            body: body.into(),
        }
    }

    /// Encodes a server message into a packet of exactly its wire size.
    pub fn build<M: ServerMessage>(msg: &M) -> Self {
        let size = msg.wire_size();
        let mut buf = BytesMut::with_capacity(size);
        msg.encode(&mut buf);
        debug_assert_eq!(
            buf.len(),
            size,
            "{:?} wrote {} bytes but reserved {}",
            msg.opcode(),
            buf.len(),
            size
        );
        Self {
            opcode: msg.opcode(),
            body: buf.freeze(),
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_reads_little_endian() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff, 0x07];
        let mut r = WireReader::new(&data);

        assert_eq!(r.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(r.read_i32().unwrap(), -1);
        assert_eq!(r.read_u8().unwrap(), 7);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_reader_truncated_read_reports_offset() {
        let data = [1, 2, 3, 4, 5];
        let mut r = WireReader::new(&data);
        r.read_u8().unwrap();

        let err = r.read_u64().unwrap_err();
        assert_eq!(
            err,
            Malformed::Truncated {
                offset: 1,
                needed: 8,
                remaining: 4,
            }
        );
        // A failed read consumes nothing.
        assert_eq!(r.position(), 1);
    }

    #[test]
    fn test_reader_skip_past_end_fails() {
        let mut r = WireReader::new(&[0, 0]);
        assert!(r.skip(2).is_ok());
        assert!(r.skip(1).is_err());
    }

    #[test]
    fn test_reader_cstring_consumes_terminator() {
        let mut r = WireReader::new(b"hi\0x");
        assert_eq!(r.read_cstring().unwrap(), "hi");
        assert_eq!(r.read_u8().unwrap(), b'x');
    }

    #[test]
    fn test_reader_empty_cstring() {
        let mut r = WireReader::new(b"\0");
        assert_eq!(r.read_cstring().unwrap(), "");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_reader_unterminated_cstring() {
        let mut r = WireReader::new(b"abc");
        assert_eq!(
            r.read_cstring(),
            Err(Malformed::UnterminatedString { offset: 0 })
        );
    }

    #[test]
    fn test_reader_invalid_utf8_cstring() {
        let mut r = WireReader::new(&[0xff, 0xfe, 0x00]);
        assert_eq!(r.read_cstring(), Err(Malformed::InvalidUtf8 { offset: 0 }));
    }

    #[test]
    fn test_put_cstring_stops_at_embedded_nul() {
        let mut buf = BytesMut::new();
        put_cstring(&mut buf, "ab\0cd");
        assert_eq!(&buf[..], b"ab\0");
        assert_eq!(cstring_size("ab\0cd"), 3);
        assert_eq!(cstring_size(""), 1);
    }

    struct Fixed;

    impl ServerMessage for Fixed {
        fn opcode(&self) -> Opcode {
            Opcode::SmsgLfgQueueStatus
        }

        fn wire_size(&self) -> usize {
            5
        }

        fn encode(&self, buf: &mut BytesMut) {
            buf.put_u32_le(9);
            buf.put_u8(1);
        }
    }

    #[test]
    fn test_build_packet_carries_opcode_and_body() {
        let packet = WorldPacket::build(&Fixed);
        assert_eq!(packet.opcode(), Opcode::SmsgLfgQueueStatus);
        assert_eq!(packet.body(), &[9, 0, 0, 0, 1]);
        assert_eq!(packet.len(), 5);
    }
}
