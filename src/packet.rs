//! Encoding of the control packet that sets a single monitor property.
//!
//! The packet is written as one HID output report and has a fixed layout:
//!
//! ```text
//! offset  0       null byte, required in front of the report
//! offset  1..=11  header: 40 c6 00 00 00 00 20 00 6e 00 80
//! offset 12..65   zero padding
//! offset 65..68   preamble: 51, 0x81 + body length, 03
//! offset 68..72   body: code high byte, code low byte, 00, value
//! offset 72..193  zero padding
//! ```
use tracing::trace;

use crate::properties::{OutOfRange, Property};

/// Length of the whole packet: the leading null byte and a 192 byte report.
pub const PACKET_LENGTH: usize = 192 + 1;
/// Offset at which the preamble starts: the 0x40 byte header plus the leading null byte.
pub const HEADER_LENGTH: usize = 0x40 + 1;
pub const PREAMBLE_LENGTH: usize = 3;
pub const BODY_LENGTH: usize = 4;
/// The longest message body a preamble length marker can describe.
pub const MAX_BODY_LENGTH: usize = (u8::MAX - PREAMBLE_LENGTH_BASE) as usize;

const HEADER: [u8; 11] = [0x40, 0xc6, 0x00, 0x00, 0x00, 0x00, 0x20, 0x00, 0x6e, 0x00, 0x80];
const PREAMBLE_OPCODE: u8 = 0x51;
const PREAMBLE_LENGTH_BASE: u8 = 0x81;
const PREAMBLE_MARKER: u8 = 0x03;

#[derive(Clone, PartialEq, Eq)]
pub struct ControlPacket([u8; PACKET_LENGTH]);

impl ControlPacket {
    pub fn as_bytes(&self) -> &[u8; PACKET_LENGTH] {
        &self.0
    }

    pub fn preamble(&self) -> &[u8] {
        &self.0[HEADER_LENGTH..][..PREAMBLE_LENGTH]
    }

    pub fn body(&self) -> &[u8] {
        &self.0[HEADER_LENGTH + PREAMBLE_LENGTH..][..BODY_LENGTH]
    }
}

impl std::fmt::Debug for ControlPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ControlPacket").field(&&self.0[..]).finish()
    }
}

/// Hex dump, sixteen bytes per line, each line prefixed with its offset.
impl std::fmt::Display for ControlPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (line, chunk) in self.0.chunks(16).enumerate() {
            if line != 0 {
                f.write_str("\n")?;
            }
            f.write_fmt(format_args!("{:04x}:", line * 16))?;
            for byte in chunk {
                f.write_fmt(format_args!(" {byte:02x}"))?;
            }
        }
        Ok(())
    }
}

/// Cursor over a zeroed packet buffer.
///
/// Fields are placed in order; skipping ahead leaves zero padding behind.
struct PacketWriter {
    buffer: [u8; PACKET_LENGTH],
    position: usize,
}

impl PacketWriter {
    fn new() -> Self {
        Self { buffer: [0; PACKET_LENGTH], position: 0 }
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        assert!(end <= PACKET_LENGTH, "control packet overflows {PACKET_LENGTH} bytes");
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    fn pad_to(&mut self, offset: usize) {
        assert!(
            self.position <= offset && offset <= PACKET_LENGTH,
            "cannot pad from offset {} to {offset}",
            self.position
        );
        self.position = offset;
    }

    fn finish(mut self) -> ControlPacket {
        self.pad_to(PACKET_LENGTH);
        ControlPacket(self.buffer)
    }
}

pub fn message_body(code: u16, value: u8) -> [u8; BODY_LENGTH] {
    let [high, low] = code.to_be_bytes();
    [high, low, 0x00, value]
}

/// The preamble announces the length of the message body that follows it.
///
/// Only four byte bodies have been observed to work with the device.
pub fn preamble(body_length: usize) -> [u8; PREAMBLE_LENGTH] {
    assert!(body_length <= MAX_BODY_LENGTH, "message body of {body_length} bytes is too long");
    [PREAMBLE_OPCODE, PREAMBLE_LENGTH_BASE + body_length as u8, PREAMBLE_MARKER]
}

/// Build the packet that sets `property` to `value`.
pub fn encode(property: &Property, value: i64) -> Result<ControlPacket, OutOfRange> {
    let value = property.validate(value)?;
    let body = message_body(property.code, value);
    let preamble = preamble(body.len());

    let mut writer = PacketWriter::new();
    writer.put(&[0x00]);
    writer.put(&HEADER);
    writer.pad_to(HEADER_LENGTH);
    writer.put(&preamble);
    writer.put(&body);
    let packet = writer.finish();
    trace!(message = "encoded control packet", property = property.name, value, packet = ?packet);
    Ok(packet)
}
