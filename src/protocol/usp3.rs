// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! USP3 frame encoding.
//!
//! A frame on the wire looks like this:
//!
//! ```text
//! 0xCA | addr[2] addr[1] addr[0] | len_hi len_lo | cmd | payload... | crc_hi crc_lo
//!  raw   \________________________ cooked (byte-stuffed) ______________________/
//! ```
//!
//! `len` counts the command byte plus the payload. The CRC runs over the
//! logical (unescaped) bytes from the address up to the last payload byte.
//! Cooking replaces `0xCA` with `0xCB 0x00` and `0xCB` with `0xCB 0x01`, so
//! the start marker only ever appears once, at the head of the frame.

use std::io::Write;

use crate::command::Command;
use crate::error::{Error, FrameError};
use crate::types::DeviceAddress;

/// Raw byte that opens every frame.
pub const START_MARKER: u8 = 0xCA;

/// Byte that introduces an escape sequence.
pub const ESCAPE_MARKER: u8 = 0xCB;

/// Initial value of the running checksum.
pub const CRC_INIT: u16 = 0x173F;

/// Polynomial applied on each set low bit.
const CRC_POLY: u16 = 0xA001;

/// Largest payload the length field can describe (it also counts the
/// command byte).
pub const MAX_PAYLOAD_LEN: usize = 65_534;

/// A logical USP3 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Target device.
    pub address: DeviceAddress,
    /// Command byte.
    pub command: u8,
    /// Command payload.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Creates a frame.
    #[must_use]
    pub fn new(address: DeviceAddress, command: u8, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            command,
            payload: payload.into(),
        }
    }

    /// Value of the length field: command byte plus payload.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLong` if the payload is longer than
    /// [`MAX_PAYLOAD_LEN`].
    pub fn data_length(&self) -> Result<u16, FrameError> {
        u16::try_from(self.payload.len() + 1).map_err(|_| FrameError::PayloadTooLong {
            len: self.payload.len(),
            max: MAX_PAYLOAD_LEN,
        })
    }

    /// Logical bytes covered by the checksum, in wire order.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLong` if the payload does not fit the
    /// length field.
    pub fn header_and_body(&self) -> Result<Vec<u8>, FrameError> {
        let length = self.data_length()?;
        let mut bytes = Vec::with_capacity(6 + self.payload.len());
        bytes.extend_from_slice(&self.address.to_bytes());
        bytes.extend_from_slice(&length.to_be_bytes());
        bytes.push(self.command);
        bytes.extend_from_slice(&self.payload);
        Ok(bytes)
    }

    /// Checksum of this frame.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLong` if the payload does not fit the
    /// length field.
    pub fn crc(&self) -> Result<u16, FrameError> {
        Ok(crc16(&self.header_and_body()?))
    }

    /// Renders the frame as wire bytes.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLong` if the payload does not fit the
    /// length field.
    pub fn encode(&self) -> Result<Vec<u8>, FrameError> {
        let mut logical = self.header_and_body()?;
        let crc = crc16(&logical);
        logical.extend_from_slice(&crc.to_be_bytes());

        let mut wire = Vec::with_capacity(logical.len() * 2 + 1);
        wire.push(START_MARKER);
        for byte in logical {
            cook(byte, &mut wire);
        }
        Ok(wire)
    }
}

/// Encodes `(address, command, payload)` into wire bytes.
///
/// # Examples
///
/// ```
/// use chromobridge::protocol::usp3::{encode_frame, START_MARKER};
/// use chromobridge::types::DeviceAddress;
///
/// let wire = encode_frame(DeviceAddress::BROADCAST, 0x7E, &[18, 1])?;
/// assert_eq!(wire[0], START_MARKER);
/// assert!(!wire[1..].contains(&START_MARKER));
/// # Ok::<(), chromobridge::FrameError>(())
/// ```
///
/// # Errors
///
/// Returns `FrameError::PayloadTooLong` if `payload` is longer than
/// [`MAX_PAYLOAD_LEN`].
pub fn encode_frame(
    address: DeviceAddress,
    command: u8,
    payload: &[u8],
) -> Result<Vec<u8>, FrameError> {
    Frame::new(address, command, payload).encode()
}

/// Runs the USP3 checksum over `bytes`.
#[must_use]
pub fn crc16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(CRC_INIT, |crc, &byte| crc_step(crc, byte))
}

fn crc_step(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ u16::from(byte);
    for _ in 0..8 {
        crc = if crc & 1 == 1 {
            (crc >> 1) ^ CRC_POLY
        } else {
            crc >> 1
        };
    }
    crc
}

/// Appends `byte` to `out`, escaping marker values.
fn cook(byte: u8, out: &mut Vec<u8>) {
    match byte {
        START_MARKER => out.extend_from_slice(&[ESCAPE_MARKER, 0]),
        ESCAPE_MARKER => out.extend_from_slice(&[ESCAPE_MARKER, 1]),
        other => out.push(other),
    }
}

/// Reverses [`cook`] over the body of a frame (everything after the start
/// marker).
///
/// # Errors
///
/// Returns `FrameError` on a raw marker or an unknown escape code.
pub fn uncook(body: &[u8]) -> Result<Vec<u8>, FrameError> {
    let mut out = Vec::with_capacity(body.len());
    let mut bytes = body.iter().copied();
    while let Some(byte) = bytes.next() {
        match byte {
            START_MARKER => return Err(FrameError::StrayMarker(START_MARKER)),
            ESCAPE_MARKER => match bytes.next() {
                Some(0) => out.push(START_MARKER),
                Some(1) => out.push(ESCAPE_MARKER),
                Some(code) => return Err(FrameError::InvalidEscape(code)),
                None => return Err(FrameError::Truncated),
            },
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Decodes one complete frame from wire bytes and verifies its checksum.
///
/// # Errors
///
/// Returns `FrameError` if the bytes are not a well-formed frame.
pub fn decode_frame(wire: &[u8]) -> Result<Frame, FrameError> {
    let Some((&START_MARKER, body)) = wire.split_first() else {
        return Err(FrameError::MissingStartMarker);
    };
    let logical = uncook(body)?;
    // address(3) + length(2) + command(1) + crc(2)
    if logical.len() < 8 {
        return Err(FrameError::Truncated);
    }

    let (covered, crc_bytes) = logical.split_at(logical.len() - 2);
    let carried = u16::from_be_bytes([crc_bytes[0], crc_bytes[1]]);
    let computed = crc16(covered);
    if carried != computed {
        return Err(FrameError::CrcMismatch {
            expected: computed,
            actual: carried,
        });
    }

    let address = DeviceAddress::from_bytes([covered[0], covered[1], covered[2]]);
    let declared = usize::from(u16::from_be_bytes([covered[3], covered[4]]));
    let data = &covered[5..];
    if declared != data.len() {
        return Err(FrameError::LengthMismatch {
            declared,
            actual: data.len(),
        });
    }

    Ok(Frame {
        address,
        command: data[0],
        payload: data[1..].to_vec(),
    })
}

/// Writes commands as USP3 frames to a byte sink.
///
/// Every frame is written in full and flushed before `send` returns. Sink
/// errors are returned as [`Error::Transport`].
#[derive(Debug)]
pub struct FrameWriter<W> {
    sink: W,
    frames_sent: u64,
}

impl<W: Write> FrameWriter<W> {
    /// Wraps an open byte sink.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            frames_sent: 0,
        }
    }

    /// Encodes `command` for `address` and writes it out.
    ///
    /// # Errors
    ///
    /// Returns `Error::Frame` if the payload is too long and
    /// `Error::Transport` if the sink fails to write or flush.
    pub fn send<C: Command + ?Sized>(
        &mut self,
        address: DeviceAddress,
        command: &C,
    ) -> Result<(), Error> {
        let frame = Frame::new(address, command.opcode(), command.payload());
        self.send_frame(&frame)
    }

    /// Writes an already built frame.
    ///
    /// Nothing reaches the sink if the frame cannot be encoded.
    ///
    /// # Errors
    ///
    /// Returns `Error::Frame` if the payload is too long and
    /// `Error::Transport` if the sink fails to write or flush.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        let wire = frame.encode()?;
        tracing::debug!(
            address = %frame.address,
            command = frame.command,
            payload = ?frame.payload,
            "Sending USP3 frame"
        );
        tracing::trace!(bytes = %hex(&wire), "USP3 wire bytes");

        self.sink.write_all(&wire)?;
        self.sink.flush()?;
        self.frames_sent += 1;
        Ok(())
    }

    /// Number of frames written successfully.
    #[must_use]
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Returns a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Unwraps the writer, returning the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Formats bytes as space separated hex.
fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a captured byte stream into frames at each start marker.
///
/// Useful for inspecting what a [`FrameWriter`] produced.
#[must_use]
pub fn split_frames(stream: &[u8]) -> Vec<&[u8]> {
    let mut frames = Vec::new();
    let mut start = None;
    for (i, &byte) in stream.iter().enumerate() {
        if byte == START_MARKER {
            if let Some(s) = start {
                frames.push(&stream[s..i]);
            }
            start = Some(i);
        }
    }
    if let Some(s) = start {
        frames.push(&stream[s..]);
    }
    frames
}
