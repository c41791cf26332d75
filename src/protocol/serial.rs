// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serial line to the Chromoflex controllers.
//!
//! Controllers listen at 9600 baud, 8 data bits, no parity, one stop bit
//! and no flow control.

use std::time::Duration;

use serialport::SerialPort;

use crate::error::ProtocolError;

/// Line speed of the USP3 bus.
pub const BAUD_RATE: u32 = 9600;

/// Write timeout of the opened port.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Opens `path` configured for the USP3 bus.
///
/// The returned port implements [`std::io::Write`] and can be handed to a
/// [`Bridge`](crate::Bridge) directly.
///
/// # Errors
///
/// Returns `ProtocolError::InvalidAddress` for an empty path and
/// `ProtocolError::Serial` if the port cannot be opened or configured.
pub fn open(path: &str) -> Result<Box<dyn SerialPort>, ProtocolError> {
    if path.is_empty() {
        return Err(ProtocolError::InvalidAddress(
            "serial device path is empty".to_string(),
        ));
    }

    let port = serialport::new(path, BAUD_RATE)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(WRITE_TIMEOUT)
        .open()?;

    tracing::info!(path = %path, baud = BAUD_RATE, "Opened serial port");
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_is_rejected() {
        let err = open("").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidAddress(_)));
    }

    #[test]
    fn missing_device_is_serial_error() {
        let err = open("/dev/chromobridge-does-not-exist").unwrap_err();
        assert!(matches!(err, ProtocolError::Serial(_)));
    }
}
