// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocols on both sides of the bridge.
//!
//! - [`usp3`]: frame encoding for the controller bus
//! - [`topic_router`]: turning MQTT set topics into [`SetRequest`]s
//! - [`MqttSession`]: the broker connection (feature `mqtt`)
//! - [`serial`]: opening the controller serial line (feature `serial`)

#[cfg(feature = "mqtt")]
mod mqtt;
#[cfg(feature = "serial")]
pub mod serial;
pub mod topic_router;
pub mod usp3;

#[cfg(feature = "mqtt")]
pub use mqtt::{MqttSession, STATUS_CONNECTED, STATUS_DISCONNECTED, SessionEvent};
pub use topic_router::{SetPayload, SetRequest, SetTarget, TopicRouter, parse_int};
pub use usp3::{Frame, FrameWriter, decode_frame, encode_frame};
