//! WebSocket frame encoding for [`RelayEvent`]s.
//!
//! Frames are JSON text: `{"event": "<name>", "payload": <value>}`. The
//! payload is never validated beyond being well-formed JSON. A missing
//! payload is read as `null`, and a payload sent with `wipeAllViews` is
//! ignored.

use serde::Deserialize;

use crate::domain::{RelayEvent, ViewRecord};

/// Failure to turn a text frame into a [`RelayEvent`] or back.
///
/// Frame errors never reach an HTTP response; the connection loop logs
/// them and drops the frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame is not JSON or lacks an `event` name.
    #[error("frame codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The frame names an event the relay does not know.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
}

/// Inbound envelope before the event name is resolved.
#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Decodes an inbound text frame.
///
/// # Errors
///
/// Returns [`FrameError::Codec`] if the text is not a JSON object with a
/// string `event`, and [`FrameError::UnknownEvent`] if that name is not
/// one of the relay events.
pub fn decode(text: &str) -> Result<RelayEvent, FrameError> {
    let frame: Frame = serde_json::from_str(text)?;
    match frame.event.as_str() {
        "synchWithMe" => Ok(RelayEvent::SynchWithMe(frame.payload)),
        "newCameraView" => Ok(RelayEvent::NewCameraView(ViewRecord::new(frame.payload))),
        "wipeAllViews" => Ok(RelayEvent::WipeAllViews),
        _ => Err(FrameError::UnknownEvent(frame.event)),
    }
}

/// Encodes an outbound event as a text frame.
///
/// # Errors
///
/// Returns [`FrameError::Codec`] if serialization fails.
pub fn encode(event: &RelayEvent) -> Result<String, FrameError> {
    Ok(serde_json::to_string(event)?)
}

/// Encodes the replay of one stored view.
///
/// # Errors
///
/// Returns [`FrameError::Codec`] if serialization fails.
pub fn encode_replay(view: ViewRecord) -> Result<String, FrameError> {
    encode(&RelayEvent::NewCameraView(view))
}
