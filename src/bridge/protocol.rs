//! # Channel Protocol
//!
//! JSON text frames of the form `{"event": <name>, "data": <payload>}`.
//!
//! Client → server: `getBreweries`, `getBreweryById` (data: id),
//! `deleteBrewery` (data: id).
//!
//! Server → client: `breweries`, `breweryDetails`, `breweryDeleted`,
//! `error`. Error frames add a sibling `code` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::aggregator::BreweryView;
use super::errors::{BridgeError, BridgeResult, ErrorCode};

pub const GET_BREWERIES: &str = "getBreweries";
pub const GET_BREWERY_BY_ID: &str = "getBreweryById";
pub const DELETE_BREWERY: &str = "deleteBrewery";

pub const BREWERIES: &str = "breweries";
pub const BREWERY_DETAILS: &str = "breweryDetails";
pub const BREWERY_DELETED: &str = "breweryDeleted";
pub const ERROR: &str = "error";

/// Wire envelope shared by both directions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
            code: None,
        }
    }
}

/// Request sent by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    GetBreweries,
    GetBreweryById(u64),
    DeleteBrewery(u64),
}

impl ClientEvent {
    /// Decode one text frame.
    ///
    /// Ids are accepted as JSON numbers or numeric strings.
    pub fn decode(text: &str) -> BridgeResult<Self> {
        let frame: Frame = serde_json::from_str(text)
            .map_err(|e| BridgeError::InvalidMessage(e.to_string()))?;

        match frame.event.as_str() {
            GET_BREWERIES => Ok(ClientEvent::GetBreweries),
            GET_BREWERY_BY_ID => Ok(ClientEvent::GetBreweryById(payload_id(&frame)?)),
            DELETE_BREWERY => Ok(ClientEvent::DeleteBrewery(payload_id(&frame)?)),
            other => Err(BridgeError::Unsupported(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::GetBreweries => GET_BREWERIES,
            ClientEvent::GetBreweryById(_) => GET_BREWERY_BY_ID,
            ClientEvent::DeleteBrewery(_) => DELETE_BREWERY,
        }
    }

    pub fn to_frame(&self) -> Frame {
        match self {
            ClientEvent::GetBreweries => Frame::new(GET_BREWERIES, Value::Null),
            ClientEvent::GetBreweryById(id) => Frame::new(GET_BREWERY_BY_ID, Value::from(*id)),
            ClientEvent::DeleteBrewery(id) => Frame::new(DELETE_BREWERY, Value::from(*id)),
        }
    }
}

fn payload_id(frame: &Frame) -> BridgeResult<u64> {
    let id = match &frame.data {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    id.ok_or_else(|| {
        BridgeError::InvalidMessage(format!(
            "{} expects a numeric brewery id, got {}",
            frame.event, frame.data
        ))
    })
}

/// Reply sent to a client
#[derive(Debug, Clone)]
pub enum ServerEvent {
    Breweries(Vec<BreweryView>),
    BreweryDetails(BreweryView),
    BreweryDeleted(u64),
    Error { code: ErrorCode, message: String },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Breweries(_) => BREWERIES,
            ServerEvent::BreweryDetails(_) => BREWERY_DETAILS,
            ServerEvent::BreweryDeleted(_) => BREWERY_DELETED,
            ServerEvent::Error { .. } => ERROR,
        }
    }

    pub fn to_frame(&self) -> BridgeResult<Frame> {
        let encode = |value: Result<Value, serde_json::Error>| {
            value.map_err(|e| BridgeError::Encode(e.to_string()))
        };

        let frame = match self {
            ServerEvent::Breweries(views) => {
                Frame::new(BREWERIES, encode(serde_json::to_value(views))?)
            }
            ServerEvent::BreweryDetails(view) => {
                Frame::new(BREWERY_DETAILS, encode(serde_json::to_value(view))?)
            }
            ServerEvent::BreweryDeleted(id) => Frame::new(BREWERY_DELETED, Value::from(*id)),
            ServerEvent::Error { code, message } => Frame {
                event: ERROR.to_string(),
                data: Value::String(message.clone()),
                code: Some(*code),
            },
        };
        Ok(frame)
    }

    /// Serialize to the text carried by one WebSocket frame
    pub fn encode(&self) -> BridgeResult<String> {
        serde_json::to_string(&self.to_frame()?).map_err(|e| BridgeError::Encode(e.to_string()))
    }
}

impl From<&BridgeError> for ServerEvent {
    fn from(err: &BridgeError) -> Self {
        ServerEvent::Error {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Brewery;
    use serde_json::json;

    fn view(id: u64) -> BreweryView {
        BreweryView {
            brewery: Brewery {
                id,
                name: format!("Brewery {}", id),
                address: "1 Hop Street".to_string(),
                profile_picture_id: 1,
                banner_picture_id: 2,
            },
            profile_picture_url: Some("https://drive.google.com/thumbnail?id=a".to_string()),
            banner_picture_url: None,
            views: None,
        }
    }

    #[test]
    fn test_decode_requests() {
        assert_eq!(
            ClientEvent::decode(r#"{"event":"getBreweries"}"#).unwrap(),
            ClientEvent::GetBreweries
        );
        assert_eq!(
            ClientEvent::decode(r#"{"event":"getBreweryById","data":7}"#).unwrap(),
            ClientEvent::GetBreweryById(7)
        );
        assert_eq!(
            ClientEvent::decode(r#"{"event":"deleteBrewery","data":"12"}"#).unwrap(),
            ClientEvent::DeleteBrewery(12)
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = ClientEvent::decode("not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMessage);

        let err = ClientEvent::decode(r#"{"event":"getBreweryById","data":"abc"}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMessage);

        let err = ClientEvent::decode(r#"{"event":"getBreweryById"}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMessage);

        let err = ClientEvent::decode(r#"{"event":"createBrewery","data":{}}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unsupported);
    }

    #[test]
    fn test_client_frame_round_trip() {
        let request = ClientEvent::GetBreweryById(3);
        let text = serde_json::to_string(&request.to_frame()).unwrap();
        assert_eq!(ClientEvent::decode(&text).unwrap(), request);
    }

    #[test]
    fn test_breweries_frame_shape() {
        let frame = ServerEvent::Breweries(vec![view(1)]).to_frame().unwrap();
        assert_eq!(frame.event, "breweries");
        assert_eq!(frame.code, None);
        assert_eq!(frame.data[0]["id"], 1);
        assert_eq!(frame.data[0]["banner_picture_url"], Value::Null);
        assert_eq!(
            frame.data[0]["profile_picture_url"],
            "https://drive.google.com/thumbnail?id=a"
        );
    }

    #[test]
    fn test_error_frame_carries_code() {
        let text = ServerEvent::from(&BridgeError::NotFound(5)).encode().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({ "event": "error", "data": "Brewery 5 not found", "code": "NOT_FOUND" })
        );
    }

    #[test]
    fn test_deleted_frame_carries_id() {
        let frame = ServerEvent::BreweryDeleted(9).to_frame().unwrap();
        assert_eq!(frame, Frame::new("breweryDeleted", json!(9)));
    }
}
