use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schema::ValidationReasons;

/// Error code of failures synthesized by the client when a payload does not
/// match its schema.
///
/// Servers never produce it, so it tells client-detected payload problems
/// apart from server-declared errors.
pub const INVALID_PAYLOAD_ERROR_CODE: i64 = -42;

/// The failure payload shared by every endpoint.
///
/// On the wire: `{"errorCode": 404, "errorDescription": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenericNotOkResponse {
    /// Server-declared error code, or [`INVALID_PAYLOAD_ERROR_CODE`].
    pub error_code: i64,
    /// Human readable description.
    pub error_description: String,
}

impl GenericNotOkResponse {
    /// Failure synthesized from the reasons a payload was rejected.
    pub fn invalid_payload(reasons: &ValidationReasons) -> Self {
        Self {
            error_code: INVALID_PAYLOAD_ERROR_CODE,
            error_description: reasons.to_string(),
        }
    }

    /// Whether this failure was synthesized by the client.
    pub fn is_invalid_payload(&self) -> bool {
        self.error_code == INVALID_PAYLOAD_ERROR_CODE
    }
}

/// Outcome of one API call.
///
/// `Ok` is only produced for a 2xx status whose payload matches the success
/// schema. Everything else, including transport failures (status `0`), is
/// `NotOk`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<TOk, TNotOk = GenericNotOkResponse> {
    /// Successful call with a validated payload.
    Ok {
        /// The HTTP status, within `200..=299`.
        http_status_code: u16,
        /// The validated payload.
        response: TOk,
    },
    /// Any other outcome.
    NotOk {
        /// The HTTP status, `0` for transport failures.
        http_status_code: u16,
        /// The validated failure payload, or a synthesized one.
        response: TNotOk,
    },
}

impl<TOk, TNotOk> ApiResponse<TOk, TNotOk> {
    /// Whether the call succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The HTTP status of the call.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Ok {
                http_status_code, ..
            }
            | Self::NotOk {
                http_status_code, ..
            } => *http_status_code,
        }
    }

    /// The success payload, if any.
    pub fn ok(self) -> Option<TOk> {
        match self {
            Self::Ok { response, .. } => Some(response),
            Self::NotOk { .. } => None,
        }
    }

    /// The failure payload, if any.
    pub fn not_ok(self) -> Option<TNotOk> {
        match self {
            Self::Ok { .. } => None,
            Self::NotOk { response, .. } => Some(response),
        }
    }

    /// Converts into a standard [`Result`], dropping the status.
    ///
    /// # Errors
    ///
    /// Returns the failure payload for `NotOk` responses.
    pub fn into_result(self) -> Result<TOk, TNotOk> {
        match self {
            Self::Ok { response, .. } => Ok(response),
            Self::NotOk { response, .. } => Err(response),
        }
    }
}
