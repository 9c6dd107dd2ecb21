//! Tagged results as seen by calling components.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult, ErrorCode};

/// The contract-surface outcome of one operation.
///
/// Serializes as `{"ok": value}` or `{"err": code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response<T> {
    /// The operation succeeded.
    Ok(T),
    /// The operation failed with a stable code.
    Err(ErrorCode),
}

impl<T> Response<T> {
    /// Convert an operation result into a tagged response.
    ///
    /// # Errors
    ///
    /// Host failures without a stable code are passed through unchanged;
    /// they abort the call instead of producing a response.
    pub fn from_result(result: AuditResult<T>) -> AuditResult<Self> {
        match result {
            Ok(value) => Ok(Self::Ok(value)),
            Err(e) => match e.code() {
                Some(code) => Ok(Self::Err(code)),
                None => Err(e),
            },
        }
    }

    /// Whether this is a success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Ok(_) => None,
            Self::Err(code) => Some(*code),
        }
    }
}

impl<T> From<Response<T>> for Result<T, ErrorCode> {
    fn from(response: Response<T>) -> Self {
        match response {
            Response::Ok(value) => Ok(value),
            Response::Err(code) => Err(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventId;
    use medtrail_storage::StorageError;

    #[test]
    fn test_wire_shape() {
        let ok: Response<EventId> = Response::Ok(EventId(0));
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"ok":0}"#);

        let err: Response<EventId> = Response::Err(ErrorCode::Unauthorized);
        assert_eq!(serde_json::to_string(&err).unwrap(), r#"{"err":1}"#);

        let parsed: Response<EventId> = serde_json::from_str(r#"{"err":4}"#).unwrap();
        assert_eq!(parsed.code(), Some(ErrorCode::InvalidInput));
    }

    #[test]
    fn test_from_result() {
        let r = Response::from_result(Ok::<_, AuditError>(EventId(3))).unwrap();
        assert!(r.is_ok());

        let r: Response<EventId> =
            Response::from_result(Err(AuditError::NotFound { event_id: 3 })).unwrap();
        assert_eq!(r, Response::Err(ErrorCode::NotFound));

        let infra: AuditResult<Response<EventId>> = Response::from_result(Err(
            AuditError::Storage(StorageError::Internal("disk".into())),
        ));
        assert!(infra.is_err());
    }

    #[test]
    fn test_into_std_result() {
        let r: Result<EventId, ErrorCode> = Response::Err(ErrorCode::NotFound).into();
        assert_eq!(r, Err(ErrorCode::NotFound));
    }
}
