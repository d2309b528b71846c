//! Staff Source
//!
//! The data source contract the synchronizer consumes, plus the endpoint
//! description and payload decoding shared by HTTP-backed sources.

use std::future::Future;

use async_trait::async_trait;
use futures::future::{select, Either};
use futures::FutureExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::StaffRecord;

/// Characters left unescaped by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Why a staff list could not be obtained
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed staff payload: {0}")]
    Decode(String),
    #[error("no response within {0} ms")]
    Timeout(u32),
}

/// Asynchronous lookup of the staff associated with a course.
///
/// UI runtimes are single-threaded, so implementations need not be `Send`.
#[async_trait(?Send)]
pub trait StaffSource {
    async fn staff_for_course(&self, course_id: &str) -> Result<Vec<StaffRecord>, FetchError>;
}

/// Maps an HTTP status to success or [`FetchError::Status`]
pub fn ensure_success(status: u16) -> Result<(), FetchError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(FetchError::Status(status))
    }
}

/// Races `request` against `timer`; a timer that fires first yields
/// [`FetchError::Timeout`] and drops the request.
pub async fn with_timeout<R, F, T>(request: F, timer: T, timeout_ms: u32) -> Result<R, FetchError>
where
    F: Future<Output = Result<R, FetchError>>,
    T: Future,
{
    match select(request.boxed_local(), timer.boxed_local()).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(FetchError::Timeout(timeout_ms)),
    }
}

/// Wire shape of a staff response.
///
/// `Wrapped` (`{"staff": [...]}`) is the canonical shape. `Bare` (a top-level
/// array) exists only for endpoints explicitly configured with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    #[default]
    Wrapped,
    Bare,
}

#[derive(Deserialize)]
struct StaffEnvelope {
    staff: Vec<StaffRecord>,
}

impl PayloadShape {
    pub fn decode(self, body: &str) -> Result<Vec<StaffRecord>, FetchError> {
        let decoded = match self {
            PayloadShape::Wrapped => serde_json::from_str::<StaffEnvelope>(body).map(|e| e.staff),
            PayloadShape::Bare => serde_json::from_str::<Vec<StaffRecord>>(body),
        };
        decoded.map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Location of the staff-by-course endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffEndpoint {
    pub path: String,
    pub query_param: String,
    pub shape: PayloadShape,
}

impl Default for StaffEndpoint {
    fn default() -> Self {
        Self {
            path: "/admin/get_staff_by_course/".to_string(),
            query_param: "course_id".to_string(),
            shape: PayloadShape::Wrapped,
        }
    }
}

impl StaffEndpoint {
    /// Request URL for a course, with the id escaped as a URI component
    pub fn url_for(&self, course_id: &str) -> String {
        let separator = if self.path.ends_with('?') || self.path.ends_with('&') {
            ""
        } else if self.path.contains('?') {
            "&"
        } else {
            "?"
        };
        format!(
            "{}{}{}={}",
            self.path,
            separator,
            self.query_param,
            utf8_percent_encode(course_id, URI_COMPONENT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_url() {
        let endpoint = StaffEndpoint::default();
        assert_eq!(endpoint.url_for("3"), "/admin/get_staff_by_course/?course_id=3");
    }

    #[test]
    fn test_url_escapes_course_id() {
        let endpoint = StaffEndpoint::default();
        assert_eq!(
            endpoint.url_for("a b&c=d/é"),
            "/admin/get_staff_by_course/?course_id=a%20b%26c%3Dd%2F%C3%A9"
        );
        assert_eq!(endpoint.url_for("x-1_(2)"), "/admin/get_staff_by_course/?course_id=x-1_(2)");
    }

    #[test]
    fn test_url_joins_existing_query() {
        let endpoint = StaffEndpoint {
            path: "/admin/myapp/student/get_staff/?format=json".to_string(),
            ..Default::default()
        };
        assert_eq!(endpoint.url_for("4"), "/admin/myapp/student/get_staff/?format=json&course_id=4");

        let endpoint = StaffEndpoint {
            path: "/staff?".to_string(),
            query_param: "course".to_string(),
            ..Default::default()
        };
        assert_eq!(endpoint.url_for("4"), "/staff?course=4");
    }

    #[test]
    fn test_decode_wrapped_payload() {
        let staff = PayloadShape::Wrapped
            .decode(r#"{"staff": [{"id": 12, "name": "A. Lee"}, {"id": "9", "name": "B. Roy"}]}"#)
            .unwrap();
        assert_eq!(staff, vec![StaffRecord::new(12u32, "A. Lee"), StaffRecord::new("9", "B. Roy")]);
    }

    #[test]
    fn test_decode_bare_payload() {
        let staff = PayloadShape::Bare.decode(r#"[{"id": 1, "name": "C. Wu"}]"#).unwrap();
        assert_eq!(staff, vec![StaffRecord::new(1u32, "C. Wu")]);
    }

    #[test]
    fn test_decode_rejects_other_shape() {
        let bare = r#"[{"id": 1, "name": "C. Wu"}]"#;
        assert!(matches!(PayloadShape::Wrapped.decode(bare), Err(FetchError::Decode(_))));
        assert!(matches!(PayloadShape::Wrapped.decode(r#"{"people": []}"#), Err(FetchError::Decode(_))));
        assert!(matches!(PayloadShape::Bare.decode("<html>"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ensure_success(200), Ok(()));
        assert_eq!(ensure_success(204), Ok(()));
        assert_eq!(ensure_success(302), Err(FetchError::Status(302)));
        assert_eq!(ensure_success(403), Err(FetchError::Status(403)));
        assert_eq!(ensure_success(500), Err(FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_timeout_wins_over_pending_request() {
        let request = futures::future::pending::<Result<Vec<StaffRecord>, FetchError>>();
        let result = with_timeout(request, futures::future::ready(()), 250).await;
        assert_eq!(result, Err(FetchError::Timeout(250)));
    }

    #[tokio::test]
    async fn test_request_wins_over_pending_timer() {
        let request = async { Ok(vec![StaffRecord::new(1u32, "C. Wu")]) };
        let result = with_timeout(request, futures::future::pending::<()>(), 250).await;
        assert_eq!(result, Ok(vec![StaffRecord::new(1u32, "C. Wu")]));
    }

    #[tokio::test]
    async fn test_request_error_passes_through_timeout() {
        let request = async { Err::<Vec<StaffRecord>, _>(FetchError::Status(502)) };
        let result = with_timeout(request, futures::future::pending::<()>(), 250).await;
        assert_eq!(result, Err(FetchError::Status(502)));
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(500).to_string(), "server responded with status 500");
        assert_eq!(FetchError::Timeout(8000).to_string(), "no response within 8000 ms");
    }
}
