//! HTTP Staff Source
//!
//! Fetches the staff list for a course from the admin endpoint.

use async_trait::async_trait;
use dependent_select::{ensure_success, with_timeout, FetchError, StaffEndpoint, StaffRecord, StaffSource};
use gloo_timers::future::TimeoutFuture;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

pub struct HttpStaffSource {
    endpoint: StaffEndpoint,
    timeout_ms: Option<u32>,
}

impl HttpStaffSource {
    pub fn new(endpoint: StaffEndpoint, timeout_ms: Option<u32>) -> Self {
        Self { endpoint, timeout_ms }
    }
}

#[async_trait(?Send)]
impl StaffSource for HttpStaffSource {
    async fn staff_for_course(&self, course_id: &str) -> Result<Vec<StaffRecord>, FetchError> {
        let url = self.endpoint.url_for(course_id);
        debug!(url = %url, "fetching staff");

        let body = match self.timeout_ms {
            Some(ms) => with_timeout(fetch_text(&url), TimeoutFuture::new(ms), ms).await?,
            None => fetch_text(&url).await?,
        };

        self.endpoint.shape.decode(&body)
    }
}

async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".to_string()))?;

    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    ensure_success(response.status())?;

    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    text.as_string()
        .ok_or_else(|| FetchError::Decode("response body is not text".to_string()))
}

fn transport(value: JsValue) -> FetchError {
    FetchError::Transport(format!("{:?}", value))
}
