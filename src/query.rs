//! Fetch-based client for the graph query service.

use log::debug;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::IngestError;

#[derive(Serialize)]
struct QueryBody<'a> {
	query: &'a str,
}

#[derive(Clone, Debug)]
pub struct QueryClient {
	endpoint: String,
}

impl QueryClient {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
		}
	}

	/// Runs one query and returns the response body text. Does not retry.
	///
	/// Only transport and HTTP status failures are reported here; decoding
	/// and service errors are left to [`GraphIngestor::ingest_str`].
	///
	/// [`GraphIngestor::ingest_str`]: crate::graph::GraphIngestor::ingest_str
	pub async fn run(&self, query: &str) -> Result<String, IngestError> {
		let body = serde_json::to_string(&QueryBody { query })?;

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_mode(RequestMode::Cors);
		opts.set_body(&JsValue::from_str(&body));

		let request = Request::new_with_str_and_init(&self.endpoint, &opts).map_err(transport)?;
		request
			.headers()
			.set("Content-Type", "application/json")
			.map_err(transport)?;

		let window = web_sys::window().ok_or_else(|| IngestError::Transport("no window".into()))?;
		debug!("POST {}", self.endpoint);
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(transport)?
			.dyn_into()
			.map_err(transport)?;

		if !response.ok() {
			return Err(IngestError::Status {
				status: response.status(),
				message: response.status_text(),
			});
		}

		let text = JsFuture::from(response.text().map_err(transport)?)
			.await
			.map_err(transport)?
			.as_string()
			.unwrap_or_default();
		Ok(text)
	}
}

fn transport(err: JsValue) -> IngestError {
	IngestError::Transport(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
