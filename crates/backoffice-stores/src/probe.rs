//! Transport-backed status probe for the `transcoding` rule

use crate::endpoint::{Endpoint, route_params, transcoding_endpoint};
use crate::transport::Transport;
use async_trait::async_trait;
use backoffice_validators::StatusProbe;
use std::rc::Rc;

/// Answers [`StatusProbe`] by calling the transcoding check endpoint.
pub struct TransportProbe {
	transport: Rc<dyn Transport>,
	endpoint: Endpoint,
}

impl TransportProbe {
	pub fn new(transport: Rc<dyn Transport>) -> Self {
		Self {
			transport,
			endpoint: transcoding_endpoint(),
		}
	}
}

#[async_trait(?Send)]
impl StatusProbe for TransportProbe {
	async fn probe(&self, value: &str) -> u16 {
		let params = route_params([("media_id", value)]);
		match self.transport.call_api(&self.endpoint, None, &params).await {
			Ok(response) => response.status,
			Err(err) => err.status,
		}
	}
}
