use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;

use super::error::TransportError;

/// Status line and body of a completed GET.
pub struct HttpResponse {
	pub status: u16,
	/// Read at most once, and only when the status is 200.
	pub body: Box<dyn Read + Send>,
}

/// Performs a blocking HTTP GET. Redirects, TLS and timeouts are the implementor's business.
pub trait HttpTransport {
	fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// `reqwest::blocking` backed transport.
pub struct ReqwestTransport {
	client: Client,
}

impl ReqwestTransport {
	pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
		let client = Client::builder()
			.timeout(timeout)
			.user_agent(user_agent)
			.build()?;
		Ok(Self { client })
	}
}

impl HttpTransport for ReqwestTransport {
	fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
		let response = self.client.get(url).send()?;
		Ok(HttpResponse {
			status: response.status().as_u16(),
			body: Box::new(response),
		})
	}
}
