use wayline_route::network::TransportFuture;
use wayline_route::{RouteRequest, RouteTransport, TransportError, TransportResponse};

use crate::config::TransportConfig;

/// Default transport backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: &RouteRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = match request {
            RouteRequest::HttpPost { url, body, .. } => self.client.post(url).body(body.clone()),
            RouteRequest::HttpGet { url, .. } => self.client.get(url),
        };
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_error)?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

impl RouteTransport for ReqwestTransport {
    fn execute<'a>(&'a self, request: &'a RouteRequest) -> TransportFuture<'a> {
        Box::pin(self.send(request))
    }
}

fn map_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connection(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
