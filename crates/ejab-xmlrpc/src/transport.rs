//! XML-RPC over HTTP transport.

use std::io::Cursor;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use ejab_core::error::TransportError;
use ejab_core::types::ServiceUrl;
use ejab_core::{Result, Transport};

use crate::value::{from_xmlrpc, to_xmlrpc};

const TEXT_XML: &str = "text/xml";

/// HTTP transport speaking XML-RPC to an ejabberd `ejabberd_xmlrpc` listener.
#[derive(Debug, Clone)]
pub struct XmlRpcTransport {
    client: reqwest::Client,
    url: ServiceUrl,
    verbose: bool,
}

impl XmlRpcTransport {
    /// Create a new transport posting to `url`.
    pub fn new(url: ServiceUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ejab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            url,
            verbose: false,
        })
    }

    /// Log request and response bodies at debug level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the endpoint this transport posts to.
    pub fn url(&self) -> &ServiceUrl {
        &self.url
    }

    fn log_body(&self, direction: &str, body: &[u8]) {
        let body = String::from_utf8_lossy(body);
        if self.verbose {
            debug!(direction, %body, "XML-RPC body");
        } else {
            trace!(direction, %body, "XML-RPC body");
        }
    }
}

#[async_trait]
impl Transport for XmlRpcTransport {
    #[instrument(skip(self, params), fields(url = %self.url))]
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let mut request = xmlrpc::Request::new(method);
        for param in params {
            request = request.arg(to_xmlrpc(param)?);
        }

        let mut body = Vec::new();
        request
            .write_as_xml(&mut body)
            .map_err(|e| TransportError::Encode {
                message: e.to_string(),
            })?;
        debug!(method, "XML-RPC call");
        self.log_body("request", &body);

        let response = self
            .client
            .post(self.url.as_str())
            .header(CONTENT_TYPE, TEXT_XML)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "XML-RPC response");
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let reply = response.bytes().await.map_err(transport_error)?;
        self.log_body("response", &reply);

        let value = request
            .call(BufferedReply(reply.to_vec()))
            .map_err(decode_error)?;
        Ok(from_xmlrpc(value))
    }
}

/// Hands an already received body to the `xmlrpc` response parser.
pub(crate) struct BufferedReply(pub(crate) Vec<u8>);

impl xmlrpc::Transport for BufferedReply {
    type Stream = Cursor<Vec<u8>>;

    fn transmit(
        self,
        _request: &xmlrpc::Request<'_>,
    ) -> std::result::Result<Self::Stream, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Cursor::new(self.0))
    }
}

fn transport_error(err: reqwest::Error) -> ejab_core::Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    err.into()
}

fn decode_error(err: xmlrpc::Error) -> ejab_core::Error {
    let err = match err.fault() {
        Some(fault) => TransportError::Fault {
            code: fault.fault_code,
            message: fault.fault_string.clone(),
        },
        None => TransportError::Decode {
            message: err.to_string(),
        },
    };
    err.into()
}
