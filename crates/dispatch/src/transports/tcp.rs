//! TcpTransport - line-oriented TCP request/response
//!
//! The endpoint name is the server's socket address (`host:port`).
//! One connection per call: the request is a single line
//! `header \t body \n`, the reply is a single line. A reply starting with
//! `ERR ` is the backend refusing the request.
//!
//! Backslashes, tabs and newlines inside header and body are escaped as
//! `\\`, `\t` and `\n`.

use contracts::{BackendTransport, TransportError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

const REJECT_PREFIX: &str = "ERR ";

/// Transport that talks to `host:port` endpoints over TCP
#[derive(Debug, Clone, Default)]
pub struct TcpTransport;

impl TcpTransport {
    pub fn new() -> Self {
        Self
    }

    fn encode_request(header: &str, body: &str) -> String {
        format!("{}\t{}\n", escape_field(header), escape_field(body))
    }

    fn decode_response(endpoint: &str, line: &str) -> Result<String, TransportError> {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.strip_prefix(REJECT_PREFIX) {
            Some(reason) => Err(TransportError::rejected(endpoint, reason)),
            None => Ok(line.to_string()),
        }
    }
}

fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

impl BackendTransport for TcpTransport {
    fn name(&self) -> &str {
        "tcp"
    }

    #[instrument(name = "tcp_transport_call", skip(self, endpoint, header, body), fields(endpoint = %endpoint))]
    async fn call(&self, endpoint: &str, header: &str, body: &str) -> Result<String, TransportError> {
        let unreachable = |e: std::io::Error| TransportError::unreachable(endpoint, e.to_string());

        let mut stream = TcpStream::connect(endpoint).await.map_err(unreachable)?;
        let request = Self::encode_request(header, body);
        stream.write_all(request.as_bytes()).await.map_err(unreachable)?;
        stream.flush().await.map_err(unreachable)?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        let read = reader.read_line(&mut line).await.map_err(unreachable)?;
        if read == 0 {
            return Err(TransportError::unreachable(
                endpoint,
                "connection closed before response",
            ));
        }

        debug!(bytes = read, "Response received");
        Self::decode_response(endpoint, &line)
    }
}
