//! Coordinator link over HTTP.
//!
//! Implements [`RemoteLink`] on top of a minimal [`HttpTransport`], so the
//! request encoding and response decoding are shared between targets:
//!
//! - **`target_os = "espidf"`**: [`EspTransport`] uses the ESP-IDF HTTP client.
//! - **all other targets**: [`TcpTransport`] speaks HTTP/1.1 over
//!   `std::net::TcpStream` with `Connection: close`.
//!
//! Every request is bounded by the configured timeout.  Nothing is retried
//! here; the next control tick is the retry.

use core::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::commands::Command;
use crate::app::ports::RemoteLink;
use crate::config::CoordinatorUrl;
use crate::error::LinkError;
use crate::sensors::SensorReading;

/// Coordinator endpoint receiving soil readings.
pub const DATA_PATH: &str = "/data";
/// Coordinator endpoint holding the pending command.
pub const COMMAND_PATH: &str = "/command";

/// Responses larger than this are cut off; both endpoints answer with a
/// few dozen bytes.
pub const MAX_RESPONSE_BYTES: usize = 16 * 1024;

// ───────────────────────────────────────────────────────────────
// Transport abstraction
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One blocking request/response exchange with the coordinator.
pub trait HttpTransport {
    /// `path` is the endpoint (`/data`, `/command`); `body` is sent as JSON.
    /// Connection and timeout failures map to [`LinkError::Unreachable`].
    fn send(&mut self, method: Method, path: &str, body: Option<&[u8]>)
    -> Result<HttpResponse, LinkError>;
}

fn transport_failure<E: core::fmt::Debug>(e: E) -> LinkError {
    debug!("coordinator transport error: {:?}", e);
    LinkError::Unreachable
}

// ───────────────────────────────────────────────────────────────
// Payloads
// ───────────────────────────────────────────────────────────────

/// `POST /data` body.  The dashboard plots the value numerically, so the
/// boolean travels as 1 (dry) / 0 (wet).
#[derive(Debug, Serialize)]
struct ReadingReport {
    soil_moisture: u8,
}

/// `GET /command` body.
#[derive(Debug, Deserialize)]
struct CommandEnvelope {
    #[serde(default)]
    command: Option<String>,
}

pub fn encode_reading(reading: &SensorReading) -> Vec<u8> {
    let report = ReadingReport {
        soil_moisture: u8::from(reading.moisture_raw),
    };
    // A struct of one integer always serialises.
    serde_json::to_vec(&report).unwrap_or_default()
}

/// Missing, non-string, or malformed payloads decode to [`Command::Unknown`].
pub fn decode_command(body: &[u8]) -> Command {
    match serde_json::from_slice::<CommandEnvelope>(body) {
        Ok(CommandEnvelope {
            command: Some(text),
        }) => Command::parse(&text),
        Ok(_) => Command::Unknown,
        Err(e) => {
            debug!("undecodable command payload: {}", e);
            Command::Unknown
        }
    }
}

// ───────────────────────────────────────────────────────────────
// HttpLink
// ───────────────────────────────────────────────────────────────

pub struct HttpLink<T> {
    transport: T,
}

impl<T: HttpTransport> HttpLink<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: HttpTransport> RemoteLink for HttpLink<T> {
    fn report_reading(&mut self, reading: &SensorReading) -> Result<(), LinkError> {
        let body = encode_reading(reading);
        let response = self.transport.send(Method::Post, DATA_PATH, Some(&body))?;
        if response.status != 200 {
            return Err(LinkError::Rejected(response.status));
        }
        debug!("reading delivered (dry={})", reading.moisture_raw);
        Ok(())
    }

    fn poll_command(&mut self) -> Result<Command, LinkError> {
        let response = self.transport.send(Method::Get, COMMAND_PATH, None)?;
        if response.status != 200 {
            return Err(LinkError::Rejected(response.status));
        }
        Ok(decode_command(&response.body))
    }
}

// ───────────────────────────────────────────────────────────────
// HTTP/1.1 wire helpers (host transport)
// ───────────────────────────────────────────────────────────────

pub fn encode_request(
    method: Method,
    host: &str,
    port: u16,
    target: &str,
    body: Option<&[u8]>,
) -> Vec<u8> {
    let mut head = format!(
        "{} {} HTTP/1.1\r\nHost: {}:{}\r\nUser-Agent: irrigator/{}\r\n\
         Accept: application/json\r\nConnection: close\r\n",
        method.as_str(),
        target,
        host,
        port,
        env!("CARGO_PKG_VERSION"),
    );
    if let Some(body) = body {
        head.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n",
            body.len()
        ));
    }
    head.push_str("\r\n");

    let mut out = head.into_bytes();
    if let Some(body) = body {
        out.extend_from_slice(body);
    }
    out
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Parse a complete `Connection: close` response.  Handles
/// `Content-Length` and `chunked` bodies; a truncated or garbled response
/// counts as a transport failure.
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse, LinkError> {
    let split = find(raw, b"\r\n\r\n").ok_or(LinkError::Unreachable)?;
    let head = core::str::from_utf8(&raw[..split]).map_err(transport_failure)?;
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.split_whitespace();
    if !parts.next().is_some_and(|v| v.starts_with("HTTP/")) {
        return Err(LinkError::Unreachable);
    }
    let status: u16 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or(LinkError::Unreachable)?;

    let mut content_length = None;
    let mut chunked = false;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "content-length" => content_length = value.parse::<usize>().ok(),
            "transfer-encoding" => chunked = value.to_ascii_lowercase().contains("chunked"),
            _ => {}
        }
    }

    let payload = &raw[split + 4..];
    let body = if chunked {
        decode_chunked(payload)?
    } else if let Some(len) = content_length {
        if payload.len() < len {
            return Err(LinkError::Unreachable);
        }
        payload[..len].to_vec()
    } else {
        payload.to_vec()
    };

    Ok(HttpResponse { status, body })
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>, LinkError> {
    let mut out = Vec::new();
    loop {
        let line_end = find(data, b"\r\n").ok_or(LinkError::Unreachable)?;
        let size_line = core::str::from_utf8(&data[..line_end]).map_err(transport_failure)?;
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16).map_err(transport_failure)?;
        data = &data[line_end + 2..];
        if size == 0 {
            return Ok(out);
        }
        // Chunk data plus its CRLF; an oversized length never fits.
        let end = size
            .checked_add(2)
            .filter(|end| data.len() >= *end)
            .ok_or(LinkError::Unreachable)?;
        out.extend_from_slice(&data[..size]);
        data = &data[end..];
    }
}

// ───────────────────────────────────────────────────────────────
// Host transport (std TcpStream)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct TcpTransport {
    url: CoordinatorUrl,
    timeout: Duration,
}

#[cfg(not(target_os = "espidf"))]
impl TcpTransport {
    pub fn new(url: CoordinatorUrl, timeout: Duration) -> Self {
        Self { url, timeout }
    }

    fn connect(&self) -> Result<std::net::TcpStream, LinkError> {
        use std::net::{TcpStream, ToSocketAddrs};

        let addrs = (self.url.host.as_str(), self.url.port)
            .to_socket_addrs()
            .map_err(transport_failure)?;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(self.timeout))
                        .map_err(transport_failure)?;
                    stream
                        .set_write_timeout(Some(self.timeout))
                        .map_err(transport_failure)?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(transport_failure(last_err))
    }
}

#[cfg(not(target_os = "espidf"))]
impl HttpTransport for TcpTransport {
    fn send(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<HttpResponse, LinkError> {
        use std::io::{Read, Write};

        let request = encode_request(method, &self.url.host, self.url.port, &self.url.path(path), body);
        let mut stream = self.connect()?;
        stream.write_all(&request).map_err(transport_failure)?;
        stream.flush().map_err(transport_failure)?;

        let mut raw = Vec::new();
        stream
            .take(MAX_RESPONSE_BYTES as u64)
            .read_to_end(&mut raw)
            .map_err(transport_failure)?;
        parse_response(&raw)
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF transport
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct EspTransport {
    url: CoordinatorUrl,
    timeout: Duration,
}

#[cfg(target_os = "espidf")]
impl EspTransport {
    pub fn new(url: CoordinatorUrl, timeout: Duration) -> Self {
        Self { url, timeout }
    }
}

#[cfg(target_os = "espidf")]
impl HttpTransport for EspTransport {
    fn send(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<HttpResponse, LinkError> {
        use embedded_svc::http::client::Client;
        use embedded_svc::io::{Read, Write};
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

        let connection = EspHttpConnection::new(&Configuration {
            timeout: Some(self.timeout),
            ..Default::default()
        })
        .map_err(transport_failure)?;
        let mut client = Client::wrap(connection);

        let url = self.url.url(path);
        let length = body.map(|b| b.len().to_string());
        let mut headers = vec![("accept", "application/json"), ("connection", "close")];
        if let Some(length) = length.as_deref() {
            headers.push(("content-type", "application/json"));
            headers.push(("content-length", length));
        }
        let esp_method = match method {
            Method::Get => embedded_svc::http::Method::Get,
            Method::Post => embedded_svc::http::Method::Post,
        };

        let mut request = client
            .request(esp_method, &url, &headers)
            .map_err(transport_failure)?;
        if let Some(body) = body {
            request.write_all(body).map_err(transport_failure)?;
            request.flush().map_err(transport_failure)?;
        }
        let mut response = request.submit().map_err(transport_failure)?;
        let status = response.status();

        let mut out = Vec::new();
        let mut buf = [0u8; 256];
        while out.len() < MAX_RESPONSE_BYTES {
            let n = response.read(&mut buf).map_err(transport_failure)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        Ok(HttpResponse { status, body: out })
    }
}

/// Transport used by the binary on the current target.
#[cfg(not(target_os = "espidf"))]
pub type PlatformTransport = TcpTransport;
#[cfg(target_os = "espidf")]
pub type PlatformTransport = EspTransport;
