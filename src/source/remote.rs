use crate::record::CountRecord;
use crate::source::{RecordSource, SourceError, parse_records};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

/// Fetches the record list from the backend's person-count endpoint over
/// plain HTTP/1.1.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    endpoint: String,
    timeout: Duration,
}

impl HttpRecordSource {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch_records(&self) -> Result<Vec<CountRecord>, SourceError> {
        let body = send_http_get(&self.endpoint, self.timeout)?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "Fetched person counts");
        parse_records(&body)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ParsedUrl {
    host: String,
    port: u16,
    path: String,
}

fn parse_http_url(endpoint: &str) -> Result<ParsedUrl, SourceError> {
    let trimmed = endpoint
        .strip_prefix("http://")
        .ok_or_else(|| SourceError::InvalidUrl("only http:// supported".to_string()))?;

    let mut parts = trimmed.splitn(2, '/');
    let host_port = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SourceError::InvalidUrl("missing host".to_string()))?;
    let path = match parts.next() {
        Some(path) if !path.is_empty() => format!("/{path}"),
        _ => "/".to_string(),
    };

    let mut host_parts = host_port.splitn(2, ':');
    let host = host_parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SourceError::InvalidUrl("missing host".to_string()))?;
    let port = match host_parts.next() {
        Some(port_str) if !port_str.is_empty() => port_str
            .parse::<u16>()
            .map_err(|_| SourceError::InvalidUrl("invalid port".to_string()))?,
        _ => 80,
    };

    Ok(ParsedUrl {
        host: host.to_string(),
        port,
        path,
    })
}

fn send_http_get(endpoint: &str, timeout: Duration) -> Result<String, SourceError> {
    let parsed = parse_http_url(endpoint)?;
    let addr = (parsed.host.as_str(), parsed.port)
        .to_socket_addrs()
        .map_err(|err| SourceError::Dns(err.to_string()))?
        .next()
        .ok_or_else(|| SourceError::Dns("no addresses resolved".to_string()))?;

    let mut stream = TcpStream::connect_timeout(&addr, timeout).map_err(SourceError::Connect)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\n\r\n",
        parsed.path, parsed.host
    );
    stream.write_all(request.as_bytes())?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw)?;

    parse_http_response(&raw)
}

const HEADER_END: &[u8] = b"\r\n\r\n";
const CRLF: &[u8] = b"\r\n";

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

// Framing is resolved on raw bytes; the body is only turned into text once
// every chunk is reassembled.
fn parse_http_response(response: &[u8]) -> Result<String, SourceError> {
    let header_end = find_subslice(response, HEADER_END)
        .ok_or_else(|| SourceError::Http(0, "invalid http response".to_string()))?;
    let headers = String::from_utf8_lossy(&response[..header_end]);
    let body = &response[header_end + HEADER_END.len()..];

    let mut lines = headers.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| SourceError::Http(0, "missing status line".to_string()))?;
    let status_code = status_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| SourceError::Http(0, "missing status code".to_string()))?
        .parse::<u16>()
        .map_err(|_| SourceError::Http(0, "invalid status code".to_string()))?;

    let chunked = lines.any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.trim().eq_ignore_ascii_case("chunked")
        })
    });
    let body = if chunked {
        decode_chunked(body)?
    } else {
        body.to_vec()
    };
    let body = String::from_utf8_lossy(&body).into_owned();

    if status_code >= 400 {
        return Err(SourceError::Http(status_code, body.trim().to_string()));
    }

    Ok(body)
}

fn decode_chunked(body: &[u8]) -> Result<Vec<u8>, SourceError> {
    let mut decoded = Vec::new();
    let mut rest = body;
    loop {
        let line_end = find_subslice(rest, CRLF)
            .ok_or_else(|| SourceError::Http(0, "truncated chunk header".to_string()))?;
        let size_line = String::from_utf8_lossy(&rest[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| SourceError::Http(0, format!("invalid chunk size: {size_hex}")))?;
        if size == 0 {
            return Ok(decoded);
        }
        let after = &rest[line_end + CRLF.len()..];
        let chunk = after
            .get(..size)
            .ok_or_else(|| SourceError::Http(0, "truncated chunk".to_string()))?;
        decoded.extend_from_slice(chunk);
        rest = after[size..].strip_prefix(CRLF).unwrap_or(&after[size..]);
    }
}
