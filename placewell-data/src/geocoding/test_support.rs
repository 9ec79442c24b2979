//! Test utilities for geocoding providers.
//!
//! This module provides [`StubNominatim`], a loopback HTTP server that answers
//! search requests with canned responses, so the real [`NominatimGeocoder`]
//! can be exercised without network access.
//!
//! [`NominatimGeocoder`]: super::NominatimGeocoder

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::debug;

/// Response the stub sends for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CannedResponse {
    /// `200 OK` with the given JSON body.
    Json(String),
    /// An empty response with the given status code.
    Status(u16),
    /// Accept the connection, then stay silent for the given duration.
    Stall(Duration),
}

impl CannedResponse {
    /// A single search hit at the given coordinate.
    #[must_use]
    pub fn place(latitude: f64, longitude: f64) -> Self {
        Self::Json(format!(
            r#"[{{"lat":"{latitude}","lon":"{longitude}","display_name":"Stub place"}}]"#
        ))
    }

    /// An empty result array.
    #[must_use]
    pub fn no_results() -> Self {
        Self::Json("[]".to_owned())
    }
}

/// Loopback HTTP server replaying [`CannedResponse`]s in order.
///
/// Each response is used for exactly one connection, answered on its own
/// thread so a stalled connection does not hold up the next one. The accept
/// thread is detached and exits once every response has been handed out.
///
/// # Example
///
/// ```
/// use placewell_core::GeocodingProvider;
/// use placewell_data::geocoding::NominatimGeocoder;
/// use placewell_data::geocoding::test_support::{CannedResponse, StubNominatim};
///
/// let stub = StubNominatim::serve(vec![CannedResponse::no_results()]).expect("bind loopback");
/// let geocoder = NominatimGeocoder::new(stub.url()).expect("provider should build");
///
/// assert_eq!(geocoder.geocode("nowhere"), Ok(None));
/// ```
#[derive(Debug)]
pub struct StubNominatim {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubNominatim {
    /// Bind a loopback port and start serving `responses`.
    ///
    /// # Errors
    ///
    /// Returns an error when no loopback port can be bound.
    pub fn serve(responses: Vec<CannedResponse>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let url = format!("http://{}/search", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for response in responses {
                let stream = match listener.accept() {
                    Ok((stream, _)) => stream,
                    Err(err) => {
                        debug!("stub Nominatim accept failed: {err}");
                        continue;
                    }
                };
                let log = Arc::clone(&recorded);
                thread::spawn(move || {
                    if let Err(err) = answer(&stream, &response, &log) {
                        debug!("stub Nominatim connection failed: {err}");
                    }
                });
            }
        });
        Ok(Self { url, requests })
    }

    /// Search endpoint URL to configure the geocoder with.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request lines received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn answer(
    stream: &TcpStream,
    response: &CannedResponse,
    recorded: &Mutex<Vec<String>>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 || header == "\r\n" {
            break;
        }
    }
    recorded
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request_line.trim_end().to_owned());

    let mut writer = stream;
    match response {
        CannedResponse::Json(body) => write!(
            writer,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        )?,
        CannedResponse::Status(status) => write!(
            writer,
            "HTTP/1.1 {status} Stub\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        )?,
        CannedResponse::Stall(duration) => thread::sleep(*duration),
    }
    writer.flush()
}
