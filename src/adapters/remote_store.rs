//! Remote key-value store adapters.
//!
//! Implements [`RemoteStorePort`]:
//!
//! - [`MemoryRemoteStore`]: in-process store for simulation and tests,
//!   with an availability switch to exercise failure paths.
//! - `HttpRemoteStore` (**`target_os = "espidf"`**): one HTTP request per
//!   call against `<base_url>/<key>`, bodies as `{"value":"..."}`.
//!
//! Neither adapter retries; the caller reports failures and moves on.

use log::debug;

use crate::app::ports::RemoteStorePort;
use crate::error::RemoteError;
use crate::remote::RemoteKey;
use crate::remote::wire::{self, Value};

// ───────────────────────────────────────────────────────────────
// In-memory store
// ───────────────────────────────────────────────────────────────

pub struct MemoryRemoteStore {
    values: [Value; RemoteKey::ALL.len()],
    available: bool,
    puts: u32,
    gets: u32,
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(key: RemoteKey) -> usize {
    match key {
        RemoteKey::DoorStatus => 0,
        RemoteKey::DialValue => 1,
        RemoteKey::Token => 2,
        RemoteKey::Command => 3,
    }
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self {
            values: Default::default(),
            available: true,
            puts: 0,
            gets: 0,
        }
    }

    /// Simulate a network outage (`false`) or recovery (`true`).
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Write a value from the app side (e.g. a pending command).
    pub fn inject(&mut self, key: RemoteKey, raw: &str) -> Result<(), RemoteError> {
        self.values[slot(key)] = wire::value(raw)?;
        Ok(())
    }

    /// Peek at a stored value without counting a request.
    pub fn value(&self, key: RemoteKey) -> &str {
        self.values[slot(key)].as_str()
    }

    pub fn puts(&self) -> u32 {
        self.puts
    }

    pub fn gets(&self) -> u32 {
        self.gets
    }
}

impl RemoteStorePort for MemoryRemoteStore {
    fn put(&mut self, key: RemoteKey, value: &str) -> Result<(), RemoteError> {
        if !self.available {
            return Err(RemoteError::Unavailable);
        }
        self.values[slot(key)] = wire::value(value)?;
        self.puts += 1;
        debug!("remote(mem): {} <- {:?}", key, value);
        Ok(())
    }

    fn get(&mut self, key: RemoteKey) -> Result<Value, RemoteError> {
        if !self.available {
            return Err(RemoteError::Unavailable);
        }
        self.gets += 1;
        Ok(self.values[slot(key)].clone())
    }
}

// ───────────────────────────────────────────────────────────────
// HTTP store (device)
// ───────────────────────────────────────────────────────────────

/// Feed `body` to a writer that may accept fewer bytes than offered.
/// A zero-length write counts as a dropped connection.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn write_fully<E>(
    mut body: &[u8],
    mut write: impl FnMut(&[u8]) -> Result<usize, E>,
) -> Result<(), RemoteError> {
    while !body.is_empty() {
        match write(body) {
            Ok(n) if n > 0 => body = &body[n.min(body.len())..],
            _ => return Err(RemoteError::Unavailable),
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub use http::HttpRemoteStore;

#[cfg(target_os = "espidf")]
mod http {
    use core::fmt::Write;

    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use log::warn;

    use super::*;

    const TIMEOUT_MS: u64 = 5_000;
    const RESPONSE_MAX: usize = 128;

    pub struct HttpRemoteStore {
        base_url: heapless::String<96>,
    }

    impl HttpRemoteStore {
        pub fn new(base_url: &str) -> Result<Self, RemoteError> {
            let mut url = heapless::String::new();
            url.push_str(base_url.trim_end_matches('/'))
                .map_err(|()| RemoteError::ValueTooLong)?;
            Ok(Self { base_url: url })
        }

        fn url(&self, key: RemoteKey) -> Result<heapless::String<128>, RemoteError> {
            let mut url = heapless::String::new();
            write!(url, "{}/{}", self.base_url, key).map_err(|_| RemoteError::ValueTooLong)?;
            Ok(url)
        }

        fn connect() -> Result<EspHttpConnection, RemoteError> {
            EspHttpConnection::new(&Configuration {
                timeout: Some(core::time::Duration::from_millis(TIMEOUT_MS)),
                ..Default::default()
            })
            .map_err(|e| {
                warn!("remote(http): connection setup failed: {}", e);
                RemoteError::Unavailable
            })
        }

        /// Send one request and return the response body.
        fn exchange(
            &self,
            method: Method,
            key: RemoteKey,
            body: &[u8],
        ) -> Result<heapless::Vec<u8, RESPONSE_MAX>, RemoteError> {
            let url = self.url(key)?;
            let mut conn = Self::connect()?;
            let mut len_buf = heapless::String::<8>::new();
            let _ = write!(len_buf, "{}", body.len());
            let headers = [
                ("content-type", "application/json"),
                ("content-length", len_buf.as_str()),
            ];

            conn.initiate_request(method, &url, &headers)
                .map_err(|_| RemoteError::Unavailable)?;
            if !body.is_empty() {
                write_fully(body, |chunk| conn.write(chunk))?;
            }
            conn.initiate_response().map_err(|_| RemoteError::Unavailable)?;

            let status = conn.status();
            if status == 404 {
                // Absent key reads as empty.
                return Ok(heapless::Vec::new());
            }
            if !(200..300).contains(&status) {
                warn!("remote(http): {} answered {}", key, status);
                return Err(RemoteError::Protocol);
            }

            let mut out = heapless::Vec::new();
            let mut chunk = [0u8; 32];
            loop {
                let n = conn.read(&mut chunk).map_err(|_| RemoteError::Unavailable)?;
                if n == 0 {
                    break;
                }
                out.extend_from_slice(&chunk[..n])
                    .map_err(|()| RemoteError::ValueTooLong)?;
            }
            Ok(out)
        }
    }

    impl RemoteStorePort for HttpRemoteStore {
        fn put(&mut self, key: RemoteKey, value: &str) -> Result<(), RemoteError> {
            let body = wire::encode_body(value)?;
            self.exchange(Method::Put, key, &body)?;
            debug!("remote(http): {} <- {:?}", key, value);
            Ok(())
        }

        fn get(&mut self, key: RemoteKey) -> Result<Value, RemoteError> {
            let body = self.exchange(Method::Get, key, &[])?;
            wire::decode_body(&body)
        }
    }
}
