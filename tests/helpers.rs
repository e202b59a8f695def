/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use async_trait::async_trait;
use bytes::Bytes;
use flickr::rest::{ApiClient, Client, Creds, FlickrError, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

pub(crate) const NOT_FOUND: &str = r#"<rsp stat="fail"><err code="1" msg="Not found"/></rsp>"#;

/// Answers every request with a canned body, keyed by the remote method called.
///
/// Requests that are not API calls, e.g. image downloads, are keyed by the full url.
#[derive(Default)]
pub(crate) struct StubTransport {
    bodies: HashMap<String, String>,
    requests: Mutex<Vec<Url>>,
}

#[allow(dead_code)]
impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, key: &str, body: &str) -> Self {
        self.bodies.insert(key.to_string(), body.to_string());
        self
    }

    /// Number of requests made so far for the method or url
    pub(crate) fn calls(&self, key: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| request_key(url) == key)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> Option<Url> {
        self.requests.lock().unwrap().last().cloned()
    }
}

fn request_key(url: &Url) -> String {
    url.query_pairs()
        .find(|(k, _)| k == "method")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| url.to_string())
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &Url) -> Result<Bytes, FlickrError> {
        self.requests.lock().unwrap().push(url.clone());
        let body = self
            .bodies
            .get(&request_key(url))
            .map(String::as_str)
            .unwrap_or(NOT_FOUND);
        Ok(Bytes::from(body.to_string()))
    }
}

/// Client talking to the stub, plus the stub itself for checking what was called
#[allow(dead_code)]
pub(crate) fn stub_client(creds: Creds, transport: StubTransport) -> (Client, Arc<StubTransport>) {
    let transport = Arc::new(transport);
    let api_client = ApiClient::with_transport(creds, transport.clone());
    (Client::with_api_client(api_client), transport)
}

#[allow(dead_code)]
pub(crate) fn get_read_only_auth_tokens() -> anyhow::Result<Creds> {
    let api_key = std::env::var("FLICKR_API_KEY")?;
    Ok(Creds::from_api_key(&api_key))
}

#[allow(dead_code)]
pub(crate) fn get_full_auth_tokens() -> anyhow::Result<Creds> {
    Ok(Creds::from_env()?)
}
