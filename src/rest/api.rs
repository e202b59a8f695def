/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::response::{self, ApiResponse};
use crate::rest::signer::Signer;
use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, trace};
use std::sync::{Arc, OnceLock};
use url::Url;

// Root Flickr REST API
pub const REST_ENDPOINT: &str = "http://api.flickr.com/services/rest/";

// Page a user is sent to for granting this application access
pub const AUTH_ENDPOINT: &str = "http://flickr.com/services/auth/";

// Every remote method lives under this namespace
const METHOD_PREFIX: &str = "flickr.";

/// This can be search criteria as well as other parameters the specific API expects
pub type ApiParams<'a> = [(&'a str, &'a str)];

/// Converts a logical method name into the remote one.
///
/// Underscores become dots and the `flickr.` namespace is prepended, so
/// `photos_search` and `photos.search` both become `flickr.photos.search`.
pub fn remote_method_name(name: &str) -> String {
    let dotted = name.replace('_', ".");
    if dotted.starts_with(METHOD_PREFIX) {
        dotted
    } else {
        format!("{METHOD_PREFIX}{dotted}")
    }
}

/// Performs the raw GET for the [`ApiClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Bytes, FlickrError>;
}

/// [`Transport`] backed by a reqwest client
#[derive(Default, Clone)]
pub struct HttpTransport {
    https_client: reqwest::Client,
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Bytes, FlickrError> {
        let resp = self
            .https_client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?)
    }
}

/// Credentials used when talking to Flickr.
///
/// The shared secret is only required for signed calls and the auth token only for
/// calls made on behalf of a user.
#[derive(Default, Clone)]
pub struct Creds {
    api_key: String,
    shared_secret: Option<String>,
    auth_token: Option<String>,
}

impl Creds {
    pub fn from_tokens(api_key: &str, shared_secret: Option<&str>, auth_token: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            shared_secret: shared_secret.map(Into::into),
            auth_token: auth_token.map(Into::into),
        }
    }

    pub fn from_api_key(api_key: &str) -> Self {
        Self::from_tokens(api_key, None, None)
    }

    /// Reads `FLICKR_API_KEY`, and optionally `FLICKR_SHARED_SECRET` and
    /// `FLICKR_AUTH_TOKEN`, from the environment.
    pub fn from_env() -> Result<Self, FlickrError> {
        let api_key = std::env::var("FLICKR_API_KEY").map_err(|_| {
            FlickrError::ConfigMissing("FLICKR_API_KEY environment variable not set".to_string())
        })?;
        let shared_secret = std::env::var("FLICKR_SHARED_SECRET").ok();
        let auth_token = std::env::var("FLICKR_AUTH_TOKEN").ok();
        Ok(Self::from_tokens(
            &api_key,
            shared_secret.as_deref(),
            auth_token.as_deref(),
        ))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("api_key", &"xxx")
            .field("shared_secret", &"xxx")
            .field("auth_token", &"xxx")
            .finish()
    }
}

/// Directly communicates with the API.
///
/// Every call is a single signed GET against the REST endpoint; there are no
/// retries and failures are returned as soon as they happen.
pub struct ApiClient {
    creds: Creds,
    signer: Signer,
    exchanged_token: OnceLock<String>,
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Creates a new Flickr client instance from provided credentials
    pub fn new(creds: Creds) -> Self {
        Self::with_transport(creds, Arc::new(HttpTransport::default()))
    }

    /// Creates a client that sends its requests through the given transport
    pub fn with_transport(creds: Creds, transport: Arc<dyn Transport>) -> Self {
        let signer = Signer::new(creds.shared_secret.as_deref());
        Self {
            creds,
            signer,
            exchanged_token: OnceLock::new(),
            endpoint: REST_ENDPOINT.to_string(),
            transport,
        }
    }

    /// Points the client at a different REST endpoint
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, FlickrError> {
        self.endpoint = Url::parse(endpoint)?.into();
        Ok(self)
    }

    pub fn api_key(&self) -> &str {
        &self.creds.api_key
    }

    /// Token from an exchange if one happened, otherwise the configured one
    pub fn auth_token(&self) -> Option<&str> {
        self.exchanged_token
            .get()
            .map(String::as_str)
            .or(self.creds.auth_token.as_deref())
    }

    pub(crate) fn set_auth_token(&self, token: &str) -> Result<(), FlickrError> {
        self.exchanged_token
            .set(token.to_string())
            .map_err(|_| FlickrError::AuthTokenAlreadySet)
    }

    /// Signature over the given parameters, `None` without a shared secret
    pub fn signature<'a, I>(&self, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        self.signer.sign(params)
    }

    /// Builds the signed request url for a remote method.
    pub fn request_url(&self, method: &str, params: &ApiParams<'_>) -> Result<Url, FlickrError> {
        let method = remote_method_name(method);

        // The client's own values win over caller supplied ones
        let reserved = ["api_key", "method", "auth_token", "api_sig"];
        let mut merged: Vec<(&str, Option<&str>)> = params
            .iter()
            .filter(|(k, _)| !reserved.contains(k))
            .map(|(k, v)| (*k, Some(*v)))
            .collect();
        merged.push(("api_key", Some(self.api_key())));
        merged.push(("method", Some(method.as_str())));
        merged.push(("auth_token", self.auth_token()));

        let signature = self.signature(merged.iter().copied());
        merged.push(("api_sig", signature.as_deref()));

        let query = encode_query(merged);
        let mut req_url = Url::parse(&self.endpoint)?;
        req_url.set_query(Some(&query));
        Ok(req_url)
    }

    /// Calls a remote method and returns the decoded response.
    ///
    /// Fails with [`FlickrError::ApiResponse`] when the service reports a failure.
    pub async fn call(
        &self,
        method: &str,
        params: &ApiParams<'_>,
    ) -> Result<ApiResponse, FlickrError> {
        let req_url = self.request_url(method, params)?;
        debug!("Calling {}", remote_method_name(method));
        trace!("GET {}{}", req_url.origin().ascii_serialization(), req_url.path());

        let body = self.transport.get(&req_url).await?;
        let body = String::from_utf8(body.to_vec())?;
        response::decode(&body).inspect_err(|err| debug!("{} failed: {}", method, err))
    }

    /// Retrieves a resource that is not an API call, e.g. an image file
    pub async fn fetch(&self, url: &str) -> Result<Bytes, FlickrError> {
        let req_url = Url::parse(url)?;
        debug!("Fetching {}", req_url);
        self.transport.get(&req_url).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

// Absent values are skipped entirely rather than sent empty
pub(crate) fn encode_query<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    params
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| format!("{}={}", k, urlencoding::encode(v))))
        .collect::<Vec<_>>()
        .join("&")
}
