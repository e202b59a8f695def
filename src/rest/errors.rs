/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use num_enum::TryFromPrimitive;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum FlickrError {
    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("Deserialization error")]
    Deserialization(#[from] serde_json::Error),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Response body is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),

    #[error("API Response was error: {0}, msg: {1}")]
    ApiResponse(u32, String),

    #[error("API Response is malformed: {0}")]
    ApiResponseMalformed(String),

    #[error("Expected response missing: {0}")]
    ResponseMissing(String),

    #[error("{0} is not implemented by this client")]
    MissingCapability(&'static str),

    #[error("An auth token has already been set for this client")]
    AuthTokenAlreadySet,

    #[error("Configuration missing: {0}")]
    ConfigMissing(String),
}

impl FlickrError {
    /// The well known error code when the service rejected the call
    pub fn api_error_code(&self) -> Option<ApiErrorCodes> {
        match self {
            FlickrError::ApiResponse(code, _) => ApiErrorCodes::try_from(*code).ok(),
            _ => None,
        }
    }
}

/// Error codes shared by every method per the Flickr API site
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum ApiErrorCodes {
    // Returned by most of the getInfo/lookup methods
    NotFound = 1,

    SslRequired = 95,
    InvalidSignature = 96,
    MissingSignature = 97,
    LoginFailed = 98,
    InsufficientPermissions = 99,
    InvalidApiKey = 100,
    ServiceUnavailable = 105,
    WriteOperationFailed = 106,
    FormatNotFound = 111,
    MethodNotFound = 112,
    InvalidSoapEnvelope = 114,
    InvalidXmlRpcCall = 115,
    BadUrl = 116,
}
