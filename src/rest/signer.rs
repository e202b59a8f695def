/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

/// Computes the `api_sig` request parameter.
///
/// The signature is the lowercase hex MD5 of the shared secret followed by every
/// present parameter as `keyvalue`, sorted by key.
#[derive(Default, Clone)]
pub struct Signer {
    shared_secret: Option<String>,
}

impl Signer {
    pub fn new(shared_secret: Option<&str>) -> Self {
        Self {
            shared_secret: shared_secret.map(Into::into),
        }
    }

    /// Signs the given parameters. Returns `None` when no shared secret is configured.
    pub fn sign<'a, I>(&self, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let secret = self.shared_secret.as_deref()?;
        let mut pairs: Vec<(&str, &str)> = params
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        pairs.sort();

        let mut request_str = String::from(secret);
        for (k, v) in pairs {
            request_str.push_str(k);
            request_str.push_str(v);
        }
        Some(format!("{:x}", md5::compute(request_str.as_bytes())))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("shared_secret", &self.shared_secret.as_ref().map(|_| "xxx"))
            .finish()
    }
}
