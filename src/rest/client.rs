/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use crate::rest::api::{AUTH_ENDPOINT, encode_query};
use crate::rest::errors::FlickrError;
use crate::rest::response::{ApiResponse, as_list, field, take_map, text_of, texts};
use crate::rest::user::groups_from;
use crate::rest::{
    ApiClient, ApiParams, CommentCollection, Creds, Group, Permission, Photo, PhotoCollection,
    Photoset, User,
};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Session with the Flickr API.
///
/// Cheap to clone; clones share the same [`ApiClient`] and so the same credentials.
#[derive(Debug, Clone)]
pub struct Client {
    api_client: Arc<ApiClient>,
}

impl Client {
    pub fn new(creds: Creds) -> Self {
        Self::with_api_client(ApiClient::new(creds))
    }

    /// Client for calls that need nothing more than the api key
    pub fn from_api_key(api_key: &str) -> Self {
        Self::new(Creds::from_api_key(api_key))
    }

    /// Wraps an already configured [`ApiClient`], e.g. one with its own transport
    pub fn with_api_client(api_client: ApiClient) -> Self {
        Self {
            api_client: Arc::new(api_client),
        }
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }

    /// Calls any remote method by name.
    ///
    /// `test_echo`, `test.echo` and `flickr.test.echo` all call `flickr.test.echo`.
    pub async fn call_method(
        &self,
        name: &str,
        params: &ApiParams<'_>,
    ) -> Result<ApiResponse, FlickrError> {
        self.api_client.call(name, params).await
    }

    pub(crate) async fn call(
        &self,
        method: &str,
        params: &ApiParams<'_>,
    ) -> Result<ApiResponse, FlickrError> {
        self.api_client.call(method, params).await
    }

    /// Calls a method that returns a listing of photos
    pub async fn photos_request(
        &self,
        method: &str,
        params: &ApiParams<'_>,
    ) -> Result<PhotoCollection, FlickrError> {
        let resp = self.call(method, params).await?;
        Ok(self.photos_from_response(resp))
    }

    /// Calls a method that returns a listing of comments
    pub async fn comments_request(
        &self,
        method: &str,
        params: &ApiParams<'_>,
    ) -> Result<CommentCollection, FlickrError> {
        let resp = self.call(method, params).await?;
        Ok(self.comments_from_response(resp))
    }

    pub fn photos_from_response(&self, response: ApiResponse) -> PhotoCollection {
        PhotoCollection::from_response(self, response)
    }

    pub fn comments_from_response(&self, response: ApiResponse) -> CommentCollection {
        CommentCollection::from_response(self, response)
    }

    /// Exchanges a frob for an auth token.
    ///
    /// The token is used for every later call made through this client. It can only be
    /// exchanged once per client.
    pub async fn get_token_from(&self, frob: &str) -> Result<TokenExchange, FlickrError> {
        if self.api_client.auth_token().is_some() {
            debug!("Replacing the configured auth token with an exchanged one");
        }
        let mut resp = self.call("auth.getToken", &[("frob", frob)]).await?;
        let mut auth = take_map(&mut resp, &["auth"])?;
        let token = auth
            .get("token")
            .and_then(text_of)
            .ok_or_else(|| FlickrError::ResponseMissing("auth.token".to_string()))?;
        let mut user_attrs = match auth.remove("user") {
            Some(Value::Object(map)) => map,
            _ => return Err(FlickrError::ResponseMissing("auth.user".to_string())),
        };
        let id = user_attrs
            .remove("nsid")
            .as_ref()
            .and_then(text_of)
            .ok_or_else(|| FlickrError::ResponseMissing("auth.user.nsid".to_string()))?;

        self.api_client.set_auth_token(&token)?;
        Ok(TokenExchange {
            token,
            user: User::from_attrs(self.clone(), &id, user_attrs),
        })
    }

    /// Url to send a user to so they can grant this application access
    pub fn login_url(&self, perms: Permission, extra: Option<&str>) -> Result<String, FlickrError> {
        let params = [
            ("api_key", Some(self.api_client.api_key())),
            ("perms", Some(<&str>::from(perms))),
            ("extra", extra),
        ];
        let signature = self.api_client.signature(params);
        let query = encode_query(params.into_iter().chain([("api_sig", signature.as_deref())]));
        let mut req_url = url::Url::parse(AUTH_ENDPOINT)?;
        req_url.set_query(Some(&query));
        Ok(req_url.into())
    }

    /// Resolves a flickr.com url to the user or group it belongs to.
    ///
    /// Tries the url as a user's first and as a group's second. Gives `None` when
    /// neither lookup succeeds.
    pub async fn find_by_url(&self, url: &str) -> Option<UrlTarget> {
        match self.call("urls.lookupUser", &[("url", url)]).await {
            Ok(resp) => {
                if let Some(id) = field(&resp, &["user", "id"]).and_then(text_of) {
                    let mut attrs = Map::new();
                    if let Some(username) = field(&resp, &["user", "username"]).and_then(text_of) {
                        attrs.insert("username".to_string(), Value::String(username));
                    }
                    return Some(UrlTarget::User(User::from_attrs(self.clone(), &id, attrs)));
                }
            }
            Err(err) => debug!("{} is not a user url: {}", url, err),
        }

        match self.call("urls.lookupGroup", &[("url", url)]).await {
            Ok(resp) => {
                let id = field(&resp, &["group", "id"]).and_then(text_of)?;
                let mut attrs = Map::new();
                if let Some(name) = field(&resp, &["group", "groupname"]).and_then(text_of) {
                    attrs.insert("name".to_string(), Value::String(name));
                }
                Some(UrlTarget::Group(Group::from_attrs(self.clone(), &id, attrs)))
            }
            Err(err) => {
                debug!("{} is not a group url either: {}", url, err);
                None
            }
        }
    }

    /// Searches when criteria are given, otherwise the most recent photos
    pub async fn photos(&self, criteria: &ApiParams<'_>) -> Result<PhotoCollection, FlickrError> {
        if criteria.is_empty() {
            self.recent().await
        } else {
            self.search(criteria).await
        }
    }

    /// The 100 newest public photos from everyone
    pub async fn recent(&self) -> Result<PhotoCollection, FlickrError> {
        self.photos_request("photos.getRecent", &[]).await
    }

    // Implements flickr.photos.search
    pub async fn search(&self, criteria: &ApiParams<'_>) -> Result<PhotoCollection, FlickrError> {
        self.photos_request("photos.search", criteria).await
    }

    /// Public photos with the given tag
    pub async fn tag(&self, tag: &str) -> Result<PhotoCollection, FlickrError> {
        self.search(&[("tags", tag)]).await
    }

    pub async fn comments_for_photo(&self, id: &str) -> Result<CommentCollection, FlickrError> {
        self.comments_request("photos.comments.getList", &[("photo_id", id)])
            .await
    }

    pub async fn comments_for_photoset(&self, id: &str) -> Result<CommentCollection, FlickrError> {
        self.comments_request("photosets.comments.getList", &[("photoset_id", id)])
            .await
    }

    /// Looks a user up by email address, and failing that by username
    pub async fn users(&self, lookup: &str) -> Result<User, FlickrError> {
        match self.user_by_email(lookup).await {
            Ok(user) => Ok(user),
            Err(err) => {
                debug!("No user with email {}: {}", lookup, err);
                self.user_by_username(lookup).await
            }
        }
    }

    // Implements flickr.people.findByEmail
    pub async fn user_by_email(&self, email: &str) -> Result<User, FlickrError> {
        let resp = self
            .call("people.findByEmail", &[("find_email", email)])
            .await?;
        self.found_user(resp)
    }

    // Implements flickr.people.findByUsername
    pub async fn user_by_username(&self, username: &str) -> Result<User, FlickrError> {
        let resp = self
            .call("people.findByUsername", &[("username", username)])
            .await?;
        self.found_user(resp)
    }

    fn found_user(&self, mut resp: ApiResponse) -> Result<User, FlickrError> {
        let mut attrs = take_map(&mut resp, &["user"])?;
        let id = attrs
            .remove("nsid")
            .or_else(|| attrs.remove("id"))
            .as_ref()
            .and_then(text_of)
            .ok_or_else(|| FlickrError::ResponseMissing("user.nsid".to_string()))?;
        attrs.remove("id");
        Ok(User::from_attrs(self.clone(), &id, attrs))
    }

    /// Groups matching the given text. Options are passed along to `flickr.groups.search`.
    pub async fn groups(
        &self,
        group_name: &str,
        options: &ApiParams<'_>,
    ) -> Result<Vec<Group>, FlickrError> {
        let mut params = vec![("text", group_name)];
        params.extend_from_slice(options);
        let resp = self.call("groups.search", &params).await?;
        Ok(groups_from(self, field(&resp, &["groups", "group"])))
    }

    pub fn user(&self, id: &str) -> User {
        User::new(self.clone(), id)
    }

    pub fn group(&self, id: &str) -> Group {
        Group::new(self.clone(), id)
    }

    pub fn photo(&self, id: &str) -> Photo {
        Photo::new(self.clone(), id)
    }

    pub fn photoset(&self, id: &str) -> Photoset {
        Photoset::new(self.clone(), id)
    }

    // Implements flickr.tags.getRelated
    pub async fn related_tags(&self, tag: &str) -> Result<Vec<String>, FlickrError> {
        let resp = self.call("tags.getRelated", &[("tag", tag)]).await?;
        Ok(texts(field(&resp, &["tags", "tag"])))
    }

    // Implements flickr.photos.licenses.getInfo
    pub async fn licenses(&self) -> Result<Vec<License>, FlickrError> {
        let resp = self.call("photos.licenses.getInfo", &[]).await?;
        as_list(field(&resp, &["licenses", "license"]))
            .into_iter()
            .map(|l| serde_json::from_value::<License>(l.clone()).map_err(FlickrError::from))
            .collect()
    }
}

/// Result of exchanging a frob for an auth token
#[derive(Debug, Clone)]
pub struct TokenExchange {
    pub token: String,

    /// The user who granted access, with id, username and full name filled in
    pub user: User,
}

/// What a flickr.com url resolved to
#[derive(Debug, Clone)]
pub enum UrlTarget {
    User(User),
    Group(Group),
}

/// One of the licenses a photo can be published under
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct License {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}
