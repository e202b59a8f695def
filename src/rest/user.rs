/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::macros::{attribute_record, lazy_accessors};
use crate::rest::parsers::{from_num_str, from_unix_str};
use crate::rest::response::{as_list, field, take_map, text_of, texts};
use crate::rest::{ApiParams, Client, Entity, Group, PhotoCollection, Photoset};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

attribute_record! {
    /// Attributes known for a user.
    ///
    /// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.people.getInfo.html)
    /// for more details on the individual fields.
    pub struct UserAttrs {
        username => "username",
        name => "realname" | "fullname" | "name",
        location => "location",
        photos_url => "photosurl",
        count => "count",
        firstdate => "firstdate",
        firstdatetaken => "firstdatetaken",
    }
}

/// A Flickr member
#[derive(Debug, Clone)]
pub struct User {
    pub(crate) client: Client,
    id: String,
    attrs: UserAttrs,
    loaded: bool,
    pretty_url: Option<String>,
}

impl User {
    const INFO_METHOD: &'static str = "people.getInfo";

    /// A user known only by id (NSID)
    pub fn new(client: Client, id: &str) -> Self {
        Self::from_attrs(client, id, Map::new())
    }

    /// A user with whatever attributes were returned inline by another call
    pub fn from_attrs(client: Client, id: &str, attrs: Map<String, Value>) -> Self {
        let mut user = Self {
            client,
            id: id.into(),
            attrs: UserAttrs::default(),
            loaded: false,
            pretty_url: None,
        };
        user.attrs.absorb(attrs);
        user
    }

    /// A user with a client of its own built from the api key
    pub fn with_api_key(id: &str, api_key: &str) -> Self {
        Self::new(Client::from_api_key(api_key), id)
    }

    pub fn attrs(&self) -> &UserAttrs {
        &self.attrs
    }

    // Implements flickr.people.getInfo
    async fn load(&mut self) -> Result<(), FlickrError> {
        if self.loaded {
            return Ok(());
        }
        let mut resp = self
            .client
            .call(Self::INFO_METHOD, &[("user_id", self.id.as_str())])
            .await?;
        let mut person = take_map(&mut resp, &["person"])?;

        // The upload stats arrive nested under <photos>
        if let Some(Value::Object(photos)) = person.remove("photos") {
            person.extend(photos);
        }
        self.attrs.absorb(person);
        self.loaded = true;
        Ok(())
    }

    lazy_accessors! {
        username,
        /// The user's real name
        name,
        location,
        /// Base url of the user's photostream, e.g. `http://www.flickr.com/photos/sco/`
        photos_url,
        /// Number of photos uploaded
        count,
        firstdate,
        firstdatetaken,
    }

    /// Date of the first upload
    pub async fn first_upload(&mut self) -> Result<Option<DateTime<Utc>>, FlickrError> {
        Ok(self.firstdate().await?.and_then(from_unix_str))
    }

    /// Url of the profile page
    pub fn url(&self) -> String {
        format!("http://www.flickr.com/people/{}/", self.id)
    }

    /// Profile url using the user's custom name if they set one up
    pub async fn pretty_url(&mut self) -> Result<&str, FlickrError> {
        if self.pretty_url.is_none() {
            let resp = self
                .client
                .call("urls.getUserProfile", &[("user_id", self.id.as_str())])
                .await?;
            let url = field(&resp, &["user", "url"])
                .and_then(text_of)
                .ok_or_else(|| FlickrError::ResponseMissing("user.url".to_string()))?;
            self.pretty_url = Some(url);
        }
        Ok(self.pretty_url.as_deref().unwrap_or_default())
    }

    /// Groups the user is a public member of
    pub async fn groups(&self) -> Result<Vec<Group>, FlickrError> {
        let resp = self
            .client
            .call("people.getPublicGroups", &[("user_id", self.id.as_str())])
            .await?;
        Ok(groups_from(&self.client, field(&resp, &["groups", "group"])))
    }

    /// The user's public photos.
    ///
    /// Options are passed along as is, e.g. `[("per_page", "25"), ("extras", "date_taken")]`.
    pub async fn photos(&self, options: &ApiParams<'_>) -> Result<PhotoCollection, FlickrError> {
        let mut params = vec![("user_id", self.id.as_str())];
        params.extend_from_slice(options);
        self.client
            .photos_request("people.getPublicPhotos", &params)
            .await
    }

    /// The user's photos with the given tag
    pub async fn tag(&self, tag: &str) -> Result<PhotoCollection, FlickrError> {
        self.client
            .search(&[("user_id", self.id.as_str()), ("tags", tag)])
            .await
    }

    pub async fn contacts(&self) -> Result<Vec<User>, FlickrError> {
        let resp = self
            .client
            .call("contacts.getPublicList", &[("user_id", self.id.as_str())])
            .await?;
        Ok(users_from(&self.client, field(&resp, &["contacts", "contact"])))
    }

    pub async fn favorites(&self) -> Result<PhotoCollection, FlickrError> {
        self.client
            .photos_request("favorites.getPublicList", &[("user_id", self.id.as_str())])
            .await
    }

    pub async fn photosets(&self) -> Result<Vec<Photoset>, FlickrError> {
        let resp = self
            .client
            .call("photosets.getList", &[("user_id", self.id.as_str())])
            .await?;
        let photosets = as_list(field(&resp, &["photosets", "photoset"]))
            .into_iter()
            .filter_map(|set| {
                let mut attrs = set.as_object()?.clone();
                let id = attrs.remove("id").as_ref().and_then(text_of)?;
                attrs.insert("owner".to_string(), Value::String(self.id.clone()));
                Some(Photoset::from_attrs(self.client.clone(), &id, attrs))
            })
            .collect();
        Ok(photosets)
    }

    /// Every tag the user has used
    pub async fn tags(&self) -> Result<Vec<String>, FlickrError> {
        let resp = self
            .client
            .call("tags.getListUser", &[("user_id", self.id.as_str())])
            .await?;
        Ok(texts(field(&resp, &["who", "tags", "tag"])))
    }

    /// The user's most used tags along with their use count
    pub async fn popular_tags(&self, count: u32) -> Result<Vec<TagScore>, FlickrError> {
        let count = count.to_string();
        let resp = self
            .client
            .call(
                "tags.getListUserPopular",
                &[("user_id", self.id.as_str()), ("count", count.as_str())],
            )
            .await?;
        let scores = as_list(field(&resp, &["who", "tags", "tag"]))
            .into_iter()
            .filter_map(|tag| {
                Some(TagScore {
                    tag: text_of(tag)?,
                    count: tag.get("count").and_then(from_num_str).unwrap_or_default(),
                })
            })
            .collect();
        Ok(scores)
    }

    /// Recent public photos from the user's contacts
    pub async fn contacts_photos(&self) -> Result<PhotoCollection, FlickrError> {
        self.client
            .photos_request(
                "photos.getContactsPublicPhotos",
                &[("user_id", self.id.as_str())],
            )
            .await
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attrs.extra.get(name)
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = self.attrs.name.as_deref().or(self.attrs.username.as_deref());
        write!(f, "{}", name.unwrap_or(&self.id))
    }
}

/// A tag and how many times it was used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagScore {
    pub tag: String,
    pub count: u32,
}

// Users in listings are keyed by nsid rather than id
pub(crate) fn users_from(client: &Client, list: Option<&Value>) -> Vec<User> {
    as_list(list)
        .into_iter()
        .filter_map(|entry| {
            let mut attrs = entry.as_object()?.clone();
            let id = attrs.remove("nsid").as_ref().and_then(text_of)?;
            Some(User::from_attrs(client.clone(), &id, attrs))
        })
        .collect()
}

pub(crate) fn groups_from(client: &Client, list: Option<&Value>) -> Vec<Group> {
    as_list(list)
        .into_iter()
        .filter_map(|entry| {
            let mut attrs = entry.as_object()?.clone();
            let id = attrs.remove("nsid").as_ref().and_then(text_of)?;
            Some(Group::from_attrs(client.clone(), &id, attrs))
        })
        .collect()
}
