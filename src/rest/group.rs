/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::macros::{attribute_record, lazy_accessors};
use crate::rest::response::{field, take_map, text_of};
use crate::rest::{Client, Entity};
use serde_json::{Map, Value};

attribute_record! {
    /// Attributes known for a group.
    ///
    /// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.groups.getInfo.html)
    /// for more details on the individual fields.
    pub struct GroupAttrs {
        name => "name",
        description => "description",
        members => "members",
        online => "online",
        privacy => "privacy",
        url => "url",
        eighteenplus => "eighteenplus",
    }
}

/// A Flickr group
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) client: Client,
    id: String,
    attrs: GroupAttrs,
    loaded: bool,
}

impl Group {
    pub fn new(client: Client, id: &str) -> Self {
        Self::from_attrs(client, id, Map::new())
    }

    pub fn from_attrs(client: Client, id: &str, attrs: Map<String, Value>) -> Self {
        let mut group = Self {
            client,
            id: id.into(),
            attrs: GroupAttrs::default(),
            loaded: false,
        };
        group.attrs.absorb(attrs);
        group
    }

    /// A group with a client of its own built from the api key
    pub fn with_api_key(id: &str, api_key: &str) -> Self {
        Self::new(Client::from_api_key(api_key), id)
    }

    pub fn attrs(&self) -> &GroupAttrs {
        &self.attrs
    }

    // Implements flickr.groups.getInfo and flickr.urls.getGroup
    async fn load(&mut self) -> Result<(), FlickrError> {
        if self.loaded {
            return Ok(());
        }
        let params = [("group_id", self.id.as_str())];
        let mut resp = self.client.call("groups.getInfo", &params).await?;
        let info = take_map(&mut resp, &["group"])?;

        let resp = self.client.call("urls.getGroup", &params).await?;
        let url = field(&resp, &["group", "url"]).and_then(text_of);

        self.attrs.absorb(info);
        if url.is_some() {
            self.attrs.url = url;
        }
        self.loaded = true;
        Ok(())
    }

    lazy_accessors! {
        name,
        description,
        /// Member count
        members,
        online,
        privacy,
        /// Url of the group's page
        url,
        /// Whether the group is restricted to adults, "1" or "0"
        eighteenplus,
    }
}

impl Entity for Group {
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

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "name: {}, id: {}", self.attrs.name.as_deref().unwrap_or_default(), self.id)
    }
}
