/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::macros::{attribute_record, lazy_accessors};
use crate::rest::response::take_map;
use crate::rest::{Client, CommentCollection, Entity, Owner, Photo, PhotoCollection, User};
use serde_json::{Map, Value};

attribute_record! {
    /// Attributes known for a photoset.
    ///
    /// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photosets.getInfo.html)
    /// for more details on the individual fields.
    pub struct PhotosetAttrs {
        /// Id of the photo used as the set's cover
        primary => "primary",
        title => "title",
        description => "description",
        url => "url",
    }
}

/// An album of photos belonging to one user
#[derive(Debug, Clone)]
pub struct Photoset {
    pub(crate) client: Client,
    id: String,
    attrs: PhotosetAttrs,
    owner: Option<Owner>,
    loaded: bool,
}

impl Photoset {
    pub fn new(client: Client, id: &str) -> Self {
        Self::from_attrs(client, id, Map::new())
    }

    pub fn from_attrs(client: Client, id: &str, mut attrs: Map<String, Value>) -> Self {
        let owner = attrs
            .remove("owner")
            .and_then(|v| Owner::from_value(&v, None));
        let mut photoset = Self {
            client,
            id: id.into(),
            attrs: PhotosetAttrs::default(),
            owner,
            loaded: false,
        };
        photoset.attrs.absorb(attrs);
        photoset
    }

    /// A photoset with a client of its own built from the api key
    pub fn with_api_key(id: &str, api_key: &str) -> Self {
        Self::new(Client::from_api_key(api_key), id)
    }

    pub fn attrs(&self) -> &PhotosetAttrs {
        &self.attrs
    }

    // Implements flickr.photosets.getInfo
    async fn load(&mut self) -> Result<(), FlickrError> {
        if self.loaded {
            return Ok(());
        }
        let mut resp = self
            .client
            .call("photosets.getInfo", &[("photoset_id", self.id.as_str())])
            .await?;
        let mut info = take_map(&mut resp, &["photoset"])?;

        let owner = info.remove("owner");
        if !self.owner.as_ref().is_some_and(Owner::is_resolved) {
            if let Some(owner) = owner.and_then(|v| Owner::from_value(&v, None)) {
                self.owner = Some(owner);
            }
        }
        self.attrs.absorb(info);
        self.loaded = true;
        Ok(())
    }

    lazy_accessors! {
        primary,
        title,
        description,
    }

    /// The user the set belongs to
    pub async fn owner(&mut self) -> Result<Option<&mut User>, FlickrError> {
        if self.owner.is_none() {
            self.load().await?;
        }
        Ok(self.owner.as_mut().map(|o| o.resolve(&self.client)))
    }

    /// Url of the set's page, built off the owner's photostream url
    pub async fn url(&mut self) -> Result<Option<&str>, FlickrError> {
        if self.attrs.url.is_none() {
            let base = match self.owner().await? {
                Some(owner) => owner.photos_url().await?.map(str::to_string),
                None => None,
            };
            self.attrs.url = base.map(|base| format!("{}sets/{}/", base, self.id));
        }
        Ok(self.attrs.url.as_deref())
    }

    /// Photos in the set. Each call fetches a fresh collection.
    pub async fn photos(&self) -> Result<PhotoCollection, FlickrError> {
        self.client
            .photos_request("photosets.getPhotos", &[("photoset_id", self.id.as_str())])
            .await
    }

    pub async fn first_photo(&self) -> Result<Option<Photo>, FlickrError> {
        let photos = self
            .client
            .photos_request(
                "photosets.getPhotos",
                &[("photoset_id", self.id.as_str()), ("per_page", "1")],
            )
            .await?;
        Ok(photos.into_iter().next())
    }

    pub async fn comments(&self) -> Result<CommentCollection, FlickrError> {
        self.client.comments_for_photoset(&self.id).await
    }
}

impl Entity for Photoset {
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
