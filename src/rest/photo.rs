/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::macros::{attribute_record, lazy_accessors};
use crate::rest::parsers::{from_empty_str_to_none, from_str_to_u32, from_taken_str};
use crate::rest::response::{as_list, field, require, take_map, text_of, texts};
use crate::rest::{ApiParams, Client, CommentCollection, Entity, Listed, Owner, Size, User};
use bytes::Bytes;
use chrono::NaiveDateTime;
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

attribute_record! {
    /// Attributes known for a photo.
    ///
    /// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photos.getInfo.html)
    /// for more details on the individual fields.
    pub struct PhotoAttrs {
        title => "title",
        description => "description",
        farm => "farm",
        server => "server",
        secret => "secret",
        isfavorite => "isfavorite",
        license => "license",
        rotation => "rotation",
        date_taken => "date_taken" | "datetaken",
        /// Photo page url using the owner's custom name
        pretty_url => "pretty_url",
    }
}

/// A single photo
#[derive(Debug, Clone)]
pub struct Photo {
    pub(crate) client: Client,
    id: String,
    attrs: PhotoAttrs,
    owner: Option<Owner>,
    notes: Option<Vec<Value>>,
    loaded: bool,
}

impl Photo {
    const INFO_METHOD: &'static str = "photos.getInfo";

    pub fn new(client: Client, id: &str) -> Self {
        Self::from_attrs(client, id, Map::new())
    }

    /// A photo with whatever attributes were returned inline, e.g. by a search
    pub fn from_attrs(client: Client, id: &str, mut attrs: Map<String, Value>) -> Self {
        let owner_name = attrs.get("ownername").and_then(text_of);
        let owner = attrs
            .remove("owner")
            .and_then(|v| Owner::from_value(&v, owner_name.as_deref()));
        let mut photo = Self {
            client,
            id: id.into(),
            attrs: PhotoAttrs::default(),
            owner,
            notes: None,
            loaded: false,
        };
        photo.attrs.absorb(attrs);
        photo
    }

    /// A photo with a client of its own built from the api key
    pub fn with_api_key(id: &str, api_key: &str) -> Self {
        Self::new(Client::from_api_key(api_key), id)
    }

    pub fn attrs(&self) -> &PhotoAttrs {
        &self.attrs
    }

    // Implements flickr.photos.getInfo
    async fn load(&mut self) -> Result<(), FlickrError> {
        if self.loaded {
            return Ok(());
        }
        let mut resp = self
            .client
            .call(Self::INFO_METHOD, &[("photo_id", self.id.as_str())])
            .await?;
        let mut info = take_map(&mut resp, &["photo"])?;

        if let Some(taken) = info.remove("dates").as_ref().and_then(|d| d.get("taken")) {
            info.insert("date_taken".to_string(), taken.clone());
        }
        if let Some(url) = info
            .remove("urls")
            .as_ref()
            .and_then(|u| as_list(u.get("url")).first().and_then(|u| text_of(u)))
        {
            info.insert("pretty_url".to_string(), Value::String(url));
        }
        let notes = info.remove("notes");
        let notes = as_list(notes.as_ref().and_then(|n| n.get("note")));
        self.notes = Some(notes.into_iter().cloned().collect());

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
        title,
        description,
        server,
        isfavorite,
        license,
        rotation,
        /// When the photo was taken, e.g. "2008-04-06 11:30:51"
        date_taken,
        pretty_url,
    }

    pub fn farm(&self) -> Option<&str> {
        self.attrs.farm.as_deref()
    }

    pub fn secret(&self) -> Option<&str> {
        self.attrs.secret.as_deref()
    }

    pub async fn taken_at(&mut self) -> Result<Option<NaiveDateTime>, FlickrError> {
        Ok(self.date_taken().await?.and_then(from_taken_str))
    }

    /// Notes placed on the photo
    pub async fn notes(&mut self) -> Result<&[Value], FlickrError> {
        if self.notes.is_none() {
            self.load().await?;
        }
        Ok(self.notes.as_deref().unwrap_or_default())
    }

    /// The user who owns the photo.
    ///
    /// An owner id returned with the photo is turned into a [`User`] without a call.
    pub async fn owner(&mut self) -> Result<Option<&mut User>, FlickrError> {
        if self.owner.is_none() {
            self.load().await?;
        }
        Ok(self.owner.as_mut().map(|o| o.resolve(&self.client)))
    }

    // Builds the image source url as described at
    // http://www.flickr.com/services/api/misc.urls.html
    fn source_from_self(&self, size: Option<Size>) -> Option<String> {
        let farm = self.attrs.farm.as_deref()?;
        let server = self.attrs.server.as_deref()?;
        let secret = self.attrs.secret.as_deref()?;
        let base = format!("http://farm{}.static.flickr.com/{}/{}_{}", farm, server, self.id, secret);
        Some(match size.and_then(Size::source_code) {
            Some(code) => format!("{base}_{code}.jpg"),
            None => format!("{base}.jpg"),
        })
    }

    // Builds the url of the photo page, or of the page showing the given size
    fn page_url_from_self(&self, size: Option<Size>) -> Option<String> {
        let owner = self.owner.as_ref()?;
        let base = format!("http://www.flickr.com/photos/{}/{}", owner.id(), self.id);
        Some(match size {
            Some(size) => format!("{}/sizes/{}/", base, size.page_code()),
            None => base,
        })
    }

    /// Url of the main photo page.
    ///
    /// `Medium` prefers the pretty url once the info has been loaded. Any other size
    /// returns the page for that size, see [`Photo::size_url`].
    pub async fn url(&mut self, size: Option<Size>) -> Result<Option<String>, FlickrError> {
        match size {
            Some(Size::Medium) if self.attrs.pretty_url.is_some() => {
                Ok(self.attrs.pretty_url.clone())
            }
            Some(Size::Medium) | None => {
                if self.owner.is_none() {
                    self.load().await?;
                }
                Ok(self.page_url_from_self(None))
            }
            Some(size) => self.size_url(size).await.map(Some),
        }
    }

    /// Url of the flickr.com page showing the given size
    pub async fn size_url(&self, size: Size) -> Result<String, FlickrError> {
        if let Some(url) = self.page_url_from_self(Some(size)) {
            return Ok(url);
        }
        self.size(size.label())
            .await?
            .and_then(|s| s.url)
            .ok_or_else(|| FlickrError::ResponseMissing(format!("url for size {}", size)))
    }

    /// Url of the image itself. With no size the default (Medium) image is returned.
    pub async fn source(&self, size: Option<Size>) -> Result<String, FlickrError> {
        if let Some(url) = self.source_from_self(size) {
            return Ok(url);
        }
        let label = size.unwrap_or(Size::Medium).label();
        self.size(label)
            .await?
            .and_then(|s| s.source)
            .ok_or_else(|| FlickrError::ResponseMissing(format!("source for size {}", label)))
    }

    /// Downloads the image data
    pub async fn file(&self, size: Option<Size>) -> Result<Bytes, FlickrError> {
        let source = self.source(size).await?;
        self.client.api_client().fetch(&source).await
    }

    /// Unique filename for the image based on its id
    pub fn filename(&self) -> String {
        format!("{}.jpg", self.id)
    }

    // Implements flickr.photos.getContext
    /// The photos before and after this one in the owner's photostream
    pub async fn context(&self) -> Result<PhotoContext, FlickrError> {
        let mut resp = self
            .client
            .call("photos.getContext", &[("photo_id", self.id.as_str())])
            .await?;
        let mut neighbour = |key: &str| {
            let mut attrs = take_map(&mut resp, &[key]).ok()?;
            let id = attrs.remove("id").as_ref().and_then(text_of)?;
            // "0" marks the ends of the stream
            (id != "0").then(|| Photo::from_attrs(self.client.clone(), &id, attrs))
        };
        Ok(PhotoContext {
            previous: neighbour("prevphoto"),
            next: neighbour("nextphoto"),
        })
    }

    // Implements flickr.photos.getExif
    pub async fn exif(&self) -> Result<Value, FlickrError> {
        let resp = self
            .client
            .call("photos.getExif", &[("photo_id", self.id.as_str())])
            .await?;
        Ok(require(&resp, &["photo"])?.clone())
    }

    // Implements flickr.photos.getPerms
    pub async fn permissions(&self) -> Result<Value, FlickrError> {
        let resp = self
            .client
            .call("photos.getPerms", &[("photo_id", self.id.as_str())])
            .await?;
        Ok(require(&resp, &["perms"])?.clone())
    }

    // Implements flickr.photos.getSizes
    /// Every size available for the photo
    pub async fn sizes(&self) -> Result<Vec<SizeInfo>, FlickrError> {
        let resp = self
            .client
            .call("photos.getSizes", &[("photo_id", self.id.as_str())])
            .await?;
        as_list(field(&resp, &["sizes", "size"]))
            .into_iter()
            .map(|s| serde_json::from_value::<SizeInfo>(s.clone()).map_err(FlickrError::from))
            .collect()
    }

    /// Details of the size with the given label, e.g. "Original"
    pub async fn size(&self, label: &str) -> Result<Option<SizeInfo>, FlickrError> {
        Ok(self
            .sizes()
            .await?
            .into_iter()
            .find(|s| s.label.eq_ignore_ascii_case(label)))
    }

    /// True when the medium size is taller than it is wide
    pub async fn is_vertical(&self) -> Result<bool, FlickrError> {
        let medium = self.size(Size::Medium.label()).await?;
        Ok(medium.is_some_and(|m| m.height > m.width))
    }

    // Implements flickr.tags.getListPhoto
    pub async fn tags(&self) -> Result<Vec<String>, FlickrError> {
        let resp = self
            .client
            .call("tags.getListPhoto", &[("photo_id", self.id.as_str())])
            .await?;
        Ok(texts(field(&resp, &["photo", "tags", "tag"])))
    }

    pub async fn comments(&self) -> Result<CommentCollection, FlickrError> {
        self.client.comments_for_photo(&self.id).await
    }

    // Implements flickr.blogs.postPhoto
    pub async fn post_to_blog(
        &self,
        blog_id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), FlickrError> {
        self.client
            .call(
                "blogs.postPhoto",
                &[
                    ("blog_id", blog_id),
                    ("photo_id", self.id.as_str()),
                    ("title", title),
                    ("description", description),
                ],
            )
            .await?;
        Ok(())
    }

    fn unsupported(&self, method: &'static str) -> Result<(), FlickrError> {
        warn!("{} requested for photo {} but is not supported", method, self.id);
        Err(FlickrError::MissingCapability(method))
    }

    pub async fn add_note(&self, _note: &str) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.notes.add")
    }

    pub async fn edit_note(&self, _note_id: &str, _note: &str) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.notes.edit")
    }

    pub async fn delete_note(&self, _note_id: &str) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.notes.delete")
    }

    pub async fn set_dates(&self, _dates: &ApiParams<'_>) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.setDates")
    }

    pub async fn set_perms(&self, _perms: &ApiParams<'_>) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.setPerms")
    }

    pub async fn set_tags(&self, _tags: &[&str]) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.setTags")
    }

    pub async fn set_title(&self, _title: &str) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.setMeta")
    }

    pub async fn set_description(&self, _description: &str) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.setMeta")
    }

    pub async fn add_tag(&self, _tag: &str) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.addTags")
    }

    pub async fn remove_tag(&self, _tag_id: &str) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.removeTag")
    }

    pub async fn rotate(&self, _degrees: u32) -> Result<(), FlickrError> {
        self.unsupported("flickr.photos.transform.rotate")
    }
}

impl Entity for Photo {
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

impl Listed for Photo {
    // photos.search and friends use <photos>, photosets.getPhotos uses <photoset>
    const LISTING_KEYS: &'static [&'static str] = &["photos", "photoset"];
    const CHILD_KEY: &'static str = "photo";

    fn from_listing(client: Client, id: &str, attrs: Map<String, Value>) -> Self {
        Self::from_attrs(client, id, attrs)
    }
}

impl std::fmt::Display for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.attrs.title.as_deref().unwrap_or(&self.id))
    }
}

/// One entry of `flickr.photos.getSizes`
#[derive(Deserialize, Debug, Clone)]
pub struct SizeInfo {
    pub label: String,

    #[serde(default, deserialize_with = "from_str_to_u32")]
    pub width: Option<u32>,

    #[serde(default, deserialize_with = "from_str_to_u32")]
    pub height: Option<u32>,

    /// Url of the image file
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub source: Option<String>,

    /// Url of the flickr.com page for this size
    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub media: Option<String>,
}

/// Neighbours of a photo, `None` at either end of the photostream
#[derive(Debug, Clone)]
pub struct PhotoContext {
    pub previous: Option<Photo>,
    pub next: Option<Photo>,
}
