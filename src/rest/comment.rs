/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::macros::attribute_record;
use crate::rest::parsers::from_unix_str;
use crate::rest::{Client, Entity, Listed, Owner, User};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

attribute_record! {
    /// Attributes of a comment.
    ///
    /// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photos.comments.getList.html)
    /// for more details on the individual fields.
    pub struct CommentAttrs {
        /// The comment text
        content => "content",
        permalink => "permalink",
        authorname => "authorname",
        datecreate => "datecreate",
    }
}

/// A comment on a photo or photoset.
///
/// Comments only ever arrive as part of a listing, there is no detail fetch for them.
#[derive(Debug, Clone)]
pub struct Comment {
    pub(crate) client: Client,
    id: String,
    attrs: CommentAttrs,
    author: Option<Owner>,
}

impl Comment {
    pub fn from_attrs(client: Client, id: &str, mut attrs: Map<String, Value>) -> Self {
        let author_name = attrs.get("authorname").and_then(Value::as_str).map(str::to_string);
        let author = attrs
            .remove("author")
            .and_then(|v| Owner::from_value(&v, author_name.as_deref()));
        let mut comment = Self {
            client,
            id: id.into(),
            attrs: CommentAttrs::default(),
            author,
        };
        comment.attrs.absorb(attrs);
        comment
    }

    pub fn attrs(&self) -> &CommentAttrs {
        &self.attrs
    }

    pub fn content(&self) -> Option<&str> {
        self.attrs.content.as_deref()
    }

    pub fn permalink(&self) -> Option<&str> {
        self.attrs.permalink.as_deref()
    }

    pub fn date_created(&self) -> Option<DateTime<Utc>> {
        self.attrs.datecreate.as_deref().and_then(from_unix_str)
    }

    /// The user who wrote the comment, named by the listing's `authorname`
    pub fn author(&mut self) -> Option<&mut User> {
        self.author.as_mut().map(|a| a.resolve(&self.client))
    }
}

impl Entity for Comment {
    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attrs.extra.get(name)
    }

    // Everything a comment has comes with the listing
    fn is_loaded(&self) -> bool {
        true
    }
}

impl Listed for Comment {
    const LISTING_KEYS: &'static [&'static str] = &["comments"];
    const CHILD_KEY: &'static str = "comment";

    fn from_listing(client: Client, id: &str, attrs: Map<String, Value>) -> Self {
        Self::from_attrs(client, id, attrs)
    }
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.content().unwrap_or_default())
    }
}
