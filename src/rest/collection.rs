/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::response::{ApiResponse, into_list, text_of};
use crate::rest::{Client, Comment, Listed, Pages, Photo};
use serde_json::{Map, Value};
use std::ops::Deref;

/// Photos returned by a listing call, along with its pagination details
pub type PhotoCollection = Collection<Photo>;

pub type CommentCollection = Collection<Comment>;

/// Entities built from one listing response, in the order the service returned them.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    pages: Option<Pages>,
}

impl<T> Collection<T> {
    /// Builds the collection from a raw response.
    ///
    /// The listing is the first of `listing_keys` present in the response and its
    /// entries live under `child_key`. A single entry decodes as a bare map and is
    /// treated as a list of one; no entries at all gives an empty collection.
    pub fn build<F>(
        mut response: ApiResponse,
        listing_keys: &[&str],
        child_key: &str,
        mut factory: F,
    ) -> Self
    where
        F: FnMut(&str, Map<String, Value>) -> T,
    {
        let Some(Value::Object(mut listing)) =
            listing_keys.iter().find_map(|k| response.remove(*k))
        else {
            return Self::default();
        };

        let pages = Pages::from_node(&listing);
        let items = into_list(listing.remove(child_key))
            .into_iter()
            .filter_map(|child| match child {
                Value::Object(mut attrs) => {
                    let id = attrs.remove("id").as_ref().and_then(text_of).unwrap_or_default();
                    Some(factory(&id, attrs))
                }
                _ => None,
            })
            .collect();
        Self { items, pages }
    }

    pub fn pagination(&self) -> Option<&Pages> {
        self.pages.as_ref()
    }

    pub fn page(&self) -> Option<u64> {
        self.pages.and_then(|p| p.page)
    }

    /// Number of pages available
    pub fn pages(&self) -> Option<u64> {
        self.pages.and_then(|p| p.pages)
    }

    pub fn per_page(&self) -> Option<u64> {
        self.pages.and_then(|p| p.perpage)
    }

    /// Number of entries across all pages
    pub fn total(&self) -> Option<u64> {
        self.pages.and_then(|p| p.total)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Listed> Collection<T> {
    /// Builds the collection using the entity's own listing layout
    pub fn from_response(client: &Client, response: ApiResponse) -> Self {
        Self::build(response, T::LISTING_KEYS, T::CHILD_KEY, |id, attrs| {
            T::from_listing(client.clone(), id, attrs)
        })
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pages: None,
        }
    }
}

impl<T> Deref for Collection<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
