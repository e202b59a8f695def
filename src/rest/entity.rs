/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Behaviour shared by the domain objects.
//!
//! An entity is identified by its id and carries a [`Client`] so it can fetch the rest
//! of its own data later. Declared accessors take `&mut self`: the one detail fetch and
//! the cache write that follows can never race with another reader of the same entity.

use crate::rest::response::text_of;
use crate::rest::{Client, User};
use serde_json::{Map, Value};

/// Read access every entity offers
pub trait Entity {
    fn id(&self) -> &str;

    /// Reads an attribute the entity does not model. Never fetches.
    fn attribute(&self, name: &str) -> Option<&Value>;

    /// True once the detail fetch has happened
    fn is_loaded(&self) -> bool;
}

/// Entities that can be built from an entry of a listing response
pub trait Listed: Sized {
    /// Candidate keys holding the listing, in priority order
    const LISTING_KEYS: &'static [&'static str];

    /// Key of the repeated child element inside the listing
    const CHILD_KEY: &'static str;

    fn from_listing(client: Client, id: &str, attrs: Map<String, Value>) -> Self;
}

/// A user reference that is either just an id or a full [`User`].
///
/// Only ever moves from `Unresolved` to `Resolved`.
#[derive(Debug, Clone)]
pub enum Owner {
    Unresolved {
        id: String,
        username: Option<String>,
    },
    Resolved(Box<User>),
}

impl Owner {
    pub fn new(id: &str, username: Option<&str>) -> Self {
        Owner::Unresolved {
            id: id.into(),
            username: username.map(Into::into),
        }
    }

    /// Reads an owner that is either a bare id or a `{nsid, username}` map
    pub(crate) fn from_value(value: &Value, username: Option<&str>) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let id = map.get("nsid").or_else(|| map.get("id")).and_then(text_of)?;
                let username = map.get("username").and_then(text_of);
                Some(Owner::new(&id, username.as_deref()))
            }
            v => text_of(v).map(|id| Owner::new(&id, username)),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Owner::Unresolved { id, .. } => id,
            Owner::Resolved(user) => user.id(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Owner::Resolved(_))
    }

    pub(crate) fn resolve(&mut self, client: &Client) -> &mut User {
        if let Owner::Unresolved { id, username } = self {
            let mut attrs = Map::new();
            if let Some(username) = username.take() {
                attrs.insert("username".to_string(), Value::String(username));
            }
            let user = User::from_attrs(client.clone(), id, attrs);
            *self = Owner::Resolved(Box::new(user));
        }
        match self {
            Owner::Resolved(user) => user,
            Owner::Unresolved { .. } => unreachable!("owner is resolved above"),
        }
    }
}
