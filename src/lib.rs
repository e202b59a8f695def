/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Flickr
//!
//! This Flickr library was created for working with the Flickr REST API.
//!
//! For further details on the API refer to the [Flickr API Docs](https://www.flickr.com/services/api/)
//!
//! ## Features
//!
//! - Any remote method can be called by name through [`rest::Client::call_method`]
//! - Request signing with the application's shared secret
//! - Users, Photos, Groups, Photosets and Comments
//!     - Attributes are fetched the first time they are asked for and cached
//!     - Attributes that are not modeled are still reachable by name
//! - Photo listings keep the pagination details of the page returned
//! - Auth token exchange and login url generation
//!
//! *Getting the frob for the token exchange is left up to the consumer of this library*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! flickr = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! **You will need to acquire an API key from Flickr prior to using the API**
//!
//! ```rust,no_run
//! use flickr::rest::{Client, Creds, Entity, FlickrError, Size};
//!
//! async fn print_recent(api_key: &str) -> Result<(), FlickrError> {
//!     let client = Client::new(Creds::from_api_key(api_key));
//!
//!     // The 100 newest public photos
//!     let photos = client.recent().await?;
//!     for mut photo in photos {
//!         // Title comes with the listing, no extra call is made
//!         let title = photo.title().await?.unwrap_or_default().to_string();
//!         let source = photo.source(Some(Size::Small)).await?;
//!         println!("{} {}: {}", photo.id(), title, source);
//!
//!         // The owner's real name needs the user's details, fetched once here
//!         if let Some(owner) = photo.owner().await? {
//!             println!("  by {:?}", owner.name().await?);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
pub mod rest;
