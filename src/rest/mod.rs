/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod api;
pub mod client;
pub mod collection;
pub mod comment;
pub mod entity;
pub mod errors;
pub mod group;
mod macros;
mod parsers;
pub mod photo;
pub mod photoset;
pub mod properties;
pub mod response;
pub mod signer;
pub mod user;

pub use api::*;
pub use client::*;
pub use collection::*;
pub use comment::*;
pub use entity::*;
pub use errors::*;
pub use group::*;
pub use photo::*;
pub use photoset::*;
pub use properties::*;
pub use signer::*;
pub use user::*;
