/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::parsers::from_num_str;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Photo sizes by the label `flickr.photos.getSizes` reports.
///
/// Flickr addresses a size with a different code depending on context. A "Small"
/// photo is viewed at `http://www.flickr.com/photos/sco/2397458775/sizes/s/` but
/// its source is `http://farm4.static.flickr.com/3118/2397458775_2ec2ddc324_m.jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Size {
    Square,
    Thumbnail,
    Small,
    Medium,
    Large,
}

impl Size {
    /// Suffix used in the image source url. Medium has none.
    pub fn source_code(self) -> Option<&'static str> {
        match self {
            Size::Square => Some("s"),
            Size::Thumbnail => Some("t"),
            Size::Small => Some("m"),
            Size::Medium => None,
            Size::Large => Some("b"),
        }
    }

    /// Path segment used for the size page on flickr.com
    pub fn page_code(self) -> &'static str {
        match self {
            Size::Square => "sq",
            Size::Thumbnail => "t",
            Size::Small => "s",
            Size::Medium => "m",
            Size::Large => "l",
        }
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Permission requested when sending a user to the login page
#[derive(Debug, Clone, Copy, Serialize, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
}

/// Pagination details returned along with a page of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pages {
    pub page: Option<u64>,
    pub pages: Option<u64>,
    pub perpage: Option<u64>,
    pub total: Option<u64>,
}

impl Pages {
    /// Pulls pagination attributes off a listing node, if any are present
    pub(crate) fn from_node(node: &Map<String, Value>) -> Option<Self> {
        let get = |key: &str| node.get(key).and_then(from_num_str);
        let pages = Pages {
            page: get("page"),
            pages: get("pages"),
            perpage: get("perpage").or_else(|| get("per_page")),
            total: get("total"),
        };
        (pages != Pages::default()).then_some(pages)
    }
}
