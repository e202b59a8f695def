/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

// Declares the typed attribute record of an entity. Every listed field is filled from
// the first matching response key, anything unrecognized lands in `extra`.
macro_rules! attribute_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident => $($key:literal)|+ ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: Option<String>, )*

            /// Everything returned that has no field of its own
            pub extra: serde_json::Map<String, serde_json::Value>,
        }

        impl $name {
            pub(crate) fn absorb(&mut self, attrs: serde_json::Map<String, serde_json::Value>) {
                for (key, value) in attrs {
                    let text = $crate::rest::response::text_of(&value);
                    match key.as_str() {
                        $( $($key)|+ if text.is_some() => self.$field = text, )*
                        // Empty elements decode to {} and carry nothing
                        _ if value.as_object().is_some_and(|m| m.is_empty()) => (),
                        _ => {
                            self.extra.insert(key, value);
                        }
                    }
                }
            }
        }
    };
}

// Generates the declared accessors of an entity. Each returns the cached value or does
// the entity's one detail fetch through `self.load()` before reading it.
macro_rules! lazy_accessors {
    ( $( $(#[$meta:meta])* $field:ident ),* $(,)? ) => {
        $(
            $(#[$meta])*
            pub async fn $field(&mut self) -> Result<Option<&str>, $crate::rest::errors::FlickrError> {
                if self.attrs.$field.is_none() {
                    self.load().await?;
                }
                Ok(self.attrs.$field.as_deref())
            }
        )*
    };
}

pub(crate) use {attribute_record, lazy_accessors};
