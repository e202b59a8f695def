/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate flickr;

use anyhow::Result;
use dotenvy::dotenv;
use flickr::rest::{Client, Creds, Entity, Photo, Size};

// Prints what is known about a photo and its owner.
// Only the owner's real name needs an extra call.
async fn describe_photo(mut photo: Photo) -> Result<()> {
    let title = photo.title().await?.unwrap_or("(untitled)").to_string();
    let source = photo.source(Some(Size::Small)).await?;
    println!("{} \"{}\"\n    {}", photo.id(), title, source);

    if let Some(owner) = photo.owner().await? {
        let name = owner.name().await?.map(str::to_string);
        println!("    by {}", name.as_deref().unwrap_or(owner.id()));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    // Reads FLICKR_API_KEY along with the optional secret and token
    let creds = Creds::from_env()?;
    let client = Client::new(creds);

    let tag = std::env::args().nth(1);
    let photos = match tag.as_deref() {
        Some(tag) => client.tag(tag).await?,
        None => client.recent().await?,
    };
    println!(
        "Showing {} of {} photos",
        photos.len().min(5),
        photos.total().unwrap_or(photos.len() as u64)
    );

    for photo in photos.into_iter().take(5) {
        describe_photo(photo).await?;
    }

    Ok(())
}
