/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers::{self, StubTransport, stub_client};
    use dotenvy::dotenv;
    use flickr::rest::{
        ApiErrorCodes, Creds, Entity, FlickrError, Permission, Size, UrlTarget,
    };

    const PHOTO_INFO: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
        <rsp stat="ok">
          <photo id="2397458775" secret="2ec2ddc324" server="3118" farm="4" isfavorite="0" license="3" rotation="0">
            <owner nsid="35468159852@N01" username="sco" realname="Scott" location=""/>
            <title>Sunset</title>
            <description/>
            <dates posted="1207502871" taken="2008-04-06 11:30:51" takengranularity="0"/>
            <notes>
              <note id="313" author="12037949754@N01" x="10" y="10" w="50" h="50">foo</note>
            </notes>
            <urls>
              <url type="photopage">http://www.flickr.com/photos/sco/2397458775/</url>
            </urls>
          </photo>
        </rsp>"#;

    const SEARCH_ONE: &str = r#"<rsp stat="ok">
          <photos page="1" pages="1" perpage="100" total="1">
            <photo id="2397458775" owner="35468159852@N01" ownername="sco" secret="2ec2ddc324"
                   server="3118" farm="4" title="Sunset" ispublic="1" isfriend="0" isfamily="0"/>
          </photos>
        </rsp>"#;

    const SEARCH_PAGE: &str = r#"<rsp stat="ok">
          <photos page="2" pages="10" perpage="2" total="20">
            <photo id="2636" owner="47058503995@N01" secret="a123456" server="2" farm="1" title="test_04"/>
            <photo id="2635" owner="47058503995@N01" secret="b123456" server="2" farm="1" title="test_03"/>
          </photos>
        </rsp>"#;

    const SEARCH_EMPTY: &str =
        r#"<rsp stat="ok"><photos page="1" pages="0" perpage="100" total="0"/></rsp>"#;

    const PERSON_INFO: &str = r#"<rsp stat="ok">
          <person id="35468159852@N01" nsid="35468159852@N01" ispro="1">
            <username>sco</username>
            <realname>Scott</realname>
            <location>Vancouver, Canada</location>
            <photosurl>http://www.flickr.com/photos/sco/</photosurl>
            <photos>
              <firstdate>1071510391</firstdate>
              <firstdatetaken>1900-09-02 09:11:24</firstdatetaken>
              <count>449</count>
            </photos>
          </person>
        </rsp>"#;

    #[tokio::test]
    async fn declared_attribute_is_fetched_once() {
        let stub = StubTransport::new().respond("flickr.photos.getInfo", PHOTO_INFO);
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        let mut photo = client.photo("2397458775");
        assert!(!photo.is_loaded());

        assert_eq!(photo.title().await.unwrap(), Some("Sunset"));
        assert_eq!(photo.title().await.unwrap(), Some("Sunset"));
        assert_eq!(stub.calls("flickr.photos.getInfo"), 1);
        assert!(photo.is_loaded());

        // Empty in the response, still no second fetch
        assert_eq!(photo.description().await.unwrap(), None);
        assert_eq!(photo.date_taken().await.unwrap(), Some("2008-04-06 11:30:51"));
        assert_eq!(photo.notes().await.unwrap().len(), 1);
        assert_eq!(stub.calls("flickr.photos.getInfo"), 1);

        // Unmodeled attributes stay reachable by name
        assert!(photo.attribute("notes").is_none());
        assert!(photo.attribute("urls").is_none());
        assert_eq!(
            photo.url(Some(Size::Medium)).await.unwrap().as_deref(),
            Some("http://www.flickr.com/photos/sco/2397458775/")
        );
    }

    #[tokio::test]
    async fn inline_attributes_need_no_fetch() {
        let stub = StubTransport::new().respond("flickr.photos.search", SEARCH_ONE);
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        let photos = client.search(&[("tags", "sunset")]).await.unwrap();
        assert_eq!(photos.len(), 1);

        let mut photo = photos.into_iter().next().unwrap();
        assert_eq!(photo.id(), "2397458775");
        assert_eq!(photo.title().await.unwrap(), Some("Sunset"));
        assert_eq!(
            photo.attribute("ispublic").and_then(|v| v.as_str()),
            Some("1")
        );
        assert!(!photo.is_loaded());
        assert_eq!(stub.calls("flickr.photos.getInfo"), 0);

        // Owner comes from the listing, only its undeclared details need a call
        let owner = photo.owner().await.unwrap().unwrap();
        assert_eq!(owner.id(), "35468159852@N01");
        assert_eq!(owner.username().await.unwrap(), Some("sco"));
        assert_eq!(stub.total_calls(), 1);
    }

    #[tokio::test]
    async fn owner_details_are_fetched_once() {
        let stub = StubTransport::new()
            .respond("flickr.photos.search", SEARCH_ONE)
            .respond("flickr.people.getInfo", PERSON_INFO);
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        let mut photo = client.tag("sunset").await.unwrap().into_vec().remove(0);

        let owner = photo.owner().await.unwrap().unwrap();
        assert_eq!(owner.name().await.unwrap(), Some("Scott"));
        assert_eq!(owner.count().await.unwrap(), Some("449"));
        assert_eq!(
            owner.first_upload().await.unwrap().map(|d| d.timestamp()),
            Some(1071510391)
        );

        // Same owner instance is handed out again
        let owner = photo.owner().await.unwrap().unwrap();
        assert_eq!(owner.location().await.unwrap(), Some("Vancouver, Canada"));
        assert_eq!(stub.calls("flickr.people.getInfo"), 1);
    }

    #[tokio::test]
    async fn listings_normalize_single_and_missing_entries() {
        let stub = StubTransport::new()
            .respond("flickr.photos.search", SEARCH_PAGE)
            .respond("flickr.photos.getRecent", SEARCH_EMPTY);
        let (client, _) = stub_client(Creds::from_api_key("key"), stub);

        let photos = client.photos(&[("tags", "test")]).await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id(), "2636");
        assert_eq!(photos[1].id(), "2635");
        assert_eq!(photos.page(), Some(2));
        assert_eq!(photos.pages(), Some(10));
        assert_eq!(photos.per_page(), Some(2));
        assert_eq!(photos.total(), Some(20));

        // No criteria means the most recent photos
        let recent = client.photos(&[]).await.unwrap();
        assert!(recent.is_empty());
        assert_eq!(recent.total(), Some(0));
    }

    #[tokio::test]
    async fn urls_are_built_from_known_attributes() {
        let stub = StubTransport::new().respond("flickr.photos.search", SEARCH_ONE);
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        let mut photo = client.tag("sunset").await.unwrap().into_vec().remove(0);

        assert_eq!(
            photo.source(Some(Size::Small)).await.unwrap(),
            "http://farm4.static.flickr.com/3118/2397458775_2ec2ddc324_m.jpg"
        );
        assert_eq!(
            photo.source(None).await.unwrap(),
            "http://farm4.static.flickr.com/3118/2397458775_2ec2ddc324.jpg"
        );
        assert_eq!(
            photo.url(None).await.unwrap().as_deref(),
            Some("http://www.flickr.com/photos/35468159852@N01/2397458775")
        );
        assert_eq!(
            photo.url(Some(Size::Small)).await.unwrap().as_deref(),
            Some("http://www.flickr.com/photos/35468159852@N01/2397458775/sizes/s/")
        );
        assert_eq!(photo.filename(), "2397458775.jpg");
        assert_eq!(stub.total_calls(), 1);
    }

    #[tokio::test]
    async fn missing_photo_fails_with_service_message() {
        let stub = StubTransport::new().respond(
            "flickr.photos.getInfo",
            r#"<rsp stat="fail"><err code="1" msg="Photo not found"/></rsp>"#,
        );
        let (client, _) = stub_client(Creds::from_api_key("key"), stub);
        let mut photo = client.photo("1");

        let err = photo.title().await.unwrap_err();
        assert_eq!(err.api_error_code(), Some(ApiErrorCodes::NotFound));
        match err {
            FlickrError::ApiResponse(code, msg) => {
                assert_eq!(code, 1);
                assert_eq!(msg, "Photo not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!photo.is_loaded());
    }

    #[tokio::test]
    async fn find_by_url_falls_back_to_groups() {
        let stub = StubTransport::new().respond(
            "flickr.urls.lookupGroup",
            r#"<rsp stat="ok"><group id="34427469792@N01"><groupname>FlickrCentral</groupname></group></rsp>"#,
        );
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);

        match client
            .find_by_url("http://www.flickr.com/groups/central/")
            .await
        {
            Some(UrlTarget::Group(mut group)) => {
                assert_eq!(group.id(), "34427469792@N01");
                assert_eq!(group.name().await.unwrap(), Some("FlickrCentral"));
            }
            other => panic!("expected a group, got {other:?}"),
        }
        assert_eq!(stub.calls("flickr.urls.lookupUser"), 1);
        assert_eq!(stub.calls("flickr.groups.getInfo"), 0);
    }

    #[tokio::test]
    async fn find_by_url_prefers_users_and_gives_none_otherwise() {
        let stub = StubTransport::new().respond(
            "flickr.urls.lookupUser",
            r#"<rsp stat="ok"><user id="12037949632@N01"><username>Stewart</username></user></rsp>"#,
        );
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        match client.find_by_url("http://www.flickr.com/photos/stewart/").await {
            Some(UrlTarget::User(mut user)) => {
                assert_eq!(user.username().await.unwrap(), Some("Stewart"));
            }
            other => panic!("expected a user, got {other:?}"),
        }
        assert_eq!(stub.calls("flickr.urls.lookupGroup"), 0);

        let (client, _) = stub_client(Creds::from_api_key("key"), StubTransport::new());
        assert!(client.find_by_url("http://example.com/").await.is_none());
    }

    #[tokio::test]
    async fn users_falls_back_to_username() {
        let stub = StubTransport::new().respond(
            "flickr.people.findByUsername",
            r#"<rsp stat="ok"><user id="12037949632@N01" nsid="12037949632@N01"><username>Stewart</username></user></rsp>"#,
        );
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        let mut user = client.users("Stewart").await.unwrap();
        assert_eq!(user.id(), "12037949632@N01");
        assert_eq!(user.username().await.unwrap(), Some("Stewart"));
        assert_eq!(stub.calls("flickr.people.findByEmail"), 1);
        assert_eq!(stub.calls("flickr.people.getInfo"), 0);

        // Neither lookup matching surfaces the last failure
        let (client, _) = stub_client(Creds::from_api_key("key"), StubTransport::new());
        assert!(matches!(
            client.users("nobody").await,
            Err(FlickrError::ApiResponse(1, _))
        ));
    }

    #[tokio::test]
    async fn exchanged_token_is_used_for_later_calls() {
        let stub = StubTransport::new()
            .respond(
                "flickr.auth.getToken",
                r#"<rsp stat="ok">
                     <auth>
                       <token>433445-76598454353455</token>
                       <perms>read</perms>
                       <user nsid="12037949754@N01" username="Bees" fullname="Cal H"/>
                     </auth>
                   </rsp>"#,
            )
            .respond(
                "flickr.test.echo",
                r#"<rsp stat="ok"><method>flickr.test.echo</method></rsp>"#,
            );
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);

        let mut exchange = client.get_token_from("frob-1").await.unwrap();
        assert_eq!(exchange.token, "433445-76598454353455");
        assert_eq!(exchange.user.id(), "12037949754@N01");
        assert_eq!(exchange.user.name().await.unwrap(), Some("Cal H"));
        assert_eq!(client.api_client().auth_token(), Some("433445-76598454353455"));

        client.call_method("test.echo", &[]).await.unwrap();
        let token = stub
            .last_request()
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "auth_token")
            .map(|(_, v)| v.into_owned());
        assert_eq!(token.as_deref(), Some("433445-76598454353455"));

        assert!(matches!(
            client.get_token_from("frob-2").await,
            Err(FlickrError::AuthTokenAlreadySet)
        ));
    }

    #[tokio::test]
    async fn method_names_are_normalized() {
        let stub = StubTransport::new().respond(
            "flickr.test.echo",
            r#"<rsp stat="ok"><method>flickr.test.echo</method><foo>bar</foo></rsp>"#,
        );
        let (client, stub) = stub_client(Creds::from_tokens("key", Some("secret"), None), stub);

        for name in ["test_echo", "test.echo", "flickr.test.echo"] {
            let resp = client.call_method(name, &[("foo", "bar")]).await.unwrap();
            assert_eq!(resp["foo"], "bar");
        }
        assert_eq!(stub.calls("flickr.test.echo"), 3);

        let signed = stub
            .last_request()
            .unwrap()
            .query_pairs()
            .any(|(k, _)| k == "api_sig");
        assert!(signed);
    }

    #[tokio::test]
    async fn mutations_are_not_supported() {
        let (client, stub) = stub_client(Creds::from_api_key("key"), StubTransport::new());
        let photo = client.photo("2397458775");

        assert!(matches!(
            photo.add_tag("sunset").await,
            Err(FlickrError::MissingCapability("flickr.photos.addTags"))
        ));
        assert!(matches!(
            photo.rotate(90).await,
            Err(FlickrError::MissingCapability(_))
        ));
        assert_eq!(stub.total_calls(), 0);
    }

    #[tokio::test]
    async fn photoset_url_builds_on_owner_photostream() {
        let stub = StubTransport::new()
            .respond(
                "flickr.photosets.getInfo",
                r#"<rsp stat="ok">
                     <photoset id="72157594162136486" owner="35468159852@N01" primary="2483" photos="5">
                       <title>Test</title>
                       <description>foo</description>
                     </photoset>
                   </rsp>"#,
            )
            .respond("flickr.people.getInfo", PERSON_INFO);
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        let mut photoset = client.photoset("72157594162136486");

        assert_eq!(
            photoset.url().await.unwrap(),
            Some("http://www.flickr.com/photos/sco/sets/72157594162136486/")
        );
        assert_eq!(photoset.title().await.unwrap(), Some("Test"));
        assert_eq!(photoset.primary().await.unwrap(), Some("2483"));
        assert_eq!(photoset.attribute("photos").and_then(|v| v.as_str()), Some("5"));
        assert_eq!(stub.calls("flickr.photosets.getInfo"), 1);
        assert_eq!(stub.calls("flickr.people.getInfo"), 1);
    }

    #[tokio::test]
    async fn comments_carry_their_author() {
        let stub = StubTransport::new().respond(
            "flickr.photos.comments.getList",
            r#"<rsp stat="ok">
                 <comments photo_id="109722179">
                   <comment id="6065-109722179-72057594077818641" author="35468159852@N01"
                            authorname="Rev Dan Catt" datecreate="1141841470"
                            permalink="http://www.flickr.com/photos/straup/109722179/#comment72057594077818641">Umm, I'm not sure, can I get back to you on that one?</comment>
                 </comments>
               </rsp>"#,
        );
        let (client, stub) = stub_client(Creds::from_api_key("key"), stub);
        let comments = client.photo("109722179").comments().await.unwrap();
        assert_eq!(comments.len(), 1);
        assert!(comments.pagination().is_none());

        let mut comment = comments.into_vec().remove(0);
        assert_eq!(
            comment.content(),
            Some("Umm, I'm not sure, can I get back to you on that one?")
        );
        assert_eq!(comment.date_created().map(|d| d.timestamp()), Some(1141841470));

        let author = comment.author().unwrap();
        assert_eq!(author.id(), "35468159852@N01");
        assert_eq!(author.username().await.unwrap(), Some("Rev Dan Catt"));
        assert_eq!(stub.total_calls(), 1);
    }

    #[tokio::test]
    async fn login_url_is_signed() {
        let (client, stub) = stub_client(
            Creds::from_tokens("key", Some("secret"), None),
            StubTransport::new(),
        );
        let url = client.login_url(Permission::Write, None).unwrap();
        let expected = format!("{:x}", md5::compute("secretapi_keykeypermswrite"));
        assert_eq!(
            url,
            format!("http://flickr.com/services/auth/?api_key=key&perms=write&api_sig={expected}")
        );
        assert_eq!(stub.total_calls(), 0);
    }

    // Needs FLICKR_API_KEY and network access
    #[ignore]
    #[tokio::test]
    async fn recent_photos_live() {
        dotenv().ok();
        let _ = env_logger::try_init();
        let creds = helpers::get_read_only_auth_tokens().unwrap();
        let client = flickr::rest::Client::new(creds);
        let photos = client.recent().await.unwrap();
        assert!(!photos.is_empty());
        for photo in photos.iter().take(3) {
            println!("Photo: {} {}", photo.id(), photo);
        }
    }

    #[ignore]
    #[tokio::test]
    async fn licenses_live() {
        dotenv().ok();
        let creds = helpers::get_full_auth_tokens().unwrap();
        let client = flickr::rest::Client::new(creds);
        let licenses = client.licenses().await.unwrap();
        println!("Licenses: {:?}", licenses);
        assert!(!licenses.is_empty());
    }
}
