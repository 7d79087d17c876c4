//! Blocking client against an in-process transport.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockTransport;
use common::blocking_client;
use common::member_json;
use common::player_json;
use common::with_quota;
use royale_lib::ApiVariant;
use royale_lib::ClientConfig;
use royale_lib::Error;
use royale_lib::Execute;
use royale_lib::cache::CacheConfig;
use royale_lib::error::RequestError;
use royale_lib::error::StatusError;
use royale_lib::transport::ResponseEnvelope;
use serde_json::json;

mod official {
    use royale_lib::api::LocationId;
    use royale_lib::api::OfficialApi;
    use royale_lib::api::Paging;
    use royale_lib::api::official as endpoints;

    use super::*;

    #[test]
    fn test_get_player_uses_canonical_tag() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let (client, _) = blocking_client(ClientConfig::new("token"), &transport);

        let player = client.get_player("2p0lyq").unwrap();

        assert_eq!(player.name, "Alpha");
        assert!(player.cache.is_none());
        assert_eq!(transport.calls(), 1);
        assert_eq!(
            transport.last_url().as_deref(),
            Some("https://api.clashroyale.com/v1/players/%232P0LYQ")
        );
        let request = &transport.requests()[0];
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer token")
        );
        assert!(request.headers["user-agent"].starts_with("royale-lib/"));
    }

    #[test]
    fn test_player_convenience_properties() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let (client, _) = blocking_client(ClientConfig::new("token"), &transport);

        let player = client.get_player("#2P0LYQ").unwrap().into_inner();

        assert_eq!(player.clan_tag().map(|t| t.to_string()), Some("#8L9L9GL".to_string()));
        assert_eq!(
            player.deck_link().as_deref(),
            Some("https://link.clashroyale.com/deck/en?deck=26000000;26000001")
        );
    }

    #[test]
    fn test_invalid_tag_sends_nothing() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let (client, _) = blocking_client(ClientConfig::new("token"), &transport);

        let result = client.get_player("#HELLO");

        assert!(matches!(result, Err(Error::Request(RequestError::InvalidTag(_)))));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_cached_within_ttl() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let config = ClientConfig::new("token").with_cache(CacheConfig::in_memory());
        let (client, clock) = blocking_client(config, &transport);

        let first = client.get_player("#2P0LYQ").unwrap();
        clock.advance(Duration::from_secs(1));
        let second = client.get_player("#2P0LYQ").unwrap();

        assert_eq!(transport.calls(), 1);
        assert!(first.cache.is_miss());
        assert!(second.is_cached());
        assert_eq!(first.data(), second.data());
        assert_eq!(first.cached_at(), second.cached_at());
    }

    #[test]
    fn test_refetched_after_ttl() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let config = ClientConfig::new("token")
            .with_cache(CacheConfig::in_memory().with_ttl(Duration::from_secs(10)));
        let (client, clock) = blocking_client(config, &transport);

        client.get_player("#2P0LYQ").unwrap();
        clock.advance(Duration::from_secs(10));
        let again = client.get_player("#2P0LYQ").unwrap();

        assert_eq!(transport.calls(), 2);
        assert!(again.cache.is_miss());
    }

    #[test]
    fn test_refresh_bypasses_cache() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let config = ClientConfig::new("token").with_cache(CacheConfig::in_memory());
        let (client, _) = blocking_client(config, &transport);

        let response = client.get_player("#2P0LYQ").unwrap();
        let refreshed = client.refresh(&response).unwrap();

        assert_eq!(transport.calls(), 2);
        assert!(refreshed.cache.is_miss());
        assert_eq!(refreshed.origin(), response.origin());
    }

    #[test]
    fn test_verify_token_is_never_cached() {
        let transport = Arc::new(MockTransport::json(
            200,
            json!({"tag": "#2P0LYQ", "token": "abc", "status": "ok"}),
        ));
        let config = ClientConfig::new("token").with_cache(CacheConfig::in_memory());
        let (client, _) = blocking_client(config, &transport);

        assert!(client.verify_player_token("#2P0LYQ", "abc").unwrap().is_valid());
        let second = client.verify_player_token("#2P0LYQ", "abc").unwrap();

        assert_eq!(transport.calls(), 2);
        assert!(second.cache.is_none());
        assert_eq!(transport.requests()[0].body, Some(json!({"token": "abc"})));
    }

    #[test]
    fn test_statuses_map_without_retry() {
        let cases: [(u16, fn(&StatusError) -> bool); 7] = [
            (400, |e| matches!(e, StatusError::BadRequest(_))),
            (401, |e| matches!(e, StatusError::Unauthorized(_))),
            (404, |e| matches!(e, StatusError::NotFound(_))),
            (417, |e| matches!(e, StatusError::NotTracked(_))),
            (429, |e| matches!(e, StatusError::Ratelimit(_))),
            (500, |e| matches!(e, StatusError::Server(_))),
            (503, |e| matches!(e, StatusError::Server(_))),
        ];

        for (status, is_expected) in cases {
            let transport = Arc::new(MockTransport::json(status, json!({"reason": "nope"})));
            let (client, _) = blocking_client(ClientConfig::new("token"), &transport);

            let error = client.get_clan("#8L9L9GL").unwrap_err();

            let status_error = error.as_status().expect("status error");
            assert!(is_expected(status_error), "{} mapped to {:?}", status, status_error);
            assert_eq!(status_error.code(), status);
            assert_eq!(transport.calls(), 1, "status {} was retried", status);
        }
    }

    #[test]
    fn test_guard_blocks_until_reset() {
        let now = chrono::Utc::now();
        let transport = Arc::new(
            MockTransport::new()
                .then(with_quota(ResponseEnvelope::json_body(200, &player_json()), 0, now, 30))
                .then(ResponseEnvelope::json_body(200, &player_json())),
        );
        let (client, clock) = blocking_client(ClientConfig::new("token"), &transport);
        clock.set(now);

        client.get_player("#2P0LYQ").unwrap();
        assert_eq!(client.rate_limit().remaining, Some(0));

        let blocked = client.get_player("#2P0LYQ");
        match blocked {
            Err(Error::RatelimitDetected { retry_after }) => {
                assert!(retry_after <= Duration::from_secs(30));
                assert!(retry_after > Duration::from_secs(29));
            }
            other => panic!("expected the guard to block, got {:?}", other),
        }
        assert_eq!(transport.calls(), 1);

        clock.advance(Duration::from_secs(31));
        client.get_player("#2P0LYQ").unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_variant_mismatch_sends_nothing() {
        let transport = Arc::new(MockTransport::json(200, json!("4.0")));
        let (client, _) = blocking_client(ClientConfig::new("token"), &transport);

        let result = client.execute(royale_lib::api::mirror::version());

        assert!(matches!(
            result,
            Err(Error::Request(RequestError::VariantMismatch {
                requested: ApiVariant::Mirror,
                configured: ApiVariant::Official,
            }))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_error_debug_never_sends() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let (client, _) = blocking_client(ClientConfig::new("token").with_error_debug(true), &transport);

        let error = client.get_player("#2P0LYQ").unwrap_err();

        assert!(matches!(error.as_status(), Some(StatusError::Server(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_paginate_follows_cursors() {
        let transport = Arc::new(
            MockTransport::new()
                .then(ResponseEnvelope::json_body(
                    200,
                    &json!({
                        "items": [member_json("#2P0LYQ", "Alpha"), member_json("#CCV9UY", "Bravo")],
                        "paging": {"cursors": {"after": "c1"}}
                    }),
                ))
                .then(ResponseEnvelope::json_body(
                    200,
                    &json!({"items": [member_json("#9YJ2", "Charlie")], "paging": {"cursors": {}}}),
                )),
        );
        let (client, _) = blocking_client(ClientConfig::new("token"), &transport);

        let request = endpoints::clan_members("#8L9L9GL", &Paging::new().limit(2)).unwrap();
        let names = client
            .paginate(request)
            .map(|member| member.map(|m| m.name))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);
        assert_eq!(transport.calls(), 2);
        let second = &transport.requests()[1].url;
        assert!(second.contains("after=c1"), "{}", second);
        assert!(second.contains("limit=2"), "{}", second);
    }

    #[test]
    fn test_rankings_page() {
        let transport = Arc::new(MockTransport::json(
            200,
            json!({"items": [{"tag": "#2P0LYQ", "name": "Alpha", "rank": 1, "trophies": 7000}]}),
        ));
        let (client, _) = blocking_client(ClientConfig::new("token"), &transport);

        let page = client.get_top_players(LocationId::Global, Paging::new()).unwrap();

        assert_eq!(page.len(), 1);
        assert!(!page.has_more());
        assert!(
            transport
                .last_url()
                .unwrap()
                .ends_with("/locations/global/rankings/players")
        );
    }

    #[test]
    fn test_sqlite_cache_survives_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("royale.db");

        let first = Arc::new(MockTransport::json(200, player_json()));
        let (client, clock) = blocking_client(
            ClientConfig::new("token").with_cache(CacheConfig::sqlite(&path)),
            &first,
        );
        client.get_player("#2P0LYQ").unwrap();
        drop(client);

        let second = Arc::new(MockTransport::json(500, json!({})));
        let client = royale_lib::BlockingClient::from_parts(
            ClientConfig::new("token").with_cache(CacheConfig::sqlite(&path)),
            second.clone(),
            Arc::new(clock.clone()),
        )
        .unwrap();
        let player = client.get_player("#2P0LYQ").unwrap();

        assert!(player.is_cached());
        assert_eq!(player.name, "Alpha");
        assert_eq!(second.calls(), 0);

        client.clear_cache().unwrap();
        assert!(client.get_player("#2P0LYQ").is_err());
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_runs_inside_spawn_blocking() {
        let transport = Arc::new(MockTransport::json(200, player_json()));
        let config = ClientConfig::new("token").with_cache(CacheConfig::in_memory());
        let (client, _) = blocking_client(config, &transport);

        let worker = client.clone();
        let (first, second) = tokio::task::spawn_blocking(move || {
            (worker.get_player("#2P0LYQ"), worker.get_player("#2P0LYQ"))
        })
        .await
        .unwrap();

        assert_eq!(first.unwrap().name, "Alpha");
        assert!(second.unwrap().is_cached());
        assert_eq!(transport.calls(), 1);
    }
}

mod mirror {
    use royale_lib::api::ClanBattleType;
    use royale_lib::api::MirrorFilter;
    use royale_lib::api::RoyaleApi;
    use royale_lib::model::KeyStyle;

    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("token").with_variant(ApiVariant::Mirror)
    }

    #[test]
    fn test_get_player_with_filter() {
        let transport = Arc::new(MockTransport::json(200, json!({"name": "Alpha", "expLevel": 13})));
        let (client, _) = blocking_client(config(), &transport);

        let player = client
            .get_player("#2P0LYQ", MirrorFilter::new().keys(["name", "expLevel"]))
            .unwrap();

        assert_eq!(player.get_str("name").unwrap(), Some("Alpha"));
        assert_eq!(player.get_i64("exp_level").unwrap(), Some(13));
        assert_eq!(
            transport.last_url().as_deref(),
            Some("https://api.royaleapi.com/player/2P0LYQ?keys=name%2CexpLevel")
        );
    }

    #[test]
    fn test_camel_case_key_style() {
        let transport = Arc::new(MockTransport::json(200, json!({"name": "Alpha", "expLevel": 13})));
        let (client, _) = blocking_client(config().with_key_style(KeyStyle::CamelCase), &transport);

        let player = client.get_player("#2P0LYQ", MirrorFilter::new()).unwrap();

        let mut keys = player.keys();
        keys.sort();
        assert_eq!(keys, ["expLevel", "name"]);
        assert!(player.get_i64("exp_level").is_err());
    }

    #[test]
    fn test_snake_case_keys_by_default() {
        let transport = Arc::new(MockTransport::json(
            200,
            json!([{"name": "Alpha", "clan": {"badgeId": 3}}, {"name": "Bravo", "clan": null}]),
        ));
        let (client, _) = blocking_client(config(), &transport);

        let players = client
            .get_players(&["#2P0LYQ", "#CCV9UY"], MirrorFilter::new())
            .unwrap();

        assert_eq!(players.len(), 2);
        let clan = players[0].get_record("clan").unwrap().unwrap();
        assert_eq!(clan.keys(), ["badge_id"]);
        assert_eq!(players[1].get_record("clan").unwrap(), None);
        assert!(transport.last_url().unwrap().ends_with("/player/2P0LYQ,CCV9UY"));
    }

    #[test]
    fn test_token_check_is_never_cached() {
        let transport = Arc::new(MockTransport::json(200, json!({"tag": "2P0LYQ", "status": "ok"})));
        let (client, _) = blocking_client(config().with_cache(CacheConfig::in_memory()), &transport);

        client.verify_player("#2P0LYQ", "secret").unwrap();
        let second = client.verify_player("#2P0LYQ", "secret").unwrap();

        assert_eq!(transport.calls(), 2);
        assert!(second.cache.is_none());
    }

    #[test]
    fn test_constants_drive_artwork_lookups() {
        let transport = Arc::new(MockTransport::json(
            200,
            json!({
                "cards": [{"key": "knight", "name": "Knight", "id": 26000000, "rarity": "Common"}],
                "rarities": [{"name": "Common", "level_count": 13}],
                "arenas": [{"id": 54000012, "arena_id": 12, "name": "Legendary Arena"}],
                "alliance_badges": [{"id": 16000002, "name": "Flame_03"}]
            }),
        ));
        let (client, _) = blocking_client(config(), &transport);

        let constants = client.get_constants(MirrorFilter::new()).unwrap();

        assert_eq!(constants.card_info("Knight").unwrap().id, 26000000);
        assert_eq!(constants.rarity_info("Common").unwrap().level_count, Some(13));
        assert!(constants.clan_badge_url(Some(16000002)).unwrap().ends_with("/Flame_03.png"));
        assert!(constants.arena_image_url(54000012).unwrap().ends_with("/arena12.png"));
        assert!(transport.last_url().unwrap().ends_with("/constants"));
    }

    #[test]
    fn test_version_is_plain_text() {
        let transport = Arc::new(MockTransport::always(ResponseEnvelope::new(
            200,
            Default::default(),
            "4.0.3",
        )));
        let (client, _) = blocking_client(config(), &transport);

        assert_eq!(client.get_version().unwrap().into_inner(), "4.0.3");
    }

    #[test]
    fn test_not_tracked_clan() {
        let transport = Arc::new(MockTransport::json(417, json!({"message": "Clan is not tracked"})));
        let (client, _) = blocking_client(config(), &transport);

        let error = client
            .get_clan_history("#8L9L9GL", MirrorFilter::new())
            .unwrap_err();

        match error {
            Error::Status(StatusError::NotTracked(detail)) => {
                assert_eq!(detail.message.as_deref(), Some("Clan is not tracked"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_auth_stats_bypass_exhausted_guard() {
        let now = chrono::Utc::now();
        let transport = Arc::new(
            MockTransport::new()
                .then(with_quota(ResponseEnvelope::json_body(200, &json!([])), 0, now, 60))
                .then(ResponseEnvelope::json_body(200, &json!({"requests": 10}))),
        );
        let (client, clock) = blocking_client(config(), &transport);
        clock.set(now);

        client
            .get_clan_battles("#8L9L9GL", ClanBattleType::War, MirrorFilter::new())
            .unwrap();
        assert!(matches!(
            client.get_popular_decks(MirrorFilter::new()),
            Err(Error::RatelimitDetected { .. })
        ));

        let stats = client.get_auth_stats().unwrap();
        assert_eq!(stats.get_i64("requests").unwrap(), Some(10));
        assert_eq!(transport.calls(), 2);
    }
}
