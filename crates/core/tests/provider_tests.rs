// ═══════════════════════════════════════════════════════════════════
// Provider Tests — StaticMarketData, CoinGecko over a mock HTTP server
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crypto_dashboard_core::errors::CoreError;
use crypto_dashboard_core::models::chart::{ChartPeriod, PricePoint};
use crypto_dashboard_core::models::coin::CoinQuote;
use crypto_dashboard_core::models::settings::Settings;
use crypto_dashboard_core::providers::coingecko::CoinGeckoProvider;
use crypto_dashboard_core::providers::static_market::StaticMarketData;
use crypto_dashboard_core::providers::traits::{validate_page, MarketDataProvider};
use crypto_dashboard_core::services::market_service::fetch_quotes;

fn market_entry(id: &str, rank: u32, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "symbol": &id[..3],
        "name": id,
        "image": format!("https://img.example/{id}.png"),
        "current_price": price,
        "market_cap": price * 1000.0,
        "market_cap_rank": rank,
        "total_volume": price * 10.0,
        "price_change_percentage_24h": 1.5,
        "last_updated": "2024-01-15T10:00:00.000Z"
    })
}

// ═══════════════════════════════════════════════════════════════════
// Paging rules
// ═══════════════════════════════════════════════════════════════════

mod paging {
    use super::*;

    #[test]
    fn pages_start_at_one() {
        assert!(validate_page(1, 50).is_ok());
        assert!(matches!(validate_page(0, 50), Err(CoreError::ValidationError(_))));
        assert!(matches!(validate_page(1, 0), Err(CoreError::ValidationError(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StaticMarketData
// ═══════════════════════════════════════════════════════════════════

mod static_market {
    use super::*;

    #[tokio::test]
    async fn sample_lists_by_rank() {
        let data = StaticMarketData::sample(Utc::now());
        let page = data.get_quotes(1, 3).await.unwrap();
        let ids: Vec<&str> = page.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum", "tether"]);
    }

    #[tokio::test]
    async fn paging_past_the_end_is_empty() {
        let data = StaticMarketData::sample(Utc::now());
        assert_eq!(data.get_quotes(2, 8).await.unwrap().len(), 2);
        assert!(data.get_quotes(5, 8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let data = StaticMarketData::sample(Utc::now());
        assert!(data.get_quotes(0, 10).await.is_err());
    }

    #[tokio::test]
    async fn unknown_coin_is_none() {
        let data = StaticMarketData::sample(Utc::now());
        assert!(data.get_quote("not-a-coin").await.unwrap().is_none());
        assert!(data.get_coin_detail("not-a-coin").await.unwrap().is_none());
        assert_eq!(
            data.get_quote("solana").await.unwrap().map(|q| q.current_price),
            Some(98.76)
        );
    }

    #[tokio::test]
    async fn detail_for_bitcoin() {
        let data = StaticMarketData::sample(Utc::now());
        let detail = data.get_coin_detail("bitcoin").await.unwrap().unwrap();
        assert_eq!(detail.name, "Bitcoin");
        assert_eq!(detail.high_24h, Some(46000.0));
        assert_eq!(detail.max_supply, Some(21_000_000.0));
    }

    #[tokio::test]
    async fn history_window_is_measured_from_newest_point() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let data = StaticMarketData::sample(now);

        let week = data
            .get_price_history("bitcoin", ChartPeriod::SevenDays)
            .await
            .unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week.last().unwrap().timestamp, now);
        assert!(week.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        let day = data
            .get_price_history("bitcoin", ChartPeriod::OneDay)
            .await
            .unwrap();
        assert_eq!(day.len(), 2);

        let all = data.get_price_history("bitcoin", ChartPeriod::All).await.unwrap();
        assert_eq!(all.len(), 7);
    }

    #[tokio::test]
    async fn history_for_unknown_coin_is_not_found() {
        let data = StaticMarketData::sample(Utc::now());
        let err = data
            .get_price_history("ethereum", ChartPeriod::SevenDays)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn with_history_sorts_points() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let data = StaticMarketData::new(vec![CoinQuote::new("x", 1.0)]).with_history(
            "x",
            vec![
                PricePoint { timestamp: t0 + Duration::days(2), price: 3.0 },
                PricePoint { timestamp: t0, price: 1.0 },
                PricePoint { timestamp: t0 + Duration::days(1), price: 2.0 },
            ],
        );
        let points = data.get_price_history("x", ChartPeriod::All).await.unwrap();
        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn replace_quotes_swaps_whole_snapshot() {
        let mut data = StaticMarketData::new(vec![CoinQuote::new("a", 1.0)]);
        data.replace_quotes(vec![CoinQuote::new("b", 2.0)]);
        assert!(data.get_quote("a").await.unwrap().is_none());
        assert_eq!(data.quotes().len(), 1);
    }

    #[test]
    fn name() {
        assert_eq!(StaticMarketData::default().name(), "Static");
    }
}

// ═══════════════════════════════════════════════════════════════════
// CoinGeckoProvider
// ═══════════════════════════════════════════════════════════════════

mod coingecko {
    use super::*;

    fn provider(server: &MockServer) -> CoinGeckoProvider {
        CoinGeckoProvider::new().with_base_url(server.uri())
    }

    #[test]
    fn name_and_defaults() {
        let p = CoinGeckoProvider::default();
        assert_eq!(p.name(), "CoinGecko");
        assert_eq!(p.vs_currency(), "usd");
    }

    #[test]
    fn from_settings_uses_currency() {
        let settings = Settings {
            vs_currency: "EUR".into(),
            ..Settings::default()
        };
        assert_eq!(CoinGeckoProvider::from_settings(&settings).vs_currency(), "eur");
    }

    #[tokio::test]
    async fn get_quotes_parses_markets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                market_entry("bitcoin", 1, 45123.45),
                market_entry("ethereum", 2, 2345.67),
            ])))
            .mount(&server)
            .await;

        let quotes = provider(&server).get_quotes(2, 2).await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].id, "bitcoin");
        assert_eq!(quotes[0].current_price, 45123.45);
        assert_eq!(quotes[0].market_cap_rank, 1);
        assert_eq!(quotes[0].image_url, "https://img.example/bitcoin.png");
        assert_eq!(quotes[1].volume_24h, 2345.67 * 10.0);
    }

    #[tokio::test]
    async fn null_fields_default_and_unpriced_entries_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "newcoin", "symbol": "new", "name": "New",
                    "image": null, "current_price": 0.5, "market_cap": null,
                    "market_cap_rank": 900, "total_volume": null,
                    "price_change_percentage_24h": null
                },
                {
                    "id": "delisted", "symbol": "del", "name": "Delisted",
                    "image": "x", "current_price": null, "market_cap": 1.0,
                    "market_cap_rank": 901, "total_volume": 1.0,
                    "price_change_percentage_24h": 0.0
                },
                {
                    "id": "unranked", "symbol": "unr", "name": "Unranked",
                    "image": "x", "current_price": 1.0, "market_cap": 1.0,
                    "market_cap_rank": null, "total_volume": 1.0,
                    "price_change_percentage_24h": 0.0
                }
            ])))
            .mount(&server)
            .await;

        let quotes = provider(&server).get_quotes(1, 10).await.unwrap();
        assert_eq!(quotes.len(), 1);
        let q = &quotes[0];
        assert_eq!(q.id, "newcoin");
        assert_eq!(q.market_cap, 0.0);
        assert_eq!(q.volume_24h, 0.0);
        assert_eq!(q.price_change_percent_24h, 0.0);
        assert_eq!(q.image_url, "");
    }

    #[tokio::test]
    async fn sparkline_is_carried_through() {
        let server = MockServer::start().await;
        let mut entry = market_entry("bitcoin", 1, 45123.0);
        entry["sparkline_in_7d"] = json!({ "price": [43000.0, 44000.0, 45123.0] });
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("sparkline", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([entry])))
            .mount(&server)
            .await;

        let quotes = provider(&server).get_quotes(1, 1).await.unwrap();
        assert_eq!(quotes[0].sparkline_7d, vec![43000.0, 44000.0, 45123.0]);
    }

    #[tokio::test]
    async fn get_quote_filters_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("ids", "solana"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([market_entry("solana", 4, 98.76)])),
            )
            .mount(&server)
            .await;

        let quote = provider(&server).get_quote("solana").await.unwrap().unwrap();
        assert_eq!(quote.current_price, 98.76);
    }

    #[tokio::test]
    async fn quotes_by_ids_use_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("ids", "bitcoin,ethereum,vapourcoin"))
            .and(query_param("per_page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                market_entry("ethereum", 2, 2345.67),
                market_entry("bitcoin", 1, 45123.45),
                market_entry("solana", 4, 98.76),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&server);
        let quotes = fetch_quotes(&p, ["vapourcoin", "ethereum", "bitcoin", "ethereum"])
            .await
            .unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes["bitcoin"].current_price, 45123.45);
        assert!(!quotes.contains_key("solana"));
    }

    #[tokio::test]
    async fn quotes_by_ids_empty_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        assert!(provider(&server).get_quotes_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn path_like_coin_ids_are_rejected_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "prices": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let p = provider(&server);
        assert!(matches!(
            p.get_coin_detail("bitcoin/market_chart").await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            p.get_price_history("bitcoin?days=1#", ChartPeriod::OneDay).await,
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            p.get_quote("bitcoin,ethereum").await,
            Err(CoreError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn get_quote_unknown_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(provider(&server).get_quote("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn api_key_header_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(header("x-cg-demo-api-key", "secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([market_entry("bitcoin", 1, 1.0)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&server).with_api_key("secret");
        assert!(p.get_quote("bitcoin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = provider(&server).get_quotes(1, 10).await.unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "CoinGecko");
                assert!(message.contains("429"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(&server).get_quotes(1, 10).await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn price_history_converts_millis() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .and(query_param("days", "30"))
            .and(query_param("vs_currency", "usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prices": [[1704153600000.0, 44000.5], [1704067200000.0, 43000.0]],
                "market_caps": [],
                "total_volumes": []
            })))
            .mount(&server)
            .await;

        let points = provider(&server)
            .get_price_history("bitcoin", ChartPeriod::OneMonth)
            .await
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(
            points[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(points[0].price, 43000.0);
        assert_eq!(points[1].price, 44000.5);
    }

    #[tokio::test]
    async fn price_history_all_uses_max() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .and(query_param("days", "max"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "prices": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let points = provider(&server)
            .get_price_history("bitcoin", ChartPeriod::All)
            .await
            .unwrap();
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn price_history_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = provider(&server)
            .get_price_history("nope", ChartPeriod::SevenDays)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn coin_detail_picks_quote_currency() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "description": { "en": "Peer-to-peer money." },
                "image": { "large": "https://img.example/btc.png" },
                "market_cap_rank": 1,
                "market_data": {
                    "current_price": { "usd": 45123.45, "eur": 41000.0 },
                    "market_cap": { "usd": 880e9, "eur": 800e9 },
                    "total_volume": { "usd": 25e9 },
                    "high_24h": { "usd": 46000.0 },
                    "low_24h": { "usd": 44500.0 },
                    "price_change_percentage_24h": 2.5,
                    "circulating_supply": 19500000.0,
                    "total_supply": 21000000.0,
                    "max_supply": null
                }
            })))
            .mount(&server)
            .await;

        let detail = provider(&server)
            .with_vs_currency("eur")
            .get_coin_detail("bitcoin")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.current_price, 41000.0);
        assert_eq!(detail.market_cap, 800e9);
        assert_eq!(detail.volume_24h, 0.0);
        assert_eq!(detail.high_24h, None);
        assert_eq!(detail.description, "Peer-to-peer money.");
        assert_eq!(detail.image_url, "https://img.example/btc.png");
        assert_eq!(detail.max_supply, None);
        assert_eq!(detail.market_cap_rank, Some(1));
    }

    #[tokio::test]
    async fn coin_detail_404_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(provider(&server).get_coin_detail("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn coin_detail_without_market_data_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/stub"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "stub", "symbol": "stb", "name": "Stub"
            })))
            .mount(&server)
            .await;

        let err = provider(&server).get_coin_detail("stub").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }
}
