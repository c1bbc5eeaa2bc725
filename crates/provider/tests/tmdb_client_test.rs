//! TMDB client tests against a mock HTTP server.

use httpmock::prelude::*;
use provider::{MetadataProvider, ProviderError, ReleaseType, TmdbClient, TmdbConfig};
use serde_json::json;

fn client_for(server: &MockServer) -> TmdbClient {
    let config = TmdbConfig {
        base_url: server.base_url(),
        access_token: Some("test-token".to_string()),
        request_delay_ms: 0,
        timeout_secs: 5,
    };
    TmdbClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_search_person_takes_first_hit() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search/person")
                .query_param("query", "Tom Hanks")
                .header("Authorization", "Bearer test-token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"results": [
                    {"id": 31, "name": "Tom Hanks", "popularity": 55.1, "known_for_department": "Acting"},
                    {"id": 999, "name": "Tom Hanks Jr", "popularity": 1.0}
                ]}));
        })
        .await;

    let client = client_for(&server);
    assert_eq!(client.search_person("Tom Hanks").await.unwrap(), 31);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_person_without_results_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search/person");
            then.status(200).json_body(json!({"results": []}));
        })
        .await;

    let err = client_for(&server).search_person("Nobody").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_movie_credits_mapping() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/person/31/movie_credits");
            then.status(200).json_body(json!({"cast": [
                {"id": 13, "title": "Forrest Gump", "release_date": "1994-06-23", "order": 0, "original_language": "en"},
                {"id": 14, "title": "Unreleased", "release_date": "", "original_language": "en"}
            ]}));
        })
        .await;

    let credits = client_for(&server).movie_credits(31).await.unwrap();
    assert_eq!(credits.len(), 2);
    assert_eq!(credits[0].billing_order, 0);
    assert_eq!(credits[0].release_date.as_deref(), Some("1994-06-23"));
    assert!(credits[0].original_language.is_english());
    assert_eq!(credits[1].release_date, None);
    assert_eq!(credits[1].billing_order, 999);
}

#[tokio::test]
async fn test_movie_detail_requests_release_dates() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/movie/13")
                .query_param("append_to_response", "release_dates");
            then.status(200).json_body(json!({
                "id": 13,
                "title": "Forrest Gump",
                "release_date": "1994-06-23",
                "revenue": 677387716,
                "original_language": "en",
                "poster_path": "/arw2vcBveWOVZr6pxd9XTd1TdQa.jpg",
                "release_dates": {"results": [
                    {"iso_3166_1": "US", "release_dates": [{"type": 3}, {"type": 5}]}
                ]}
            }));
        })
        .await;

    let detail = client_for(&server).movie_detail(13).await.unwrap();
    mock.assert_async().await;
    assert_eq!(detail.revenue, Some(677387716));
    assert_eq!(detail.release_type, Some(ReleaseType::Theatrical));
    assert_eq!(detail.to_curated().release_year, Some(1994));
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/movie/1");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/movie/2");
            then.status(503);
        })
        .await;

    let client = client_for(&server);
    assert!(matches!(client.movie_detail(1).await, Err(ProviderError::NotFound(_))));
    assert!(client.movie_detail(2).await.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_search_movies_limits_and_formats_year() {
    let server = MockServer::start_async().await;
    let results: Vec<_> = (1..=15)
        .map(|i| {
            let date = if i == 1 { String::new() } else { format!("20{:02}-01-01", i) };
            json!({"id": i, "title": format!("Toy Story {}", i), "release_date": date})
        })
        .collect();
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search/movie")
                .query_param("query", "toy story")
                .query_param("include_adult", "false");
            then.status(200).json_body(json!({ "results": results }));
        })
        .await;

    let hits = client_for(&server).search_movies("toy story").await.unwrap();
    assert_eq!(hits.len(), 10);
    assert_eq!(hits[0].year, "N/A");
    assert_eq!(hits[1].year, "2002");
}

#[tokio::test]
async fn test_popular_people_filters_known_for_media() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/person/popular").query_param("page", "2");
            then.status(200).json_body(json!({"results": [{
                "id": 31,
                "name": "Tom Hanks",
                "popularity": 55.1,
                "known_for_department": "Acting",
                "known_for": [
                    {"media_type": "movie", "title": "Forrest Gump", "original_language": "en"},
                    {"media_type": "tv", "name": "Band of Brothers", "original_language": "en"}
                ]
            }]}));
        })
        .await;

    let people = client_for(&server).popular_people(2).await.unwrap();
    assert_eq!(people.len(), 1);
    assert!(people[0].is_actor());
    assert_eq!(people[0].known_for.len(), 2);
    assert_eq!(people[0].known_for[1].title, "Band of Brothers");
}
