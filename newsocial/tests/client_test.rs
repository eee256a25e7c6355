use std::time::Duration;

use mockito::Matcher;
use newsocial::client::session::SessionSettings;
use newsocial::client::{ApiClient, ClientError, Session};
use newsocial::models::NewsQuery;
use serde_json::json;
use url::Url;

fn client_for(server: &mockito::Server) -> ApiClient {
    let base_url = Url::parse(&server.url()).expect("mock url");
    ApiClient::new(base_url, Duration::from_secs(5)).expect("client")
}

fn news_body() -> String {
    json!({
        "success": true,
        "articles": [
            { "title": "A", "description": "d1", "source": "Wire", "published_at": "2026-10-15", "url": "https://a.example" },
            { "title": "B", "description": "d2", "source": "", "published_at": "", "url": "" }
        ],
        "count": 2
    })
    .to_string()
}

#[tokio::test]
async fn generate_news_sends_query_and_decodes_articles() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/generate_news")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("category".into(), "sports".into()),
            Matcher::UrlEncoded("country".into(), "de".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(news_body())
        .create_async()
        .await;

    let query = NewsQuery {
        category: "sports".to_string(),
        country: "de".to_string(),
        limit: 2,
    };
    let response = client_for(&server).generate_news(&query).await.expect("news");

    assert_eq!(response.count, 2);
    assert_eq!(response.articles[0].title, "A");
    assert_eq!(response.articles[1].source, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn service_error_carries_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/analyze_news")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "error": "OpenAI API key missing"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .analyze_news(&Default::default())
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "OpenAI API key missing");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unreadable_body_is_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("<html>proxy</html>")
        .create_async()
        .await;

    let err = client_for(&server).health().await.unwrap_err();
    assert!(matches!(err, ClientError::TransportFailure(_)));

    let _gateway = server
        .mock("POST", "/analyze_news")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let err = client_for(&server)
        .analyze_news(&Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::TransportFailure(_)));
}

#[tokio::test]
async fn unreachable_service_is_transport_failure() {
    let base_url = Url::parse("http://127.0.0.1:9/").expect("url");
    let client = ApiClient::new(base_url, Duration::from_secs(2)).expect("client");

    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ClientError::TransportFailure(_)));
    assert!(err.to_string().starts_with("Could not reach the news service"));
}

#[tokio::test]
async fn session_fetch_select_and_post() {
    let mut server = mockito::Server::new_async().await;
    let _news = server
        .mock("GET", "/generate_news")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(news_body())
        .create_async()
        .await;
    let post = server
        .mock("POST", "/create_social_content")
        .match_body(Matcher::PartialJson(json!({
            "article": { "title": "B" },
            "platform": "linkedin",
            "tone": "professional",
            "include_hashtags": true,
            "include_link": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "content": "Big news about B", "platform": "linkedin"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut session = Session::new(SessionSettings {
        platform: "linkedin".to_string(),
        tone: "professional".to_string(),
        ..Default::default()
    });

    assert_eq!(session.fetch_news(&client).await.expect("fetch"), 2);
    session.select(1).expect("select");
    let content = session.generate_post(&client).await.expect("post");

    assert_eq!(content, "Big news about B");
    post.assert_async().await;
}

#[tokio::test]
async fn session_series_sends_first_three_articles() {
    let mut server = mockito::Server::new_async().await;
    let series = server
        .mock("POST", "/create_content_series")
        .match_body(Matcher::PartialJson(json!({
            "platform": "twitter",
            "theme": "Daily Update",
            "tone": "informative"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "series": "1/3 ...", "platform": "twitter", "theme": "Daily Update"}"#)
        .create_async()
        .await;

    let mut session = Session::new(SessionSettings::default());
    session.replace_articles(
        ["A", "B", "C", "D"]
            .iter()
            .map(|title| newsocial::models::Article {
                title: title.to_string(),
                ..Default::default()
            })
            .collect(),
    );

    let text = session.generate_series(&client_for(&server)).await.expect("series");

    assert_eq!(text, "1/3 ...");
    series.assert_async().await;
}

#[tokio::test]
async fn failed_fetch_keeps_previous_list() {
    let mut server = mockito::Server::new_async().await;
    let _news = server
        .mock("GET", "/generate_news")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "error": "Invalid JSON from model: expected value", "raw": "nope"}"#)
        .create_async()
        .await;

    let mut session = Session::new(SessionSettings::default());
    session.replace_articles(vec![newsocial::models::Article {
        title: "kept".to_string(),
        ..Default::default()
    }]);

    let err = session.fetch_news(&client_for(&server)).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 502, .. }));
    assert_eq!(session.articles()[0].title, "kept");
}

#[tokio::test]
async fn preconditions_send_no_request() {
    let mut server = mockito::Server::new_async().await;
    let never = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let session = Session::new(SessionSettings::default());

    assert!(matches!(
        session.generate_post(&client).await,
        Err(ClientError::Precondition(_))
    ));
    assert!(matches!(
        session.generate_series(&client).await,
        Err(ClientError::Precondition(_))
    ));
    assert!(matches!(
        session.analyze(&client).await,
        Err(ClientError::Precondition(_))
    ));
    never.assert_async().await;
}
