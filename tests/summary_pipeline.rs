mod common;

use common::{CannedModel, Reply, TestServer, completion_json};
use site_digest::prompts::SUMMARY_SYSTEM_PROMPT;
use site_digest::summary::SUMMARY_FAILED;
use site_digest::{ApiKey, LlmError, OpenAiClient, Summarizer};

const ARTICLE_PAGE: &str = r#"<html>
<head><title>  Anvil News </title></head>
<body>
  <nav><a href="/">Home</a> <a href="/about">About</a></nav>
  <main>
    <h1>Acme releases a lighter anvil</h1>
    <p>The new model weighs half as much.</p>
    <script>trackVisit();</script>
  </main>
  <footer>Copyright Acme</footer>
</body>
</html>"#;

fn test_key() -> ApiKey {
    ApiKey::validate(Some("sk-test-0123456789".to_string())).unwrap()
}

#[tokio::test]
async fn test_summarize_sends_page_text_to_model() {
    let server = TestServer::start(|request| match request.path.as_str() {
        "/news" => Reply::Html(ARTICLE_PAGE.to_string()),
        _ => Reply::Status(404),
    })
    .await;
    let model = CannedModel::new(vec![Ok("# Summary\nLighter anvils.".to_string())]);

    let summary = Summarizer::new(&model).summarize(&server.url("/news")).await;
    assert_eq!(summary, "# Summary\nLighter anvils.");

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[0].temperature, Some(0.7));
    assert_eq!(requests[0].max_tokens, Some(1000));
    assert_eq!(requests[0].messages[0].content, SUMMARY_SYSTEM_PROMPT);

    let user_prompt = &requests[0].messages[1].content;
    assert!(user_prompt.contains("titled: 'Anvil News'"));
    assert!(user_prompt.contains("Acme releases a lighter anvil\nThe new model weighs half as much."));
    assert!(!user_prompt.contains("trackVisit"));
    assert!(!user_prompt.contains("Copyright Acme"));
    assert!(!user_prompt.contains("Home"));
}

#[tokio::test]
async fn test_http_error_status_becomes_error_block() {
    let server = TestServer::start(|_| Reply::Status(404)).await;
    let model = CannedModel::new(vec![]);
    let url = server.url("/missing");

    let summary = Summarizer::new(&model).summarize(&url).await;
    assert!(summary.starts_with(&format!(
        "## Error\nCould not retrieve or parse content from {}.\nDetails: Error fetching URL",
        url
    )));
    assert!(summary.contains("404"));
    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn test_model_failure_becomes_error_block() {
    let server = TestServer::start(|_| Reply::Html(ARTICLE_PAGE.to_string())).await;
    let model = CannedModel::new(vec![Err(LlmError::Api {
        status: 429,
        message: "Rate limit reached".to_string(),
    })]);

    let summary = Summarizer::new(&model).summarize(&server.url("/")).await;
    assert_eq!(summary, SUMMARY_FAILED);
}

#[tokio::test]
async fn test_each_url_is_summarized_independently() {
    let server = TestServer::start(|request| match request.path.as_str() {
        "/ok" => Reply::Html(ARTICLE_PAGE.to_string()),
        _ => Reply::Status(500),
    })
    .await;
    let model = CannedModel::new(vec![Ok("first".to_string()), Ok("second".to_string())]);
    let summarizer = Summarizer::new(&model);

    let broken = summarizer.summarize(&server.url("/broken")).await;
    let first = summarizer.summarize(&server.url("/ok")).await;
    let second = summarizer.summarize(&server.url("/ok")).await;

    assert!(broken.starts_with("## Error\n"));
    assert_eq!(first, "first");
    assert_eq!(second, "second");
}

#[tokio::test]
async fn test_summarize_through_chat_api() {
    let server = TestServer::start(|request| match request.path.as_str() {
        "/page" => Reply::Html(ARTICLE_PAGE.to_string()),
        "/v1/chat/completions" => Reply::Json(completion_json("Acme makes lighter anvils.")),
        _ => Reply::Status(404),
    })
    .await;
    let client = OpenAiClient::new(test_key()).with_base_url(server.url("/v1"));

    let summary = Summarizer::new(&client)
        .with_model_name("gpt-4o")
        .summarize(&server.url("/page"))
        .await;
    assert_eq!(summary, "Acme makes lighter anvils.");

    let calls = server.requests_to("/v1/chat/completions");
    assert_eq!(calls.len(), 1);
    let body: serde_json::Value = serde_json::from_str(&calls[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 1000);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body.get("stream").is_none());
}

#[tokio::test]
async fn test_chat_api_error_becomes_error_block() {
    let server = TestServer::start(|request| match request.path.as_str() {
        "/page" => Reply::Html(ARTICLE_PAGE.to_string()),
        _ => Reply::Status(401),
    })
    .await;
    let client = OpenAiClient::new(test_key()).with_base_url(server.url("/v1"));

    let summary = Summarizer::new(&client).summarize(&server.url("/page")).await;
    assert_eq!(summary, SUMMARY_FAILED);
}
