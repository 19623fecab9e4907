use mockito::{Matcher, Server};

use chainscan::{
	services::transport::{HttpClient, TransportError},
	utils::{http::RetryConfig, tests::create_test_http_client},
};

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
	items
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

#[tokio::test]
async fn test_get_sends_query_and_headers() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/api")
		.match_query(Matcher::AllOf(vec![
			Matcher::UrlEncoded("module".into(), "account".into()),
			Matcher::UrlEncoded("action".into(), "balance".into()),
		]))
		.match_header("accept", "application/json")
		.with_status(200)
		.with_body(r#"{"status":"1","message":"OK","result":"1"}"#)
		.create_async()
		.await;

	let client = create_test_http_client();
	let response = client
		.get(
			&format!("{}/api", server.url()),
			&pairs(&[("module", "account"), ("action", "balance")]),
			&pairs(&[("Accept", "application/json")]),
		)
		.await
		.unwrap();

	assert!(response.is_success());
	assert!(response.body.contains("\"status\":\"1\""));
	mock.assert_async().await;
}

#[tokio::test]
async fn test_error_statuses_are_data_not_errors() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("GET", "/api")
		.with_status(403)
		.with_body("forbidden")
		.create_async()
		.await;

	let client = create_test_http_client();
	let response = client
		.get(&format!("{}/api", server.url()), &[], &[])
		.await
		.unwrap();

	assert_eq!(response.status, 403);
	assert_eq!(response.body, "forbidden");
	mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_are_retried_before_surfacing() {
	let mut server = Server::new_async().await;
	let expected_attempts = 1 + RetryConfig::default().max_retries;
	let mock = server
		.mock("GET", "/api")
		.with_status(500)
		.with_body("boom")
		.expect(expected_attempts as usize)
		.create_async()
		.await;

	let client = create_test_http_client();
	let response = client
		.get(&format!("{}/api", server.url()), &[], &[])
		.await
		.unwrap();

	// The middleware exhausts its retries, then the final response surfaces
	// as data for the caller to classify
	assert_eq!(response.status, 500);
	mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_host_is_a_network_error() {
	// Nothing listens on this port
	let client = create_test_http_client();
	let err = client
		.get("http://127.0.0.1:9/api", &[], &[])
		.await
		.unwrap_err();

	assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn test_invalid_url_fails_without_network() {
	let client = create_test_http_client();
	let err = client.get("not a url", &[], &[]).await.unwrap_err();
	assert!(matches!(err, TransportError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_post_sends_json_body() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/api")
		.match_header("content-type", "application/json")
		.match_body(Matcher::Json(serde_json::json!({"jsonrpc": "2.0"})))
		.with_status(200)
		.with_body("{}")
		.create_async()
		.await;

	let client = create_test_http_client();
	let response = client
		.post(
			&format!("{}/api", server.url()),
			&[],
			&[],
			Some(&serde_json::json!({"jsonrpc": "2.0"})),
		)
		.await
		.unwrap();

	assert!(response.is_success());
	mock.assert_async().await;
}
