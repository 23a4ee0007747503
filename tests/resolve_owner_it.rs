#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use identity_resolver::{
	_preludet::*,
	fields::FieldSelection,
	provider::{ProviderDescriptor, ProviderId},
};

const TOKEN: &str = "token-it";
const PROJECTION: &str =
	"(id,localizedFirstName,localizedLastName,profilePicture(displayImage~:playableStreams))";
const EMAIL_PROJECTION: &str = "(elements*(state,primary,type,handle~))";

fn build_descriptor(server: &MockServer) -> ProviderDescriptor {
	let provider_id = ProviderId::new("mock-http")
		.expect("Provider identifier should be valid for resolution test.");

	ProviderDescriptor::builder(provider_id)
		.profile_endpoint(
			Url::parse(&server.url("/v2/me"))
				.expect("Mock profile endpoint should parse successfully."),
		)
		.email_endpoint(
			Url::parse(&server.url(
				"/v2/clientAwareMemberHandles?q=members&projection=(elements*(state,primary,type,handle~))",
			))
			.expect("Mock email endpoint should parse successfully."),
		)
		.default_fields(
			FieldSelection::new([
				"id",
				"localizedFirstName",
				"localizedLastName",
				"profilePicture(displayImage~:playableStreams)",
			])
			.expect("Default field selection should be valid for resolution test."),
		)
		.build()
		.expect("Provider descriptor should build successfully.")
}

fn profile_body() -> Value {
	json!({
		"id": "REdO4xz9K3",
		"localizedFirstName": "Ada",
		"localizedLastName": "Lovelace",
		"somethingExtra": { "more": "kept verbatim" },
		"profilePicture": { "displayImage~": { "elements": [
			{
				"authorizationMethod": "PUBLIC",
				"data": { "com.linkedin.digitalmedia.mediaartifact.StillImage": {
					"storageSize": { "width": 800, "height": 800 },
				} },
				"identifiers": [{
					"identifier": "https://cdn.example.com/800",
					"mediaType": "image/jpeg",
				}],
			},
			{
				"authorizationMethod": "PUBLIC",
				"data": { "com.linkedin.digitalmedia.mediaartifact.StillImage": {
					"storageSize": { "width": 100, "height": 100 },
				} },
				"identifiers": [{
					"identifier": "https://cdn.example.com/100",
					"mediaType": "image/jpeg",
				}],
			},
		] } },
	})
}

fn email_body() -> Value {
	json!({ "elements": [{
		"type": "EMAIL",
		"state": "CONFIRMED",
		"primary": true,
		"handle~": { "emailAddress": "ada@example.com" },
	}] })
}

#[tokio::test]
async fn resolution_merges_profile_and_email_into_an_owner() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let resolver = build_reqwest_test_resolver(descriptor);
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v2/me")
				.query_param("projection", PROJECTION)
				.header("authorization", format!("Bearer {TOKEN}"));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(profile_body());
		})
		.await;
	let email_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v2/clientAwareMemberHandles")
				.query_param("q", "members")
				.query_param("projection", EMAIL_PROJECTION)
				.header("authorization", format!("Bearer {TOKEN}"));
			then.status(200).header("content-type", "application/json").json_body(email_body());
		})
		.await;
	let owner = resolver
		.resolve_resource_owner(&test_access_token(TOKEN), &resolver.request())
		.await
		.expect("Resolution should succeed.");

	profile_mock.assert_async().await;
	email_mock.assert_async().await;

	assert_eq!(owner.id(), Some("REdO4xz9K3"));
	assert_eq!(owner.first_name(), Some("Ada"));
	assert_eq!(owner.last_name(), Some("Lovelace"));
	assert_eq!(owner.email(), Some("ada@example.com"));
	assert_eq!(owner.picture_widths(), vec![100, 800]);
	assert_eq!(owner.image_url(), Some("https://cdn.example.com/800".to_owned()));
	assert_eq!(owner.attribute("somethingExtra.more"), Some(&json!("kept verbatim")));

	let mut expected = profile_body();

	expected["email"] = json!("ada@example.com");

	assert_eq!(owner.as_raw(), &expected, "Merged document must round-trip verbatim.");
}

#[tokio::test]
async fn denied_email_scope_degrades_to_an_absent_email() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let resolver = build_reqwest_test_resolver(descriptor);
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/me");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(profile_body());
		})
		.await;
	let email_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/clientAwareMemberHandles");
			then.status(403).header("content-type", "application/json").json_body(json!({
				"serviceErrorCode": 100,
				"message": "Not enough permissions to access resource",
				"status": 403,
			}));
		})
		.await;
	let owner = resolver
		.resolve_resource_owner(&test_access_token(TOKEN), &resolver.request())
		.await
		.expect("Denied email scope must not fail the resolution.");

	profile_mock.assert_async().await;
	email_mock.assert_async().await;

	assert_eq!(owner.email(), None);
	assert_eq!(owner.attribute("email"), Some(&Value::Null));
	assert_eq!(owner.id(), Some("REdO4xz9K3"));
}

#[tokio::test]
async fn generic_email_failure_stays_fatal() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let resolver = build_reqwest_test_resolver(descriptor);
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/me");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(profile_body());
		})
		.await;
	let _email_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/clientAwareMemberHandles");
			then.status(500).header("content-type", "application/json").json_body(json!({
				"message": "Internal service failure",
				"status": 500,
			}));
		})
		.await;
	let err = resolver
		.resolve_resource_owner(&test_access_token(TOKEN), &resolver.request())
		.await
		.expect_err("A non-denial email failure must abort the resolution.");

	match err {
		Error::Provider(failure) => {
			assert_eq!(failure.status, 500);
			assert_eq!(failure.message, "Internal service failure");
		},
		other => panic!("Expected a generic provider failure, got {other:?}."),
	}
}

#[tokio::test]
async fn profile_failures_never_produce_an_owner() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let resolver = build_reqwest_test_resolver(descriptor);
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/me");
			then.status(401).header("content-type", "application/json").json_body(json!({
				"error": "invalid_token",
				"error_description": "The token has expired",
			}));
		})
		.await;
	let email_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/clientAwareMemberHandles");
			then.status(200).header("content-type", "application/json").json_body(email_body());
		})
		.await;
	let err = resolver
		.resolve_resource_owner(&test_access_token(TOKEN), &resolver.request())
		.await
		.expect_err("A classified profile failure must abort the resolution.");

	profile_mock.assert_async().await;
	// The pipeline is sequential; a failed profile fetch never reaches the email endpoint.
	email_mock.assert_calls_async(0).await;

	assert!(
		matches!(err, Error::Provider(ref failure) if failure.message == "The token has expired")
	);
}

#[tokio::test]
async fn denied_profile_scope_stays_fatal() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let resolver = build_reqwest_test_resolver(descriptor);
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/me");
			then.status(403).header("content-type", "application/json").json_body(json!({
				"message": "Not enough permissions to access resource",
				"status": 403,
			}));
		})
		.await;
	let err = resolver
		.resolve_resource_owner(&test_access_token(TOKEN), &resolver.request())
		.await
		.expect_err("A denied profile fetch must abort the resolution.");

	assert!(matches!(err, Error::AccessDenied(ref failure) if failure.status == 403));
}

#[tokio::test]
async fn email_fetch_can_be_disabled_per_request() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let resolver = build_reqwest_test_resolver(descriptor);
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/me");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(profile_body());
		})
		.await;
	let email_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/clientAwareMemberHandles");
			then.status(200).header("content-type", "application/json").json_body(email_body());
		})
		.await;
	let request = resolver.request().with_fetch_email(false);
	let owner = resolver
		.resolve_resource_owner(&test_access_token(TOKEN), &request)
		.await
		.expect("Resolution should succeed without the email fetch.");

	email_mock.assert_calls_async(0).await;

	assert_eq!(owner.email(), None);
	assert_eq!(owner.attribute("email"), Some(&Value::Null));
}

#[tokio::test]
async fn narrowed_field_selections_reach_the_wire() {
	let server = MockServer::start_async().await;
	let descriptor = build_descriptor(&server);
	let resolver = build_reqwest_test_resolver(descriptor);
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/me").query_param("projection", "(id,localizedFirstName)");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "id": "REdO4xz9K3", "localizedFirstName": "Ada" }));
		})
		.await;
	let request = resolver
		.request()
		.with_fields(
			FieldSelection::new(["id", "localizedFirstName"])
				.expect("Narrowed selection should be valid."),
		)
		.with_fetch_email(false);
	let owner = resolver
		.resolve_resource_owner(&test_access_token(TOKEN), &request)
		.await
		.expect("Resolution should succeed with a narrowed selection.");

	profile_mock.assert_async().await;

	assert_eq!(owner.first_name(), Some("Ada"));
	assert_eq!(owner.last_name(), None);
}
