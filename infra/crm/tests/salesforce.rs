use chrono::{TimeZone, Utc};
use dormant_crm::{CrmApi, CrmError, EndpointPolicy, OrgEndpoint, SalesforceClient};
use dormant_vault::Credential;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SOBJECTS: &str = "/services/data/v59.0/sobjects";
const QUERY: &str = "/services/data/v59.0/query";

fn client() -> SalesforceClient {
    SalesforceClient::builder().api_version("59.0").build().expect("client")
}

fn endpoint(server: &MockServer) -> OrgEndpoint {
    let policy = EndpointPolicy::new(true, vec!["127.0.0.1".to_owned()]);
    OrgEndpoint::parse(&server.uri(), &policy).expect("endpoint")
}

fn credential() -> Credential {
    Credential::new("00Dxx!session")
}

#[tokio::test]
async fn lists_objects_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SOBJECTS))
        .and(header("authorization", "Bearer 00Dxx!session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encoding": "UTF-8",
            "sobjects": [
                { "name": "Account", "custom": false, "label": "Account" },
                { "name": "Invoice__c", "custom": true, "label": "Invoice" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resources = client().list_resources(&credential(), &endpoint(&server)).await.unwrap();

    assert_eq!(resources.len(), 2);
    assert_eq!(resources[1].name, "Invoice__c");
    assert!(resources[1].custom);
    assert!(!resources[0].custom);
}

#[tokio::test]
async fn existence_query_is_windowed_and_limited() {
    let server = MockServer::start().await;
    let since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    Mock::given(method("GET"))
        .and(path(QUERY))
        .and(query_param(
            "q",
            "SELECT Id FROM Invoice__c WHERE LastModifiedDate >= 2024-03-01T00:00:00Z LIMIT 1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 1,
            "done": true,
            "records": [{ "attributes": { "type": "Invoice__c" }, "Id": "a0B000000000001" }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(QUERY))
        .and(query_param(
            "q",
            "SELECT Id FROM Legacy__c WHERE LastModifiedDate >= 2024-03-01T00:00:00Z LIMIT 1",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 0,
            "done": true,
            "records": []
        })))
        .mount(&server)
        .await;

    let client = client();
    let org = endpoint(&server);

    assert!(client.has_recent_activity(&credential(), &org, "Invoice__c", since).await.unwrap());
    assert!(!client.has_recent_activity(&credential(), &org, "Legacy__c", since).await.unwrap());
}

#[tokio::test]
async fn error_status_carries_salesforce_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            { "message": "sObject type 'Gone__c' is not supported.", "errorCode": "INVALID_TYPE" }
        ])))
        .mount(&server)
        .await;

    let err = client()
        .has_recent_activity(&credential(), &endpoint(&server), "Gone__c", Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, CrmError::Status { status: 400, .. }));
    assert!(err.to_string().contains("INVALID_TYPE"));
}

#[tokio::test]
async fn listing_failure_is_reported_with_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SOBJECTS))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!([
            { "message": "Session expired or invalid", "errorCode": "INVALID_SESSION_ID" }
        ])))
        .mount(&server)
        .await;

    let err = client().list_resources(&credential(), &endpoint(&server)).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("listing objects"));
    assert!(!err.to_string().contains("00Dxx"));
}

#[tokio::test]
async fn invalid_object_name_never_reaches_the_org() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client()
        .has_recent_activity(&credential(), &endpoint(&server), "X__c LIMIT 0", Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, CrmError::InvalidObjectName { .. }));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"unexpected\": true}"))
        .mount(&server)
        .await;

    let err = client()
        .has_recent_activity(&credential(), &endpoint(&server), "Invoice__c", Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, CrmError::Decode { .. }));
}
