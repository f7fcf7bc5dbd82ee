use dormant_derive::api_model;

#[api_model]
pub struct Report {
    pub inactive_objects: Vec<String>,
}

#[api_model(rename_all = "camelCase", deny_unknown_fields = true)]
pub struct Query {
    pub instance_url: String,
}

fn main() {
    let body = serde_json::to_string(&Report { inactive_objects: vec!["A__c".to_owned()] }).unwrap();
    assert_eq!(body, r#"{"inactive_objects":["A__c"]}"#);

    let parsed: Query = serde_json::from_str(r#"{"instanceUrl":"https://x"}"#).unwrap();
    assert_eq!(parsed.instance_url, "https://x");
    assert!(serde_json::from_str::<Query>(r#"{"instanceUrl":"a","extra":1}"#).is_err());
}
