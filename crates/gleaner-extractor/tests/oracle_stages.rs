//! Oracle client behaviour across consecutive detailed attempts

use gleaner_extractor::{ExtractorError, OracleClient, OracleConfig, ParseFailureKind};
use gleaner_llm::{MockProvider, MockReply};

#[tokio::test]
async fn test_retained_keywords_flow_into_retry_prompts() {
    let llm = MockProvider::default()
        .then(r#"{"summary":"first try","keywords":["alpha","beta","gamma","delta","epsilon"]}"#)
        .then("second try mentions alpha beta gamma delta");
    let oracle = OracleClient::new(llm.clone(), OracleConfig::default());

    let first = oracle.extract_detailed("article", None).await.unwrap();
    let second = oracle
        .extract_detailed("article", Some(&first.keywords))
        .await
        .unwrap();

    assert_eq!(second.keywords, first.keywords);
    assert_eq!(second.long_summary, "second try mentions alpha beta gamma delta");

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].system.contains("alpha, beta, gamma, delta, epsilon"));
    assert_eq!(prompts[0].user, prompts[1].user);
}

#[tokio::test]
async fn test_rules_pick_reply_by_stage() {
    let llm = MockProvider::default()
        .when("published_date", vec![MockReply::from("not json")])
        .when("\"keywords\"", vec![MockReply::from(r#"{"summary":"s","keywords":[]}"#)]);
    let oracle = OracleClient::new(llm, OracleConfig::default());

    let basic = oracle.extract_basic("article").await.unwrap_err();
    assert!(matches!(
        basic,
        ExtractorError::Parse(ref f) if f.kind == ParseFailureKind::MalformedJson
    ));

    let detailed = oracle.extract_detailed("article", None).await.unwrap();
    assert!(detailed.keywords.is_empty());
}
