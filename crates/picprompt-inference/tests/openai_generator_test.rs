//! Integration tests for the OpenAI completions generator.
//!
//! These tests verify the wire contract against a mock HTTP server:
//! auth header, request payload shape, first-choice extraction, and
//! error mapping.

use picprompt_core::{defaults, Error, GenerationParams, LabelSet};
use picprompt_inference::openai::{OpenAiConfig, OpenAiGenerator, PromptGenerator};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn test_config(base_url: String) -> OpenAiConfig {
    OpenAiConfig {
        base_url,
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        timeout_seconds: 5,
    }
}

fn completion_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-123",
        "object": "text_completion",
        "model": "test-model",
        "choices": [
            { "text": text, "index": 0, "finish_reason": "stop" }
        ],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
    })
}

#[tokio::test]
async fn test_generate_returns_first_choice_verbatim() {
    let mock_server = MockServer::start().await;

    // Leading whitespace in the completion must survive: the contract is
    // "first choice's text verbatim, no trimming".
    let response = serde_json::json!({
        "choices": [
            { "text": "\n\nAn elegant cat, oil painting", "index": 0 },
            { "text": "second choice is ignored", "index": 1 }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let labels = LabelSet::from_detected(vec!["Cat".to_string()]);
    let params = GenerationParams::default();

    let text = generator.generate(&labels, &params).await.unwrap();
    assert_eq!(text, "\n\nAn elegant cat, oil painting");
}

#[tokio::test]
async fn test_generate_sends_params_and_fixed_token_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "temperature": 0.5,
            "max_tokens": 256,
            "top_p": 0.9,
            "frequency_penalty": 0.25,
            "presence_penalty": 0.75
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let labels = LabelSet::from_detected(vec!["Cat".to_string()]);
    let params = GenerationParams::new(0.5, 0.9, 0.25, 0.75, "template").unwrap();

    let result = generator.generate(&labels, &params).await;
    assert!(result.is_ok(), "request should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_generate_prompt_includes_template_and_labels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(body_partial_json(serde_json::json!({
            "prompt": "List prompts \n [\"Cat\", \"Animal\", \"Pet\"]"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let labels = LabelSet::from_detected(vec![
        "Cat".to_string(),
        "Animal".to_string(),
        "Pet".to_string(),
    ]);
    let params = GenerationParams::new(0.7, 1.0, 0.0, 0.0, "List prompts").unwrap();

    let result = generator.generate(&labels, &params).await;
    assert!(result.is_ok(), "request should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_generate_with_empty_label_set_is_well_formed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/completions"))
        .and(body_partial_json(serde_json::json!({
            "prompt": "template \n []"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response("something")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let params = GenerationParams::new(0.7, 1.0, 0.0, 0.0, "template").unwrap();

    let text = generator
        .generate(&LabelSet::default(), &params)
        .await
        .unwrap();
    assert_eq!(text, "something");
}

#[tokio::test]
async fn test_generate_maps_service_error_message() {
    let mock_server = MockServer::start().await;

    let error_body = serde_json::json!({
        "error": {
            "message": "Rate limit reached for requests",
            "type": "requests",
            "code": "rate_limit_exceeded"
        }
    });

    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let labels = LabelSet::from_detected(vec!["Cat".to_string()]);

    let err = generator
        .generate(&labels, &GenerationParams::default())
        .await
        .unwrap_err();
    match err {
        Error::Generation(msg) => {
            assert!(msg.contains("429"), "message should carry status: {}", msg);
            assert!(msg.contains("Rate limit reached"), "got: {}", msg);
        }
        other => panic!("expected Generation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_fails_on_unparseable_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let labels = LabelSet::from_detected(vec!["Cat".to_string()]);

    let err = generator
        .generate(&labels, &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
}

#[tokio::test]
async fn test_generate_fails_on_missing_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let labels = LabelSet::from_detected(vec!["Cat".to_string()]);

    let err = generator
        .generate(&labels, &GenerationParams::default())
        .await
        .unwrap_err();
    match err {
        Error::Generation(msg) => assert!(msg.contains("no completion choices")),
        other => panic!("expected Generation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_label_sets_of_every_length_build_valid_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response("text")))
        .expect(8)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let params = GenerationParams::default();

    // 0 through 7 labels inclusive, all valid inputs.
    for n in 0..=defaults::MAX_LABELS as usize {
        let labels = LabelSet::from_detected((0..n).map(|i| format!("label-{}", i)));
        let result = generator.generate(&labels, &params).await;
        assert!(result.is_ok(), "length {} failed: {:?}", n, result.err());
    }
}

#[tokio::test]
async fn test_request_body_is_flat_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = OpenAiGenerator::new(test_config(mock_server.uri())).unwrap();
    let labels = LabelSet::from_detected(vec!["Cat".to_string()]);
    generator
        .generate(&labels, &GenerationParams::default())
        .await
        .unwrap();

    let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    // The legacy completions contract: exactly these seven fields.
    let object = body.as_object().unwrap();
    for field in [
        "model",
        "prompt",
        "temperature",
        "max_tokens",
        "top_p",
        "frequency_penalty",
        "presence_penalty",
    ] {
        assert!(object.contains_key(field), "missing field {}", field);
    }
    assert_eq!(object.len(), 7);
}
