// Inpainting request tests against a mock generateContent endpoint

use mockito::{Matcher, Server};
use nanobanana::config::GeminiConfig;
use nanobanana::gemini::{GeminiClient, InpaintParams};
use nanobanana::workflow::{Mode, ModelChoice};
use serde_json::json;

const ENDPOINT: &str = "/models/gemini-2.0-flash-exp-image-generation:generateContent";
const API_KEY: &str = "test-key";

fn client(base_url: &str, api_key: &str) -> GeminiClient {
    GeminiClient::new(&GeminiConfig {
        api_key: api_key.to_string(),
        api_base_url: base_url.to_string(),
        ..GeminiConfig::default()
    })
    .unwrap()
}

fn params(mode: Mode, count: u32) -> InpaintParams {
    InpaintParams {
        model: ModelChoice::Auto,
        prompt: "a red balloon".to_string(),
        mode,
        base_image: "QkFTRQ==".to_string(),
        mask_image: "TUFTSw==".to_string(),
        count,
    }
}

fn image_response(data: &str) -> String {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Here is the edited image."},
                    {"inlineData": {"mimeType": "image/png", "data": data}}
                ]
            },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_one_call_per_requested_variation() {
    for mode in Mode::ALL {
        for count in 1..=4u32 {
            let mut server = Server::new_async().await;
            let mock = server
                .mock("POST", ENDPOINT)
                .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(image_response("UE5H"))
                .expect(count as usize)
                .create_async()
                .await;

            let outcome = client(&server.url(), API_KEY)
                .generate_inpainted_images(&params(mode, count))
                .await;

            mock.assert_async().await;
            assert!(outcome.success, "{mode:?} x{count}");
            assert!(outcome.error.is_none());
            assert_eq!(outcome.variations.len(), count as usize);
            for variation in &outcome.variations {
                assert_eq!(variation.data_url, "data:image/png;base64,UE5H");
                assert!(variation.id.starts_with("variation-"));
            }
        }
    }
}

#[tokio::test]
async fn test_zero_count_makes_one_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(image_response("UE5H"))
        .expect(1)
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Replace, 0))
        .await;

    mock.assert_async().await;
    assert_eq!(outcome.variations.len(), 1);
}

#[tokio::test]
async fn test_instruction_depends_on_mode() {
    let mut server = Server::new_async().await;
    let erase = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex(
            r#""text":"Remove or erase the masked area\. a red balloon""#.into(),
        ))
        .with_status(200)
        .with_body(image_response("RVJBU0U="))
        .expect(1)
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Erase, 1))
        .await;

    erase.assert_async().await;
    assert!(outcome.success);

    let replace = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex(
            r#""text":"Replace the masked area with: a red balloon""#.into(),
        ))
        .with_status(200)
        .with_body(image_response("UkVQTA=="))
        .expect(1)
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Replace, 1))
        .await;

    replace.assert_async().await;
    assert_eq!(outcome.variations[0].data_url, "data:image/png;base64,UkVQTA==");
}

#[tokio::test]
async fn test_request_carries_images_and_modalities() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""inlineData":\{"mimeType":"image/png","data":"QkFTRQ=="\}"#.into()),
            Matcher::Regex(r#""inlineData":\{"mimeType":"image/png","data":"TUFTSw=="\}"#.into()),
            Matcher::Regex(r#""generationConfig":\{"responseModalities":\["TEXT","IMAGE"\]\}"#.into()),
        ]))
        .with_status(200)
        .with_body(image_response("UE5H"))
        .expect(1)
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Replace, 1))
        .await;

    mock.assert_async().await;
    assert!(outcome.success);
}

#[tokio::test]
async fn test_rejected_call_keeps_earlier_variations() {
    let mut server = Server::new_async().await;
    let accepted = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(image_response("T0s="))
        .expect(2)
        .create_async()
        .await;
    let rejected = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Replace, 4))
        .await;

    accepted.assert_async().await;
    rejected.assert_async().await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("API Error: quota exceeded"));
    assert_eq!(outcome.variations.len(), 2);
}

#[tokio::test]
async fn test_error_without_message_uses_status_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("<html>upstream unavailable</html>")
        .expect(1)
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Erase, 3))
        .await;

    mock.assert_async().await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("API Error: Service Unavailable"));
    assert!(outcome.variations.is_empty());
}

#[tokio::test]
async fn test_missing_key_makes_no_calls() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let outcome = client(&server.url(), "")
        .generate_inpainted_images(&params(Mode::Replace, 3))
        .await;

    mock.assert_async().await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("API Key is required"));
    assert!(outcome.variations.is_empty());
}

#[tokio::test]
async fn test_text_only_responses_still_succeed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{"content": {"parts": [{"text": "I cannot edit this image."}]}}]
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Replace, 2))
        .await;

    mock.assert_async().await;
    assert!(outcome.success);
    assert!(outcome.variations.is_empty());
}

#[tokio::test]
async fn test_unparseable_success_body_fails_without_variations() {
    let mut server = Server::new_async().await;
    let _ok = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(image_response("T0s="))
        .expect(1)
        .create_async()
        .await;
    let _garbage = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let outcome = client(&server.url(), API_KEY)
        .generate_inpainted_images(&params(Mode::Replace, 3))
        .await;

    assert!(!outcome.success);
    assert!(outcome.error.is_some());
    assert!(outcome.variations.is_empty());
}

#[tokio::test]
async fn test_transport_failure_fails_without_variations() {
    let outcome = client("http://127.0.0.1:1", API_KEY)
        .generate_inpainted_images(&params(Mode::Replace, 2))
        .await;

    assert!(!outcome.success);
    assert!(outcome.error.is_some());
    assert!(outcome.variations.is_empty());
}

#[tokio::test]
async fn test_model_override_changes_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-custom-image:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(image_response("UE5H"))
        .expect(1)
        .create_async()
        .await;

    let mut config = GeminiConfig {
        api_key: API_KEY.to_string(),
        api_base_url: server.url(),
        ..GeminiConfig::default()
    };
    config
        .model_overrides
        .insert("pro".to_string(), "gemini-custom-image".to_string());

    let mut request = params(Mode::Replace, 1);
    request.model = ModelChoice::Pro;
    let outcome = GeminiClient::new(&config)
        .unwrap()
        .generate_inpainted_images(&request)
        .await;

    mock.assert_async().await;
    assert!(outcome.success);
}
