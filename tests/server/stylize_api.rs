use image::GenericImageView;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{
    BACKGROUND_PIXEL, FOREGROUND_PIXEL, mount_successful_provider, photo_form, png_bytes,
    post_photo, spawn_app, spawn_app_with_provider_mock, spawn_app_without_style_refs,
};

// --- Validation ---

#[tokio::test]
async fn missing_photo_returns_400_without_side_effects() {
    let app = spawn_app_with_provider_mock().await;

    // The provider must never be called for a rejected request
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(app.mock_server.as_ref().unwrap())
        .await;

    let response = post_photo(&app, None, Some("female")).await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "no file uploaded");

    assert_eq!(app.upload_count(), 0);
    assert!(app.generated_files().is_empty());
}

// --- Configuration ---

#[tokio::test]
async fn missing_style_references_return_500() {
    let app = spawn_app_without_style_refs().await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "no reference style images found");

    // The upload temp file is removed even on the configuration failure path
    assert_eq!(app.upload_count(), 0);
}

// --- Provider failures ---

#[tokio::test]
async fn provider_http_error_maps_to_500_and_cleans_up() {
    let app = spawn_app_with_provider_mock().await;

    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(app.mock_server.as_ref().unwrap())
        .await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], false);
    let message = body["message"].as_str().unwrap();
    assert!(!message.is_empty());
    assert!(message.contains("503"));

    assert_eq!(app.upload_count(), 0);
    assert!(app.generated_files().is_empty());
}

#[tokio::test]
async fn failed_prediction_surfaces_the_provider_error() {
    let app = spawn_app_with_provider_mock().await;

    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "pred-test",
            "status": "failed",
            "error": "NSFW content detected",
        })))
        .mount(app.mock_server.as_ref().unwrap())
        .await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["message"], "NSFW content detected");
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn unparseable_provider_body_maps_to_500() {
    let app = spawn_app_with_provider_mock().await;

    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(app.mock_server.as_ref().unwrap())
        .await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], false);
    assert_eq!(app.upload_count(), 0);
}

// --- Fetch failures ---

#[tokio::test]
async fn fetch_failure_maps_to_500_and_cleans_up() {
    let app = spawn_app_with_provider_mock().await;
    let mock = app.mock_server.as_ref().unwrap();

    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "pred-test",
            "status": "succeeded",
            "output": [format!("{}/delivery/char.png", mock.uri())],
        })))
        .mount(mock)
        .await;

    Mock::given(method("GET"))
        .and(path("/delivery/char.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(mock)
        .await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], false);
    assert!(body["message"].as_str().unwrap().contains("404"));

    assert_eq!(app.upload_count(), 0);
    assert!(app.generated_files().is_empty());
}

// --- Success ---

#[tokio::test]
async fn photo_to_brand_end_to_end() {
    let app = spawn_app_with_provider_mock().await;
    mount_successful_provider(&app, png_bytes(800, 800, FOREGROUND_PIXEL)).await;

    let response = post_photo(
        &app,
        Some(png_bytes(512, 512, [10, 20, 30, 255])),
        Some("female"),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], true);

    let url = body["url"].as_str().expect("url missing");
    assert!(url.starts_with("/generated/final-"));
    assert!(url.ends_with(".png"));

    // The composited file exists with the canvas dimensions, foreground centered
    let file = app.generated_dir.join(url.trim_start_matches("/generated/"));
    let img = image::open(&file).expect("output file missing or unreadable");
    assert_eq!(img.dimensions(), (1024, 1024));
    let rgba = img.to_rgba8();
    assert_eq!(*rgba.get_pixel(512, 512), image::Rgba(FOREGROUND_PIXEL));
    // Background corner, with a little slack for resize rounding
    let corner = rgba.get_pixel(5, 5);
    for channel in 0..4 {
        let expected = i16::from(BACKGROUND_PIXEL[channel]);
        let actual = i16::from(corner[channel]);
        assert!((expected - actual).abs() <= 2, "corner pixel {corner:?}");
    }

    // And it is served at the returned URL
    let served = reqwest::get(app.page_url(url)).await.expect("GET failed");
    assert_eq!(served.status(), 200);
    assert!(!served.bytes().await.expect("failed to read body").is_empty());

    // Both temp files are gone
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn single_output_reference_is_accepted() {
    let app = spawn_app_with_provider_mock().await;
    let mock = app.mock_server.as_ref().unwrap();

    Mock::given(method("POST"))
        .and(path("/predictions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "pred-test",
            "status": "succeeded",
            "output": format!("{}/delivery/char.png", mock.uri()),
        })))
        .mount(mock)
        .await;

    Mock::given(method("GET"))
        .and(path("/delivery/char.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(png_bytes(16, 16, FOREGROUND_PIXEL), "image/png"),
        )
        .mount(mock)
        .await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn prediction_request_carries_model_and_dimensions() {
    let app = spawn_app_with_provider_mock().await;
    let mock = app.mock_server.as_ref().unwrap();

    // Matcher pins the request shape the provider contract expects
    Mock::given(method("POST"))
        .and(path("/predictions"))
        .and(body_partial_json(serde_json::json!({
            "version": "test/model",
            "input": { "width": 1024, "height": 1024 },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "pred-test",
            "status": "succeeded",
            "output": [format!("{}/delivery/char.png", mock.uri())],
        })))
        .expect(1)
        .mount(mock)
        .await;

    Mock::given(method("GET"))
        .and(path("/delivery/char.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(png_bytes(16, 16, FOREGROUND_PIXEL), "image/png"),
        )
        .mount(mock)
        .await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn gender_defaults_when_absent() {
    let app = spawn_app_with_provider_mock().await;
    mount_successful_provider(&app, png_bytes(16, 16, FOREGROUND_PIXEL)).await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn concurrent_requests_produce_distinct_outputs() {
    let app = spawn_app_with_provider_mock().await;
    mount_successful_provider(&app, png_bytes(16, 16, FOREGROUND_PIXEL)).await;

    let photo = png_bytes(32, 32, [10, 20, 30, 255]);
    let mut set = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let url = app.api_url("/photo-to-brand");
        let photo = photo.clone();
        set.spawn(async move {
            let response = reqwest::Client::new()
                .post(url)
                .multipart(photo_form(photo, None))
                .send()
                .await
                .expect("failed to POST photo");
            assert_eq!(response.status(), 200);
            let body: serde_json::Value =
                response.json().await.expect("failed to parse response");
            body["url"].as_str().expect("url missing").to_string()
        });
    }

    let mut urls = Vec::new();
    while let Some(result) = set.join_next().await {
        urls.push(result.expect("request task panicked"));
    }

    let mut deduped = urls.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), urls.len(), "output URLs must be distinct");
    assert_eq!(app.generated_files().len(), 5);
    assert_eq!(app.upload_count(), 0);
}

// --- Fallback behavior used by spawn_app ---

#[tokio::test]
async fn unreachable_provider_maps_to_500() {
    let app = spawn_app().await;

    let response = post_photo(&app, Some(png_bytes(32, 32, [10, 20, 30, 255])), None).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], false);
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert_eq!(app.upload_count(), 0);
}
