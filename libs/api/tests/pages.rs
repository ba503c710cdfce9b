mod common;

use std::time::Duration;

use axum::http::{header, StatusCode};

use common::{
    body_text, get, healthy_app, post_form, post_multipart, send, session_cookie,
    spawn, Part, PNG, UNREACHABLE,
};

#[tokio::test]
async fn test_wardrobe_lists_items_and_sets_cookie() {
    // Arrange
    let app = healthy_app().await;

    // Act
    let response = send(&app, get("/wardrobe", None)).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).starts_with("outfit_session="));
    let html = body_text(response).await;
    assert!(html.contains("Your Items"));
    assert!(html.contains("Blue"));
    assert!(html.contains("1 items"));
}

#[tokio::test]
async fn test_wardrobe_with_catalog_down_still_renders() {
    let app = common::app(UNREACHABLE, UNREACHABLE, UNREACHABLE);

    let response = send(&app, get("/wardrobe", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No items yet. Upload your first clothing item!"));
}

#[tokio::test]
async fn test_upload_redirects_with_success_notice() {
    // Arrange
    let app = healthy_app().await;
    let first = send(&app, get("/wardrobe", None)).await;
    let cookie = session_cookie(&first);

    // Act
    let response = send(
        &app,
        post_multipart(
            "/wardrobe/upload",
            Some(&cookie),
            &[
                Part::Text("category", "top"),
                Part::Text("color", "blue"),
                Part::File("file", "shirt.png", PNG),
            ],
        ),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/wardrobe");

    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;
    assert!(html.contains("Item uploaded successfully!"));

    // shown once
    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;
    assert!(!html.contains("Item uploaded successfully!"));
}

#[tokio::test]
async fn test_text_search_then_clear() {
    // Arrange
    let app = healthy_app().await;
    let first = send(&app, get("/wardrobe", None)).await;
    let cookie = session_cookie(&first);

    // Act
    let response = send(
        &app,
        post_form("/wardrobe/search", Some(&cookie), "query=blue+top"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;

    // Assert
    assert!(html.contains("Search Results"));
    assert!(html.contains("Match: 92.0%"));
    assert!(html.contains(r#"value="blue top""#));

    send(&app, post_form("/wardrobe/clear", Some(&cookie), "")).await;
    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;
    assert!(html.contains("Your Items"));
    assert!(!html.contains("Match:"));
}

#[tokio::test]
async fn test_search_failure_shows_notice() {
    let app = common::app(UNREACHABLE, UNREACHABLE, UNREACHABLE);
    let first = send(&app, get("/wardrobe", None)).await;
    let cookie = session_cookie(&first);

    send(&app, post_form("/wardrobe/search", Some(&cookie), "query=red")).await;
    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;

    assert!(html.contains(r#"<div class="notice error">Search failed</div>"#));
}

#[tokio::test]
async fn test_upload_failure_shows_notice() {
    let app = common::app(UNREACHABLE, UNREACHABLE, UNREACHABLE);
    let first = send(&app, get("/wardrobe", None)).await;
    let cookie = session_cookie(&first);

    send(
        &app,
        post_multipart(
            "/wardrobe/upload",
            Some(&cookie),
            &[Part::File("file", "shirt.png", PNG)],
        ),
    )
    .await;
    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;

    assert!(html.contains(r#"<div class="notice error">Failed to upload item</div>"#));
}

#[tokio::test]
async fn test_image_search_shows_results() {
    // Arrange
    let app = healthy_app().await;
    let first = send(&app, get("/wardrobe", None)).await;
    let cookie = session_cookie(&first);

    // Act
    let response = send(
        &app,
        post_multipart(
            "/wardrobe/search-image",
            Some(&cookie),
            &[Part::File("file", "boots.png", PNG)],
        ),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/wardrobe");
    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;
    assert!(html.contains("Search Results"));
    assert!(html.contains("Match: 75.0%"));
    assert!(html.contains("Clear Search"));
}

#[tokio::test]
async fn test_image_search_failure_shows_notice() {
    let app = common::app(UNREACHABLE, UNREACHABLE, UNREACHABLE);
    let first = send(&app, get("/wardrobe", None)).await;
    let cookie = session_cookie(&first);

    send(
        &app,
        post_multipart(
            "/wardrobe/search-image",
            Some(&cookie),
            &[Part::File("file", "boots.png", PNG)],
        ),
    )
    .await;
    let html = body_text(send(&app, get("/wardrobe", Some(&cookie))).await).await;

    assert!(html.contains(r#"<div class="notice error">Image search failed</div>"#));
    assert!(html.contains("Your Items"));
}

#[tokio::test]
async fn test_recommend_appends_assistant_reply() {
    // Arrange
    let app = healthy_app().await;
    let first = send(&app, get("/recommend", None)).await;
    let cookie = session_cookie(&first);

    // Act
    let response = send(
        &app,
        post_form(
            "/recommend/send",
            Some(&cookie),
            "message=Brunch+outfit&occasion=casual&weather=&style_preference=&color_preference=",
        ),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/recommend");

    let html = body_text(send(&app, get("/recommend", Some(&cookie))).await).await;
    assert!(html.contains(r#"<div class="message user">Brunch outfit</div>"#));
    assert!(html.contains("Try navy chinos with a white tee."));
    assert!(html.contains(r#"<option value="casual" selected>Casual</option>"#));
}

#[tokio::test]
async fn test_recommend_failure_appends_error_message() {
    // Arrange
    let recommender = spawn(common::failing_recommender()).await;
    let app = common::app(UNREACHABLE, &recommender, UNREACHABLE);
    let first = send(&app, get("/recommend", None)).await;
    let cookie = session_cookie(&first);

    // Act
    send(
        &app,
        post_form("/recommend/send", Some(&cookie), "message=Wedding+guest"),
    )
    .await;

    // Assert
    let html = body_text(send(&app, get("/recommend", Some(&cookie))).await).await;
    assert!(html.contains("Wedding guest"));
    assert!(html.contains(
        "Sorry, I encountered an error. Please make sure the recommendation \
         service is running and try again."
    ));
}

#[tokio::test]
async fn test_second_message_while_waiting_is_ignored() {
    // Arrange
    let recommender =
        spawn(common::slow_recommender(Duration::from_millis(300))).await;
    let app = common::app(UNREACHABLE, &recommender, UNREACHABLE);
    let first = send(&app, get("/recommend", None)).await;
    let cookie = session_cookie(&first);

    // Act
    let slow = send(
        &app,
        post_form("/recommend/send", Some(&cookie), "message=First+question"),
    );
    let eager = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let html = body_text(send(&app, get("/recommend", Some(&cookie))).await).await;
        let response = send(
            &app,
            post_form("/recommend/send", Some(&cookie), "message=Second+question"),
        )
        .await;
        (html, response)
    };
    let (slow, (waiting, eager)) = tokio::join!(slow, eager);

    // Assert
    assert_eq!(slow.status(), StatusCode::SEE_OTHER);
    assert_eq!(eager.status(), StatusCode::SEE_OTHER);
    assert!(waiting.contains("Thinking..."));

    let html = body_text(send(&app, get("/recommend", Some(&cookie))).await).await;
    assert!(html.contains("First question"));
    assert!(html.contains("Worth the wait."));
    assert!(!html.contains("Second question"));
    assert!(!html.contains("Thinking..."));
}

#[tokio::test]
async fn test_unknown_occasion_shows_notice() {
    let app = healthy_app().await;
    let first = send(&app, get("/recommend", None)).await;
    let cookie = session_cookie(&first);

    let response = send(
        &app,
        post_form(
            "/recommend/send",
            Some(&cookie),
            "message=Gala+night&occasion=gala&weather=",
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = body_text(send(&app, get("/recommend", Some(&cookie))).await).await;
    assert!(html.contains(r#"<div class="notice error">Unknown occasion or weather</div>"#));
    assert!(!html.contains(r#"class="message user""#));
}

#[tokio::test]
async fn test_blank_message_is_ignored_and_reset_restores_greeting() {
    let app = healthy_app().await;
    let first = send(&app, get("/recommend", None)).await;
    let cookie = session_cookie(&first);

    send(&app, post_form("/recommend/send", Some(&cookie), "message=+++")).await;
    let html = body_text(send(&app, get("/recommend", Some(&cookie))).await).await;
    assert!(!html.contains(r#"class="message user""#));

    send(&app, post_form("/recommend/send", Some(&cookie), "message=Gym")).await;
    send(&app, post_form("/recommend/reset", Some(&cookie), "")).await;
    let html = body_text(send(&app, get("/recommend", Some(&cookie))).await).await;

    assert!(!html.contains(r#"class="message user""#));
    assert!(html.contains("AI fashion stylist"));
}

#[tokio::test]
async fn test_quick_prompt_prefills_input() {
    let app = healthy_app().await;

    let response = send(
        &app,
        get("/recommend?prompt=Casual+Friday+work+outfit", None),
    )
    .await;

    let html = body_text(response).await;
    assert!(html.contains(
        r#"name="message" value="Casual Friday work outfit""#
    ));
}

#[tokio::test]
async fn test_try_on_requires_person_image() {
    // Arrange
    let app = healthy_app().await;
    let first = send(&app, get("/try-on", None)).await;
    let cookie = session_cookie(&first);

    // Act
    send(
        &app,
        post_multipart(
            "/try-on/generate",
            Some(&cookie),
            &[Part::Text("mode", "simple")],
        ),
    )
    .await;

    // Assert
    let html = body_text(send(&app, get("/try-on", Some(&cookie))).await).await;
    assert!(html.contains("Please upload a person image"));
}

#[tokio::test]
async fn test_try_on_shows_generated_image_and_keeps_upload() {
    // Arrange
    let app = healthy_app().await;
    let first = send(&app, get("/try-on", None)).await;
    let cookie = session_cookie(&first);

    // Act
    let response = send(
        &app,
        post_multipart(
            "/try-on/generate",
            Some(&cookie),
            &[
                Part::Text("mode", "simple"),
                Part::Text("prompt", "red summer dress"),
                Part::Text("strength", "0.5"),
                Part::File("person_image", "me.png", PNG),
            ],
        ),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = body_text(send(&app, get("/try-on", Some(&cookie))).await).await;
    assert!(html.contains(r#"alt="Generated result""#));
    assert!(html.contains("Person: me.png"));
    assert!(html.contains("red summer dress"));

    // img2img without a clothing image keeps the stored person image
    send(
        &app,
        post_multipart(
            "/try-on/generate",
            Some(&cookie),
            &[Part::Text("mode", "img2img")],
        ),
    )
    .await;
    let html = body_text(send(&app, get("/try-on", Some(&cookie))).await).await;
    assert!(html.contains("Please upload a clothing image for img2img mode"));
    assert!(html.contains("Person: me.png"));
}

#[tokio::test]
async fn test_try_on_rejects_out_of_range_parameters() {
    let app = healthy_app().await;
    let first = send(&app, get("/try-on", None)).await;
    let cookie = session_cookie(&first);

    send(
        &app,
        post_multipart(
            "/try-on/generate",
            Some(&cookie),
            &[
                Part::Text("num_inference_steps", "500"),
                Part::File("person_image", "me.png", PNG),
            ],
        ),
    )
    .await;

    let html = body_text(send(&app, get("/try-on", Some(&cookie))).await).await;
    assert!(html.contains("Invalid generation parameters"));
    assert!(!html.contains(r#"alt="Generated result""#));
}

#[tokio::test]
async fn test_unparsable_parameters_keep_uploads() {
    let app = healthy_app().await;
    let first = send(&app, get("/try-on", None)).await;
    let cookie = session_cookie(&first);

    send(
        &app,
        post_multipart(
            "/try-on/generate",
            Some(&cookie),
            &[
                Part::Text("strength", "strong"),
                Part::File("person_image", "me.png", PNG),
            ],
        ),
    )
    .await;

    let html = body_text(send(&app, get("/try-on", Some(&cookie))).await).await;
    assert!(html.contains("Invalid generation parameters"));
    assert!(html.contains("Person: me.png"));
}

#[tokio::test]
async fn test_generate_outfit_failure_notice() {
    let app = common::app(UNREACHABLE, UNREACHABLE, UNREACHABLE);
    let first = send(&app, get("/try-on", None)).await;
    let cookie = session_cookie(&first);

    send(
        &app,
        post_multipart(
            "/try-on/generate-outfit",
            Some(&cookie),
            &[Part::Text("prompt", "streetwear look")],
        ),
    )
    .await;

    let html = body_text(send(&app, get("/try-on", Some(&cookie))).await).await;
    assert!(html.contains("Failed to generate outfit visualization"));
}

#[tokio::test]
async fn test_home_links_pages() {
    let app = healthy_app().await;

    let html = body_text(send(&app, get("/", None)).await).await;

    assert!(html.contains(r#"href="/wardrobe""#));
    assert!(html.contains(r#"href="/recommend""#));
    assert!(html.contains(r#"href="/try-on""#));
}
