use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ProductDetail, ProductPage};
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";
const VENDOR: &str = "vendor-1";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("identifier", VENDOR)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn multipart_body(params: &str, images: &[&str]) -> String {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"params\"\r\n\
         Content-Type: application/json\r\n\r\n{params}\r\n"
    );
    for image in images {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{image}\"\r\n\
             Content-Type: image/png\r\n\r\nPNG\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn create_request(identifier: Option<&str>, params: &str, images: &[&str]) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(identifier) = identifier {
        builder = builder.header("identifier", identifier);
    }
    builder.body(multipart_body(params, images)).unwrap()
}

const PEN: &str =
    r#"{"name":"pen","description":"blue","price":1000,"currency":"KRW","stock":3,"secret":"pw"}"#;

// --- health ---

#[tokio::test]
async fn health_check_answers_ok() {
    let resp = app().oneshot(get("/healthChecker")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "OK");
}

// --- list ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app()
        .oneshot(get("/api/products?page_no=1&items_per_page=20"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: ProductPage = body_json(resp).await;
    assert!(page.pages.is_empty());
    assert_eq!(page.last_page, 1);
    assert!(!page.has_next);
}

#[tokio::test]
async fn list_products_rejects_page_zero() {
    let resp = app()
        .oneshot(get("/api/products?page_no=0&items_per_page=20"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_product_returns_201() {
    let resp = app()
        .oneshot(create_request(Some(VENDOR), PEN, &["pen.png"]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let detail: ProductDetail = body_json(resp).await;
    assert_eq!(detail.product.name, "pen");
    assert_eq!(detail.product.stock, 3);
    assert_eq!(detail.images.len(), 1);
    assert_eq!(detail.product.thumbnail, detail.images[0].thumbnail_url);
}

#[tokio::test]
async fn create_product_without_identifier_returns_401() {
    let resp = app()
        .oneshot(create_request(None, PEN, &["pen.png"]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_product_without_images_returns_400() {
    let resp = app()
        .oneshot(create_request(Some(VENDOR), PEN, &[]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_product_with_unknown_currency_returns_400() {
    let params = r#"{"name":"pen","description":"blue","price":1000,"currency":"EUR","secret":"pw"}"#;
    let resp = app()
        .oneshot(create_request(Some(VENDOR), params, &["pen.png"]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- get ---

#[tokio::test]
async fn get_product_not_found() {
    let resp = app().oneshot(get("/api/products/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_product_bad_id_returns_400() {
    let resp = app().oneshot(get("/api/products/not-a-number")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_product_not_found() {
    let resp = app()
        .oneshot(json_request("PATCH", "/api/products/999", r#"{"stock":1,"secret":"pw"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_product_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/products/999/whatever")
                .header("identifier", VENDOR)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn product_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(create_request(Some(VENDOR), PEN, &["a.png", "b.png"]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: ProductDetail = body_json(resp).await;
    let id = created.product.id;
    let second_image = created.images[1].id;

    // list: should contain the one product
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/products?page_no=1&items_per_page=10"))
        .await
        .unwrap();
    let page: ProductPage = body_json(resp).await;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.pages[0].id, id);

    // update: wrong vendor secret
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/api/products/{id}"),
            r#"{"stock":9,"secret":"wrong"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // update: partial: stock and thumbnail
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/api/products/{id}"),
            &format!(r#"{{"stock":9,"thumbnail_id":{second_image},"secret":"pw"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: ProductDetail = body_json(resp).await;
    assert_eq!(updated.product.name, "pen"); // unchanged
    assert_eq!(updated.product.stock, 9);
    assert_eq!(updated.product.thumbnail, created.images[1].thumbnail_url);

    // secret lookup
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/api/products/{id}/archived"),
            r#"{"secret":"pw"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let product_secret = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();

    // delete: wrong product secret
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/api/products/{id}/pw"))
                .header("identifier", VENDOR)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/api/products/{id}/{product_secret}"))
                .header("identifier", VENDOR)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/products/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
