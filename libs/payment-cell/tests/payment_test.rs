use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use payment_cell::router::payment_routes;
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

fn create_test_app(store_url: &str, stripe_url: &str) -> Router {
    let mut config = TestConfig::with_store_url(store_url);
    config.stripe_base_url = stripe_url.to_string();
    payment_routes(config.to_arc())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_intent_amount_derived_from_stored_price() {
    let store = MockServer::start().await;
    let stripe = MockServer::start().await;
    let booking_id = Uuid::new_v4();

    // Stored price is 99.0 dollars; the provider must be asked for 9900
    // cents regardless of anything the client sends.
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{}", booking_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::booking("2024-01-01", "a@x.com", "Cleaning", "9:00")
        ])))
        .mount(&store)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(body_string_contains("amount=9900"))
        .and(body_string_contains("currency=usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_123",
            "client_secret": "pi_123_secret_456"
        })))
        .expect(1)
        .mount(&stripe)
        .await;

    let app = create_test_app(&store.uri(), &stripe.uri());
    let request = Request::builder()
        .method("POST")
        .uri("/create-payment-intent")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "bookingId": booking_id }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reply = body_json(response).await;
    assert_eq!(reply["clientSecret"], "pi_123_secret_456");
}

#[tokio::test]
async fn test_intent_for_unknown_booking_never_reaches_provider() {
    let store = MockServer::start().await;
    let stripe = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&store)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&stripe)
        .await;

    let app = create_test_app(&store.uri(), &stripe.uri());
    let request = Request::builder()
        .method("POST")
        .uri("/create-payment-intent")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "bookingId": Uuid::new_v4() }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_provider_rejection_is_a_gateway_error() {
    let store = MockServer::start().await;
    let stripe = MockServer::start().await;
    let booking_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::booking("2024-01-01", "a@x.com", "Cleaning", "9:00")
        ])))
        .mount(&store)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "message": "Your card was declined." }
        })))
        .mount(&stripe)
        .await;

    let app = create_test_app(&store.uri(), &stripe.uri());
    let request = Request::builder()
        .method("POST")
        .uri("/create-payment-intent")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "bookingId": booking_id }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_record_payment_stores_and_marks_booking_paid() {
    let store = MockServer::start().await;
    let stripe = MockServer::start().await;
    let booking_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/payments"))
        .and(body_string_contains("txn_123"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::payment(booking_id, "txn_123", 9900)
        ])))
        .expect(1)
        .mount(&store)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{}", booking_id)))
        .and(body_string_contains("\"paid\":true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::booking("2024-01-01", "a@x.com", "Cleaning", "9:00")
        ])))
        .expect(1)
        .mount(&store)
        .await;

    let app = create_test_app(&store.uri(), &stripe.uri());
    let request = Request::builder()
        .method("POST")
        .uri("/payments")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "bookingId": booking_id,
                "email": "a@x.com",
                "amount": 9900,
                "transactionId": "txn_123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reply = body_json(response).await;
    assert_eq!(reply["acknowledged"], true);
    assert_eq!(reply["payment"]["transactionId"], "txn_123");
    assert_eq!(reply["payment"]["amount"], 9900);
}

#[tokio::test]
async fn test_booking_patch_is_replayed_after_a_timeout() {
    let store = MockServer::start().await;
    let stripe = MockServer::start().await;
    let booking_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/payments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::payment(booking_id, "txn_123", 9900)
        ])))
        .mount(&store)
        .await;

    // First PATCH stalls past the 1s test client timeout; the replay
    // lands on the healthy responder below.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&store)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("id", format!("eq.{}", booking_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::booking("2024-01-01", "a@x.com", "Cleaning", "9:00")
        ])))
        .expect(1)
        .mount(&store)
        .await;

    let app = create_test_app(&store.uri(), &stripe.uri());
    let request = Request::builder()
        .method("POST")
        .uri("/payments")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "bookingId": booking_id,
                "email": "a@x.com",
                "amount": 9900,
                "transactionId": "txn_123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reply = body_json(response).await;
    assert_eq!(reply["acknowledged"], true);
    assert_eq!(reply["payment"]["transactionId"], "txn_123");
}

#[tokio::test]
async fn test_record_payment_survives_vanished_booking() {
    let store = MockServer::start().await;
    let stripe = MockServer::start().await;
    let booking_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/payments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::payment(booking_id, "txn_123", 9900)
        ])))
        .mount(&store)
        .await;

    // The referenced booking was deleted between checkout and confirmation;
    // the payment record still lands and the call still succeeds.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&store)
        .await;

    let app = create_test_app(&store.uri(), &stripe.uri());
    let request = Request::builder()
        .method("POST")
        .uri("/payments")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "bookingId": booking_id,
                "email": "a@x.com",
                "amount": 9900,
                "transactionId": "txn_123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
