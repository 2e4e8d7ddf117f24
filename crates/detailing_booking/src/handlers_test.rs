#[cfg(test)]
mod tests {
    use crate::handlers::BookingState;
    use crate::logic::{BookingResponse, CheckoutResponse};
    use crate::routes::routes;
    use crate::test_support::{availability, catalog, zurich, FakeCalendar, FakePayments};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use detailing_common::services::DynPaymentService;
    use serde_json::{json, Value};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(calendar: Arc<FakeCalendar>, payments: Option<Arc<FakePayments>>) -> Router {
        routes(Arc::new(BookingState {
            availability: Arc::new(availability(calendar.clone())),
            calendar,
            payments: payments.map(|p| p as DynPaymentService),
            catalog: Arc::new(catalog()),
        }))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn booking(date_time: &str) -> Value {
        json!({
            "vehicle_class": "sedan",
            "package_id": "exterior",
            "option_ids": ["pet_hair"],
            "date_time": date_time,
            "customer": { "name": "Jane Muster", "email": "jane@example.com" },
            "location": "Seestrasse 5, Kusnacht"
        })
    }

    #[tokio::test]
    async fn test_catalog_is_served() {
        let (status, body) = send(app(Arc::default(), None), "GET", "/catalog", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currency"], "CHF");
        assert_eq!(body["packages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_booking_creates_calendar_event() {
        let calendar = Arc::new(FakeCalendar::default());
        let (status, body) = send(
            app(calendar.clone(), None),
            "POST",
            "/bookings",
            Some(booking("2030-05-07T09:00:00+02:00")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let response: BookingResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.booking_id, "evt-1");
        assert!(response.message.contains("2030-05-07 09:00"));

        let created = calendar.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].start, zurich(2030, 5, 7, 9, 0));
        assert_eq!(created[0].end, zurich(2030, 5, 7, 10, 0));
        assert_eq!(created[0].location.as_deref(), Some("Seestrasse 5, Kusnacht"));
    }

    #[tokio::test]
    async fn test_booking_flushes_cached_events() {
        let calendar = Arc::new(FakeCalendar::default());
        let app = app(calendar.clone(), None);

        for hour in ["09", "14"] {
            let (status, _) = send(
                app.clone(),
                "POST",
                "/bookings",
                Some(booking(&format!("2030-05-07T{hour}:00:00+02:00"))),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        // Each re-check read the calendar again instead of the cached day
        assert_eq!(calendar.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_taken_slot_is_409() {
        // 09:00 plus the 30 minute buffer runs into this event
        let calendar = Arc::new(FakeCalendar::with_busy(
            zurich(2030, 5, 7, 10, 15),
            zurich(2030, 5, 7, 11, 0),
        ));
        let (status, body) = send(
            app(calendar.clone(), None),
            "POST",
            "/bookings",
            Some(booking("2030-05-07T09:00:00+02:00")),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], 409);
        assert!(calendar.created().is_empty());
    }

    #[tokio::test]
    async fn test_calendar_conflict_on_write_is_409() {
        let calendar = Arc::new(FakeCalendar {
            reject_create: true,
            ..FakeCalendar::default()
        });
        let (status, _) = send(
            app(calendar, None),
            "POST",
            "/bookings",
            Some(booking("2030-05-07T09:00:00+02:00")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_off_grid_or_weekend_is_409() {
        for date_time in ["2030-05-07T09:10:00+02:00", "2030-05-11T09:00:00+02:00"] {
            let (status, _) = send(
                app(Arc::default(), None),
                "POST",
                "/bookings",
                Some(booking(date_time)),
            )
            .await;
            assert_eq!(status, StatusCode::CONFLICT, "{date_time}");
        }
    }

    #[tokio::test]
    async fn test_invalid_payload_is_400() {
        let mut unknown_package = booking("2030-05-07T09:00:00+02:00");
        unknown_package["package_id"] = json!("gold");
        let mut bad_email = booking("2030-05-07T09:00:00+02:00");
        bad_email["customer"]["email"] = json!("jane");

        for payload in [unknown_package, bad_email, booking("tomorrow at nine")] {
            let calendar = Arc::new(FakeCalendar::default());
            let (status, body) = send(app(calendar.clone(), None), "POST", "/bookings", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["code"], 400);
            assert_eq!(calendar.list_calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_checkout_returns_session() {
        let payments = Arc::new(FakePayments::default());
        let calendar = Arc::new(FakeCalendar::default());
        let (status, body) = send(
            app(calendar.clone(), Some(payments.clone())),
            "POST",
            "/bookings/checkout",
            Some(booking("2030-05-07T09:00:00+02:00")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let response: CheckoutResponse = serde_json::from_value(body).unwrap();
        assert!(response.session_id.starts_with("cs_test_"));
        assert!(response.url.ends_with(&response.session_id));

        let requests = payments.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, 9_900 + 3_000);
        assert_eq!(requests[0].metadata["customer_email"], "jane@example.com");
        // Payment first, calendar later
        assert!(calendar.created().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_without_payments_is_500() {
        let (status, body) = send(
            app(Arc::default(), None),
            "POST",
            "/bookings/checkout",
            Some(booking("2030-05-07T09:00:00+02:00")),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], 500);
    }

    #[tokio::test]
    async fn test_checkout_provider_failure_is_502() {
        let payments = Arc::new(FakePayments {
            fail: true,
            ..FakePayments::default()
        });
        let (status, body) = send(
            app(Arc::default(), Some(payments)),
            "POST",
            "/bookings/checkout",
            Some(booking("2030-05-07T09:00:00+02:00")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body["error"]["message"].as_str().unwrap().contains("stripe down"));
    }
}
