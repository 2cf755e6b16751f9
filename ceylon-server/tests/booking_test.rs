mod common;

use common::{TestApp, date_in, get, json};
use http::StatusCode;
use serde_json::json;

async fn create_tour(app: &TestApp, admin: &str) -> i64 {
    let resp = app
        .send(json(
            "POST",
            "/api/tour-packages",
            Some(admin),
            json!({
                "title": "Cultural Triangle",
                "category": "Heritage",
                "location": "Dambulla",
                "price": 149.99,
                "duration": 4
            }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.json());
    resp.json()["id"].as_i64().unwrap()
}

async fn create_transport(app: &TestApp, admin: &str, seats: u32, available: bool) -> i64 {
    let resp = app
        .send(json(
            "POST",
            "/api/transports",
            Some(admin),
            json!({
                "vehicle": "Toyota KDH",
                "vehicleType": "Van",
                "seats": seats,
                "pricePer1km": 0.8,
                "available": available,
                "provider": { "name": "Lanka Tours", "rating": 4.5 }
            }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.json());
    resp.json()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_tour_booking_flow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let tour_id = create_tour(&app, &admin).await;
    let (alice_id, alice) = app.customer("alice@example.lk").await;
    let (_, bob) = app.customer("bob@example.lk").await;

    let resp = app
        .send(json(
            "POST",
            "/api/tour-packages/bookings",
            Some(&alice),
            json!({ "tourPackageId": tour_id, "travelDate": date_in(30), "guests": 3 }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.json());
    let booking = resp.json();
    assert_eq!(booking["userId"], alice_id);
    assert_eq!(booking["tourTitle"], "Cultural Triangle");
    assert_eq!(booking["totalPrice"], 449.97);
    assert_eq!(booking["status"], "Confirmed");

    let mine = app
        .send(get("/api/tour-packages/bookings", Some(&alice)))
        .await;
    assert_eq!(mine.json().as_array().unwrap().len(), 1);

    let bobs = app.send(get("/api/tour-packages/bookings", Some(&bob))).await;
    assert_eq!(bobs.json(), json!([]));

    let all = app
        .send(get("/api/tour-packages/bookings", Some(&admin)))
        .await;
    assert_eq!(all.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tour_booking_rejections() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let tour_id = create_tour(&app, &admin).await;
    let (_, token) = app.customer("alice@example.lk").await;

    let body = json!({ "tourPackageId": tour_id, "travelDate": date_in(10), "guests": 2 });
    let resp = app
        .send(json("POST", "/api/tour-packages/bookings", None, body))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app
        .send(json(
            "POST",
            "/api/tour-packages/bookings",
            Some(&token),
            json!({ "tourPackageId": tour_id, "travelDate": date_in(-1), "guests": 2 }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["code"], 4004);

    let resp = app
        .send(json(
            "POST",
            "/api/tour-packages/bookings",
            Some(&token),
            json!({ "tourPackageId": tour_id, "travelDate": date_in(10), "guests": 0 }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["details"]["guests"], "Guests must be between 1 and 50");

    let resp = app
        .send(json(
            "POST",
            "/api/tour-packages/bookings",
            Some(&token),
            json!({ "tourPackageId": 9999, "travelDate": date_in(10), "guests": 2 }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app
        .send(json(
            "POST",
            "/api/tour-packages/bookings",
            Some(&token),
            json!({ "tourPackageId": tour_id, "travelDate": "next tuesday", "guests": 2 }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transport_booking_rules() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let van = create_transport(&app, &admin, 6, true).await;
    let parked = create_transport(&app, &admin, 6, false).await;
    let (_, token) = app.customer("alice@example.lk").await;

    let request = |transport_id: i64, passengers: u32| {
        json!({
            "transportId": transport_id,
            "pickupLocation": "  Colombo Airport ",
            "dropoffLocation": "Kandy",
            "pickupDate": date_in(5),
            "passengers": passengers,
            "distanceKm": 120.0
        })
    };

    let resp = app
        .send(json("POST", "/api/transports/book", Some(&token), request(van, 4)))
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.json());
    let booking = resp.json();
    assert_eq!(booking["totalPrice"], 96.0);
    assert_eq!(booking["pickupLocation"], "Colombo Airport");
    assert_eq!(booking["vehicle"], "Toyota KDH");

    let resp = app
        .send(json("POST", "/api/transports/book", Some(&token), request(van, 7)))
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);

    let resp = app
        .send(json("POST", "/api/transports/book", Some(&token), request(parked, 1)))
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut past = request(van, 1);
    past["pickupDate"] = json!(date_in(-3));
    let resp = app
        .send(json("POST", "/api/transports/book", Some(&token), past))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let mine = app.send(get("/api/transports/bookings", Some(&token))).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.json().as_array().unwrap().len(), 1);
    assert!(mine.json()[0]["totalPrice"].is_number());

    let anonymous = app.send(get("/api/transports/bookings", None)).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_transport_listing_defaults() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let resp = app
        .send(json(
            "POST",
            "/api/transports",
            Some(&admin),
            json!({
                "vehicle": "Tuk-tuk",
                "seats": 2,
                "pricePer1km": 0.5,
                "providerName": "Ravi",
                "providerVerified": "true"
            }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.json());
    let transport = resp.json();
    assert_eq!(transport["available"], true);
    assert_eq!(transport["provider"]["name"], "Ravi");
    assert_eq!(transport["provider"]["verified"], true);

    let resp = app
        .send(json(
            "POST",
            "/api/transports",
            Some(&admin),
            json!({ "vehicle": "Bus", "seats": 0, "pricePer1km": 1.0 }),
        ))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transport_booking_input_bounds() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let van = create_transport(&app, &admin, 6, true).await;
    let (_, token) = app.customer("alice@example.lk").await;

    let base = json!({
        "transportId": van,
        "pickupLocation": "Galle",
        "dropoffLocation": "Mirissa",
        "pickupDate": date_in(2),
        "passengers": 2,
        "distanceKm": 35.0
    });

    let mut blank = base.clone();
    blank["pickupLocation"] = json!("   ");
    blank["dropoffLocation"] = json!("  ");
    let resp = app
        .send(json("POST", "/api/transports/book", Some(&token), blank))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let body = resp.json();
    assert_eq!(body["details"]["pickup_location"], "Pickup location is required");
    assert_eq!(body["details"]["dropoff_location"], "Drop-off location is required");

    let mut far = base.clone();
    far["distanceKm"] = json!(1e308);
    let resp = app
        .send(json("POST", "/api/transports/book", Some(&token), far))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json()["details"]["distance_km"],
        "Distance must be between 0 and 5000 km"
    );

    let all = app.send(get("/api/transports/bookings", Some(&admin))).await;
    assert_eq!(all.status, StatusCode::OK);
    assert!(all.json().as_array().unwrap().is_empty());
}
