//! End-to-end API flows driven through the full router

mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::spawn().await;
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn api_requires_a_valid_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app.request("GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["code"].as_u64().is_some());

    let (status, _) = app.get("/api/orders", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn delivering_a_full_order_charges_the_wallet() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (customer_id, address_id) = app.customer(&admin, "amal", None).await;
    app.driver(&admin, "sami").await;
    let driver = app.token("sami", "sami-pw").await;
    let customer = app.token("amal", "amal-pw").await;

    let order = app.order(&customer, address_id, 3).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_price"], 60.0);
    assert_eq!(order["customer_id"], customer_id);
    let order_id = order["id"].as_i64().unwrap();

    let bottles = app.bottles(&admin, 3).await;
    let (status, outcome) = app
        .post(
            "/api/bottles/add-bottles-to-order",
            &driver,
            json!({ "order_id": order_id, "bottle_ids": bottles }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    assert_eq!(outcome["order_status"], "delivered");
    assert_eq!(outcome["bottle_count"], 3);

    let login = app.login("amal", "amal-pw").await;
    assert_eq!(login["wallet"], -60.0);
    assert_eq!(login["user_id"], customer_id);

    let (status, payments) = app.get("/api/payments", &customer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments.as_array().unwrap().len(), 1);
    assert_eq!(payments[0]["amount"], -60.0);

    let (status, detail) = app.get(&format!("/api/orders/{order_id}"), &customer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["address_title"], "Home");
    assert_eq!(detail["bottles"].as_array().unwrap().len(), 3);

    // Full order refuses more bottles
    let extra = app.bottles(&admin, 1).await;
    let (status, body) = app
        .post(
            "/api/bottles/add-bottles-to-order",
            &driver,
            json!({ "order_id": order_id, "bottle_ids": extra }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn partial_batch_reports_the_refused_bottle() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, address_id) = app.customer(&admin, "amal", None).await;
    let customer = app.token("amal", "amal-pw").await;

    let first = app.order(&customer, address_id, 1).await["id"].as_i64().unwrap();
    let second = app.order(&customer, address_id, 2).await["id"].as_i64().unwrap();
    let bottles = app.bottles(&admin, 2).await;

    let (status, _) = app
        .post(
            "/api/bottles/add-bottles-to-order",
            &admin,
            json!({ "order_id": first, "bottle_ids": [bottles[1]] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, outcome) = app
        .post(
            "/api/bottles/add-bottles-to-order",
            &admin,
            json!({ "order_id": second, "bottle_ids": [bottles[0], bottles[1]] }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(outcome["attached"], json!([bottles[0]]));
    assert_eq!(outcome["rejected"]["bottle_id"], bottles[1]);
    assert_eq!(outcome["rejected"]["code"], 6002);
    assert_eq!(outcome["order_status"], "pending");

    let (_, bottle) = app.get(&format!("/api/bottles/{}", bottles[0]), &customer).await;
    assert_eq!(bottle["status"], "sold");
    assert!(bottle["qr_code"].as_str().is_some_and(|c| !c.is_empty()));
}

#[tokio::test]
async fn return_requires_every_bottle_on_loan() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, address_id) = app.customer(&admin, "amal", None).await;
    let customer = app.token("amal", "amal-pw").await;
    let order_id = app.order(&customer, address_id, 1).await["id"].as_i64().unwrap();
    let bottles = app.bottles(&admin, 2).await;

    app.post(
        "/api/bottles/add-bottles-to-order",
        &admin,
        json!({ "order_id": order_id, "bottle_ids": [bottles[0]] }),
    )
    .await;

    let (status, body) = app
        .post("/api/bottles/return-bottles", &admin, json!({ "bottle_ids": bottles }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6004);
    let (_, bottle) = app.get(&format!("/api/bottles/{}", bottles[0]), &admin).await;
    assert_eq!(bottle["status"], "sold");

    let (status, body) = app
        .post("/api/bottles/return-bottles", &admin, json!({ "bottle_ids": [bottles[0]] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bottles"][0]["status"], "available");
    assert_eq!(body["bottles"][0]["reuse_count"], 1);
}

#[tokio::test]
async fn special_price_and_payments_flow_into_wallet() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (customer_id, address_id) = app.customer(&admin, "noor", Some(15.0)).await;
    let customer = app.token("noor", "noor-pw").await;

    let order = app.order(&customer, address_id, 4).await;
    assert_eq!(order["total_price"], 60.0);

    let (status, payment) = app
        .post("/api/payments", &admin, json!({ "customer_id": customer_id, "amount": 100.0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(payment["receiver_id"].as_i64().is_some());

    let (status, changed) = app
        .request(
            "PATCH",
            "/api/orders/change-status",
            Some(&admin),
            Some(json!({ "order_id": order["id"], "status": "D" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(changed["status"], "delivered");
    assert_eq!(changed["total_price"], 60.0);

    assert_eq!(app.login("noor", "noor-pw").await["wallet"], 40.0);

    let (_, profile) = app.get(&format!("/api/users/{customer_id}"), &customer).await;
    assert_eq!(profile["wallet_balance"], 40.0);
    assert_eq!(profile["service_type"], "Customer");
    assert!(profile["last_order_date"].as_i64().is_some());

    let (status, body) = app
        .request(
            "PATCH",
            "/api/orders/change-status",
            Some(&admin),
            Some(json!({ "order_id": order["id"], "status": "shipped" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn out_of_range_prices_and_quantities_are_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (customer_id, address_id) = app.customer(&admin, "huda", None).await;
    let customer = app.token("huda", "huda-pw").await;

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/users/{customer_id}"),
            Some(&admin),
            Some(json!({ "special_bottle_price": 1e12 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);

    let (status, body) = app
        .post(
            "/api/orders",
            &customer,
            json!({ "address_id": address_id, "quantity": 100_000_000_000_000_000_i64 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4005);

    let (_, orders) = app.get("/api/orders", &customer).await;
    assert_eq!(orders.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn roles_gate_the_routes() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (customer_id, _) = app.customer(&admin, "amal", None).await;
    let (other_id, other_address) = app.customer(&admin, "rami", None).await;
    app.driver(&admin, "sami").await;
    let customer = app.token("amal", "amal-pw").await;
    let driver = app.token("sami", "sami-pw").await;

    let (status, _) = app.get("/api/users", &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.get("/api/customers", &driver).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    let (status, body) = app.get("/api/employees", &driver).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Bottle registration is admin-only
    let (status, body) = app.post("/api/bottles", &driver, json!({ "count": 1 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    // Drivers cannot create staff accounts
    let (status, _) = app
        .post(
            "/api/users",
            &driver,
            json!({ "username": "x", "email": "x@example.com", "role": "admin", "password": "pw" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Customers see only their own resources
    let (status, _) = app.get(&format!("/api/users/{other_id}"), &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/api/address/{other_address}"), &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/api/orders/customer/{other_id}"), &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.get(&format!("/api/orders/customer/{customer_id}"), &customer).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app
        .request(
            "PATCH",
            "/api/orders/change-status",
            Some(&customer),
            Some(json!({ "order_id": 1, "status": "delivered" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/dashboard/stats", &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_changes_apply_to_existing_tokens() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let driver_id = app.driver(&admin, "sami").await;
    let driver = app.token("sami", "sami-pw").await;

    let (status, _) = app.get("/api/users", &driver).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/users/{driver_id}"),
            Some(&admin),
            Some(json!({ "role": "customer" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "customer");

    // Same token, current role
    let (status, _) = app.get("/api/users", &driver).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app
        .post("/api/bottles/return-bottles", &driver, json!({ "bottle_ids": [1] }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(driver_id)
        .execute(&app.state.pool)
        .await
        .unwrap();
    let (status, body) = app.get(&format!("/api/users/{driver_id}"), &driver).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn profile_and_password_changes() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (customer_id, _) = app.customer(&admin, "amal", None).await;
    let customer = app.token("amal", "amal-pw").await;

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/users/{customer_id}"),
            Some(&customer),
            Some(json!({ "special_bottle_price": 1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/users/{customer_id}"),
            Some(&customer),
            Some(json!({ "phone_number": "555-0111" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone_number"], "555-0111");

    let (status, body) = app
        .request(
            "PUT",
            "/api/users/change-password",
            Some(&customer),
            Some(json!({ "old_password": "nope", "new_password": "n", "confirm_password": "n" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1005);

    let (status, _) = app
        .request(
            "PUT",
            "/api/users/change-password",
            Some(&customer),
            Some(json!({ "old_password": "amal-pw", "new_password": "fresh", "confirm_password": "fresh" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app.login("amal", "fresh").await;
}

#[tokio::test]
async fn addresses_belong_to_customers() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (customer_id, _) = app.customer(&admin, "amal", None).await;
    let customer = app.token("amal", "amal-pw").await;

    let (status, created) = app.post("/api/address", &customer, json!({ "title": "Office" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"], customer_id);

    let (_, own) = app.get("/api/address", &customer).await;
    assert_eq!(own.as_array().unwrap().len(), 2);

    let (status, body) = app.post("/api/address", &admin, json!({ "title": "HQ" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3004);

    let (status, updated) = app
        .request(
            "PUT",
            &format!("/api/address/{}", created["id"]),
            Some(&customer),
            Some(json!({ "title": "Studio" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Studio");
}

#[tokio::test]
async fn dashboard_aggregates_activity() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (customer_id, address_id) = app.customer(&admin, "amal", None).await;
    let customer = app.token("amal", "amal-pw").await;
    let order_id = app.order(&customer, address_id, 2).await["id"].as_i64().unwrap();
    let bottles = app.bottles(&admin, 3).await;
    app.post(
        "/api/bottles/add-bottles-to-order",
        &admin,
        json!({ "order_id": order_id, "bottle_ids": [bottles[0], bottles[1]] }),
    )
    .await;

    let (status, stats) = app.get("/api/dashboard/stats", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_orders"], 1);
    assert_eq!(stats["avg_bottles_per_order"], 2);
    assert_eq!(stats["total_payments"], 1);
    assert_eq!(stats["bottles"]["total"], 3);
    assert_eq!(stats["bottles"]["sold"], 2);
    assert_eq!(stats["bottles"]["available"], 1);
    assert_eq!(stats["top_customers"][0]["customer_id"], customer_id);
}
