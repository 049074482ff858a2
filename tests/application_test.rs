mod common;

use city_info::core::points_of_interest::DELETED_SUBJECT;
use city_info::core::{Mapper, MappingConfig};
use city_info::{Application, InMemoryCityStore, Request};
use common::{store, RecordingNotifier};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn app() -> (Application<InMemoryCityStore>, Arc<InMemoryCityStore>, Arc<RecordingNotifier>) {
    let store = store();
    let notifier = Arc::new(RecordingNotifier::new());
    let app = Application::new(store.clone(), notifier.clone(), Mapper::default());
    (app, store, notifier)
}

fn patch(city_id: i32, id: i32, body: serde_json::Value) -> Request {
    Request::PatchPointOfInterest {
        city_id,
        id,
        body: body.to_string(),
    }
}

#[test]
fn test_create_returns_created_with_location() {
    let (app, _, _) = app();
    let reply = app.handle(&Request::CreatePointOfInterest {
        city_id: 1,
        body: json!({ "name": "Museum", "description": "Paintings." }).to_string(),
    });

    assert_eq!(reply.status, 201);
    assert_eq!(reply.location.as_deref(), Some("/api/cities/1/pointsofinterest/7"));
    assert_eq!(reply.body, json!({ "id": 7, "name": "Museum", "description": "Paintings." }));
}

#[test]
fn test_create_in_missing_city_is_not_found() {
    let (app, store, _) = app();
    let reply = app.handle(&Request::CreatePointOfInterest {
        city_id: 999,
        body: json!({ "name": "Museum", "description": "Paintings." }).to_string(),
    });
    assert_eq!(reply.status, 404);
    assert_eq!(store.point_count().unwrap(), 6);
}

#[test]
fn test_create_validation_errors_are_bad_request() {
    let (app, _, _) = app();
    let reply = app.handle(&Request::CreatePointOfInterest {
        city_id: 1,
        body: json!({ "description": "d".repeat(201) }).to_string(),
    });

    assert_eq!(reply.status, 400);
    assert_eq!(reply.body["errors"]["name"][0], "You should provide a name value.");
    assert_eq!(
        reply.body["errors"]["description"][0],
        "The field description must be a string with a maximum length of 200."
    );
}

#[test]
fn test_empty_or_malformed_body_is_bad_request() {
    let (app, _, _) = app();
    let empty = app.handle(&Request::UpdatePointOfInterest {
        city_id: 1,
        id: 5,
        body: String::new(),
    });
    assert_eq!(empty.status, 400);

    let malformed = app.handle(&patch(1, 5, json!({ "op": "replace" })));
    assert_eq!(malformed.status, 400);
    assert!(malformed.body["errors"]["body"].is_array());
}

#[test]
fn test_patch_updates_only_named_fields() {
    let (app, _, _) = app();
    let reply = app.handle(&patch(
        1,
        5,
        json!([{ "op": "replace", "path": "/description", "value": "A quiet green space." }]),
    ));
    assert_eq!(reply.status, 204);

    let point = app.handle(&Request::PointOfInterest { city_id: 1, id: 5 });
    assert_eq!(
        point.body,
        json!({ "id": 5, "name": "Park", "description": "A quiet green space." })
    );
}

#[test]
fn test_patch_is_validated_after_merge() {
    let (app, _, _) = app();

    // Point 5 starts as {Park, Park}; renaming only the name fixes the rule.
    let renamed = app.handle(&patch(1, 5, json!([{ "op": "replace", "path": "/name", "value": "Park2" }])));
    assert_eq!(renamed.status, 204);

    let clash = app.handle(&patch(
        1,
        5,
        json!([{ "op": "replace", "path": "/description", "value": "Park2" }]),
    ));
    assert_eq!(clash.status, 400);
    assert_eq!(
        clash.body["errors"]["title"][0],
        "The provided description should be different from the name."
    );

    let removed = app.handle(&patch(1, 5, json!([{ "op": "remove", "path": "/name" }])));
    assert_eq!(removed.status, 400);
    assert!(removed.body["errors"]["name"].is_array());
}

#[test]
fn test_patch_with_unknown_path_is_bad_request() {
    let (app, _, _) = app();
    let reply = app.handle(&patch(1, 5, json!([{ "op": "replace", "path": "/id", "value": 9 }])));
    assert_eq!(reply.status, 400);
    assert!(reply.body["errors"]["patch"].is_array());
}

#[test]
fn test_patch_of_missing_point_is_not_found() {
    let (app, _, _) = app();
    let body = json!([{ "op": "replace", "path": "/name", "value": "X" }]);
    assert_eq!(app.handle(&patch(1, 42, body.clone())).status, 404);
    assert_eq!(app.handle(&patch(999, 5, body)).status, 404);
}

#[test]
fn test_delete_flow() {
    let (app, _, notifier) = app();
    let reply = app.handle(&Request::DeletePointOfInterest { city_id: 1, id: 5 });
    assert_eq!(reply.status, 204);
    assert_eq!(reply.body, serde_json::Value::Null);
    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(notifier.sent()[0].0, DELETED_SUBJECT);

    let again = app.handle(&Request::DeletePointOfInterest { city_id: 1, id: 5 });
    assert_eq!(again.status, 404);
    assert_eq!(notifier.sent().len(), 1);
}

#[test]
fn test_persistence_failure_is_server_error() {
    let (app, store, notifier) = app();
    store.reject_saves(true);
    let reply = app.handle(&Request::DeletePointOfInterest { city_id: 1, id: 5 });
    assert_eq!(reply.status, 500);
    assert!(notifier.sent().is_empty());
}

#[test]
fn test_status_and_version() {
    let (app, store, _) = app();
    let status = app.handle(&Request::Status);
    assert_eq!(status.status, 200);
    assert_eq!(status.body, json!("Health Check OK"));

    store.set_healthy(false);
    let status = app.handle(&Request::Status);
    assert_eq!(status.status, 500);
    assert_eq!(status.body, json!("Unknown Error"));

    let version = app.handle(&Request::Version);
    assert_eq!(version.body, json!(format!("Version: {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_mapping_config_trims_client_text() {
    let store = store();
    let notifier = Arc::new(RecordingNotifier::new());
    let app = Application::new(
        store,
        notifier,
        Mapper::new(MappingConfig {
            trim_whitespace: true,
        }),
    );
    let reply = app.handle(&Request::CreatePointOfInterest {
        city_id: 2,
        body: json!({ "name": "  Museum  ", "description": "Paintings." }).to_string(),
    });
    assert_eq!(reply.body["name"], "Museum");
}

#[tokio::test]
async fn test_async_requests_follow_blocking_semantics() {
    let (app, _, notifier) = app();
    let cancel = CancellationToken::new();

    let cities = app.handle_async(&Request::Cities, &cancel).await;
    assert_eq!(cities.status, 200);
    assert_eq!(cities.body[0]["name"], "Shelbyville");

    let city = app
        .handle_async(
            &Request::City {
                id: 1,
                include_points_of_interest: true,
            },
            &cancel,
        )
        .await;
    assert_eq!(city.body["numberOfPointsOfInterest"], 5);

    let patched = app
        .handle_async(
            &patch(1, 5, json!([{ "op": "replace", "path": "/name", "value": "Park2" }])),
            &cancel,
        )
        .await;
    assert_eq!(patched.status, 204);

    let deleted = app
        .handle_async(&Request::DeletePointOfInterest { city_id: 1, id: 5 }, &cancel)
        .await;
    assert_eq!(deleted.status, 204);
    assert!(notifier.sent()[0].1.contains("Park2"));
}

#[tokio::test]
async fn test_cancelled_request_changes_nothing() {
    let (app, store, notifier) = app();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let reply = app
        .handle_async(&Request::DeletePointOfInterest { city_id: 1, id: 5 }, &cancel)
        .await;
    assert_eq!(reply.status, 500);
    assert_eq!(store.point_count().unwrap(), 6);
    assert!(notifier.sent().is_empty());
}

#[test]
fn test_patch_result_matches_field_by_field_merge() {
    let (app, _, _) = app();
    let reply = app.handle(&patch(
        1,
        4,
        json!([
            { "op": "replace", "path": "/name", "value": "Stadium North" },
            { "op": "replace", "path": "/Name", "value": "Stadium East" },
            { "op": "add", "path": "/description", "value": "Renovated." },
            { "op": "test", "path": "/name", "value": "Stadium East" }
        ]),
    ));
    assert_eq!(reply.status, 204);

    let point = app.handle(&Request::PointOfInterest { city_id: 1, id: 4 });
    assert_eq!(
        point.body,
        json!({ "id": 4, "name": "Stadium East", "description": "Renovated." })
    );
}
