use std::fs;

use handlerkit::error::DiscoveryError;
use handlerkit::handlers;
use handlerkit::registry::discover;

#[test]
fn test_missing_directory_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir");

    let err = discover(&missing, &handlers::registry().unwrap()).unwrap_err();

    assert!(matches!(err, DiscoveryError::NotFound(path) if path == missing));
}

#[test]
fn test_file_is_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("status_handler.json");
    fs::write(&file, "{}").unwrap();

    let err = discover(&file, &handlers::registry().unwrap()).unwrap_err();

    assert!(matches!(err, DiscoveryError::NotADirectory(_)));
}

#[test]
fn test_discovers_registered_handlers_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sum_handler.json"), "{}").unwrap();
    fs::write(dir.path().join("status_handler.json"), "").unwrap();
    fs::write(dir.path().join("mod.rs"), "").unwrap();
    fs::write(dir.path().join("index_handler.json"), "{}").unwrap();
    fs::write(dir.path().join("unknown_handler.json"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a handler").unwrap();

    let descriptors = discover(dir.path(), &handlers::registry().unwrap()).unwrap();

    let found: Vec<_> = descriptors
        .iter()
        .map(|d| (d.name.as_str(), d.route.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![("status", "/example.json"), ("sum", "/sum.json")]
    );
}

#[test]
fn test_non_json_entries_use_registered_route() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("status_handler.rs"), "// not parsed").unwrap();
    fs::create_dir(dir.path().join("sum_handler")).unwrap();

    let descriptors = discover(dir.path(), &handlers::registry().unwrap()).unwrap();

    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].route, "/example.json");
    assert_eq!(descriptors[1].route, "/sum.json");
}

#[test]
fn test_manifest_overrides_route() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sum_handler.json"),
        r#"{ "route": "/v2/sum.json" }"#,
    )
    .unwrap();

    let descriptors = discover(dir.path(), &handlers::registry().unwrap()).unwrap();

    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].name, "sum");
    assert_eq!(descriptors[0].route, "/v2/sum.json");
}

#[test]
fn test_invalid_manifest() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sum_handler.json"), "{ route: ").unwrap();

    let err = discover(dir.path(), &handlers::registry().unwrap()).unwrap_err();

    assert!(matches!(err, DiscoveryError::InvalidManifest { .. }));
}

#[test]
fn test_manifest_route_must_be_absolute() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sum_handler.json"),
        r#"{ "route": "sum.json" }"#,
    )
    .unwrap();

    let err = discover(dir.path(), &handlers::registry().unwrap()).unwrap_err();

    assert!(matches!(
        err,
        DiscoveryError::InvalidRoute { name, route, .. } if name == "sum" && route == "sum.json"
    ));
}

#[test]
fn test_manifest_route_with_legacy_capture_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sum_handler.json"),
        r#"{ "route": "/sum/:id" }"#,
    )
    .unwrap();

    let err = discover(dir.path(), &handlers::registry().unwrap()).unwrap_err();

    assert!(matches!(
        err,
        DiscoveryError::InvalidRoute { route, .. } if route == "/sum/:id"
    ));
}

#[test]
fn test_empty_directory_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();

    let descriptors = discover(dir.path(), &handlers::registry().unwrap()).unwrap();

    assert!(descriptors.is_empty());
}
