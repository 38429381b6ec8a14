//! Call-location prefixes from a real captured stack.

use logwrap::{DecorateOptions, Recorder, decorate};

fn root() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/").to_string()
}

#[test]
fn location_points_at_the_calling_test() {
    let recorder = Recorder::new();
    let options = DecorateOptions::new()
        .call_location(true)
        .project_root(root())
        .tag("loc");
    let log = decorate(recorder.logger(), options).unwrap();

    log.info("here");

    let message = recorder.messages().remove(0);
    assert!(
        message.starts_with("[tests/integration/call_location.rs:"),
        "unexpected location prefix: {message}"
    );
    assert!(message.ends_with("][loc]here"), "{message}");
}

#[test]
fn custom_prefix_is_stripped() {
    let recorder = Recorder::new();
    let prefix = format!("{}tests/", root());
    let log = decorate(recorder.logger(), DecorateOptions::new().call_location(prefix)).unwrap();

    log.warn("careful");

    let message = recorder.messages().remove(0);
    assert!(message.starts_with("[integration/call_location.rs:"), "{message}");
}
