//! Library behavior through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use logwrap::backends::{ConsoleOptions, SharedWriter, console_with_writers};
use logwrap::{
    Args, DecorateOptions, FixedClock, Level, Logger, Recorder, StatProvider, WrapError, args,
    decorate, decorate_value,
};
use parking_lot::Mutex;
use serde_json::{Value, json};

#[test]
fn partial_logger_gets_every_level() {
    let recorder = Recorder::with_levels(&[Level::Info, Level::Silly]);
    let log = decorate(recorder.logger(), DecorateOptions::new()).unwrap();
    log.set_level("silly").unwrap();

    log.error("e");
    log.warn("w");
    log.info("i");
    log.verbose("v");
    log.debug("d");
    log.silly("s");

    let methods: Vec<_> = recorder.calls().into_iter().map(|c| c.method).collect();
    assert_eq!(methods, vec!["info", "info", "info", "info", "info", "silly"]);
}

#[test]
fn threshold_controls_emission() {
    let recorder = Recorder::new();
    let log = decorate(recorder.logger(), DecorateOptions::new()).unwrap();

    assert!(log.info("shown"));
    assert!(!log.verbose("hidden"));
    log.set_level("error").unwrap();
    assert!(!log.warn("hidden"));
    assert!(log.error("shown"));

    assert_eq!(recorder.messages(), vec!["shown", "shown"]);
}

#[test]
fn invalid_level_assignment_is_rejected() {
    let log = decorate(Recorder::new().logger(), DecorateOptions::new()).unwrap();
    log.set_level("debug").unwrap();
    let err = log.set_level("loud").unwrap_err();
    assert!(err.to_string().contains("error,warn,info,verbose,debug,silly"));
    assert_eq!(log.level(), Level::Debug);
}

#[test]
fn tags_are_live() {
    let recorder = Recorder::new();
    let log = decorate(recorder.logger(), DecorateOptions::new().tags(["api"])).unwrap();

    log.info("one");
    log.tags().push("v2");
    log.info("two");
    log.tags().clear();
    log.info("three");

    assert_eq!(recorder.messages(), vec!["[api]one", "[api][v2]two", "three"]);
}

#[test]
fn lazy_arguments_run_only_when_emitted() {
    let recorder = Recorder::new();
    let log = decorate(recorder.logger(), DecorateOptions::new()).unwrap();
    let runs = AtomicUsize::new(0);

    log.debug(Args::lazy(|| {
        runs.fetch_add(1, Ordering::SeqCst);
        "expensive"
    }));
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    log.info(Args::lazy(|| {
        runs.fetch_add(1, Ordering::SeqCst);
        json!(["computed", 3])
    }));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.calls()[0].args, vec![json!("computed"), json!(3)]);
}

#[test]
fn level_check_vetoes_calls() {
    let recorder = Recorder::new();
    let options = DecorateOptions::new().level_check(|level, _| level != Level::Warn);
    let log = decorate(recorder.logger(), options).unwrap();

    assert!(!log.warn("vetoed"));
    assert!(log.error("kept"));
    assert_eq!(recorder.messages(), vec!["kept"]);
}

#[test]
fn timestamp_prefix_uses_injected_clock() {
    let recorder = Recorder::new();
    let clock = Arc::new(FixedClock::from_millisecond(0).unwrap());
    let options = DecorateOptions::new()
        .timestamp("%H:%M:%S")
        .tag("job")
        .clock(clock.clone());
    let log = decorate(recorder.logger(), options).unwrap();

    log.info("start");
    clock.advance(jiff::SignedDuration::from_secs(61));
    log.info(args!["done", 2]);

    let calls = recorder.calls();
    assert_eq!(calls[0].args, vec![json!("[00:00:00][job]start")]);
    assert_eq!(calls[1].args, vec![json!("[00:01:01][job]done"), json!(2)]);
}

#[test]
fn stat_defaults_to_noops_that_run_callbacks() {
    let counted = Arc::new(AtomicUsize::new(0));
    let c = counted.clone();
    let provider = StatProvider::new().with("increment", move |_, _, _| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    let log = decorate(Recorder::new().logger(), DecorateOptions::new().stat(provider)).unwrap();

    log.stat().increment("hits", None, None);
    assert_eq!(counted.load(Ordering::SeqCst), 1);

    let called = Arc::new(AtomicUsize::new(0));
    let c = called.clone();
    log.stat().gauge(
        "queue",
        Some(json!(4)),
        Some(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        })),
    );
    assert_eq!(called.load(Ordering::SeqCst), 1);
}

#[test]
fn invalid_targets_are_rejected() {
    for value in [Value::Null, json!(42), json!("logger"), json!(true), json!([1])] {
        let err = decorate(value, DecorateOptions::new()).unwrap_err();
        assert!(matches!(err, WrapError::InvalidArgument(_)), "{err:?}");
    }
    let err = decorate(json!({"info": "not callable"}), DecorateOptions::new()).unwrap_err();
    assert!(matches!(err, WrapError::NoValidLevels));
}

#[test]
fn invalid_options_documents_are_rejected() {
    let recorder = Recorder::new();
    let err = decorate_value(recorder.logger(), &json!({"stat": {"gauge": "x"}})).unwrap_err();
    assert!(err.to_string().contains("options.stat.gauge"));
    let err = decorate_value(recorder.logger(), &json!("tags")).unwrap_err();
    assert!(matches!(err, WrapError::InvalidArgument(_)));
    assert!(decorate_value(recorder.logger(), &Value::Null).is_ok());

    let log = decorate_value(recorder.logger(), &json!({"stat": []})).unwrap();
    log.stat().timing("t", Some(json!(5)), None);
    assert!(decorate_value(recorder.logger(), &json!(["tags"])).is_ok());
}

#[test]
fn redecorating_returns_the_same_logger() {
    let recorder = Recorder::new();
    let log = decorate(recorder.logger(), DecorateOptions::new()).unwrap();
    let again = decorate(log.clone(), DecorateOptions::new()).unwrap();

    assert!(again.ptr_eq(&log));
    assert_eq!(recorder.messages(), vec!["Attempted to re-wrap log object!"]);
}

#[test]
fn level_writes_through_to_underlying() {
    let recorder = Recorder::new().with_level_member("warn");
    let log = decorate(recorder.logger(), DecorateOptions::new()).unwrap();
    assert_eq!(log.level(), Level::Warn);

    log.set_level_to(Level::Silly);
    assert_eq!(recorder.logger().level(), Some(Level::Silly));
}

#[test]
fn callable_logger_is_forwarded() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    let logger = Logger::callable(move |_, args| s.lock().push(args));
    let log = decorate(logger, DecorateOptions::new().tag("t")).unwrap();

    log.warn("via level");
    assert!(log.call(vec![json!("direct")]));

    assert_eq!(
        *seen.lock(),
        vec![vec![json!("[t]via level")], vec![json!("direct")]]
    );
}

#[test]
fn console_backend_end_to_end() {
    let out = Arc::new(Mutex::new(Vec::<u8>::new()));
    let err = Arc::new(Mutex::new(Vec::<u8>::new()));
    let logger = console_with_writers(
        &ConsoleOptions::default(),
        out.clone() as SharedWriter,
        err.clone() as SharedWriter,
    );
    let log = decorate(logger, DecorateOptions::new().tag("svc")).unwrap();
    log.set_level_to(Level::Debug);

    log.info("ready");
    log.debug(args!["state", json!({"open": true})]);

    assert_eq!(String::from_utf8_lossy(&out.lock()), "   INFO: [svc]ready\n");
    assert_eq!(
        String::from_utf8_lossy(&err.lock()),
        "  DEBUG: [svc]state {\"open\":true}\n"
    );
}
