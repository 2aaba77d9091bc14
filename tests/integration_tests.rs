//! Integration tests exercising the public builder API end to end.

use http::Version;
use requisition::{
    BodySpec, BuilderConfig, Error, Request, RequestBuilder, RequestMethods, Result,
};
use std::collections::BTreeMap;
use std::time::Duration;

const TEST_URI: &str = "http://www.foo.com/";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("requisition=trace")
        .with_test_writer()
        .try_init();
}

fn builder() -> RequestBuilder {
    init_tracing();
    RequestBuilder::with_uri(TEST_URI).unwrap()
}

fn empty_body() -> BodySpec {
    BodySpec::from_string("")
}

fn map(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(name, values)| {
            (
                name.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn test_new_builder_without_uri_fails_to_build() {
    init_tracing();
    match RequestBuilder::new().build() {
        Err(Error::InvalidState(_)) => {}
        other => panic!("Expected InvalidState, got {:?}", other),
    }
}

#[test]
fn test_builder_factories_validate_uri() {
    init_tracing();
    assert!(RequestBuilder::with_uri(None::<&str>)
        .unwrap_err()
        .is_null_argument());

    for uri in [
        "badScheme://www.foo.com/",
        "http://www.foo.com:-1/",
        "https://www.foo.com:-1/",
        "www.foo.com/relative",
    ] {
        let err = Request::builder_for(uri).unwrap_err();
        assert!(err.is_invalid_argument(), "{}: {:?}", uri, err);
    }

    assert!(Request::builder_for(TEST_URI).unwrap().build().is_ok());
    assert!(Request::builder().build().unwrap_err().is_invalid_state());
}

#[test]
fn test_uri_accepts_http_and_https_ports() {
    let mut b = builder();
    for uri in [
        "http://www.foo.com/",
        "https://www.foo.com/",
        "http://www.foo.com:8080/",
        "https://www.foo.com:65535/path?q=1",
    ] {
        b.uri(uri).unwrap();
        assert_eq!(b.build().unwrap().uri().as_str(), uri);
    }

    let parsed = url::Url::parse("https://www.foo.com:8443/").unwrap();
    b.uri(&parsed).unwrap();
    assert_eq!(b.build().unwrap().uri(), &parsed);
}

#[test]
fn test_uri_rejections() {
    let mut b = builder();
    assert!(b.uri(None::<String>).unwrap_err().is_null_argument());
    for uri in [
        "http://www.foo.com:-1/",
        "https://www.foo.com:-1/",
        "http://www.foo.com:70000/",
        "ftp://www.foo.com/",
        "/just/a/path",
    ] {
        assert!(b.uri(uri).unwrap_err().is_invalid_argument(), "{}", uri);
    }
}

#[test]
fn test_header_null_and_syntax_errors() {
    let mut b = builder();

    assert!(b.header(None, "bar").unwrap_err().is_null_argument());
    assert!(b.header("foo", None).unwrap_err().is_null_argument());
    assert!(b.header(None, None).unwrap_err().is_null_argument());
    assert!(b.header("", "bar").unwrap_err().is_invalid_argument());
    assert!(b.header("foo", "\r").unwrap_err().is_invalid_argument());
    assert!(b.header("foo", "\n").unwrap_err().is_invalid_argument());

    assert!(b.set_header(None, "bar").unwrap_err().is_null_argument());
    assert!(b.set_header("foo", None).unwrap_err().is_null_argument());
    assert!(b.set_header(None, None).unwrap_err().is_null_argument());
    assert!(b.set_header("", "bar").unwrap_err().is_invalid_argument());
    assert!(b.set_header("foo", "a\r\nb").unwrap_err().is_invalid_argument());

    assert!(b.build().unwrap().headers().is_empty());
}

#[test]
fn test_header_appends_and_set_header_replaces() {
    let mut b = builder();
    b.header("X-Foo", "1").unwrap().header("X-Foo", "2").unwrap();
    assert_eq!(
        b.build().unwrap().headers().to_map(),
        map(&[("X-Foo", &["1", "2"][..])])
    );

    b.set_header("X-Foo", "9").unwrap();
    assert_eq!(
        b.build().unwrap().headers().to_map(),
        map(&[("X-Foo", &["9"][..])])
    );
}

#[test]
fn test_requests_equal_regardless_of_header_name_casing() {
    let mut lower = builder();
    lower.header("x-foo", "1").unwrap();
    let mut mixed = builder();
    mixed.header("X-Foo", "1").unwrap();

    let lower = lower.build().unwrap();
    let mixed = mixed.build().unwrap();
    assert_eq!(lower.headers(), mixed.headers());
    assert_eq!(lower, mixed);
    assert_eq!(mixed.headers().to_map(), map(&[("X-Foo", &["1"][..])]));
}

#[test]
fn test_headers_pair_batch_errors() {
    let mut b = builder();

    assert!(b.headers(None::<[&str; 2]>).unwrap_err().is_null_argument());
    assert!(b.headers([""; 0]).unwrap_err().is_invalid_argument());
    assert!(b.headers([None, Some("bar")]).unwrap_err().is_null_argument());
    assert!(b.headers([Some("foo"), None]).unwrap_err().is_null_argument());
    assert!(b.headers([None::<&str>, None]).unwrap_err().is_null_argument());

    // Odd length with a trailing missing element may fail either way.
    let err = b.headers([Some("foo"), Some("bar"), None]).unwrap_err();
    assert!(err.is_null_argument() || err.is_invalid_argument());

    for pairs in [
        [Some("foo"), Some("bar"), None, None],
        [Some("foo"), Some("bar"), Some("baz"), None],
        [Some("foo"), Some("bar"), None, Some("baz")],
    ] {
        assert!(b.headers(pairs).unwrap_err().is_null_argument());
    }
    assert!(b.headers(["foo", "bar", "\r", "baz"]).unwrap_err().is_invalid_argument());
    assert!(b.headers(["foo", "bar", "baz", "\n"]).unwrap_err().is_invalid_argument());
    assert!(b.headers(["foo", "bar", "", "baz"]).unwrap_err().is_invalid_argument());
    assert!(b.headers(["foo", "bar", "baz"]).unwrap_err().is_invalid_argument());
    assert!(b.headers(["foo"]).unwrap_err().is_invalid_argument());
}

#[test]
fn test_headers_keeps_pairs_before_failure() {
    let mut b = builder();
    let err = b.headers(["foo", "bar", "", "baz"]).unwrap_err();
    assert!(err.is_invalid_argument());

    // Shape errors are detected before any pair is applied.
    assert!(b.headers(["late", "1", "odd"]).is_err());

    let headers = b.build().unwrap().headers().to_map();
    assert_eq!(headers, map(&[("foo", &["bar"][..])]));

    b.headers(vec!["X-A", "1", "x-a", "2"]).unwrap();
    assert_eq!(b.build().unwrap().headers().all_values("X-A"), ["1", "2"]);
}

#[test]
fn test_method_defaults_and_overrides() {
    let cases: [(&str, fn(&mut RequestBuilder) -> Result<&mut RequestBuilder>, &str); 12] = [
        ("default", |b| Ok(b), "GET"),
        ("GET", |b| Ok(b.get()), "GET"),
        ("POST then GET", |b| Ok(b.post(empty_body())?.get()), "GET"),
        ("PUT then GET", |b| Ok(b.put(empty_body())?.get()), "GET"),
        ("DELETE then GET", |b| Ok(b.delete().get()), "GET"),
        ("POST", |b| b.post(empty_body()), "POST"),
        ("PUT", |b| b.put(empty_body()), "PUT"),
        ("DELETE", |b| Ok(b.delete()), "DELETE"),
        ("GET then POST", |b| b.get().post(empty_body()), "POST"),
        ("GET then PUT", |b| b.get().put(empty_body()), "PUT"),
        ("GET then DELETE", |b| Ok(b.get().delete()), "DELETE"),
        ("HEAD", |b| Ok(b.head()), "HEAD"),
    ];

    for (name, setup, expected) in cases {
        let mut b = builder();
        setup(&mut b).unwrap();
        let request = b.build().unwrap();

        assert_eq!(request.method(), expected, "{}", name);
        if request.method() == "GET" || request.method() == "DELETE" {
            assert!(request.body().is_none(), "Unexpected body for {}", name);
        }
    }
}

#[test]
fn test_get_after_post_clears_body_and_post_reinstates() {
    let body = BodySpec::from_string("payload");
    let mut b = builder();
    b.post(body.clone()).unwrap().get();

    let request = b.build().unwrap();
    assert_eq!(request.method(), "GET");
    assert!(request.body().is_none());

    b.post(body.clone()).unwrap();
    let request = b.build().unwrap();
    assert_eq!(request.method(), "POST");
    assert_eq!(request.body(), Some(&body));
}

#[test]
fn test_method_argument_errors() {
    let mut b = builder();

    b.post(BodySpec::empty()).unwrap();
    b.put(BodySpec::empty()).unwrap();
    b.method("GET", BodySpec::empty()).unwrap();

    assert!(b.post(None).unwrap_err().is_null_argument());
    assert!(b.put(None).unwrap_err().is_null_argument());
    assert!(b.method("GET", None).unwrap_err().is_null_argument());
    assert!(b
        .method(None, BodySpec::from_string("foo"))
        .unwrap_err()
        .is_null_argument());
    assert!(b.method("", BodySpec::empty()).unwrap_err().is_invalid_argument());
    assert!(b
        .method("BAD METHOD", BodySpec::empty())
        .unwrap_err()
        .is_invalid_argument());
    assert!(b
        .method("CONNECT", BodySpec::empty())
        .unwrap_err()
        .is_invalid_argument());

    // The last successful call still holds.
    let request = b.build().unwrap();
    assert_eq!(request.method(), "GET");
    assert!(request.body().is_some_and(BodySpec::is_empty));
}

#[test]
fn test_custom_method_keeps_supplied_body() {
    let body = BodySpec::from_string("query");
    let mut b = builder();
    b.method("QUERY", body.clone()).unwrap();

    let request = b.build().unwrap();
    assert_eq!(request.method().as_str(), "QUERY");
    assert_eq!(request.body(), Some(&body));
}

/// Implements only the method primitive, relying on the provided `head`.
struct PrimitiveOnly {
    underlying: RequestBuilder,
}

impl RequestMethods for PrimitiveOnly {
    fn method<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        body: impl Into<Option<BodySpec>>,
    ) -> Result<&mut Self> {
        self.underlying.method(name, body)?;
        Ok(self)
    }
}

#[test]
fn test_default_head_attaches_present_empty_body() {
    init_tracing();
    let mut wrapper = PrimitiveOnly {
        underlying: RequestBuilder::new(),
    };
    wrapper.head().unwrap();
    wrapper.underlying.uri(TEST_URI).unwrap();

    let request = wrapper.underlying.build().unwrap();
    assert_eq!(request.method(), "HEAD");
    let body = request.body().expect("HEAD carries a present body");
    assert!(body.is_empty());

    let get = builder().get().build().unwrap();
    assert!(get.body().is_none());
}

#[test]
fn test_copy_is_independent() {
    let mut b = builder();
    b.header("X-Foo", "1")
        .unwrap()
        .method("GET", BodySpec::empty())
        .unwrap()
        .expect_continue(true)
        .timeout(Duration::from_secs(0xBEEF))
        .unwrap()
        .version(Version::HTTP_2)
        .unwrap();

    let request = b.build().unwrap();
    let copied = b
        .copy()
        .header("X-Foo", "2")
        .unwrap()
        .header("X-Bar", "3")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(request.uri(), copied.uri());
    assert_eq!(request.method(), copied.method());
    assert_eq!(request.expect_continue(), copied.expect_continue());
    assert_eq!(request.timeout(), copied.timeout());
    assert_eq!(request.version(), copied.version());
    assert_eq!(request.body(), copied.body());

    assert_eq!(request.headers().to_map(), map(&[("X-Foo", &["1"][..])]));
    assert_eq!(
        copied.headers().to_map(),
        map(&[("X-Foo", &["1", "2"][..]), ("X-Bar", &["3"][..])])
    );

    // The original builder is untouched by the copy's changes.
    assert_eq!(b.build().unwrap(), request);
}

#[test]
fn test_mutating_original_does_not_affect_copy() {
    let mut b = builder();
    b.header("X-Foo", "1").unwrap();
    let copy = b.copy();

    b.set_header("X-Foo", "2")
        .unwrap()
        .delete()
        .expect_continue(true)
        .timeout(Duration::from_secs(1))
        .unwrap()
        .uri("https://elsewhere.example.com/")
        .unwrap();

    let request = copy.build().unwrap();
    assert_eq!(request.uri().as_str(), TEST_URI);
    assert_eq!(request.method(), "GET");
    assert_eq!(request.headers().all_values("X-Foo"), ["1"]);
    assert!(!request.expect_continue());
    assert_eq!(request.timeout(), None);
}

#[test]
fn test_timeout_and_version_errors() {
    let mut b = builder();
    assert!(b.timeout(None).unwrap_err().is_null_argument());
    assert!(b.timeout(Duration::ZERO).unwrap_err().is_invalid_argument());
    assert!(b.version(None).unwrap_err().is_null_argument());

    b.timeout(Duration::from_millis(250)).unwrap();
    b.version(Version::HTTP_11).unwrap();
    let request = b.build().unwrap();
    assert_eq!(request.timeout(), Some(Duration::from_millis(250)));
    assert_eq!(request.version(), Some(Version::HTTP_11));
}

#[test]
fn test_restricted_headers_config() {
    let mut b = builder();
    for name in ["Host", "Connection", "Content-Length", "Expect", "Upgrade"] {
        assert!(b.header(name, "x").unwrap_err().is_invalid_argument(), "{}", name);
    }

    let config = BuilderConfig::builder()
        .allow_header("host")
        .restrict_header("X-Internal")
        .build();
    let mut b = RequestBuilder::with_config(config);
    b.uri(TEST_URI).unwrap().header("Host", "www.foo.com").unwrap();
    assert!(b.header("X-Internal", "1").unwrap_err().is_invalid_argument());
    assert_eq!(
        b.build().unwrap().headers().first_value("HOST"),
        Some("www.foo.com")
    );
}

#[test]
fn test_json_body_and_transport_hand_off() {
    let body = BodySpec::from_json(&serde_json::json!({"name": "Alice"})).unwrap();
    let mut b = builder();
    b.post(body.clone())
        .unwrap()
        .header("Content-Type", "application/json")
        .unwrap()
        .expect_continue(true);

    let request = b.build().unwrap().to_http().unwrap();
    assert_eq!(request.method(), http::Method::POST);
    assert_eq!(request.headers()["content-type"], "application/json");
    assert_eq!(request.headers()["expect"], "100-continue");
    assert_eq!(request.body().as_ref(), Some(&body));

    let content = request.body().as_ref().and_then(BodySpec::bytes);
    assert_eq!(content, Some(&br#"{"name":"Alice"}"#[..]));
}

#[test]
fn test_request_shared_across_threads() {
    let mut b = builder();
    b.header("X-Foo", "1").unwrap();
    let request = std::sync::Arc::new(b.build().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let request = request.clone();
            std::thread::spawn(move || request.headers().all_values("x-foo").to_vec())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec!["1".to_string()]);
    }
}
