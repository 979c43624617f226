//! End-to-end tests of resolve-and-fetch against the in-memory store

use std::collections::HashMap;
use std::error::Error as _;

use s3config_core::config::{ENDPOINT_ENV_VAR, REGION_ENV_VAR};
use s3config_core::{
    ConfigFetcher, ConfigProvider, Error, ErrorKind, Layered, MemoryStore, Region, StoreError,
};
use tokio::io::AsyncReadExt;

const CONFIG_YML: &[u8] = b"server:\n  port: 8080\nlogging:\n  level: INFO\n";

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn backend() -> MemoryStore {
    MemoryStore::new().with_object("cfg-bucket", "config.yml", CONFIG_YML)
}

#[tokio::test]
async fn fetched_bytes_match_stored_bytes() {
    let store = backend();
    let fetcher = ConfigFetcher::new(store.clone()).with_source(env(&[]));

    let mut stream = fetcher
        .resolve_and_fetch(Some("s3://cfg-bucket/config.yml"))
        .await
        .unwrap();
    let mut content = Vec::new();
    stream.read_to_end(&mut content).await.unwrap();

    assert_eq!(content, CONFIG_YML);
    assert_eq!(store.connections().len(), 1);
}

#[tokio::test]
async fn binary_content_is_not_transformed() {
    let data: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
    let store = MemoryStore::new().with_object("bin", "blob", data.clone());
    let fetcher = ConfigFetcher::new(store).with_source(env(&[]));

    let mut stream = fetcher.open("s3://bin/blob").await.unwrap();
    let mut content = Vec::new();
    stream.read_to_end(&mut content).await.unwrap();
    assert_eq!(content, data);
}

#[tokio::test]
async fn each_call_connects_with_fresh_config() {
    let store = backend();
    let fetcher = ConfigFetcher::new(store.clone()).with_source(env(&[
        (ENDPOINT_ENV_VAR, "http://localhost:9999"),
        (REGION_ENV_VAR, "us-west-2"),
    ]));

    for _ in 0..3 {
        fetcher.open("s3://cfg-bucket/config.yml").await.unwrap();
    }

    let connections = store.connections();
    assert_eq!(connections.len(), 3);
    for config in connections {
        assert_eq!(
            config.endpoint_override.as_deref(),
            Some("http://localhost:9999")
        );
        assert!(config.path_style_access);
        assert!(config.region_override.is_none());
    }
}

#[tokio::test]
async fn region_override_only() {
    let store = backend();
    let fetcher =
        ConfigFetcher::new(store.clone()).with_source(env(&[(REGION_ENV_VAR, "us-west-2")]));

    fetcher.open("s3://cfg-bucket/config.yml").await.unwrap();
    assert_eq!(store.connections()[0].region_override, Some(Region::UsWest2));
}

#[tokio::test]
async fn unknown_region_is_fatal_and_skips_store() {
    let store = backend();
    let fetcher = ConfigFetcher::new(store.clone())
        .with_source(env(&[(REGION_ENV_VAR, "not-a-real-region")]));

    let err = fetcher
        .open("s3://cfg-bucket/config.yml")
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Fatal);
    assert!(store.connections().is_empty());
}

#[tokio::test]
async fn missing_object_is_wrapped() {
    let fetcher = ConfigFetcher::new(backend()).with_source(env(&[]));

    let err = fetcher
        .open("s3://cfg-bucket/missing.yml")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::FetchFailed(StoreError::NotFound(_))));
    assert!(err.source().unwrap().to_string().contains("missing.yml"));
}

#[tokio::test]
async fn unsupported_scheme_skips_store() {
    let store = backend();
    let fetcher = ConfigFetcher::new(store.clone()).with_source(env(&[]));

    let err = fetcher.open("http://cfg-bucket/config.yml").await.err().unwrap();
    assert!(matches!(err, Error::UnsupportedScheme(_)));
    assert!(store.connections().is_empty());
}

#[tokio::test]
async fn layered_source_prefers_first_layer() {
    let store = backend();
    let overrides = env(&[(REGION_ENV_VAR, "eu-west-1")]);
    let fetcher = ConfigFetcher::new(store.clone())
        .with_source(Layered::new(overrides, env(&[(REGION_ENV_VAR, "us-east-1")])));

    fetcher.open("s3://cfg-bucket/config.yml").await.unwrap();
    assert_eq!(store.connections()[0].region_override, Some(Region::EuWest1));
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let store = backend().with_object("cfg-bucket", "other.yml", "other");
    let fetcher = ConfigFetcher::new(store.clone()).with_source(env(&[]));

    let mut handles = Vec::new();
    for i in 0..8 {
        let fetcher = fetcher.clone();
        handles.push(tokio::spawn(async move {
            let path = if i % 2 == 0 {
                "s3://cfg-bucket/config.yml"
            } else {
                "s3://cfg-bucket/other.yml"
            };
            let mut stream = fetcher.open(path).await.unwrap();
            let mut content = Vec::new();
            stream.read_to_end(&mut content).await.unwrap();
            content
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let content = handle.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(content, CONFIG_YML);
        } else {
            assert_eq!(content, b"other");
        }
    }
    assert_eq!(store.connections().len(), 8);
}
