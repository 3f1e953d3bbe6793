use std::sync::Arc;
use std::time::Duration;

use ukhsa_client::UkhsaClient;
use ukhsa_tracker::{RefreshCoordinator, RefreshError, TrackerRegistry};

fn path(topic: &str, metric: &str) -> String {
    format!(
        "/themes/infectious_disease/sub_themes/respiratory/topics/{}/geography_types/Nation/geographies/England/metrics/{}",
        topic, metric
    )
}

fn covid_path() -> String {
    path("COVID-19", "weekly_hospital_admissions_rate")
}

fn flu_path() -> String {
    path("Influenza", "weekly_hospital_admissions_rate")
}

fn rhino_path() -> String {
    path("OtherRespiratoryViruses", "rhinovirus_positive_count")
}

fn client_for(server: &mockito::Server) -> UkhsaClient {
    UkhsaClient::builder()
        .base_url(server.url())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn partial_failure_against_http_api() {
    let mut server = mockito::Server::new_async().await;

    let covid = server
        .mock("GET", covid_path().as_str())
        .with_status(200)
        .with_body(r#"{"results": [{"metric_value": 4.21, "date": "2024-01-14", "geography": "England"}]}"#)
        .create_async()
        .await;
    let flu = server
        .mock("GET", flu_path().as_str())
        .with_status(500)
        .create_async()
        .await;
    let rhino = server
        .mock("GET", rhino_path().as_str())
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let coordinator = RefreshCoordinator::new(client_for(&server));
    let snapshot = coordinator.refresh().await.unwrap();

    covid.assert_async().await;
    flu.assert_async().await;
    rhino.assert_async().await;

    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot.successful(), 1);
    assert!(snapshot.get("covid_admissions_rate").is_some());
    assert!(snapshot.get("flu_admissions_rate").is_none());
    assert!(snapshot.get("rhinovirus_positivity").is_none());
    assert!(coordinator.last_error().is_none());
}

#[tokio::test]
async fn total_failure_keeps_last_good_snapshot() {
    let mut server = mockito::Server::new_async().await;

    let mut mocks = Vec::new();
    for p in [covid_path(), flu_path(), rhino_path()] {
        mocks.push(
            server
                .mock("GET", p.as_str())
                .with_status(200)
                .with_body(r#"{"results": [{"metric_value": "7.06", "date": "2024-01-14"}]}"#)
                .create_async()
                .await,
        );
    }

    let coordinator = Arc::new(RefreshCoordinator::new(client_for(&server)));
    let first = coordinator.first_refresh().await.unwrap();
    assert_eq!(first.successful(), 3);

    for mock in &mocks {
        mock.remove_async().await;
    }
    for p in [covid_path(), flu_path(), rhino_path()] {
        server
            .mock("GET", p.as_str())
            .with_status(503)
            .create_async()
            .await;
    }

    let err = coordinator.refresh().await.unwrap_err();

    assert_eq!(err, RefreshError::AllMetricsFailed { attempted: 3 });
    assert!(Arc::ptr_eq(&coordinator.snapshot().unwrap(), &first));
    assert!(!coordinator.last_update_success());
}

#[tokio::test]
async fn registry_renders_sensors_from_http_api() {
    let mut server = mockito::Server::new_async().await;

    let _covid = server
        .mock("GET", covid_path().as_str())
        .with_status(200)
        .with_body(r#"{"results": [{"metric_value": 4.21, "date": "2024-01-14", "geography": "England"}]}"#)
        .create_async()
        .await;
    let _flu = server
        .mock("GET", flu_path().as_str())
        .with_status(200)
        .with_body(r#"{"results": [{"metric_value": "not-a-number", "date": "2024-01-14"}]}"#)
        .create_async()
        .await;
    let _rhino = server
        .mock("GET", rhino_path().as_str())
        .with_status(200)
        .with_body(r#"{"results": [{"metric_value": "12.34", "date": "2024-01-14"}]}"#)
        .create_async()
        .await;

    let registry = TrackerRegistry::new();
    let entry = registry
        .setup_entry("default", RefreshCoordinator::new(client_for(&server)))
        .await
        .unwrap();

    let values: Vec<Option<f64>> = entry.sensors().iter().map(|s| s.native_value()).collect();
    assert_eq!(values, vec![Some(4.21), None, Some(12.3)]);

    let flu = &entry.sensors()[1];
    assert_eq!(flu.attributes().geography.as_deref(), Some("England"));
    assert!(flu.available());

    assert!(registry.unload_entry("default").await);
}
