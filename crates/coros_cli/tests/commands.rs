use anyhow::Result;
use clap::Parser;
use coros_cli::cli::Cli;
use coros_cli::commands::{self, ActivityPicker, DownloadOptions, IdPicker};
use coros_client::config::Config;
use coros_client::http_client::ReqwestCorosClient;
use coros_client::{ActivitySummary, CorosError, Credentials, ExportFormat, Region};
use secrecy::SecretString;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Picks fixed positions, recording what it was offered.
struct FixedPicker {
    indices: Vec<usize>,
    offered: Vec<String>,
}

impl ActivityPicker for FixedPicker {
    fn pick(&mut self, activities: &[ActivitySummary]) -> Result<Vec<usize>> {
        self.offered = activities.iter().map(|a| a.id.clone()).collect();
        Ok(self.indices.clone())
    }
}

fn creds() -> Credentials {
    Credentials::new("a@example.com", SecretString::new("x".into()))
}

fn client(server: &MockServer) -> ReqwestCorosClient {
    ReqwestCorosClient::new(&server.uri(), Duration::from_secs(5)).expect("client")
}

async fn mock_vendor(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/account/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": "0000",
            "data": {"accessToken": "tok"}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activity/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": "0000",
            "data": {"dataList": [
                {"labelId": "123", "name": "Morning Run", "sportType": 100, "date": 20250601, "startTime": 0, "distance": 10000, "totalTime": 3000},
                {"labelId": "122", "name": "Easy Spin", "sportType": 201, "date": 20250531, "startTime": 0, "distance": 20000, "totalTime": 3600}
            ]}
        })))
        .mount(server)
        .await;
    for id in ["123", "122"] {
        Mock::given(method("POST"))
            .and(path("/activity/detail/download"))
            .and(query_param("labelId", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "0000",
                "data": {"fileUrl": format!("/files/{id}.gpx")}
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/files/{id}.gpx")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("<gpx id=\"{id}\"/>")))
            .mount(server)
            .await;
    }
}

fn options(dir: &std::path::Path, overwrite: bool) -> DownloadOptions {
    DownloadOptions {
        format: ExportFormat::Gpx,
        limit: 2,
        output: dir.to_path_buf(),
        overwrite,
    }
}

#[tokio::test]
async fn list_prints_table_and_total() {
    let server = MockServer::start().await;
    mock_vendor(&server).await;

    let mut out = Vec::new();
    let acts = commands::list(&client(&server), &creds(), 2, &mut out)
        .await
        .expect("list");
    assert_eq!(acts.len(), 2);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Morning Run"), "{text}");
    assert!(text.contains("Indoor Bike"), "{text}");
    assert!(text.contains("Total: 2 activities"), "{text}");
    assert!(text.contains("signs out"), "{text}");
}

#[tokio::test]
async fn download_selected_activities_to_output_dir() {
    let server = MockServer::start().await;
    mock_vendor(&server).await;
    let tmp = tempfile::tempdir().unwrap();

    let mut picker = FixedPicker {
        indices: vec![1, 0],
        offered: Vec::new(),
    };
    let mut out = Vec::new();
    let written = commands::download(
        &client(&server),
        &creds(),
        &options(tmp.path(), false),
        &mut picker,
        &mut out,
    )
    .await
    .expect("download");

    assert_eq!(picker.offered, ["123", "122"]);
    assert_eq!(
        written,
        [tmp.path().join("122.gpx"), tmp.path().join("123.gpx")]
    );
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("123.gpx")).unwrap(),
        "<gpx id=\"123\"/>"
    );
}

#[tokio::test]
async fn download_by_id_refuses_to_clobber_without_overwrite() {
    let server = MockServer::start().await;
    mock_vendor(&server).await;
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("123.gpx"), "old").unwrap();

    let mut out = Vec::new();
    let err = commands::download(
        &client(&server),
        &creds(),
        &options(tmp.path(), false),
        &mut IdPicker(vec!["123".into()]),
        &mut out,
    )
    .await
    .expect_err("existing file");
    assert!(format!("{err:#}").contains("already exists"));
    assert_eq!(std::fs::read_to_string(tmp.path().join("123.gpx")).unwrap(), "old");

    let written = commands::download(
        &client(&server),
        &creds(),
        &options(tmp.path(), true),
        &mut IdPicker(vec!["123".into()]),
        &mut out,
    )
    .await
    .expect("overwrite");
    assert_eq!(written.len(), 1);
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("123.gpx")).unwrap(),
        "<gpx id=\"123\"/>"
    );
}

#[tokio::test]
async fn repeated_id_is_downloaded_once() {
    let server = MockServer::start().await;
    mock_vendor(&server).await;
    let tmp = tempfile::tempdir().unwrap();

    let mut out = Vec::new();
    let written = commands::download(
        &client(&server),
        &creds(),
        &options(tmp.path(), false),
        &mut IdPicker(vec!["123".into(), "123".into()]),
        &mut out,
    )
    .await
    .expect("download");
    assert_eq!(written, [tmp.path().join("123.gpx")]);
}

#[tokio::test]
async fn empty_selection_downloads_nothing() {
    let server = MockServer::start().await;
    mock_vendor(&server).await;
    let tmp = tempfile::tempdir().unwrap();

    let mut picker = FixedPicker {
        indices: vec![],
        offered: Vec::new(),
    };
    let mut out = Vec::new();
    let written = commands::download(
        &client(&server),
        &creds(),
        &options(tmp.path(), false),
        &mut picker,
        &mut out,
    )
    .await
    .unwrap();
    assert!(written.is_empty());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn failed_login_reports_auth_error_and_skips_listing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/account/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": "1030",
            "message": "wrong password"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activity/query"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    let err = commands::list(&client(&server), &creds(), 10, &mut out)
        .await
        .unwrap_err();
    let coros = err.downcast_ref::<CorosError>().expect("coros error");
    assert!(coros.is_auth());
    assert!(err.to_string().contains("wrong password"));
}

#[test]
fn region_flag_overrides_environment() {
    let config = Config::from_env_with(|k| match k {
        "COROS_EMAIL" => Some("a@example.com".into()),
        "COROS_PASSWORD" => Some("x".into()),
        "COROS_REGION" => Some("europe".into()),
        _ => None,
    })
    .unwrap();
    let cli = Cli::try_parse_from(["coros", "list", "--region", "china"]).unwrap();
    let config = coros_cli::resolve_config(&cli, config);
    assert_eq!(config.region, Region::China);
    assert_eq!(config.base_url(), "https://teamcnapi.coros.com");
}

#[test]
fn region_flag_drops_base_url_override() {
    let env = |k: &str| -> Option<String> {
        match k {
            "COROS_EMAIL" => Some("a@example.com".into()),
            "COROS_PASSWORD" => Some("x".into()),
            "COROS_BASE_URL" => Some("http://localhost:9000".into()),
            _ => None,
        }
    };

    let cli = Cli::try_parse_from(["coros", "list", "--region", "america"]).unwrap();
    let config = coros_cli::resolve_config(&cli, Config::from_env_with(env).unwrap());
    assert!(config.base_url_override.is_none());
    assert_eq!(config.base_url(), "https://teamapi.coros.com");

    let cli = Cli::try_parse_from(["coros", "list"]).unwrap();
    let config = coros_cli::resolve_config(&cli, Config::from_env_with(env).unwrap());
    assert_eq!(config.base_url(), "http://localhost:9000");
}
