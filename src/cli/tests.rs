//! Tests for CLI module

use super::*;
use crate::error::Error;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_fetch_command() {
    let cli = Cli::try_parse_from([
        "pageflow",
        "--config",
        "source.yaml",
        "fetch",
        "--max-pages",
        "3",
        "-p",
        "team=core",
        "--param",
        "q=a=b",
    ])
    .unwrap();

    assert_eq!(cli.config, PathBuf::from("source.yaml"));
    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Commands::Fetch { max_pages, params } => {
            assert_eq!(max_pages, Some(3));
            assert_eq!(params, vec!["team=core".to_string(), "q=a=b".to_string()]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_poll_defaults() {
    let cli = Cli::try_parse_from(["pageflow", "poll", "-v"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config, PathBuf::from("pageflow.yaml"));
    match cli.command {
        Commands::Poll {
            ticks,
            interval_ms,
            params,
        } => {
            assert_eq!(ticks, 3);
            assert!(interval_ms.is_none());
            assert!(params.is_empty());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["pageflow"]).is_err());
}

#[test]
fn test_parse_params() {
    let params = parse_params(&["a=1".to_string(), "b=x=y".to_string(), "c=".to_string()]).unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params["a"], "1");
    assert_eq!(params["b"], "x=y");
    assert_eq!(params["c"], "");
}

#[test]
fn test_parse_params_rejects_malformed() {
    assert!(matches!(
        parse_params(&["novalue".to_string()]),
        Err(Error::InvalidConfigValue { .. })
    ));
    assert!(matches!(
        parse_params(&["=1".to_string()]),
        Err(Error::InvalidConfigValue { .. })
    ));
}

#[tokio::test]
async fn test_runner_validate_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let cli = Cli::try_parse_from(["pageflow", "-C", path.to_str().unwrap(), "validate"]).unwrap();
    let result = Runner::new(cli).run().await;
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}

#[tokio::test]
async fn test_runner_fetch_requires_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pageflow.yaml");
    std::fs::write(&path, "polling:\n  interval_ms: 100\n").unwrap();

    let cli = Cli::try_parse_from(["pageflow", "-C", path.to_str().unwrap(), "fetch"]).unwrap();
    let result = Runner::new(cli).run().await;
    assert!(matches!(result, Err(Error::MissingConfigField { ref field }) if field == "source"));
}

#[tokio::test]
async fn test_runner_fetch_names_bad_param() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pageflow.yaml");
    std::fs::write(&path, "source:\n  base_url: http://127.0.0.1:9\n").unwrap();

    let cli = Cli::try_parse_from([
        "pageflow",
        "-C",
        path.to_str().unwrap(),
        "fetch",
        "-p",
        "novalue",
    ])
    .unwrap();
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::Other(_)));
    assert!(err.to_string().starts_with("--param: Invalid config value for 'param'"));
}
