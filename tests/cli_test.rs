use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use stencil::cli::{parse_key_value, Args, Commands};

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("stencil")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_ls() {
    let parsed = Args::try_parse_from(make_args(&["ls"])).unwrap();
    assert!(matches!(parsed.command, Commands::Ls { config: None }));
    assert!(!parsed.verbose);

    let parsed = Args::try_parse_from(make_args(&["l", "--config", "conf/stencil.yml", "-v"])).unwrap();
    match parsed.command {
        Commands::Ls { config } => assert_eq!(config, Some(PathBuf::from("conf/stencil.yml"))),
        other => panic!("Expected ls, got {other:?}"),
    }
    assert!(parsed.verbose);
}

#[test]
fn test_create_defaults() {
    let parsed = Args::try_parse_from(make_args(&["create"])).unwrap();
    match parsed.command {
        Commands::Create { template, config, output, data, skip_install } => {
            assert_eq!(template, None);
            assert_eq!(config, None);
            assert_eq!(output, None);
            assert!(data.is_empty());
            assert!(!skip_install);
        }
        other => panic!("Expected create, got {other:?}"),
    }
}

#[test]
fn test_create_all_flags() {
    let args = make_args(&[
        "-v",
        "tmpl",
        "lib",
        "--config",
        "./stencil.yml",
        "-o",
        "./packages",
        "-d",
        "pkg=my-lib",
        "--data",
        "query=a=b",
        "--skip-install",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();
    assert!(parsed.verbose);
    match parsed.command {
        Commands::Create { template, config, output, data, skip_install } => {
            assert_eq!(template.as_deref(), Some("lib"));
            assert_eq!(config, Some(PathBuf::from("./stencil.yml")));
            assert_eq!(output, Some(PathBuf::from("./packages")));
            assert_eq!(
                data,
                vec![
                    ("pkg".to_string(), "my-lib".to_string()),
                    ("query".to_string(), "a=b".to_string())
                ]
            );
            assert!(skip_install);
        }
        other => panic!("Expected create, got {other:?}"),
    }
}

#[test]
fn test_short_alias() {
    let parsed = Args::try_parse_from(make_args(&["t", "web"])).unwrap();
    assert!(matches!(parsed.command, Commands::Create { template: Some(ref t), .. } if t == "web"));
}

#[test]
fn test_missing_subcommand() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_bad_data() {
    assert!(Args::try_parse_from(make_args(&["create", "-d", "novalue"])).is_err());
}

#[test]
fn test_parse_key_value() {
    assert_eq!(parse_key_value("a=1"), Ok(("a".to_string(), "1".to_string())));
    assert_eq!(parse_key_value("a="), Ok(("a".to_string(), String::new())));
    assert!(parse_key_value("=1").is_err());
    assert!(parse_key_value("a").is_err());
}
