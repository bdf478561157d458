//! End-to-end tests for the `generate` command handler.

use sdg_core::SdgConfig;
use sdg_writer::{GenerateArgs, SchemaSourceArgs};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use synthetic_data_generator::{generate_test_document, load_blueprint, load_config, run_generate};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn template_args(template: &str, output: &Path) -> GenerateArgs {
    GenerateArgs {
        index_name: "orders".to_string(),
        schema: SchemaSourceArgs {
            index_mappings: None,
            template_document: Some(fixture(template)),
        },
        output_path: output.to_path_buf(),
        total_size_gb: 0.00001,
        config: None,
        seed: Some(42),
        test_document: false,
        skip_disk_check: false,
        no_progress: true,
    }
}

fn mapping_args(output: &Path) -> GenerateArgs {
    GenerateArgs {
        index_name: "logs".to_string(),
        schema: SchemaSourceArgs {
            index_mappings: Some(fixture("logs_mapping.json")),
            template_document: None,
        },
        config: Some(fixture("logs_config.yml")),
        total_size_gb: 0.00002,
        ..template_args("orders_template.json", output)
    }
}

fn read_documents(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_template_dataset() {
    let dir = TempDir::new().unwrap();
    let args = template_args("orders_template.json", dir.path());
    let record = run_generate(&args).unwrap().unwrap();

    assert_eq!(record.index_name, "orders");
    assert!(record.docs_added > 0);
    assert!(record.dataset_size >= args.total_size_bytes());
    assert!(dir.path().join("orders_record.json").exists());

    let mut total = 0;
    for file in &record.files {
        for doc in read_documents(&dir.path().join(&file.file_name)) {
            let id = doc["id"].as_i64().unwrap();
            assert!((1..=5).contains(&id));
            assert_eq!(doc["name"], "static");
            assert_eq!(doc["source"], "web");
            assert!(["new", "paid", "shipped"].contains(&doc["order"]["status"].as_str().unwrap()));
            assert!(doc["order"]["total"].as_str().unwrap().ends_with(" EUR"));
            assert!(doc["order"]["placed_at"].as_str().unwrap().starts_with("2024-"));
            assert_eq!(doc["lines"].as_array().unwrap().len(), 2);
            total += 1;
        }
    }
    assert_eq!(total, record.docs_added);
}

#[test]
fn test_unknown_generator_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    let args = template_args("unknown_generator_template.json", &output);

    let err = run_generate(&args).unwrap_err();
    assert!(format!("{err:#}").contains("NOT_A_GENERATOR"));
    assert!(!output.exists() || fs::read_dir(&output).unwrap().count() == 0);
}

#[test]
fn test_mapping_dataset_with_overrides() {
    let dir = TempDir::new().unwrap();
    let args = mapping_args(dir.path());
    let record = run_generate(&args).unwrap().unwrap();

    // max_file_size_gb is about 4 KiB, so the run spans several files.
    assert!(record.files.len() >= 2);
    let max_file_bytes = SdgConfig::from_file(fixture("logs_config.yml"))
        .unwrap()
        .settings
        .max_file_bytes();
    let (_, full) = record.files.split_last().unwrap();
    assert!(full.iter().all(|f| f.file_size_bytes <= max_file_bytes));

    let docs = read_documents(&dir.path().join(&record.files[0].file_name));
    for doc in &docs {
        let bytes = doc["bytes"].as_i64().unwrap();
        assert!((1000..=2000).contains(&bytes));
        assert!(["debug", "info", "warn", "error"].contains(&doc["level"].as_str().unwrap()));
        assert!(["alice", "bob"].contains(&doc["user"]["name"].as_str().unwrap()));
        assert!(doc["user"]["age"].is_i64());
        assert!(doc["success"].is_boolean());
        assert!(doc["client_ip"].as_str().unwrap().parse::<std::net::Ipv4Addr>().is_ok());

        let tags = doc["tags"].as_array().unwrap();
        assert!((1..=5).contains(&tags.len()));
        for tag in tags {
            assert!(["debug", "info", "warn", "error"].contains(&tag["key"].as_str().unwrap()));
        }

        let lat = doc["location"]["lat"].as_f64().unwrap();
        assert!((-90.0..=90.0).contains(&lat));
        assert!(doc["@timestamp"].as_str().unwrap().ends_with('Z'));
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let a = run_generate(&mapping_args(first.path())).unwrap().unwrap();
    let b = run_generate(&mapping_args(second.path())).unwrap().unwrap();

    assert_eq!(a.files, b.files);
    for file in &a.files {
        assert_eq!(
            fs::read(first.path().join(&file.file_name)).unwrap(),
            fs::read(second.path().join(&file.file_name)).unwrap()
        );
    }
}

#[test]
fn test_test_document_mode_writes_no_files() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("preview");
    let args = GenerateArgs {
        test_document: true,
        ..template_args("orders_template.json", &output)
    };
    assert!(run_generate(&args).unwrap().is_none());
    assert!(!output.exists());
}

#[test]
fn test_test_document_carries_timeseries_start() {
    let config = load_config(Some(&fixture("timeseries_config.yml"))).unwrap();
    let source = SchemaSourceArgs {
        index_mappings: Some(fixture("logs_mapping.json")),
        template_document: None,
    };
    let blueprint = load_blueprint(&source, &config).unwrap();
    let doc = generate_test_document(&blueprint, &config, 7).unwrap();
    // 2023-06-01T00:00:00Z in epoch milliseconds.
    assert_eq!(doc["@timestamp"], 1_685_577_600_000i64);
}

#[test]
fn test_timeseries_dataset_is_time_ordered() {
    let dir = TempDir::new().unwrap();
    let args = GenerateArgs {
        config: Some(fixture("timeseries_config.yml")),
        ..mapping_args(dir.path())
    };
    let record = run_generate(&args).unwrap().unwrap();
    assert_eq!(record.files.len(), 1);

    let docs = read_documents(&dir.path().join(&record.files[0].file_name));
    let stamps: Vec<i64> = docs.iter().map(|d| d["@timestamp"].as_i64().unwrap()).collect();
    assert_eq!(stamps[0], 1_685_577_600_000);
    assert!(stamps.windows(2).all(|w| w[1] - w[0] == 60_000));
}

#[test]
fn test_missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let args = GenerateArgs {
        config: Some(dir.path().join("missing.yml")),
        ..template_args("orders_template.json", dir.path())
    };
    let err = run_generate(&args).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load config"));
}
