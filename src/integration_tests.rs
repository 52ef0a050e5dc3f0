//! End-to-end tests for the batch: source file on disk in, ARB files on disk out.
//!
//! # Running the live backend test
//!
//! ```bash
//! export GOOGLE_TRANSLATE_API_KEY=...
//! cargo test --lib integration_tests -- --ignored --nocapture
//! ```

#[cfg(test)]
mod tests {
    use crate::catalog::{LocaleCatalog, LocaleSpec};
    use crate::config::BatchConfig;
    use crate::mt::{MachineTranslator, MockMode, MockTranslator};
    use crate::orchestrator::Orchestrator;
    use crate::sink::MemorySink;
    use crate::{EXIT_FATAL, EXIT_LOCALE_FAILED, Error, exit_status, run_with};
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    const SOURCE: &str = r#"{
  "@@locale": "en",
  "appTitle": "Notes",
  "@appTitle": {"description": "Title of the application"},
  "greet": "Hello {name}",
  "@greet": {"placeholders": {"name": {"type": "String"}}},
  "itemCount": "You have {count} items",
  "bye": "Goodbye"
}"#;

    fn small_catalog() -> LocaleCatalog {
        LocaleCatalog::new(vec![
            LocaleSpec::new("en", "English"),
            LocaleSpec::new("fr", "French"),
            LocaleSpec::new("de", "German"),
            LocaleSpec::new("ja", "Japanese"),
            LocaleSpec::new("es-MX", "Spanish (Mexico)").with_backend("es"),
        ])
    }

    /// Writes `source` into a fresh temp dir and points a config at it
    fn setup(source: &str) -> (TempDir, BatchConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("app_en.arb");
        fs::write(&input, source).unwrap();
        let config = BatchConfig {
            input,
            output_dir: tmp.path().join("langfiles"),
            concurrency: 2,
            ..BatchConfig::default()
        };
        (tmp, config)
    }

    fn suffix() -> Arc<dyn MachineTranslator> {
        Arc::new(MockTranslator::new(MockMode::Suffix))
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn output_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_example_table_to_french() {
        let source = r#"{"greet": "Hello {name}", "@greet": {"placeholders":{"name":{}}}, "bye": "Goodbye", "@@locale": "en"}"#;
        let (_tmp, mut config) = setup(source);
        config.locales = Some(vec!["fr".to_string()]);
        let mut map = HashMap::new();
        map.insert(("Goodbye".to_string(), "fr".to_string()), "Au revoir".to_string());
        let translator = Arc::new(MockTranslator::new(MockMode::Mappings(map)));

        let report = run_with(&config, &small_catalog(), translator).await.unwrap();

        assert!(report.is_success());
        let contents = fs::read_to_string(config.output_dir.join("app_fr.arb")).unwrap();
        assert_eq!(
            contents,
            r#"{
  "@@locale": "fr",
  "greet": "Hello {name}",
  "@greet": {
    "placeholders": {
      "name": {}
    }
  },
  "bye": "Au revoir"
}
"#
        );
    }

    #[tokio::test]
    async fn test_every_document_covers_exactly_the_source_keys() {
        let (_tmp, config) = setup(SOURCE);

        let report = run_with(&config, &small_catalog(), suffix()).await.unwrap();

        assert_eq!(report.locales.len(), 4);
        let source_keys: Vec<String> = crate::SourceTable::from_json_str(SOURCE)
            .unwrap()
            .keys()
            .map(str::to_string)
            .collect();
        for path in report.written() {
            let doc = read_json(path);
            let keys: Vec<String> = doc.as_object().unwrap().keys().cloned().collect();
            assert_eq!(keys, source_keys, "key set mismatch in {}", path.display());
        }
    }

    #[tokio::test]
    async fn test_placeholder_messages_are_identical_everywhere() {
        let (_tmp, config) = setup(SOURCE);

        let report = run_with(&config, &small_catalog(), suffix()).await.unwrap();

        for path in report.written() {
            let doc = read_json(path);
            assert_eq!(doc["greet"], "Hello {name}");
            assert_eq!(doc["itemCount"], "You have {count} items");
            assert_eq!(doc["@greet"]["placeholders"]["name"]["type"], "String");
        }
        let mx = read_json(&config.output_dir.join("app_es-MX.arb"));
        assert_eq!(mx["@@locale"], "es-MX");
        assert_eq!(mx["bye"], "Goodbye_es");
    }

    #[tokio::test]
    async fn test_failed_pair_falls_back_without_touching_others() {
        let (_tmp, config) = setup(SOURCE);
        let pairs = HashSet::from([("Goodbye".to_string(), "de".to_string())]);
        let translator = Arc::new(MockTranslator::new(MockMode::FailOn(pairs)));

        let report = run_with(&config, &small_catalog(), translator).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.total_fallbacks(), 1);
        let de = read_json(&config.output_dir.join("app_de.arb"));
        assert_eq!(de["bye"], "Goodbye");
        assert_eq!(de["appTitle"], "Notes_de");
        let fr = read_json(&config.output_dir.join("app_fr.arb"));
        assert_eq!(fr["bye"], "Goodbye_fr");
        let de_report = report.report_for("de").unwrap();
        assert_eq!(de_report.failures[0].key, "bye");
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let (_tmp, config) = setup(SOURCE);

        run_with(&config, &small_catalog(), suffix()).await.unwrap();
        let first: Vec<Vec<u8>> = output_files(&config.output_dir)
            .iter()
            .map(|name| fs::read(config.output_dir.join(name)).unwrap())
            .collect();

        run_with(&config, &small_catalog(), suffix()).await.unwrap();
        let second: Vec<Vec<u8>> = output_files(&config.output_dir)
            .iter()
            .map(|name| fs::read(config.output_dir.join(name)).unwrap())
            .collect();

        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_locale_produces_no_file() {
        let (_tmp, mut config) = setup(SOURCE);
        config.locales = Some(vec!["de".to_string(), "tlh".to_string()]);

        let report = run_with(&config, &small_catalog(), suffix()).await.unwrap();

        assert_eq!(report.locales.len(), 1);
        assert_eq!(output_files(&config.output_dir), vec!["app_de.arb"]);
    }

    #[tokio::test]
    async fn test_source_locale_gets_no_output() {
        let (_tmp, config) = setup(SOURCE);

        run_with(&config, &small_catalog(), suffix()).await.unwrap();

        assert_eq!(
            output_files(&config.output_dir),
            vec!["app_de.arb", "app_es-MX.arb", "app_fr.arb", "app_ja.arb"]
        );
    }

    #[tokio::test]
    async fn test_missing_locale_tag_is_filled_in() {
        let (_tmp, mut config) = setup(r#"{"bye": "Goodbye"}"#);
        config.locales = Some(vec!["ja".to_string()]);

        run_with(&config, &small_catalog(), suffix()).await.unwrap();

        let contents = fs::read_to_string(config.output_dir.join("app_ja.arb")).unwrap();
        assert_eq!(
            contents,
            "{\n  \"@@locale\": \"ja\",\n  \"bye\": \"Goodbye_ja\"\n}\n"
        );
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let (_tmp, mut config) = setup(SOURCE);
        config.dry_run = true;

        let report = run_with(&config, &small_catalog(), suffix()).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.written().count(), 4);
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_missing_source_aborts_before_dispatch() {
        let (tmp, mut config) = setup(SOURCE);
        config.input = tmp.path().join("missing.arb");

        let result = run_with(&config, &small_catalog(), suffix()).await;

        assert!(matches!(result, Err(Error::Table(_))));
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_malformed_source_aborts_before_dispatch() {
        let (_tmp, config) = setup(r#"{"count": 3}"#);

        let result = run_with(&config, &small_catalog(), suffix()).await;

        assert!(matches!(result, Err(Error::Table(_))));
    }

    #[tokio::test]
    async fn test_unusable_output_dir_aborts_before_dispatch() {
        let (tmp, mut config) = setup(SOURCE);
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        config.output_dir = blocker;

        let result = run_with(&config, &small_catalog(), suffix()).await;

        assert!(matches!(result, Err(Error::Output(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let (_tmp, mut config) = setup(SOURCE);
        config.concurrency = 0;

        let result = run_with(&config, &small_catalog(), suffix()).await;

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_bad_command_line_exits_fatal() {
        let (tmp, _) = setup(SOURCE);
        let input = tmp.path().join("app_en.arb");
        let matches = BatchConfig::command()
            .try_get_matches_from([
                "arb-translate",
                "--mock",
                "-i",
                input.to_str().unwrap(),
                "-j",
                "0",
            ])
            .unwrap();

        let outcome = match BatchConfig::from_matches(&matches) {
            Ok(config) => run_with(&config, &small_catalog(), suffix()).await,
            Err(e) => Err(e.into()),
        };

        assert!(matches!(outcome, Err(Error::Config(_))));
        assert_eq!(exit_status(&outcome), EXIT_FATAL);
    }

    #[tokio::test]
    async fn test_exit_status_for_batch_outcomes() {
        let (_tmp, mut config) = setup(SOURCE);
        let written = run_with(&config, &small_catalog(), suffix()).await;
        assert_eq!(exit_status(&written), 0);

        config.input = config.output_dir.join("missing.arb");
        let missing = run_with(&config, &small_catalog(), suffix()).await;
        assert_eq!(exit_status(&missing), EXIT_FATAL);

        let orchestrator = Orchestrator::new(
            suffix(),
            Arc::new(MemorySink::default().failing_for(["de"])),
            "en",
            2,
        );
        let table = Arc::new(crate::SourceTable::from_json_str(SOURCE).unwrap());
        let partial = Ok(orchestrator.run(table, small_catalog().all()).await);
        assert_eq!(exit_status(&partial), EXIT_LOCALE_FAILED);
    }

    #[tokio::test]
    async fn test_empty_locale_list_is_rejected() {
        let (_tmp, mut config) = setup(SOURCE);
        config.locales = Some(Vec::new());

        let outcome = run_with(&config, &small_catalog(), suffix()).await;

        assert!(matches!(outcome, Err(Error::Config(_))));
        assert_eq!(exit_status(&outcome), EXIT_FATAL);
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_builtin_catalog_full_run() {
        let (_tmp, mut config) = setup(SOURCE);
        config.concurrency = 6;

        let report = run_with(&config, &LocaleCatalog::builtin(), suffix())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.locales.len(), 47);
        assert!(report.peak_concurrency <= 6);
        assert_eq!(output_files(&config.output_dir).len(), 47);
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_google_translate_batch() {
        if std::env::var(crate::mt::google_translate::API_KEY_ENV).is_err() {
            eprintln!("⚠️  Skipping: GOOGLE_TRANSLATE_API_KEY not set");
            return;
        }

        let (_tmp, mut config) = setup(SOURCE);
        config.locales = Some(vec!["fr".to_string(), "zh-CN".to_string()]);
        let translator = crate::translator_for(crate::config::Provider::Google).unwrap();

        let report = run_with(&config, &LocaleCatalog::builtin(), translator)
            .await
            .unwrap();

        assert!(report.is_success());
        let fr = read_json(&config.output_dir.join("app_fr.arb"));
        println!("fr: {}", fr);
        assert_eq!(fr["greet"], "Hello {name}");
        assert_ne!(fr["bye"], "Goodbye");
    }
}
