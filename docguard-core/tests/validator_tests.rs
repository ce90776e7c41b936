//! Integration tests for the documentation validator
//!
//! Each test lays out a docs tree in a temp directory and runs the full check
//! list against an in-memory probe, so no test touches the network.

use std::{
    collections::HashMap,
    fs,
    path::Path,
};

use async_trait::async_trait;
use docguard_core::{
    error::{
        DocGuardError,
        DocGuardResult,
    },
    probe::Probe,
    CheckKind,
    DocGuardConfig,
    DocValidator,
    Status,
    ValidationReport,
};
use tempfile::TempDir;

/// Probe answering from fixed tables; anything absent is a transport error
#[derive(Default)]
struct FakeProbe {
    packages: HashMap<String, String>,
    accounts: HashMap<String, String>,
    urls:     HashMap<String, u16>,
}

impl FakeProbe {
    /// Every configured resource exists and every URL answers 200
    fn healthy(config: &DocGuardConfig) -> Self {
        let mut probe = FakeProbe::default();
        for name in &config.registry.packages {
            probe.packages.insert(name.clone(), "1.0.0".to_string());
        }
        for id in &config.chain.accounts {
            probe.accounts.insert(
                id.clone(),
                format!(r#"{{"{}":"{}","ram_quota":-1}}"#, config.chain.expected_field, id),
            );
        }
        for url in &config.http.urls {
            probe.urls.insert(url.clone(), 200);
        }
        probe
    }
}

#[async_trait]
impl Probe for FakeProbe {
    async fn package_version(&self, name: &str) -> DocGuardResult<String> {
        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| DocGuardError::Response(format!("no latest version for {}", name)))
    }

    async fn account_body(&self, id: &str) -> DocGuardResult<String> {
        self.accounts
            .get(id)
            .cloned()
            .ok_or_else(|| DocGuardError::Http("dns error".to_string()))
    }

    async fn url_status(&self, url: &str) -> DocGuardResult<u16> {
        self.urls
            .get(url)
            .copied()
            .ok_or_else(|| DocGuardError::Http("operation timed out".to_string()))
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn clean_bundle() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "SKILL.md",
        "---\nname: xpr-network\ndescription: XPR Network\n---\n\n\
         See [wallets](guides/wallets.md).\n",
    );
    write(
        dir.path(),
        "guides/wallets.md",
        "# Wallets\n\nQuery https://proton.eosusa.io/v1/chain/get_account\n",
    );
    dir
}

async fn run(dir: &TempDir, config: DocGuardConfig, probe: Option<FakeProbe>) -> ValidationReport {
    let probe = probe.map(|p| Box::new(p) as Box<dyn Probe>);
    DocValidator::for_root(dir.path(), config, probe).unwrap().run().await
}

#[tokio::test]
async fn test_clean_bundle_passes_everything() {
    let dir = clean_bundle();
    let config = DocGuardConfig::default();
    let probe = FakeProbe::healthy(&config);

    let report = run(&dir, config, Some(probe)).await;

    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.summary.warnings, 0);
    assert!(report.checks.iter().all(|r| r.status == Status::Pass));
    for check in CheckKind::ALL {
        assert!(
            report.results_for(check).count() > 0,
            "{} produced no results",
            check
        );
    }
}

#[tokio::test]
async fn test_all_urls_200_reports_no_url_failures() {
    let dir = clean_bundle();
    let mut config = DocGuardConfig::default();
    config.http.urls = vec![
        "https://a.example".to_string(),
        "https://b.example".to_string(),
        "https://c.example".to_string(),
    ];
    let probe = FakeProbe::healthy(&config);

    let report = run(&dir, config, Some(probe)).await;
    let url_results: Vec<_> = report.results_for(CheckKind::Urls).collect();
    assert_eq!(url_results.len(), 3);
    assert!(url_results.iter().all(|r| r.status == Status::Pass));
}

#[tokio::test]
async fn test_network_errors_count_as_failures() {
    let dir = clean_bundle();
    let config = DocGuardConfig::default();
    let mut probe = FakeProbe::healthy(&config);
    probe.packages.clear();
    probe.urls.insert(config.http.urls[0].clone(), 404);
    probe
        .accounts
        .insert(config.chain.accounts[0].clone(), r#"{"code":500,"message":"x"}"#.to_string());

    let package_count = config.registry.packages.len();
    let report = run(&dir, config, Some(probe)).await;

    let failed = |kind| report.results_for(kind).filter(|r| r.status == Status::Fail).count();
    assert_eq!(failed(CheckKind::Packages), package_count);
    assert_eq!(failed(CheckKind::Urls), 1);
    assert_eq!(failed(CheckKind::Accounts), 1);
    assert_eq!(report.exit_code() as usize, package_count + 2);
}

#[tokio::test]
async fn test_missing_frontmatter_fails() {
    let dir = clean_bundle();
    write(dir.path(), "SKILL.md", "# XPR Network\n\nNo frontmatter here.\n");

    let report = run(&dir, DocGuardConfig::default(), None).await;
    let results: Vec<_> = report.results_for(CheckKind::Frontmatter).collect();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, Status::Fail);
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_leaked_key_gives_nonzero_exit() {
    let dir = clean_bundle();
    write(
        dir.path(),
        "guides/accounts.md",
        &format!("```ts\nconst pk = \"PVT_K1_{}\";\n```\n", "3f".repeat(25)),
    );

    let report = run(&dir, DocGuardConfig::default(), None).await;
    let secret_fails: Vec<_> = report
        .results_for(CheckKind::Secrets)
        .filter(|r| r.status == Status::Fail)
        .collect();
    assert_eq!(secret_fails.len(), 1);
    assert_eq!(secret_fails[0].findings[0].file, "guides/accounts.md");
    assert_eq!(secret_fails[0].findings[0].line, 2);
    assert!(report.exit_code() >= 1);
}

#[tokio::test]
async fn test_placeholder_keys_are_not_leaks() {
    let dir = clean_bundle();
    write(
        dir.path(),
        "guides/accounts.md",
        &format!("PRIVATE_KEY=5J{} # YOUR_PRIVATE_KEY\n", "a".repeat(49)),
    );

    let report = run(&dir, DocGuardConfig::default(), None).await;
    assert!(report.results_for(CheckKind::Secrets).all(|r| r.status == Status::Pass));
}

#[tokio::test]
async fn test_exit_code_counts_fails_not_warnings() {
    let dir = clean_bundle();
    write(
        dir.path(),
        "guides/notes.md",
        "Built on /Users/alice/dev\n\
         Old docs at protonchain.com\n\
         Call https://proton.eosusa.io/chain/get_table_rows\n\
         Broken [link](nowhere.md)\n",
    );

    let report = run(&dir, DocGuardConfig::default(), None).await;
    let fails = report.checks.iter().filter(|r| r.status == Status::Fail).count();
    let warnings = report.checks.iter().filter(|r| r.status == Status::Warning).count();

    assert_eq!(warnings, 1);
    assert_eq!(fails, 3);
    assert_eq!(report.summary.errors, fails);
    assert_eq!(report.exit_code() as usize, fails);
}

#[tokio::test]
async fn test_warnings_alone_exit_zero() {
    let dir = clean_bundle();
    write(dir.path(), "guides/notes.md", "Cloned into /home/carol/work/\n");

    let report = run(&dir, DocGuardConfig::default(), None).await;
    assert_eq!(report.summary.warnings, 1);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.summary.headline(), "Passed with 1 warning(s)");
}

#[tokio::test]
async fn test_inventory_lists_every_document() {
    let dir = clean_bundle();
    write(dir.path(), "guides/leak.md", &format!("PVT_K1_{}\n", "1".repeat(50)));

    let report = run(&dir, DocGuardConfig::default(), None).await;
    let inventory: Vec<_> = report.results_for(CheckKind::Inventory).collect();
    assert_eq!(inventory.len(), 3);
    assert!(inventory.iter().all(|r| r.status == Status::Pass));
    assert_eq!(inventory[0].message, "SKILL.md (6 lines)");
}

#[tokio::test]
async fn test_undecodable_document_does_not_stop_the_run() {
    let dir = clean_bundle();
    fs::write(dir.path().join("latin1.md"), b"caf\xe9 notes\n").unwrap();

    let report = run(&dir, DocGuardConfig::default(), None).await;
    assert_eq!(report.exit_code(), 0);
    assert!(report
        .results_for(CheckKind::Inventory)
        .any(|r| r.message == "latin1.md (1 lines)"));
}

#[test]
fn test_invalid_config_pattern_rejected_before_run() {
    let dir = clean_bundle();
    let mut config = DocGuardConfig::default();
    config.personal.patterns.push("[unclosed".to_string());
    assert!(matches!(
        DocValidator::for_root(dir.path(), config, None),
        Err(DocGuardError::Pattern { .. })
    ));
}
