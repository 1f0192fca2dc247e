use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use minify_core::{FileResult, NoopObserver, SyncObserver};
use minify_engine::Synchronizer;
use minify_llm::{ChatCompletion, ChatRequest, Compressor, LlmError};
use minify_sources::{DEFAULT_PATTERN, resolve_files};
use minify_tokens::{Encoding, TokenCounter};
use tempfile::TempDir;

fn counter() -> TokenCounter {
    TokenCounter::new(Encoding::O200kBase).unwrap()
}

struct Tree {
    _dir: TempDir,
    source: PathBuf,
    target: PathBuf,
}

fn tree(files: &[(&str, &str)]) -> Tree {
    let dir = tempfile::Builder::new()
        .prefix("minify-")
        .suffix(".test")
        .tempdir()
        .unwrap();
    let source = dir.path().join("src");
    let target = dir.path().join("templates/base/.roo");
    fs::create_dir_all(&source).unwrap();

    for (rel, content) in files {
        let path = source.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    Tree {
        _dir: dir,
        source,
        target,
    }
}

struct Unreachable;

#[async_trait]
impl ChatCompletion for Unreachable {
    async fn complete(&self, _request: &ChatRequest) -> minify_llm::Result<String> {
        Err(LlmError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

struct Halve;

#[async_trait]
impl ChatCompletion for Halve {
    async fn complete(&self, request: &ChatRequest) -> minify_llm::Result<String> {
        let content = &request.messages[1].content;
        Ok(content[..content.len() / 2].to_string())
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl SyncObserver for Recorder {
    fn on_file_start(&self, file: &Path, index: usize, total: usize) {
        let name = file.file_name().unwrap().to_string_lossy();
        self.events
            .lock()
            .unwrap()
            .push(format!("start {} {}/{}", name, index + 1, total));
    }

    fn on_file_done(&self, result: &FileResult) {
        let name = result.file.file_name().unwrap().to_string_lossy();
        self.events.lock().unwrap().push(format!("done {}", name));
    }

    fn on_file_error(&self, file: &Path, _message: &str) {
        let name = file.file_name().unwrap().to_string_lossy();
        self.events.lock().unwrap().push(format!("error {}", name));
    }
}

#[tokio::test]
async fn test_pass_through_copies_bytes() {
    let tree = tree(&[
        ("rules/code.md", "# Code\r\n\r\n- keep **this**\r\n"),
        ("rules/deep/nested.md", "Unicode \u{2713} stays\n"),
        ("top.md", "top"),
    ]);

    let files = resolve_files(&tree.source, DEFAULT_PATTERN, &[], None).unwrap();
    let sync = Synchronizer::new(Compressor::pass_through(counter()), &tree.source, &tree.target);
    let report = sync.run(&files, &NoopObserver).await;

    assert_eq!(report.results.len(), 3);
    for result in &report.results {
        let stats = result.stats().expect("pass-through succeeds");
        assert_eq!(stats.total_ratio(), 1.0);
        assert_eq!(stats.llm_size, None);
        assert_eq!(stats.tokens, None);
        assert_eq!(stats.fallback, None);
        assert_eq!(fs::read(&result.file).unwrap(), fs::read(&result.target).unwrap());
    }

    assert!(tree.target.join("rules/deep/nested.md").is_file());
    assert_eq!(report.summary().overall_ratio(), 1.0);
}

#[tokio::test]
async fn test_pass_through_is_idempotent() {
    let tree = tree(&[("a.md", "alpha\n"), ("b/c.md", "gamma\n")]);
    let files = resolve_files(&tree.source, DEFAULT_PATTERN, &[], None).unwrap();
    let sync = Synchronizer::new(Compressor::pass_through(counter()), &tree.source, &tree.target);

    sync.run(&files, &NoopObserver).await;
    let first: Vec<Vec<u8>> = ["a.md", "b/c.md"]
        .iter()
        .map(|f| fs::read(tree.target.join(f)).unwrap())
        .collect();

    sync.run(&files, &NoopObserver).await;
    let second: Vec<Vec<u8>> = ["a.md", "b/c.md"]
        .iter()
        .map(|f| fs::read(tree.target.join(f)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_overwrites_existing_target() {
    let tree = tree(&[("a.md", "fresh")]);
    fs::create_dir_all(&tree.target).unwrap();
    fs::write(tree.target.join("a.md"), "stale content that is longer").unwrap();

    let sync = Synchronizer::new(Compressor::pass_through(counter()), &tree.source, &tree.target);
    let result = sync.process(&tree.source.join("a.md")).await;

    assert!(result.is_success());
    assert_eq!(fs::read_to_string(tree.target.join("a.md")).unwrap(), "fresh");
}

#[tokio::test]
async fn test_empty_file() {
    let tree = tree(&[("empty.md", "")]);
    let sync = Synchronizer::new(Compressor::pass_through(counter()), &tree.source, &tree.target);
    let result = sync.process(&tree.source.join("empty.md")).await;

    let stats = result.stats().unwrap();
    assert_eq!(stats.original_size, 0);
    assert_eq!(stats.final_size, 0);
    assert_eq!(stats.total_ratio(), 0.0);
    assert_eq!(fs::read(&result.target).unwrap(), b"");
}

#[tokio::test]
async fn test_invalid_utf8_is_recorded_and_run_continues() {
    let tree = tree(&[("good.md", "fine")]);
    fs::write(tree.source.join("bad.md"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
    let files = resolve_files(&tree.source, DEFAULT_PATTERN, &[], None).unwrap();

    let recorder = Recorder::default();
    let sync = Synchronizer::new(Compressor::pass_through(counter()), &tree.source, &tree.target);
    let report = sync.run(&files, &recorder).await;

    let summary = report.summary();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    let failed: Vec<_> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].file.ends_with("bad.md"));
    assert!(failed[0].error_message().unwrap().contains("Failed to read file"));
    assert!(!tree.target.join("bad.md").exists());
    assert!(tree.target.join("good.md").is_file());

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec!["start bad.md 1/2", "error bad.md", "start good.md 2/2", "done good.md"]
    );
}

#[tokio::test]
async fn test_write_failure_is_recorded() {
    let tree = tree(&[("a.md", "alpha")]);
    // A regular file where the target root directory should be
    fs::create_dir_all(tree.target.parent().unwrap()).unwrap();
    fs::write(&tree.target, "in the way").unwrap();

    let sync = Synchronizer::new(Compressor::pass_through(counter()), &tree.source, &tree.target);
    let result = sync.process(&tree.source.join("a.md")).await;

    assert!(!result.is_success());
    assert!(result.error_message().is_some());
}

#[tokio::test]
async fn test_single_file_outside_source_root() {
    let tree = tree(&[]);
    let outside_dir = tree.source.parent().unwrap().join("elsewhere/deeper");
    fs::create_dir_all(&outside_dir).unwrap();
    let outside = outside_dir.join("notes.md");
    fs::write(&outside, "outside").unwrap();

    let files = resolve_files(&tree.source, DEFAULT_PATTERN, &[], Some(&outside)).unwrap();
    let sync = Synchronizer::new(Compressor::pass_through(counter()), &tree.source, &tree.target);
    let report = sync.run(&files, &NoopObserver).await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].target, tree.target.join("notes.md"));
    assert_eq!(fs::read_to_string(tree.target.join("notes.md")).unwrap(), "outside");
}

#[tokio::test]
async fn test_backend_failure_keeps_original_text() {
    let original = "# Heading\n\nPlease make sure that you always **remember** this.\n";
    let tree = tree(&[("doc.md", original)]);

    let compressor = Compressor::with_client(Unreachable, "gpt-4o", counter());
    let sync = Synchronizer::new(compressor, &tree.source, &tree.target);
    let result = sync.process(&tree.source.join("doc.md")).await;

    // Backend errors are absorbed; the file still succeeds
    let stats = result.stats().expect("fallback is not a file error");
    assert_eq!(fs::read_to_string(&result.target).unwrap(), original);
    assert_eq!(stats.final_size, original.len());
    assert_eq!(stats.llm_size, Some(original.len()));

    let tokens = stats.tokens.unwrap();
    assert_eq!(tokens.before, tokens.after);
    assert_eq!(tokens.ratio(), 1.0);

    let reason = stats.fallback.as_deref().expect("fallback reason recorded");
    assert!(reason.contains("503"));
}

#[tokio::test]
async fn test_api_mode_records_token_stats() {
    let original = "abcdefghijklmnopqrstuvwxyz abcdefghijklmnopqrstuvwxyz\n";
    let tree = tree(&[("doc.md", original)]);

    let compressor = Compressor::with_client(Halve, "gpt-4o", counter());
    let sync = Synchronizer::new(compressor, &tree.source, &tree.target);
    let report = sync.run(&[tree.source.join("doc.md")], &NoopObserver).await;

    let stats = report.results[0].stats().unwrap();
    assert_eq!(stats.original_size, original.len());
    assert_eq!(stats.final_size, original.len() / 2);
    assert_eq!(stats.llm_ratio(), Some(stats.total_ratio()));
    assert!(stats.tokens.unwrap().before > stats.tokens.unwrap().after);
    assert_eq!(stats.fallback, None);

    let summary = report.summary();
    assert_eq!(summary.tokens, stats.tokens);
    assert_eq!(summary.fallbacks, 0);
}
