//! Integration tests for Larder

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn larder() -> Command {
        cargo_bin_cmd!("larder")
    }

    /// Point the global config at a nonexistent file inside `temp` so the
    /// developer's real configuration never leaks into a test.
    fn isolated(temp: &TempDir) -> Command {
        let mut cmd = larder();
        cmd.env("LARDER_CONFIG", temp.path().join("no-config.toml"));
        cmd.arg("--no-local");
        cmd
    }

    #[test]
    fn help_displays() {
        larder()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Build-time external dependency cache",
            ));
    }

    #[test]
    fn version_displays() {
        larder()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("larder"));
    }

    #[test]
    fn config_path() {
        larder()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"))
            .stdout(predicate::str::contains("[npm]"));
    }

    #[test]
    fn populate_empty_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("externals.json");
        std::fs::write(&manifest, "{}").unwrap();

        isolated(&temp)
            .args(["populate", "--manifest"])
            .arg(&manifest)
            .arg("--root")
            .arg(temp.path().join("cache"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing to cache"));
    }

    #[test]
    fn populate_without_manifests_warns() {
        let temp = TempDir::new().unwrap();
        let tree = temp.path().join("empty-tree");
        std::fs::create_dir_all(&tree).unwrap();

        isolated(&temp)
            .arg("populate")
            .arg(&tree)
            .arg("--root")
            .arg(temp.path().join("cache"))
            .assert()
            .success()
            .stdout(predicate::str::contains("No externals.json manifests found"));
    }

    #[test]
    fn populate_discovers_nested_manifests() {
        let temp = TempDir::new().unwrap();
        let task = temp.path().join("tree").join("Tasks").join("MyTask");
        std::fs::create_dir_all(&task).unwrap();
        std::fs::write(task.join("externals.json"), "{}").unwrap();

        isolated(&temp)
            .arg("populate")
            .arg(temp.path().join("tree"))
            .arg("--root")
            .arg(temp.path().join("cache"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Loading"))
            .stdout(predicate::str::contains("Nothing to cache"));
    }

    #[test]
    fn populate_rejects_invalid_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("externals.json");
        std::fs::write(&manifest, r#"{ "npm": { "lodash": "" } }"#).unwrap();

        isolated(&temp)
            .args(["populate", "--manifest"])
            .arg(&manifest)
            .arg("--root")
            .arg(temp.path().join("cache"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid manifest"));
    }

    #[test]
    fn populate_missing_manifest_fails() {
        let temp = TempDir::new().unwrap();

        isolated(&temp)
            .args(["populate", "--manifest"])
            .arg(temp.path().join("does-not-exist.json"))
            .arg("--root")
            .arg(temp.path().join("cache"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn populate_unreachable_archive_fails_and_keeps_partial() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("externals.json");
        // discard-port URL: the connection fails without touching the network
        std::fs::write(
            &manifest,
            r#"{ "archivePackages": [ { "url": "http://127.0.0.1:9/tool.zip" } ] }"#,
        )
        .unwrap();
        let root = temp.path().join("cache");

        isolated(&temp)
            .args(["populate", "--manifest"])
            .arg(&manifest)
            .arg("--root")
            .arg(&root)
            .assert()
            .failure()
            .stderr(predicate::str::contains("tool.zip"));

        // partial directory stays behind for inspection, no entry promoted
        assert!(root
            .join("partial/archive/http___127.0.0.1_9_tool.zip")
            .is_dir());
        assert!(!root.join("archive/http___127.0.0.1_9_tool.zip").exists());
    }

    #[test]
    fn populate_skips_already_cached_archive() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("externals.json");
        std::fs::write(
            &manifest,
            r#"{ "archivePackages": [ { "url": "http://127.0.0.1:9/tool.zip" } ] }"#,
        )
        .unwrap();
        let root = temp.path().join("cache");
        // pre-existing entry short-circuits before any network I/O
        std::fs::create_dir_all(root.join("archive/http___127.0.0.1_9_tool.zip")).unwrap();

        isolated(&temp)
            .args(["populate", "--manifest"])
            .arg(&manifest)
            .arg("--root")
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("1 already present"));
    }

    #[test]
    fn list_empty_root() {
        let temp = TempDir::new().unwrap();

        isolated(&temp)
            .args(["list", "--root"])
            .arg(temp.path().join("cache"))
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache entries found"));
    }

    #[test]
    fn list_shows_entries() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        std::fs::create_dir_all(root.join("npm/lodash/4.17.0")).unwrap();
        std::fs::create_dir_all(root.join("archive/https___x_y.zip")).unwrap();

        isolated(&temp)
            .args(["list", "--root"])
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("lodash/4.17.0"))
            .stdout(predicate::str::contains("https___x_y.zip"))
            .stdout(predicate::str::contains("Total: 2"));
    }

    #[test]
    fn list_json_format() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        std::fs::create_dir_all(root.join("npm/lodash/4.17.0")).unwrap();

        isolated(&temp)
            .args(["list", "--format", "json", "--root"])
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"category\": \"npm\""))
            .stdout(predicate::str::contains("\"key\": \"lodash/4.17.0\""));
    }

    #[test]
    fn clean_requires_target_flag() {
        larder().arg("clean").assert().failure();
    }

    #[test]
    fn clean_partial_removes_staging() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        std::fs::create_dir_all(root.join("partial/npm/lodash/4.17.0")).unwrap();
        std::fs::create_dir_all(root.join("npm/lodash/4.17.0")).unwrap();

        isolated(&temp)
            .args(["clean", "--partial", "-y", "--root"])
            .arg(&root)
            .assert()
            .success();

        // staging gone, entries untouched
        assert!(!root.join("partial").exists());
        assert!(root.join("npm/lodash/4.17.0").is_dir());
    }

    #[test]
    fn clean_nothing_to_do() {
        let temp = TempDir::new().unwrap();

        isolated(&temp)
            .args(["clean", "--partial", "-y", "--root"])
            .arg(temp.path().join("cache"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing to clean"));
    }

    #[test]
    fn clean_all_removes_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        std::fs::create_dir_all(root.join("npm/lodash/4.17.0")).unwrap();

        isolated(&temp)
            .args(["clean", "--all", "-y", "--root"])
            .arg(&root)
            .assert()
            .success();

        assert!(!root.exists());
    }

    #[test]
    fn status_runs() {
        // Status may warn if npm isn't installed, but should not panic
        let temp = TempDir::new().unwrap();
        let _ = isolated(&temp).arg("status").assert();
    }
}
