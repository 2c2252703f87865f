//! Integration tests for cfs

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Command isolated to a temporary store and config
    fn cfs(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("cfs");
        cmd.env("CFS_STORE", temp.path().join("store"))
            .env("CFS_CONFIG", temp.path().join("config.toml"));
        cmd
    }

    fn write_file(temp: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        cfs(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("versioned asset cache"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        cfs(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("cfs"));
    }

    #[test]
    fn put_then_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        let file = write_file(&temp, "logo.png", &[137, 80, 78, 71, 0, 255]);
        let out = temp.path().join("out.png");

        cfs(&temp)
            .args(["put", "images/logo.png"])
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("Stored images/logo.png"));

        cfs(&temp)
            .args(["get", "images/logo.png", "-o"])
            .arg(&out)
            .assert()
            .success();

        assert_eq!(fs::read(&out).unwrap(), vec![137, 80, 78, 71, 0, 255]);
    }

    #[test]
    fn get_to_stdout() {
        let temp = TempDir::new().unwrap();
        let file = write_file(&temp, "doc.txt", b"hello v2");

        cfs(&temp)
            .args(["put", "doc.txt?v2"])
            .arg(&file)
            .assert()
            .success();

        cfs(&temp)
            .args(["get", "doc.txt?v2"])
            .assert()
            .success()
            .stdout("hello v2");
    }

    #[test]
    fn versions_lists_each_version_once() {
        let temp = TempDir::new().unwrap();
        let file = write_file(&temp, "doc.txt", b"x");

        for asset in ["doc.txt?v1", "doc.txt?v2", "doc.txt?v2"] {
            cfs(&temp).args(["put", asset]).arg(&file).assert().success();
        }

        cfs(&temp)
            .args(["versions", "doc.txt", "--format", "plain"])
            .assert()
            .success()
            .stdout("v1\nv2\n");
    }

    #[test]
    fn rm_removes_version() {
        let temp = TempDir::new().unwrap();
        let file = write_file(&temp, "doc.txt", b"x");

        cfs(&temp).args(["put", "doc.txt"]).arg(&file).assert().success();
        cfs(&temp)
            .args(["rm", "doc.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed doc.txt"));

        cfs(&temp)
            .args(["versions", "doc.txt", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));

        cfs(&temp)
            .args(["get", "doc.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn get_missing_asset() {
        let temp = TempDir::new().unwrap();
        cfs(&temp)
            .args(["get", "nonexistent.bin?v3"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn invalid_asset_path() {
        let temp = TempDir::new().unwrap();
        cfs(&temp)
            .args(["get", "?"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid asset path"));
    }

    #[test]
    fn expired_asset_is_reported() {
        let temp = TempDir::new().unwrap();
        let file = write_file(&temp, "old.css", b"body {}");
        fs::write(
            temp.path().join("config.toml"),
            "[cache]\nmax_age_ms = 0\n",
        )
        .unwrap();

        cfs(&temp).args(["put", "old.css"]).arg(&file).assert().success();
        std::thread::sleep(std::time::Duration::from_millis(20));

        cfs(&temp)
            .args(["get", "old.css"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expired"));

        cfs(&temp)
            .args(["versions", "old.css", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No versions"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        cfs(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        cfs(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        cfs(&temp).args(["config", "init"]).assert().success();

        let written = fs::read_to_string(temp.path().join("config.toml")).unwrap();
        assert!(written.contains("auto_save = true"));

        cfs(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));
    }
}
