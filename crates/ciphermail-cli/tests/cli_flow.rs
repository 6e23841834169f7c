use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ciphermail"))
}

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("mail.db")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        let home = self.dir.path();
        cmd.env_clear()
            .env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_DATA_HOME", home.join("data"))
            .env("CIPHERMAIL_DB", self.db_path())
            .env("NO_COLOR", "1")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str], password: &str, key: Option<&str>) -> Output {
        let mut cmd = self.command();
        cmd.args(args).env("CIPHERMAIL_PASSWORD", password);
        if let Some(key) = key {
            cmd.env("CIPHERMAIL_MESSAGE_KEY", key);
        }
        cmd.output().expect("run ciphermail")
    }

    fn register(&self, username: &str, password: &str) {
        let output = self.run(&["register", username], password, None);
        assert!(output.status.success(), "{}", stderr(&output));
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn inbox(env: &Env, user: &str, password: &str) -> Vec<serde_json::Value> {
    let output = env.run(&["inbox", "--user", user, "--json"], password, None);
    assert!(output.status.success(), "{}", stderr(&output));
    serde_json::from_str(&stdout(&output)).expect("inbox json")
}

fn file_contains(path: &Path, needle: &str) -> bool {
    let bytes = std::fs::read(path).expect("read db");
    bytes
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[test]
fn test_send_and_read_flow() {
    let env = Env::new();
    env.register("alice", "alice-pw");
    env.register("bob", "bob-pw");

    let sent = env.run(
        &[
            "send",
            "--user",
            "alice",
            "--to",
            "@bob",
            "--message",
            "meet at noon",
        ],
        "alice-pw",
        Some("pineapple"),
    );
    assert!(sent.status.success(), "{}", stderr(&sent));
    assert!(!file_contains(&env.db_path(), "meet at noon"));

    let unread = inbox(&env, "bob", "bob-pw");
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0]["sender"], "alice");
    assert!(unread[0].get("ciphertext").is_none());

    // Wrong key: auth failure, message stays unread.
    let failed = env.run(&["read", "--user", "bob", "1"], "bob-pw", Some("mango"));
    assert_eq!(failed.status.code(), Some(4));
    assert!(stderr(&failed).contains("Decryption failed"));
    assert_eq!(inbox(&env, "bob", "bob-pw").len(), 1);

    let read = env.run(&["read", "--user", "bob", "1"], "bob-pw", Some("pineapple"));
    assert!(read.status.success(), "{}", stderr(&read));
    assert!(stdout(&read).contains("meet at noon"));

    assert!(inbox(&env, "bob", "bob-pw").is_empty());
}

#[test]
fn test_read_by_id_and_quiet_send() {
    let env = Env::new();
    env.register("alice", "pw");
    env.register("bob", "pw");

    let sent = env.run(
        &["-q", "send", "-u", "alice", "-t", "bob", "-m", "hello"],
        "pw",
        Some(""),
    );
    assert!(sent.status.success(), "{}", stderr(&sent));
    let id = stdout(&sent).trim().to_string();
    assert_eq!(id.len(), 36);

    let read = env.run(&["-q", "read", "-u", "bob", &id], "pw", Some(""));
    assert!(read.status.success(), "{}", stderr(&read));
    assert_eq!(stdout(&read).trim(), "hello");
}

#[test]
fn test_cannot_read_someone_elses_message() {
    let env = Env::new();
    env.register("alice", "pw");
    env.register("bob", "pw");
    env.register("eve", "pw");

    let sent = env.run(
        &["-q", "send", "-u", "alice", "-t", "bob", "-m", "secret"],
        "pw",
        Some("k"),
    );
    let id = stdout(&sent).trim().to_string();

    let read = env.run(&["read", "-u", "eve", &id], "pw", Some("k"));
    assert_eq!(read.status.code(), Some(3));
    assert_eq!(inbox(&env, "bob", "pw").len(), 1);
}

#[test]
fn test_send_to_unknown_recipient() {
    let env = Env::new();
    env.register("alice", "pw");

    let output = env.run(
        &["send", "-u", "alice", "-t", "ghost", "-m", "hi"],
        "pw",
        Some("k"),
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("@ghost"));
}

#[test]
fn test_wrong_password_is_rejected() {
    let env = Env::new();
    env.register("alice", "right");

    let output = env.run(&["inbox", "-u", "alice"], "wrong", None);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_duplicate_registration() {
    let env = Env::new();
    env.register("alice", "pw");

    let output = env.run(&["register", "@alice"], "pw", None);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("already exists"));
}

#[test]
fn test_init_writes_config() {
    let env = Env::new();
    let db = env.dir.path().join("custom").join("init.db");

    let output = env.run(&["init", db.to_str().expect("utf8 path")], "", None);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(db.exists());

    let config = env.dir.path().join("config").join("ciphermail").join("config.toml");
    let contents = std::fs::read_to_string(&config).expect("config written");
    assert!(contents.contains("init.db"));

    let again = env.run(&["init", db.to_str().expect("utf8 path")], "", None);
    assert_eq!(again.status.code(), Some(2));
}
