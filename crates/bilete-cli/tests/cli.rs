use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tickets.json")
}

fn output(config_home: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("bilete")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("BILETE_TOKEN")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(config_home: &Path, args: &[&str]) -> String {
    let output = output(config_home, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(config_home: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = output(config_home, &full);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn ids(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn cli_phone_normalize_and_check() {
    let temp = TempDir::new().expect("temp dir");

    let out = run_cmd(temp.path(), &["phone", "normalize", "0722 123 456"]);
    assert_eq!(out.trim(), "+40722123456");

    let out = run_cmd(temp.path(), &["phone", "normalize", "12345"]);
    assert_eq!(out.trim(), "12345");

    let dto = run_cmd_json(temp.path(), &["phone", "normalize", "40722123456"]);
    assert_eq!(dto["normalized"], "+40722123456");
    assert_eq!(dto["valid"], true);

    let out = run_cmd(temp.path(), &["phone", "check", "+40 (722) 123-456"]);
    assert_eq!(out.trim(), "valid +40722123456");

    let invalid = output(temp.path(), &["phone", "check", "0722"]);
    assert_eq!(invalid.status.code(), Some(3));
}

#[test]
fn cli_tickets_list_filters_and_pages() {
    let temp = TempDir::new().expect("temp dir");
    let file = fixture();
    let file = file.to_str().expect("fixture path");

    let all = run_cmd_json(temp.path(), &["tickets", "list", "--file", file]);
    assert_eq!(all["total_filtered"], 7);
    assert_eq!(all["total_pages"], 1);
    assert_eq!(all["current_page"], 1);

    let narrowed = run_cmd_json(
        temp.path(),
        &[
            "tickets",
            "list",
            "--file",
            file,
            "--status",
            "verified",
            "--type",
            "BAL + AFTER",
        ],
    );
    assert_eq!(ids(&narrowed), vec!["t4"]);

    let searched = run_cmd_json(
        temp.path(),
        &["tickets", "list", "--file", file, "--search", "  POP "],
    );
    assert_eq!(ids(&searched), vec!["t1", "t4"]);

    let queried = run_cmd_json(
        temp.path(),
        &["tickets", "list", "--file", file, "--query", "sent:not-sent status:pending"],
    );
    assert_eq!(ids(&queried), vec!["t2", "t6", "t7"]);

    let second = run_cmd_json(
        temp.path(),
        &["tickets", "list", "--file", file, "--per-page", "2", "--page", "2"],
    );
    assert_eq!(ids(&second), vec!["t3", "t4"]);
    assert_eq!(second["first_index"], 2);
    assert_eq!(second["total_pages"], 4);

    let beyond = run_cmd_json(
        temp.path(),
        &["tickets", "list", "--file", file, "--page", "9"],
    );
    assert!(ids(&beyond).is_empty());
    assert_eq!(beyond["current_page"], 9);

    let text = run_cmd(
        temp.path(),
        &["tickets", "list", "--file", file, "--per-page", "3", "--page", "3"],
    );
    assert!(text.contains("Maria Georgescu"));
    assert!(text.contains("page 3/3  showing 7-7 of 7"));
}

#[test]
fn cli_tickets_list_rejects_bad_selectors() {
    let temp = TempDir::new().expect("temp dir");
    let file = fixture();
    let file = file.to_str().expect("fixture path");

    let bad_status = output(
        temp.path(),
        &["tickets", "list", "--file", file, "--status", "done"],
    );
    assert_eq!(bad_status.status.code(), Some(3));

    let bad_quote = output(
        temp.path(),
        &["tickets", "list", "--file", file, "--query", "type:\"BAL"],
    );
    assert_eq!(bad_quote.status.code(), Some(3));

    let page_zero = output(
        temp.path(),
        &["tickets", "list", "--file", file, "--page", "0"],
    );
    assert_eq!(page_zero.status.code(), Some(3));
}

#[test]
fn cli_tickets_summary_uses_price_table() {
    let temp = TempDir::new().expect("temp dir");
    let file = fixture();
    let file = file.to_str().expect("fixture path");

    let summary = run_cmd_json(temp.path(), &["tickets", "summary", "--file", file]);
    assert_eq!(summary["count"], 7);
    assert_eq!(summary["total_cost"], 780);
    assert_eq!(summary["currency"], "RON");

    let text = run_cmd(temp.path(), &["tickets", "summary", "--file", file]);
    assert_eq!(text.trim(), "7 tickets, total 780 RON");
}

#[test]
fn cli_tickets_show_and_share_from_file() {
    let temp = TempDir::new().expect("temp dir");
    let file = fixture();
    let file = file.to_str().expect("fixture path");

    let detail = run_cmd_json(temp.path(), &["tickets", "show", "t3", "--file", file]);
    assert_eq!(detail["nume"], "Ioana Marin");
    assert_eq!(detail["verification_count"], 2);

    let link = run_cmd(temp.path(), &["tickets", "share", "t1", "--file", file]);
    assert!(link.trim().starts_with("https://wa.me/40722123456?text="));

    let share = run_cmd_json(temp.path(), &["tickets", "share", "t1", "--file", file]);
    assert_eq!(
        share["public_link"],
        "https://www.site-bilete.shop/api/tickets/t1/custom-public"
    );
    assert!(share["message"]
        .as_str()
        .expect("message")
        .starts_with("*Bilet BAL*"));

    let missing = output(temp.path(), &["tickets", "show", "nope", "--file", file]);
    assert_eq!(missing.status.code(), Some(2));
}

#[test]
fn cli_reads_config_file() {
    let temp = TempDir::new().expect("temp dir");
    let config_dir = temp.path().join("bilete");
    fs::create_dir_all(&config_dir).expect("config dir");
    let config_path = config_dir.join("config.toml");
    fs::write(
        &config_path,
        "items_per_page = 3\n\n[prices]\n\"VIP PROMO\" = 40\n",
    )
    .expect("write config");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))
            .expect("chmod config");
    }

    let file = fixture();
    let file = file.to_str().expect("fixture path");

    let page = run_cmd_json(temp.path(), &["tickets", "list", "--file", file]);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(ids(&page), vec!["t1", "t2", "t3"]);

    let summary = run_cmd_json(temp.path(), &["tickets", "summary", "--file", file]);
    assert_eq!(summary["total_cost"], 820);
}

#[test]
fn cli_rejects_unknown_config_keys() {
    let temp = TempDir::new().expect("temp dir");
    let config_path = temp.path().join("custom.toml");
    fs::write(&config_path, "rows_per_page = 10\n").expect("write config");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))
            .expect("chmod config");
    }

    let out = output(
        temp.path(),
        &[
            "--config",
            config_path.to_str().expect("config path"),
            "phone",
            "normalize",
            "0722123456",
        ],
    );
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn cli_completions() {
    let temp = TempDir::new().expect("temp dir");
    let out = run_cmd(temp.path(), &["completions", "bash"]);
    assert!(out.contains("bilete"));
}

#[test]
fn cli_verify_rejects_bad_input_before_calling_api() {
    let temp = TempDir::new().expect("temp dir");

    let bad_phone = output(temp.path(), &["verify", "phone", "0722"]);
    assert_eq!(bad_phone.status.code(), Some(3));

    let empty_qr = output(temp.path(), &["verify", "qr", "  "]);
    assert_eq!(empty_qr.status.code(), Some(3));

    let blank_id = output(temp.path(), &["tickets", "mark-sent", " "]);
    assert_eq!(blank_id.status.code(), Some(3));

    let unknown_type = output(temp.path(), &["tickets", "set-type", "t1", "GOLD"]);
    assert_eq!(unknown_type.status.code(), Some(3));
}

#[test]
fn cli_account_and_group_commands_validate_input_first() {
    let temp = TempDir::new().expect("temp dir");

    let no_code = output(
        temp.path(),
        &[
            "register",
            "--username",
            "ana",
            "--password",
            "secret",
            "--referral-code",
            "  ",
        ],
    );
    assert_eq!(no_code.status.code(), Some(3));

    let no_user = output(
        temp.path(),
        &[
            "register",
            "--username",
            " ",
            "--password",
            "secret",
            "--referral-code",
            "LIC2",
        ],
    );
    assert_eq!(no_user.status.code(), Some(3));

    let blank_group = output(temp.path(), &["tickets", "logs", " "]);
    assert_eq!(blank_group.status.code(), Some(3));

    let blank_qr = output(temp.path(), &["tickets", "qr", ""]);
    assert_eq!(blank_qr.status.code(), Some(3));
}

#[test]
fn cli_share_refuses_invalid_holder_phone() {
    let temp = TempDir::new().expect("temp dir");
    let file = temp.path().join("tickets.json");
    fs::write(
        &file,
        r#"[{"_id":"x1","nume":"Fara Telefon","telefon":"12345","tip_bilet":"BAL"}]"#,
    )
    .expect("write tickets");

    let out = output(
        temp.path(),
        &["tickets", "share", "x1", "--file", file.to_str().expect("path")],
    );
    assert_eq!(out.status.code(), Some(3));
    assert!(out.stdout.is_empty());
}

#[test]
fn cli_list_survives_off_format_timestamps() {
    let temp = TempDir::new().expect("temp dir");
    let file = temp.path().join("tickets.json");
    fs::write(
        &file,
        r#"{"tickets":[
            {"_id":"a","nume":"Ana","created_at":"2024-05-01T12:00:00Z"},
            {"_id":"b","nume":"Bogdan","created_at":"2024-05-01 12:00:00","verification_count":"2"}
        ]}"#,
    )
    .expect("write tickets");

    let page = run_cmd_json(
        temp.path(),
        &["tickets", "list", "--file", file.to_str().expect("path")],
    );
    assert_eq!(ids(&page), vec!["a", "b"]);
}

#[test]
fn cli_quoted_query_text_is_searched_literally() {
    let temp = TempDir::new().expect("temp dir");
    let file = fixture();
    let file = file.to_str().expect("fixture path");

    let out = output(
        temp.path(),
        &["tickets", "list", "--file", file, "--query", "\"status:pending\""],
    );
    assert!(out.status.success(), "command failed: {:?}", out);
    let text = String::from_utf8(out.stdout).expect("utf8");
    assert_eq!(text.trim(), "no tickets");
}
