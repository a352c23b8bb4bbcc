use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn facturier_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("facturier"))
}

fn init_config(config_path: &std::path::Path) {
    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();
}

fn write_state(config_path: &std::path::Path, state: &str) {
    fs::write(config_path.join("state.toml"), state).unwrap();
}

fn write_clients(config_path: &std::path::Path, clients: &str) {
    fs::write(config_path.join("clients.toml"), clients).unwrap();
}

#[test]
fn test_help() {
    facturier_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CLI business management for an events staffing agency",
        ));
}

#[test]
fn test_version() {
    facturier_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("facturier"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized facturier config"));

    // Check files were created
    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("clients.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    // Second init should fail
    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status_shows_next_numbers() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Facturier Status"))
        .stdout(predicate::str::contains("Next quote:"))
        .stdout(predicate::str::contains("DEV/"))
        .stdout(predicate::str::contains("Next invoice:"))
        .stdout(predicate::str::contains("FAC/"));
}

#[test]
fn test_clients_list() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "clients"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exemple-client"))
        .stdout(predicate::str::contains("Exemple Client SARL"));
}

#[test]
fn test_quote_new_missing_client() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "new",
            "--client",
            "nonexistent",
            "--event-date",
            "2030-05-01",
            "--line",
            "Hôtesses accueil:4:3:800:20",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client 'nonexistent' not found"));
}

#[test]
fn test_quote_new_missing_event_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "new",
            "--client",
            "exemple-client",
            "--line",
            "Hôtesses accueil:4:3:800:20",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing event date"));
}

#[test]
fn test_quote_new_no_lines() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "new",
            "--client",
            "exemple-client",
            "--event-date",
            "2030-05-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No lines specified"));
}

#[test]
fn test_quote_new_invalid_line_format() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "new",
            "--client",
            "exemple-client",
            "--event-date",
            "2030-05-01",
            "--line",
            "Hôtesses accueil:4",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid line format"));
}

#[test]
fn test_quote_new_rejects_bad_vat_rate() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "new",
            "--client",
            "exemple-client",
            "--event-date",
            "2030-05-01",
            "--line",
            "Hôtesses accueil:4:3:800:7",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TVA must be 0 or 20"));
}

#[test]
fn test_quote_new_rejects_zero_price() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "new",
            "--client",
            "exemple-client",
            "--event-date",
            "2030-05-01",
            "--line",
            "Hôtesses accueil:4:3:0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "description and a unit price greater than zero",
        ));
}

#[test]
fn test_quote_new_and_list() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "new",
            "--client",
            "exemple-client",
            "--event-date",
            "2030-05-01",
            "--line",
            "Hôtesses accueil:4:3:800:20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created DEV/"))
        .stdout(predicate::str::contains("11 520,00 MAD"));

    // Future event, not invoiced: pending
    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "quote", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEV/"))
        .stdout(predicate::str::contains("01/05/2030"))
        .stdout(predicate::str::contains("EN ATTENTE"));
}

fn quote_fixture() -> &'static str {
    r#"[quote_counter]
last_number = 1
last_year = 2026

[invoice_counter]
last_number = 0
last_year = 2026

[[quotes]]
number = "DEV/2026/0001"
client = "exemple-client"
date = "2026-01-05"
event_date = "2026-01-20"
term = "30 jours fin de mois"
invoiced = false

[[quotes.lines]]
description = "Hôtesses accueil"
staff_count = 4
days = 3
unit_price = 800.0
vat_rate = 20.0
"#
}

#[test]
fn test_quote_past_event_is_to_invoice() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, quote_fixture());

    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "quote", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("À FACTURER"));
}

#[test]
fn test_invoice_from_quote_copies_totals_and_derives_due_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, quote_fixture());

    // "30 jours fin de mois" from 2026-01-06: last day of February 2026
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "invoice",
            "DEV/2026/0001",
            "--date",
            "2026-01-06",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Created FAC/2026/0001 from DEV/2026/0001",
        ))
        .stdout(predicate::str::contains("28/02/2026"))
        .stdout(predicate::str::contains("11 520,00 MAD"));

    // The quote is now frozen as invoiced
    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "quote", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FACTURÉ"));

    // A second derivation is refused
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "invoice",
            "DEV/2026/0001",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already invoiced"));
}

#[test]
fn test_invoice_new_direct_with_fixed_term() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "invoice",
            "new",
            "--client",
            "exemple-client",
            "--date",
            "2026-01-01",
            "--term",
            "15 jours",
            "--line",
            "Serveurs:2:1:500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created FAC/2026/0001"))
        .stdout(predicate::str::contains("16/01/2026"))
        .stdout(predicate::str::contains("1 200,00 MAD"));
}

#[test]
fn test_invoice_new_rejects_unknown_term() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "invoice",
            "new",
            "--client",
            "exemple-client",
            "--term",
            "45 jours",
            "--line",
            "Serveurs:2:1:500",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown payment term"));
}

fn invoice_fixture() -> &'static str {
    r#"[quote_counter]
last_number = 0
last_year = 2026

[invoice_counter]
last_number = 3
last_year = 2026

[[invoices]]
number = "FAC/2026/0001"
client = "exemple-client"
date = "2026-01-10"
due_date = "2020-01-01"
term = "30 jours"
paid = false

[[invoices.lines]]
description = "Hôtesses accueil"
staff_count = 1
days = 1
unit_price = 100.0
vat_rate = 0.0

[[invoices]]
number = "FAC/2026/0002"
client = "exemple-client"
date = "2026-01-11"
due_date = "2020-02-01"
term = "30 jours"
paid = true

[[invoices.lines]]
description = "Serveurs"
staff_count = 2
days = 1
unit_price = 100.0
vat_rate = 0.0

[[invoices]]
number = "FAC/2026/0003"
client = "exemple-client"
date = "2026-01-12"
term = "30 jours"
paid = false

[[invoices.lines]]
description = "Maîtres d'hôtel"
staff_count = 3
days = 1
unit_price = 100.0
vat_rate = 0.0
"#
}

#[test]
fn test_invoice_list_statuses_and_financial_footer() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    // Overdue (due 2020), paid wins over its past due date, and the
    // invoice without a due date stays unpaid.
    facturier_cmd()
        .args(["-C", config_path.to_str().unwrap(), "invoice", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EN RETARD"))
        .stdout(predicate::str::contains("PAYÉE"))
        .stdout(predicate::str::contains("IMPAYÉE"))
        .stdout(predicate::str::contains("TOTAL TTC"))
        .stdout(predicate::str::contains("(-) PAYÉ"))
        .stdout(predicate::str::contains("(=) SOLDE"))
        .stdout(predicate::str::contains("600 MAD"))
        .stdout(predicate::str::contains("200 MAD"))
        .stdout(predicate::str::contains("400 MAD"));
}

#[test]
fn test_mark_paid_is_terminal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "invoice",
            "mark-paid",
            "FAC/2026/0001",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked FAC/2026/0001 as paid"));

    // Marking again fails: paid is a terminal state
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "invoice",
            "mark-paid",
            "FAC/2026/0001",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already marked paid"));
}

#[test]
fn test_invoice_edit_date_recomputes_due_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    // Changing the issue date recomputes the due date from the term
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "invoice",
            "edit",
            "FAC/2026/0001",
            "--date",
            "2026-02-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated FAC/2026/0001"))
        .stdout(predicate::str::contains("03/03/2026"));
}

#[test]
fn test_invoice_edit_lines_keeps_stored_due_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    // A line-only edit leaves the stored due date untouched
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "invoice",
            "edit",
            "FAC/2026/0001",
            "--line",
            "Hôtesses accueil:2:2:100:0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("01/01/2020"))
        .stdout(predicate::str::contains("400,00 MAD"));
}

#[test]
fn test_delete_by_index_uses_newest_first_order() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "invoice",
            "delete",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted FAC/2026/0003"));
}

#[test]
fn test_export_clients_csv_quotes_delimiter() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_clients(
        &config_path,
        r#"[royale]
company_name = "Agence;Royale"
ice = "001234567000089"
address = "45 Avenue Client"
city = "Casablanca"
phone = "+212 5 22 11 22 33"
email = "contact@royale.ma"
"#,
    );

    let out_path = temp_dir.path().join("clients.csv");
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "clients",
            "--format",
            "csv",
            "--output",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 clients"));

    let content = fs::read_to_string(&out_path).unwrap();
    assert!(content.starts_with('\u{feff}'));
    assert!(content.contains("Société;ICE;Adresse"));
    // The delimiter inside the name is preserved by quoting
    assert!(content.contains("\"Agence;Royale\""));
}

#[test]
fn test_export_invoices_csv_carries_totals() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, quote_fixture());

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "quote",
            "invoice",
            "DEV/2026/0001",
            "--date",
            "2026-01-06",
        ])
        .assert()
        .success();

    let out_path = temp_dir.path().join("factures.csv");
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "invoices",
            "--output",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out_path).unwrap();
    assert!(content.contains("Numéro;Client;Date émission;Date échéance"));
    assert!(content.contains("FAC/2026/0001"));
    assert!(content.contains("9 600,00 MAD"));
    assert!(content.contains("1 920,00 MAD"));
    assert!(content.contains("11 520,00 MAD"));
    assert!(content.contains("28/02/2026"));
}

#[test]
fn test_export_quotes_html_uses_accent_property() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, quote_fixture());

    let out_path = temp_dir.path().join("devis.html");
    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "quotes",
            "--format",
            "html",
            "--output",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out_path).unwrap();
    assert!(content.contains("<table>"));
    assert!(content.contains("<th>Numéro</th>"));
    assert!(content.contains("--accent: hsl("));
    assert!(content.contains("DEV/2026/0001"));
}

#[test]
fn test_summary_for_year() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "summary",
            "--year",
            "2026",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary 2026"))
        .stdout(predicate::str::contains("600,00 MAD"))
        .stdout(predicate::str::contains("200,00 MAD"))
        .stdout(predicate::str::contains("400,00 MAD"));
}

#[test]
fn test_report_rejects_bad_status_filter() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--client",
            "exemple-client",
            "--status",
            "late",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --status value"));
}

#[test]
fn test_report_no_matching_invoices() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("facturier-config");

    init_config(&config_path);
    write_state(&config_path, invoice_fixture());

    facturier_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--client",
            "exemple-client",
            "--from",
            "2030-01-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No invoices found"));
}
