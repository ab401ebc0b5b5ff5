use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a test command
fn azctl() -> Command {
    Command::cargo_bin("azctl").unwrap()
}

#[test]
fn test_help_flag() {
    azctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage Azure Batch accounts"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_help_short_flag() {
    azctl()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    azctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("azctl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_shows_help() {
    azctl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    azctl()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_pool_help() {
    azctl()
        .arg("pool")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage pools"));
}

#[test]
fn test_vault_help() {
    azctl()
        .arg("vault")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage Key Vault vaults"));
}

#[test]
fn test_key_help_lists_update_expiry() {
    azctl()
        .arg("key")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update-expiry"))
        .stdout(predicate::str::contains("encrypt"));
}

#[test]
fn test_profile_help() {
    azctl()
        .arg("profile")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage configuration profiles"));
}

#[test]
fn test_output_format_json() {
    let dir = tempfile::tempdir().unwrap();
    azctl()
        .arg("--config-file")
        .arg(dir.path().join("config.toml"))
        .arg("profile")
        .arg("list")
        .arg("-o")
        .arg("json")
        .assert()
        .success();
}

#[test]
fn test_output_format_yaml() {
    let dir = tempfile::tempdir().unwrap();
    azctl()
        .arg("--config-file")
        .arg(dir.path().join("config.toml"))
        .arg("profile")
        .arg("list")
        .arg("-o")
        .arg("yaml")
        .assert()
        .success();
}

#[test]
fn test_invalid_output_format() {
    azctl()
        .arg("profile")
        .arg("list")
        .arg("-o")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_multiple_verbose_flags() {
    let dir = tempfile::tempdir().unwrap();
    azctl()
        .arg("-vvv")
        .arg("--config-file")
        .arg(dir.path().join("config.toml"))
        .arg("profile")
        .arg("list")
        .assert()
        .success();
}

#[test]
fn test_pool_create_requires_configuration_flags() {
    azctl()
        .arg("pool")
        .arg("create")
        .arg("mypool")
        .arg("--vm-size")
        .arg("STANDARD_D1_V2")
        .arg("--os-family")
        .arg("5")
        .arg("--image-publisher")
        .arg("canonical")
        .arg("--image-offer")
        .arg("ubuntu-24_04-lts")
        .arg("--image-sku")
        .arg("server")
        .arg("--node-agent")
        .arg("batch.node.ubuntu 24.04")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_account_create_requires_storage_or_application() {
    azctl()
        .arg("account")
        .arg("create")
        .arg("myacct")
        .arg("-g")
        .arg("rg")
        .arg("--region")
        .arg("westus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_profile_set_and_list_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    azctl()
        .arg("--config-file")
        .arg(&config)
        .arg("profile")
        .arg("set")
        .arg("test")
        .arg("--subscription-id")
        .arg("sub-1")
        .arg("--tenant-id")
        .arg("tenant-1")
        .arg("--client-id")
        .arg("client-1")
        .arg("--client-secret")
        .arg("s3cret")
        .arg("--default")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));

    azctl()
        .arg("--config-file")
        .arg(&config)
        .arg("profile")
        .arg("list")
        .arg("-o")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("sub-1"))
        .stdout(predicate::str::contains("\"is_default\": true"));
}

#[test]
fn test_profile_show_redacts_secret() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    azctl()
        .arg("--config-file")
        .arg(&config)
        .arg("profile")
        .arg("set")
        .arg("test")
        .arg("--subscription-id")
        .arg("sub-1")
        .arg("--tenant-id")
        .arg("tenant-1")
        .arg("--client-id")
        .arg("client-1")
        .arg("--client-secret")
        .arg("super-secret-value")
        .assert()
        .success();

    azctl()
        .arg("--config-file")
        .arg(&config)
        .arg("profile")
        .arg("show")
        .arg("test")
        .arg("-o")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("super-secret-value").not());
}

#[test]
fn test_profile_remove_missing_fails() {
    let dir = tempfile::tempdir().unwrap();
    azctl()
        .arg("--config-file")
        .arg(dir.path().join("config.toml"))
        .arg("profile")
        .arg("remove")
        .arg("ghost")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_batch_command_without_endpoint_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    azctl()
        .arg("--config-file")
        .arg(&config)
        .arg("profile")
        .arg("set")
        .arg("test")
        .arg("--subscription-id")
        .arg("sub-1")
        .arg("--tenant-id")
        .arg("tenant-1")
        .arg("--client-id")
        .arg("client-1")
        .arg("--client-secret")
        .arg("s3cret")
        .assert()
        .success();

    azctl()
        .arg("--config-file")
        .arg(&config)
        .arg("pool")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch endpoint"));
}
