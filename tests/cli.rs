use assert_fs::fixture::*;
use predicates::prelude::*;
use assert_cmd::Command;

#[test]
fn welcome_without_profile() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    Command::cargo_bin("pbk")?
        .current_dir(dir.path())
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to pbackup!"))
        .stdout(predicate::str::contains("Profile does not exist"))
        .stdout(predicate::str::contains("profile.txt"))
        .stdout(predicate::str::contains("Bye!"));

    dir.close()?;
    Ok(())
}

#[test]
fn help_then_exit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    Command::cargo_bin("pbk")?
        .current_dir(dir.path())
        .write_stdin("help\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("All commands:"))
        .stdout(predicate::str::contains("* 'restore' or 'load'"));

    dir.close()?;
    Ok(())
}

#[test]
fn unknown_command_keeps_running() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    Command::cargo_bin("pbk")?
        .current_dir(dir.path())
        .write_stdin("frobnicate\nversion\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Unknown command: frobnicate"))
        .stdout(predicate::str::contains("pbackup 0.1.0"));

    dir.close()?;
    Ok(())
}

#[test]
fn store_and_find_with_profile_argument() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let target = dir.child("save.dat");
    target.write_str("level 4")?;
    let storage = dir.child("backups");
    storage.create_dir_all()?;
    let profile = dir.child("game.txt");
    profile.write_str(&format!(
        "name game\ntarget {}\nstorage {}\ncapacity 5\ncompression false\n",
        target.path().display(),
        storage.path().display()
    ))?;

    Command::cargo_bin("pbk")?
        .arg(profile.path())
        .write_stdin("store tagged\nfind tag\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'game' @ "))
        .stdout(predicate::str::contains("Done"))
        .stdout(predicate::str::is_match(r"game-\d{8}-\d{6} tagged\.zip\n")?);

    assert_eq!(std::fs::read_dir(storage.path())?.count(), 1);
    dir.close()?;
    Ok(())
}

#[test]
fn too_many_arguments() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("pbk")?
        .args(["a.txt", "b.txt"])
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("unexpected argument"));
    Ok(())
}
