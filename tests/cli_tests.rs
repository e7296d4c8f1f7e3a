use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_starship-film"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Procedural Starship promo film renderer"));
}

#[test]
fn test_cli_landing_hud() {
    cli()
        .args(["hud", "landing", "--progress", "0.75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STATUS  LANDING"))
        .stdout(predicate::str::contains("ALT     300 m"));
}

#[test]
fn test_cli_orbit_hud_json() {
    cli()
        .args(["hud", "orbit", "--progress", "1", "--leg", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phase\": \"ORBIT\""));
}

#[test]
fn test_cli_rocket_preset() {
    cli()
        .args(["rocket", "liftoff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"nose\""));
}

#[test]
fn test_cli_unknown_rocket_preset() {
    cli()
        .args(["rocket", "saturn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rocket preset"));
}

#[test]
fn test_cli_storyboard_init_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("film.json");

    cli()
        .args(["storyboard", "init"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    cli()
        .args(["storyboard", "show"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Scenes: 5"))
        .stdout(predicate::str::contains("starship_mars_landing"));
}

#[test]
fn test_cli_assemble_without_clips_fails() {
    let dir = TempDir::new().unwrap();

    cli()
        .arg("assemble")
        .arg(dir.path().join("intro.mp4"))
        .arg(dir.path().join("outro.mp4"))
        .arg("--output")
        .arg(dir.path().join("film.mp4"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No rendered clips"));
}

#[test]
fn test_cli_still_writes_png() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("liftoff.png");

    cli()
        .env("STARSHIP__VIDEO__RESOLUTION", "160x90")
        .current_dir(dir.path())
        .args(["still", "starship-liftoff", "--time", "1.0", "--output"])
        .arg(&output)
        .assert()
        .success();

    let image = image::open(&output).unwrap();
    assert_eq!((image.width(), image.height()), (160, 90));
}

#[test]
fn test_cli_rejects_zero_fps_config() {
    let dir = TempDir::new().unwrap();

    cli()
        .env("STARSHIP__VIDEO__FPS", "0")
        .current_dir(dir.path())
        .args(["still", "starship-liftoff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FPS must be greater than 0"));
    assert!(!dir.path().join("still.png").exists());
}
