// Minimal integration test that drives the compiled binary through a PTY.
// Requires a TTY, so it is Unix-only and ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::io::Write;
use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn single_word_session_levels_up_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let words = dir.path().join("words.txt");
    std::fs::File::create(&words)?.write_all(b"hola\n")?;

    let bin = assert_cmd::cargo::cargo_bin("eclipse");
    let cmd = format!(
        "{} --config {} --words {}",
        bin.display(),
        dir.path().join("config.json").display(),
        words.display()
    );
    let mut p = spawn(cmd)?;

    std::thread::sleep(Duration::from_millis(300));
    p.send("hola\r")?;
    p.expect("Level: 2")?;

    // ESC quits from any state
    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}
