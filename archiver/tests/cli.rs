//! End-to-end CLI scenarios, exercising the compiled `dedal` binary the way
//! a user would from a shell.

use std::process::Command;

fn dedal() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dedal"))
}

fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn round_trips_a_single_byte_alphabet_file() {
    let dir = tempdir();
    let input = dir.path().join("all_a.bin");
    std::fs::write(&input, vec![b'a'; 64]).unwrap();

    let archive_dir = dir.path().join("archives");
    let status = dedal()
        .args(["compress", input.to_str().unwrap(), "--dest"])
        .arg(&archive_dir)
        .status()
        .unwrap();
    assert!(status.success());
    let archive = archive_dir.join("all_a.dedal");
    assert!(archive.exists());

    let restore_dir = dir.path().join("restored");
    let status = dedal()
        .args(["decompress"])
        .arg(&archive)
        .args(["--dest"])
        .arg(&restore_dir)
        .status()
        .unwrap();
    assert!(status.success());

    let restored = std::fs::read(restore_dir.join("all_a.bin")).unwrap();
    assert_eq!(restored, vec![b'a'; 64]);
}

#[test]
fn round_trips_a_two_symbol_balanced_file() {
    let dir = tempdir();
    let input = dir.path().join("ab.bin");
    let data: Vec<u8> = b"ab".iter().cycle().take(200).copied().collect();
    std::fs::write(&input, &data).unwrap();

    let archive_dir = dir.path().join("archives");
    assert!(dedal()
        .args(["compress", input.to_str().unwrap(), "--dest"])
        .arg(&archive_dir)
        .status()
        .unwrap()
        .success());
    let archive = archive_dir.join("ab.dedal");

    let restore_dir = dir.path().join("restored");
    assert!(dedal()
        .args(["decompress"])
        .arg(&archive)
        .args(["--dest"])
        .arg(&restore_dir)
        .status()
        .unwrap()
        .success());

    assert_eq!(std::fs::read(restore_dir.join("ab.bin")).unwrap(), data);
}

#[test]
fn multi_file_input_strips_the_common_prefix() {
    let dir = tempdir();
    std::fs::create_dir_all(dir.path().join("project/src")).unwrap();
    std::fs::write(dir.path().join("project/src/main.rs"), b"fn main() {}").unwrap();
    std::fs::write(dir.path().join("project/Cargo.toml"), b"[package]").unwrap();

    let archive_dir = dir.path().join("archives");
    let status = dedal()
        .arg("compress")
        .arg(dir.path().join("project"))
        .args(["--dest"])
        .arg(&archive_dir)
        .status()
        .unwrap();
    assert!(status.success());
    let archive = archive_dir.join("project.dedal");

    let restore_dir = dir.path().join("restored");
    assert!(dedal()
        .args(["decompress"])
        .arg(&archive)
        .args(["--dest"])
        .arg(&restore_dir)
        .status()
        .unwrap()
        .success());

    assert!(restore_dir.join("src/main.rs").exists());
    assert!(restore_dir.join("Cargo.toml").exists());
}

#[test]
fn auto_block_size_is_used_when_no_block_flag_is_given() {
    let dir = tempdir();
    let input = dir.path().join("big.bin");
    let data: Vec<u8> = (0u32..20_000).map(|i| (i % 251) as u8).collect();
    std::fs::write(&input, &data).unwrap();

    let archive_dir = dir.path().join("archives");
    assert!(dedal()
        .args(["compress", input.to_str().unwrap(), "--dest"])
        .arg(&archive_dir)
        .status()
        .unwrap()
        .success());
    let archive = archive_dir.join("big.dedal");

    let restore_dir = dir.path().join("restored");
    assert!(dedal()
        .args(["decompress"])
        .arg(&archive)
        .args(["--dest"])
        .arg(&restore_dir)
        .status()
        .unwrap()
        .success());

    assert_eq!(std::fs::read(restore_dir.join("big.bin")).unwrap(), data);
}

#[test]
fn a_truncated_footer_size_fails_cleanly() {
    let dir = tempdir();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"aaaabbbb").unwrap();

    let archive_dir = dir.path().join("archives");
    assert!(dedal()
        .args(["compress", input.to_str().unwrap(), "--dest"])
        .arg(&archive_dir)
        .status()
        .unwrap()
        .success());
    let archive = archive_dir.join("a.dedal");

    // Truncate away everything but a handful of bytes, destroying the footer.
    let mut bytes = std::fs::read(&archive).unwrap();
    bytes.truncate(4);
    std::fs::write(&archive, &bytes).unwrap();

    let restore_dir = dir.path().join("restored");
    let status = dedal()
        .args(["decompress"])
        .arg(&archive)
        .args(["--dest"])
        .arg(&restore_dir)
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn a_corrupted_archive_reports_a_checksum_mismatch_but_keeps_the_output() {
    let dir = tempdir();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"aaaabbbb").unwrap();

    let archive_dir = dir.path().join("archives");
    assert!(dedal()
        .args(["compress", input.to_str().unwrap(), "--dest"])
        .arg(&archive_dir)
        .status()
        .unwrap()
        .success());
    let archive = archive_dir.join("a.dedal");

    let mut bytes = std::fs::read(&archive).unwrap();
    bytes[0] ^= 0xFF;
    std::fs::write(&archive, &bytes).unwrap();

    let restore_dir = dir.path().join("restored");
    let status = dedal()
        .args(["decompress"])
        .arg(&archive)
        .args(["--dest"])
        .arg(&restore_dir)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(restore_dir.join("a.txt").exists());
}

#[test]
fn metadata_subcommand_lists_every_stored_file() {
    let dir = tempdir();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"aaaabbbb").unwrap();

    let archive_dir = dir.path().join("archives");
    assert!(dedal()
        .args(["compress", input.to_str().unwrap(), "--dest"])
        .arg(&archive_dir)
        .status()
        .unwrap()
        .success());
    let archive = archive_dir.join("a.dedal");

    let output = dedal().arg("metadata").arg(&archive).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("a.txt"));
}

#[test]
fn rejects_an_unsupported_compression_type_flag() {
    let dir = tempdir();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"aaaa").unwrap();

    let status = dedal()
        .args(["compress", input.to_str().unwrap(), "--type", "gzip"])
        .status()
        .unwrap();
    assert!(!status.success());
}
