// tests/materialize.rs

mod common;
use crate::common::{init_tracing, mkdir, write_file};

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use svcrun::fs::mock::MockFileSystem;
use svcrun::fs::RealFileSystem;
use svcrun::materialize::{materialize, MaterializeTarget, SkipReason};

fn target(service: &str, file: &str, dir: impl Into<PathBuf>) -> MaterializeTarget {
    MaterializeTarget {
        service_name: service.to_string(),
        config_file_name: file.to_string(),
        destination_dir: dir.into(),
        destination_file_name: ".env".to_string(),
    }
}

#[test]
fn copy_is_byte_identical_and_idempotent() {
    init_tracing();

    let root = tempdir().unwrap();
    let root = root.path();
    write_file(root, ".env/MemberA.env", "PORT=5000\nMONGODB_URI=foo\n");
    mkdir(root, "membera/backend");

    let targets = vec![target("a", "MemberA.env", root.join("membera/backend"))];

    let first = materialize(&RealFileSystem, &root.join(".env"), &targets);
    assert_eq!(first.copied_count(), 1);
    assert_eq!(first.skipped_count(), 0);
    let after_first = fs::read(root.join("membera/backend/.env")).unwrap();
    assert_eq!(after_first, b"PORT=5000\nMONGODB_URI=foo\n");

    let second = materialize(&RealFileSystem, &root.join(".env"), &targets);
    assert_eq!(second.copied_count(), 1);
    let after_second = fs::read(root.join("membera/backend/.env")).unwrap();
    assert_eq!(after_second, after_first);
}

#[test]
fn stale_destination_is_overwritten_not_merged() {
    init_tracing();

    let root = tempdir().unwrap();
    let root = root.path();
    write_file(root, ".env/MemberA.env", "PORT=5000\nMONGODB_URI=new\n");
    write_file(
        root,
        "membera/backend/.env",
        "PORT=4000\nMONGODB_URI=old\nLEFTOVER=1\n",
    );

    let targets = vec![target("a", "MemberA.env", root.join("membera/backend"))];
    materialize(&RealFileSystem, &root.join(".env"), &targets);

    assert_eq!(
        fs::read_to_string(root.join("membera/backend/.env")).unwrap(),
        "PORT=5000\nMONGODB_URI=new\n"
    );
}

#[test]
fn missing_source_skips_only_that_target() {
    init_tracing();

    let root = tempdir().unwrap();
    let root = root.path();
    write_file(root, ".env/MemberA.env", "PORT=5000\nMONGODB_URI=a\n");
    write_file(root, ".env/MemberC.env", "PORT=5002\nMONGODB_URI=c\n");
    for dir in ["membera/backend", "memberb/backend", "memberc/backend"] {
        mkdir(root, dir);
    }

    let targets = vec![
        target("a", "MemberA.env", root.join("membera/backend")),
        target("b", "MemberB.env", root.join("memberb/backend")),
        target("c", "MemberC.env", root.join("memberc/backend")),
    ];

    let report = materialize(&RealFileSystem, &root.join(".env"), &targets);

    assert_eq!(report.copied_count(), 2);
    assert_eq!(report.skipped_count(), 1);

    let (skipped, reason) = &report.skipped[0];
    assert_eq!(skipped.service_name, "b");
    assert_eq!(
        *reason,
        SkipReason::ConfigMissing(root.join(".env/MemberB.env"))
    );

    assert!(root.join("membera/backend/.env").is_file());
    assert!(!root.join("memberb/backend/.env").exists());
    assert!(root.join("memberc/backend/.env").is_file());

    let ports: Vec<u16> = report.entries.iter().map(|e| e.listen_port).collect();
    assert_eq!(ports, vec![5000, 5002]);
}

#[test]
fn missing_destination_directory_is_skipped_and_not_created() {
    init_tracing();

    let root = tempdir().unwrap();
    let root = root.path();
    write_file(root, ".env/MemberA.env", "PORT=5000\nMONGODB_URI=a\n");

    let dest = root.join("membera/backend");
    let report = materialize(
        &RealFileSystem,
        &root.join(".env"),
        &[target("a", "MemberA.env", &dest)],
    );

    assert_eq!(report.copied_count(), 0);
    assert_eq!(report.skipped[0].1, SkipReason::DestinationMissing(dest.clone()));
    assert!(!dest.exists());
}

#[test]
fn unparsable_env_file_is_still_copied() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/p/.env/Odd.env", "just some text\n");
    fs.add_dir("/p/odd");

    let report = materialize(
        &fs,
        Path::new("/p/.env"),
        &[target("odd", "Odd.env", "/p/odd")],
    );

    assert_eq!(report.copied_count(), 1);
    assert!(report.entries.is_empty());
    assert_eq!(
        fs.contents("/p/odd/.env").unwrap(),
        b"just some text\n".to_vec()
    );
}

#[test]
fn mock_fs_materialize_matches_real_behaviour() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("/p/.env/MemberA.env", "PORT=5000\nMONGODB_URI=foo\n");
    fs.add_dir("/p/membera/backend");

    let targets = vec![
        target("a", "MemberA.env", "/p/membera/backend"),
        target("b", "MemberB.env", "/p/memberb/backend"),
    ];
    let report = materialize(&fs, Path::new("/p/.env"), &targets);

    assert_eq!(report.copied_count(), 1);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.entries[0].connection_string, "foo");
    assert_eq!(
        fs.contents("/p/membera/backend/.env").unwrap(),
        b"PORT=5000\nMONGODB_URI=foo\n".to_vec()
    );
}
