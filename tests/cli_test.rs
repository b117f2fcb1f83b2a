use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

use propfile::name::encode_name;

fn wrap_binary_prop_stream(head: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&[0, 0, 0, 0]); // magic, unvalidated
    out.extend_from_slice(&(head.len() as u32).to_be_bytes());
    out.extend_from_slice(head);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

fn smallest_prop_tree_bytes() -> Vec<u8> {
    let mut head = Vec::new();
    head.push(0x01); // void
    head.extend_from_slice(&encode_name("").unwrap());
    head.push(0xFE); // no children
    head.push(0xFF); // head EOF
    wrap_binary_prop_stream(&head, &[])
}

#[test]
fn xmldump_prints_smallest_tree_to_stdout() {
    let dir = tempdir().unwrap();
    let infile = dir.path().join("in.bin");
    std::fs::write(&infile, smallest_prop_tree_bytes()).unwrap();

    Command::cargo_bin("xmldump")
        .unwrap()
        .arg(&infile)
        .assert()
        .success()
        .stdout(predicate::eq("</>\n"));
}

#[test]
fn xmldump_writes_to_outfile_when_given() {
    let dir = tempdir().unwrap();
    let infile = dir.path().join("in.bin");
    let outfile = dir.path().join("out.xml");
    std::fs::write(&infile, smallest_prop_tree_bytes()).unwrap();

    Command::cargo_bin("xmldump")
        .unwrap()
        .arg(&infile)
        .arg(&outfile)
        .assert()
        .success();

    let written = std::fs::read_to_string(&outfile).unwrap();
    assert_eq!(written, "</>\n");
}

#[test]
fn xmldump_rejects_malformed_input() {
    let dir = tempdir().unwrap();
    let infile = dir.path().join("bad.bin");
    std::fs::write(&infile, [0u8, 1, 2]).unwrap();

    Command::cargo_bin("xmldump").unwrap().arg(&infile).assert().failure();
}

fn build_ifs_archive(file_name: &str, file_bytes: &[u8]) -> Vec<u8> {
    let mut head = Vec::new();
    head.push(0x01); // root: void directory
    head.extend_from_slice(&encode_name("").unwrap());
    head.push(0x1E); // 3s32 file dirent
    head.extend_from_slice(&encode_name(file_name).unwrap());
    head.push(0xFE); // file node has no children/attrs
    head.push(0xFE); // root child list end
    head.push(0xFF); // head EOF

    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes()); // offset
    body.extend_from_slice(&(file_bytes.len() as u32).to_be_bytes()); // length
    body.extend_from_slice(&0u32.to_be_bytes()); // timestamp

    let toc = wrap_binary_prop_stream(&head, &body);
    let body_start = 0x24 + toc.len();

    let mut header = vec![0u8; 0x24];
    header[16..20].copy_from_slice(&(body_start as u32).to_be_bytes()); // word 4

    let mut archive = header;
    archive.extend_from_slice(&toc);
    archive.extend_from_slice(file_bytes);
    archive
}

#[test]
fn ifsdump_expands_a_single_file() {
    let dir = tempdir().unwrap();
    let archive_path = dir.path().join("archive.ifs");
    let outdir = dir.path().join("out");
    std::fs::write(&archive_path, build_ifs_archive("hello", b"hi there")).unwrap();

    Command::cargo_bin("ifsdump")
        .unwrap()
        .arg(&archive_path)
        .arg(&outdir)
        .assert()
        .success();

    let extracted = std::fs::read(outdir.join("hello")).unwrap();
    assert_eq!(extracted, b"hi there");
}

#[test]
fn ifsdump_can_also_write_toc_xml() {
    let dir = tempdir().unwrap();
    let archive_path = dir.path().join("archive.ifs");
    let outdir = dir.path().join("out");
    std::fs::write(&archive_path, build_ifs_archive("hello", b"hi")).unwrap();

    Command::cargo_bin("ifsdump")
        .unwrap()
        .arg(&archive_path)
        .arg(&outdir)
        .arg("--toc")
        .assert()
        .success();

    let toc = std::fs::read_to_string(outdir.join("toc.xml")).unwrap();
    assert!(toc.contains("__type=\"3s32\""));
}
