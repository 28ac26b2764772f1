mod common;

use common::{RecordingDirectory, as_parent, options_in};
use quire_core::file::{FileError, FileModel};
use quire_core::identity::IdentityHash;
use std::fs;
use std::time::UNIX_EPOCH;
use tempfile::TempDir;

#[test]
fn open_reads_existing_file() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let notes = tmpdir.path().join("notes");
    fs::create_dir(&notes)?;
    let path = notes.join("a.md");
    fs::write(&path, "hello world")?;

    let dir = RecordingDirectory::directory();
    let file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;

    assert_eq!(file.snippet(), "hello world");
    assert!(!file.is_modified());
    assert_eq!(file.name(), "a.md");
    assert_eq!(file.extension(), "md");
    assert_eq!(file.directory_name(), "notes");
    assert_eq!(file.path(), path.as_path());

    let mtime = fs::metadata(&path)?.modified()?;
    let millis = mtime.duration_since(UNIX_EPOCH).unwrap().as_millis() as i64;
    assert_eq!(file.modified_time(), millis);

    Ok(())
}

#[test]
fn open_creates_missing_file() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("fresh.md");
    assert!(!path.exists());

    let dir = RecordingDirectory::directory();
    let file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;

    assert!(path.exists());
    assert_eq!(fs::read_to_string(&path)?, "");
    assert_eq!(file.snippet(), "");

    // opening again must not truncate
    fs::write(&path, "kept")?;
    let again = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    assert_eq!(again.snippet(), "kept");

    Ok(())
}

#[test]
fn same_path_gives_same_identity() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("same.md");
    let dir = RecordingDirectory::directory();

    let first = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    let second = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;

    assert_eq!(first.identity_hash(), second.identity_hash());
    assert_eq!(first.identity_hash(), IdentityHash::of(&path));

    let other = FileModel::open_with(
        &as_parent(&dir),
        tmpdir.path().join("other.md"),
        options_in(tmpdir.path()),
    )?;
    assert_ne!(first.identity_hash(), other.identity_hash());

    Ok(())
}

#[test]
fn pseudo_root_files_register_with_watcher() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("loose.md");

    let root = RecordingDirectory::pseudo_root();
    let file = FileModel::open_with(&as_parent(&root), &path, options_in(tmpdir.path()))?;
    assert!(file.is_root());
    assert_eq!(*root.watch().added.borrow(), vec![path.clone()]);

    let dir = RecordingDirectory::directory();
    let nested = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    assert!(!nested.is_root());
    assert!(dir.watch().added.borrow().is_empty());

    Ok(())
}

#[test]
fn set_content_marks_modified_and_updates_snippet() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let dir = RecordingDirectory::directory();
    let mut file = FileModel::open_with(
        &as_parent(&dir),
        tmpdir.path().join("edit.md"),
        options_in(tmpdir.path()),
    )?;

    file.set_content("short text");
    assert!(file.is_modified());
    assert_eq!(file.snippet(), "short text");
    assert_eq!(file.buffer(), "short text");

    let exactly_fifty = "x".repeat(50);
    file.set_content(exactly_fifty.clone());
    assert_eq!(file.snippet(), exactly_fifty);

    let long = format!("{}{}", "é".repeat(50), "tail");
    file.set_content(long);
    assert_eq!(file.snippet(), format!("{}…", "é".repeat(50)));

    // nothing reached the disk
    assert_eq!(fs::read_to_string(file.path())?, "");

    Ok(())
}

#[test]
fn save_writes_buffer_and_resets_state() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let dir = RecordingDirectory::directory();
    let mut file = FileModel::open_with(
        &as_parent(&dir),
        tmpdir.path().join("save.md"),
        options_in(tmpdir.path()),
    )?;

    let text = "# Title\n\nSome body text that is definitely longer than fifty characters.";
    file.set_content(text);
    file.save()?;

    assert!(!file.is_modified());
    assert_eq!(file.buffer(), "");
    assert_eq!(file.read()?, text);
    assert_eq!(fs::read_to_string(file.path())?, text);
    assert!(file.snippet().ends_with('…'));
    assert_eq!(file.snippet().chars().count(), 51);

    let mtime = fs::metadata(file.path())?.modified()?;
    let millis = mtime.duration_since(UNIX_EPOCH).unwrap().as_millis() as i64;
    assert_eq!(file.modified_time(), millis);

    Ok(())
}

#[test]
fn save_without_edits_truncates_file() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("empty.md");
    fs::write(&path, "on disk")?;

    let dir = RecordingDirectory::directory();
    let mut file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    file.save()?;

    assert_eq!(fs::read_to_string(&path)?, "");
    assert_eq!(file.snippet(), "");

    Ok(())
}

#[test]
fn read_drops_unsaved_edits() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("reread.md");
    fs::write(&path, "disk")?;

    let dir = RecordingDirectory::directory();
    let mut file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    file.set_content("draft");

    assert_eq!(file.read()?, "disk");
    assert!(!file.is_modified());
    assert_eq!(file.buffer(), "");
    assert_eq!(file.snippet(), "disk");

    Ok(())
}

#[test]
fn get_by_identity_reads_only_for_matching_hash() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("lookup.md");
    fs::write(&path, "content")?;

    let dir = RecordingDirectory::directory();
    let mut file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    file.set_content("unsaved");

    assert_eq!(
        file.get_by_identity(file.identity_hash())?,
        Some("content".to_string())
    );
    assert_eq!(file.get_by_identity(IdentityHash(file.identity_hash().0 ^ 1))?, None);

    // the live edit is untouched
    assert!(file.is_modified());
    assert_eq!(file.buffer(), "unsaved");

    Ok(())
}

#[test]
fn snapshot_carries_content_without_touching_model() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("snap.md");
    fs::write(&path, "snapshot body")?;

    let dir = RecordingDirectory::directory();
    let file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    let snapshot = file.with_content_snapshot()?;

    assert_eq!(snapshot.content, "snapshot body");
    assert_eq!(snapshot.name, "snap.md");
    assert_eq!(snapshot.identity_hash, file.identity_hash());
    assert_eq!(snapshot.modified_time, file.modified_time());
    assert_eq!(file.buffer(), "");

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["content"], "snapshot body");
    assert_eq!(json["identity_hash"], file.identity_hash().0);

    Ok(())
}

#[test]
fn leaf_predicates() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let path = tmpdir.path().join("leaf.md");
    let dir = RecordingDirectory::directory();
    let file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;

    assert!(file.is_file());
    assert!(!file.is_directory());
    assert!(!file.contains(&path));
    assert!(file.find_directory(&path.clone().into()).is_none());

    Ok(())
}

#[test]
fn open_rejects_path_without_file_name() {
    let dir = RecordingDirectory::directory();
    let result = FileModel::open(&as_parent(&dir), "/");
    assert!(matches!(result, Err(FileError::InvalidPath(_))));
}

#[test]
fn directory_name_comes_from_parent_label() -> Result<(), FileError> {
    let tmpdir = TempDir::new()?;
    let inbox = tmpdir.path().join("inbox");
    fs::create_dir(&inbox)?;
    let path = inbox.join("label.md");

    let dir = RecordingDirectory::labelled("Inbox (3)");
    let mut file = FileModel::open_with(&as_parent(&dir), &path, options_in(tmpdir.path()))?;
    assert_eq!(file.directory_name(), "Inbox (3)");

    // survives a rename within the same parent
    file.rename("relabelled", None)?;
    assert_eq!(file.directory_name(), "Inbox (3)");

    // a pseudo-root has no label of its own
    let root = RecordingDirectory::pseudo_root();
    let loose = FileModel::open_with(&as_parent(&root), &path, options_in(tmpdir.path()));
    assert_eq!(loose?.directory_name(), "inbox");

    file.detach();
    let adopter = RecordingDirectory::labelled("Archive");
    file.attach(&as_parent(&adopter));
    assert_eq!(file.directory_name(), "Archive");

    Ok(())
}
