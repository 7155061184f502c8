// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![cfg(unix)]

use env_smoke_core::inventory::{
    collect, default_search_paths, find_on_path, interpreter_bin_dir, list_bins, list_imports,
    list_libs,
};
use env_smoke_core::InventoryError;
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

fn touch_executable(path: &Path) {
    touch(path);
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

struct Installation {
    _root: TempDir,
    bin_dir: PathBuf,
    shadow_bin_dir: PathBuf,
    site_packages: PathBuf,
    extra_path: PathBuf,
}

impl Installation {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let prefix = root.path().join("prefix");
        let bin_dir = prefix.join("bin");
        touch_executable(&bin_dir.join("python"));
        touch_executable(&bin_dir.join("tool"));
        touch_executable(&bin_dir.join(".hidden"));
        touch(&bin_dir.join("readme.txt"));

        let shadow_bin_dir = root.path().join("shadow").join("bin");
        touch_executable(&shadow_bin_dir.join("tool"));

        let lib = prefix.join("lib");
        touch(&lib.join("libfoo.so"));
        touch(&lib.join("libbar.so"));
        touch(&lib.join("notes.txt"));
        let site_packages = lib.join("python3.11").join("site-packages");
        touch(&site_packages.join("json.py"));
        touch(&site_packages.join("_ssl.cpython-311.so"));
        touch(&site_packages.join("__pycache__").join("json.cpython-311.pyc"));
        touch(&site_packages.join("pkg").join("__init__.py"));
        touch(&site_packages.join("pkg").join("sub").join("__init__.py"));
        touch(&site_packages.join("pkg").join("data").join("table.csv"));

        let extra_path = root.path().join("extra");
        touch(&extra_path.join("pkg").join("__init__.py"));
        touch(&extra_path.join("pkg").join("extra").join("__init__.py"));
        touch(&extra_path.join("yaml").join("__init__.py"));

        Self {
            _root: root,
            bin_dir,
            shadow_bin_dir,
            site_packages,
            extra_path,
        }
    }

    fn path_var(&self) -> OsString {
        std::env::join_paths([&self.shadow_bin_dir, &self.bin_dir]).unwrap()
    }
}

// ============================================================
// bins
// ============================================================

#[test]
fn test_bins_are_sorted_executables_without_hidden_files() {
    let install = Installation::new();
    let listing = list_bins(&install.bin_dir, &install.path_var()).unwrap();
    assert_eq!(listing.bins, vec!["python", "tool"]);
}

#[test]
fn test_bin_shadowed_by_earlier_path_entry_is_masked() {
    let install = Installation::new();
    let listing = list_bins(&install.bin_dir, &install.path_var()).unwrap();
    assert_eq!(listing.masked, vec!["tool"]);
}

#[test]
fn test_find_on_path_takes_first_match() {
    let install = Installation::new();
    let path_var = install.path_var();
    assert_eq!(
        find_on_path("tool", &path_var),
        Some(install.shadow_bin_dir.join("tool"))
    );
    assert_eq!(find_on_path("readme.txt", &path_var), None);
    assert_eq!(
        interpreter_bin_dir(&path_var).unwrap(),
        install.bin_dir
    );
}

#[test]
fn test_missing_interpreter_is_reported() {
    let install = Installation::new();
    let path_var = std::env::join_paths([&install.shadow_bin_dir]).unwrap();
    assert!(matches!(
        interpreter_bin_dir(&path_var),
        Err(InventoryError::NotOnPath { .. })
    ));
}

#[test]
fn test_unreadable_bin_dir_is_io_error() {
    let install = Installation::new();
    let missing = install.bin_dir.join("nope");
    assert!(matches!(
        list_bins(&missing, &install.path_var()),
        Err(InventoryError::Io { .. })
    ));
}

// ============================================================
// libs
// ============================================================

#[test]
fn test_libs_are_sorted_shared_objects() {
    let install = Installation::new();
    assert_eq!(
        list_libs(&install.bin_dir).unwrap(),
        vec!["libbar.so", "libfoo.so"]
    );
}

#[test]
fn test_missing_lib_dir_yields_no_libs() {
    let install = Installation::new();
    assert!(list_libs(&install.shadow_bin_dir).unwrap().is_empty());
}

// ============================================================
// imports
// ============================================================

#[test]
fn test_default_search_paths_find_site_packages() {
    let install = Installation::new();
    let paths = default_search_paths(&install.bin_dir).unwrap();
    assert_eq!(
        paths,
        vec![
            install.site_packages.parent().unwrap().to_path_buf(),
            install.site_packages.clone(),
        ]
    );
}

#[test]
fn test_imports_walk_packages_and_flag_masked_ones() {
    let install = Installation::new();
    let listing = list_imports(&[
        install.site_packages.clone(),
        install.extra_path.clone(),
        install.extra_path.join("does-not-exist"),
    ])
    .unwrap();

    assert_eq!(
        listing.imports,
        vec!["_ssl.cpython-311", "json", "pkg", "pkg.sub", "pkg.extra", "yaml"]
    );
    assert_eq!(listing.masked.len(), 1);
    assert_eq!(listing.masked[0].name, "pkg");
    assert_eq!(listing.masked[0].path, install.extra_path.join("pkg"));
}

#[test]
fn test_dunder_modules_are_listed() {
    let root = tempfile::tempdir().unwrap();
    touch(&root.path().join("__future__.py"));
    touch(&root.path().join("__phello__.py"));
    touch(&root.path().join("os.py"));
    touch(&root.path().join("__pycache__").join("os.cpython-311.pyc"));

    let listing = list_imports(&[root.path().to_path_buf()]).unwrap();
    assert_eq!(listing.imports, vec!["__future__", "__phello__", "os"]);
}

#[test]
fn test_collect_gathers_all_sections() {
    let install = Installation::new();
    let inventory = collect(
        &install.bin_dir,
        &[install.site_packages.clone()],
        &install.path_var(),
    )
    .unwrap();
    assert_eq!(inventory.bins.bins.len(), 2);
    assert_eq!(inventory.libs.len(), 2);
    assert!(inventory.imports.imports.contains(&"pkg.sub".to_string()));
    assert!(inventory.imports.masked.is_empty());
}

#[test]
fn test_inventory_serializes_masked_entries() {
    let install = Installation::new();
    let inventory = collect(
        &install.bin_dir,
        &[install.site_packages.clone(), install.extra_path.clone()],
        &install.path_var(),
    )
    .unwrap();

    let value = serde_json::to_value(&inventory).unwrap();
    assert_eq!(value["bins"]["masked"], serde_json::json!(["tool"]));
    assert_eq!(value["imports"]["masked"][0]["name"], "pkg");
    assert_eq!(value["libs"], serde_json::json!(["libbar.so", "libfoo.so"]));
}
