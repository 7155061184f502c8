// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Listing of the executables, importable modules and shared libraries an
//! interpreter installation provides.
//!
//! Everything is found by scanning directories; nothing is executed.

use crate::InventoryError;
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Package nesting deeper than this is not walked (guards symlink loops)
const MAX_PACKAGE_DEPTH: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BinListing {
    /// Executables in the bin directory, sorted
    pub bins: Vec<String>,
    /// Executables shadowed by an earlier PATH entry
    pub masked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedImport {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportListing {
    /// Module names, in search-path order
    pub imports: Vec<String>,
    /// Packages shadowed by one found earlier
    pub masked: Vec<MaskedImport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub bins: BinListing,
    pub imports: ImportListing,
    pub libs: Vec<String>,
}

/// Scans `bin_dir`, its sibling `lib` directory, and `search_paths`
pub fn collect(
    bin_dir: &Path,
    search_paths: &[PathBuf],
    path_var: &OsStr,
) -> Result<Inventory, InventoryError> {
    Ok(Inventory {
        bins: list_bins(bin_dir, path_var)?,
        imports: list_imports(search_paths)?,
        libs: list_libs(bin_dir)?,
    })
}

/// First directory on `path_var` holding an executable called `name`
pub fn find_on_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Directory of the `python` (or `python3`) found on `path_var`
pub fn interpreter_bin_dir(path_var: &OsStr) -> Result<PathBuf, InventoryError> {
    ["python", "python3"]
        .iter()
        .find_map(|name| find_on_path(name, path_var))
        .and_then(|interpreter| interpreter.parent().map(Path::to_path_buf))
        .ok_or_else(|| InventoryError::NotOnPath {
            name: "python".to_string(),
        })
}

pub fn list_bins(bin_dir: &Path, path_var: &OsStr) -> Result<BinListing, InventoryError> {
    debug!(bin_dir = %bin_dir.display(), "looking for bins");
    let mut listing = BinListing::default();
    for (name, path) in sorted_entries(bin_dir)? {
        if name.starts_with('.') || !is_executable(&path) {
            continue;
        }
        listing.bins.push(name);
    }
    debug!(count = listing.bins.len(), "identified bins");

    for bin in &listing.bins {
        let Some(resolved) = find_on_path(bin, path_var) else {
            debug!(bin = %bin, "bin is not reachable through PATH");
            continue;
        };
        if absolute(&resolved) != absolute(&bin_dir.join(bin)) {
            warn!(
                bin = %bin,
                resolved = %resolved.display(),
                "bin in the interpreter directory is masked by another PATH entry"
            );
            listing.masked.push(bin.clone());
        }
    }
    Ok(listing)
}

/// Directory the shared libraries of `bin_dir`'s installation live in
pub fn lib_dir(bin_dir: &Path) -> PathBuf {
    bin_dir.parent().unwrap_or(bin_dir).join("lib")
}

pub fn list_libs(bin_dir: &Path) -> Result<Vec<String>, InventoryError> {
    let lib_dir = lib_dir(bin_dir);
    if !lib_dir.is_dir() {
        error!(lib_dir = %lib_dir.display(), "couldn't find lib dir");
        return Ok(Vec::new());
    }

    let libs: Vec<String> = sorted_entries(&lib_dir)?
        .into_iter()
        .filter(|(name, path)| {
            !name.starts_with('.')
                && path.is_file()
                && path.extension() == Some(OsStr::new("so"))
        })
        .map(|(name, _)| name)
        .collect();
    debug!(count = libs.len(), "found libs");
    Ok(libs)
}

/// Module search directories of an installation: `lib/python*/`
/// plus its `lib-dynload` and `site-packages`
pub fn default_search_paths(bin_dir: &Path) -> Result<Vec<PathBuf>, InventoryError> {
    let lib_dir = lib_dir(bin_dir);
    if !lib_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for (name, path) in sorted_entries(&lib_dir)? {
        if !name.starts_with("python") || !path.is_dir() {
            continue;
        }
        paths.push(path.clone());
        for sub in ["lib-dynload", "site-packages"] {
            let sub = path.join(sub);
            if sub.is_dir() {
                paths.push(sub);
            }
        }
    }
    Ok(paths)
}

/// Walks `search_paths` in order collecting importable module names
pub fn list_imports(search_paths: &[PathBuf]) -> Result<ImportListing, InventoryError> {
    let mut listing = ImportListing::default();
    let mut seen = HashSet::new();
    for path in search_paths {
        if !path.is_dir() {
            continue;
        }
        let before = listing.imports.len();
        top_level_modules(&mut listing, &mut seen, path)?;
        debug!(
            path = %path.display(),
            count = listing.imports.len() - before,
            "scanned search path"
        );
    }
    Ok(listing)
}

fn top_level_modules(
    listing: &mut ImportListing,
    seen: &mut HashSet<String>,
    dir: &Path,
) -> Result<(), InventoryError> {
    for (name, path) in sorted_entries(dir)? {
        if is_module_file(&name) {
            if let Some(stem) = Path::new(&name).file_stem() {
                listing.imports.push(stem.to_string_lossy().into_owned());
            }
        } else if is_package(&path) {
            record_package(listing, seen, name.clone(), &path);
            sub_packages(listing, seen, &path, &name, 1)?;
        }
    }
    Ok(())
}

fn sub_packages(
    listing: &mut ImportListing,
    seen: &mut HashSet<String>,
    dir: &Path,
    prefix: &str,
    depth: usize,
) -> Result<(), InventoryError> {
    if depth > MAX_PACKAGE_DEPTH {
        warn!(package = %prefix, "package nesting too deep, not descending");
        return Ok(());
    }
    for (name, path) in sorted_entries(dir)? {
        if !is_package(&path) {
            continue;
        }
        let dotted = format!("{}.{}", prefix, name);
        record_package(listing, seen, dotted.clone(), &path);
        sub_packages(listing, seen, &path, &dotted, depth + 1)?;
    }
    Ok(())
}

fn record_package(
    listing: &mut ImportListing,
    seen: &mut HashSet<String>,
    name: String,
    path: &Path,
) {
    if seen.contains(&name) {
        warn!(
            import = %name,
            path = %path.display(),
            "import is masked by a directory earlier in the search path"
        );
        listing.masked.push(MaskedImport {
            name,
            path: path.to_path_buf(),
        });
    } else {
        seen.insert(name.clone());
        listing.imports.push(name);
    }
}

fn is_module_file(name: &str) -> bool {
    name.ends_with(".py") || name.ends_with(".so")
}

fn is_package(path: &Path) -> bool {
    path.join("__init__.py").exists()
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Directory entries as (file name, full path), sorted by name
fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>, InventoryError> {
    let io_error = |source| InventoryError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
    }
    entries.sort();
    Ok(entries)
}
