//! Directory mode: convert every `*.struct` file in a directory with one session.
//!
//! Files are ordered so that a struct used as a member type elsewhere is converted
//! first; its size is then in the catalog by the time the dependent file is read.

use crate::error::ConvertError;
use crate::parser::TERMINATOR;
use crate::session::ConversionSession;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const INPUT_EXTENSION: &str = "struct";
pub const OUTPUT_EXTENSION: &str = "rs";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Convert {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },
}

/// A struct file with the names it declares and uses, from a lightweight pre-scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructFile {
    pub path: PathBuf,
    /// Struct name from the header line, if the file has one.
    pub struct_name: Option<String>,
    /// First token of every member line.
    pub member_types: Vec<String>,
}

impl StructFile {
    pub fn scan(path: &Path) -> Result<Self, BatchError> {
        let text = fs::read_to_string(path).map_err(|source| BatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(path, &text))
    }

    pub fn from_source(path: &Path, text: &str) -> Self {
        let mut lines = text.lines();
        let struct_name = lines
            .next()
            .and_then(|header| header.split_whitespace().nth(1))
            .map(str::to_string);
        let member_types = lines
            .map(str::trim)
            .take_while(|l| *l != TERMINATOR)
            .filter_map(|l| l.split_whitespace().next())
            .map(str::to_string)
            .collect();
        StructFile {
            path: path.to_path_buf(),
            struct_name,
            member_types,
        }
    }
}

/// `*.struct` files directly inside `dir`, sorted by file name.
pub fn collect_struct_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let io_err = |source| BatchError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == INPUT_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Order files so every struct comes after the structs it uses as member types.
/// Independent files keep their relative order; cycles are broken at the first file
/// (in input order) that closes one.
pub fn order_by_dependency(files: Vec<StructFile>) -> Vec<StructFile> {
    let by_name: HashMap<&str, usize> = files
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.struct_name.as_deref().map(|n| (n, i)))
        .collect();

    let mut order = Vec::with_capacity(files.len());
    let mut done = vec![false; files.len()];
    let mut visiting = HashSet::new();
    for i in 0..files.len() {
        visit(i, &files, &by_name, &mut done, &mut visiting, &mut order);
    }

    let mut slots: Vec<Option<StructFile>> = files.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

fn visit(
    i: usize,
    files: &[StructFile],
    by_name: &HashMap<&str, usize>,
    done: &mut [bool],
    visiting: &mut HashSet<usize>,
    order: &mut Vec<usize>,
) {
    if done[i] {
        return;
    }
    if !visiting.insert(i) {
        log::warn!(
            "{}: struct dependency cycle; converting in file-name order",
            files[i].path.display()
        );
        return;
    }
    for ty in &files[i].member_types {
        if let Some(&dep) = by_name.get(ty.as_str()) {
            if dep != i {
                visit(dep, files, by_name, done, visiting, order);
            }
        }
    }
    visiting.remove(&i);
    if !done[i] {
        done[i] = true;
        order.push(i);
    }
}

/// Output path for an input file: `<out_dir>/<stem>.rs`.
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    out_dir.join(name)
}

/// Convert every struct file in `dir`, writing each result into `out_dir`. Stops at the
/// first failure; files converted before it keep their output. Returns the written paths.
pub fn convert_dir(
    session: &mut ConversionSession,
    dir: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, BatchError> {
    let files = collect_struct_files(dir)?
        .iter()
        .map(|p| StructFile::scan(p))
        .collect::<Result<Vec<_>, _>>()?;
    let ordered = order_by_dependency(files);
    log::info!("converting {} struct file(s) from {}", ordered.len(), dir.display());

    let mut written = Vec::with_capacity(ordered.len());
    for file in ordered {
        let reader = fs::File::open(&file.path)
            .map(std::io::BufReader::new)
            .map_err(|source| BatchError::Io {
                path: file.path.clone(),
                source,
            })?;
        let def = session.read_struct(reader).map_err(|source| BatchError::Convert {
            path: file.path.clone(),
            source,
        })?;
        let out = output_path(&file.path, out_dir);
        fs::write(&out, session.render(&def)).map_err(|source| BatchError::Io {
            path: out.clone(),
            source,
        })?;
        log::info!("{} -> {}", file.path.display(), out.display());
        written.push(out);
    }
    Ok(written)
}
