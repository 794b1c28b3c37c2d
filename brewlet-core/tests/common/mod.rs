#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use brewlet_common::error::{BrewletError, Result};
use brewlet_common::model::{ArtifactRecord, Formula, Platform};
use brewlet_net::http::{ArtifactFetcher, BoxFuture};
use brewlet_net::validation::sha256_hex;
use flate2::write::GzEncoder;
use flate2::Compression;

pub const TOOL: &str = "limesctl";
pub const VERSION: &str = "3.1.0";
pub const BINARY_SCRIPT: &[u8] = b"#!/bin/sh\necho \"limesctl version 3.1.0\"\n";

/// Serves canned bytes per URL and records every request.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn serving(url: &str, body: Vec<u8>) -> Self {
        let mut responses = HashMap::new();
        responses.insert(url.to_string(), body);
        Self {
            responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ArtifactFetcher for FakeFetcher {
    fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> BoxFuture<'a, Result<u64>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(url.to_string());
            match self.responses.get(url) {
                Some(body) => {
                    fs::write(dest, body)?;
                    Ok(body.len() as u64)
                }
                None => Err(BrewletError::download_failed(
                    url,
                    "server responded with HTTP 404 Not Found",
                )),
            }
        })
    }
}

/// Builds a gzipped tarball from `(path, mode, contents)` triples.
pub fn tar_gz(files: &[(&str, u32, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, mode, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(*mode);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// A release archive in the layout the release process produces.
pub fn release_archive(with_zsh: bool, with_binary: bool) -> Vec<u8> {
    let mut files: Vec<(&str, u32, &[u8])> = vec![
        ("completions/limesctl.bash", 0o644, &b"complete -F _limesctl limesctl\n"[..]),
        ("completions/limesctl.fish", 0o644, &b"complete -c limesctl\n"[..]),
        ("README.md", 0o644, &b"# limesctl\n"[..]),
    ];
    if with_zsh {
        files.push(("completions/limesctl.zsh", 0o644, &b"#compdef limesctl\n"[..]));
    }
    if with_binary {
        files.push((TOOL, 0o755, BINARY_SCRIPT));
    }
    tar_gz(&files)
}

pub fn url_for(platform: Platform) -> String {
    format!("https://example.com/releases/v{VERSION}/{TOOL}-{VERSION}-{platform}.tar.gz")
}

/// Formula with one record per given platform, each pointing at `url_for(platform)` and
/// carrying the digest of `body`.
pub fn formula_for(platforms: &[Platform], body: &[u8]) -> Formula {
    let sha = sha256_hex(body);
    let artifacts: Vec<String> = platforms
        .iter()
        .map(|p| {
            format!(
                r#"{{"os":"{}","arch":"{}","url":"{}","sha256":"{}"}}"#,
                p.os,
                p.arch,
                url_for(*p),
                sha
            )
        })
        .collect();
    Formula::from_json_str(&format!(
        r#"{{"name":"{TOOL}","version":"{VERSION}","artifacts":[{}]}}"#,
        artifacts.join(",")
    ))
    .unwrap()
}

pub fn record_for(formula: &Formula, platform: Platform) -> ArtifactRecord {
    formula.artifact_for(&platform).unwrap().clone()
}

/// Every file below `root`, relative, sorted.
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    collect(root, root, &mut out);
    out.sort();
    out
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            out.push(path.strip_prefix(root).unwrap().to_path_buf());
        }
    }
}
