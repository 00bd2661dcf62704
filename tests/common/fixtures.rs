//! Test fixture helpers for build histories and config files

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Three builds: `b` adds burritos and a source map, `c` drops tacos
pub const HISTORY_JSON: &str = r#"[
  {
    "meta": {
      "revision": { "value": "a", "url": "https://example.com/commit/a" },
      "branch": "main",
      "timestamp": 1700000000
    },
    "artifacts": [
      { "name": "tacos", "hash": "abc", "sizes": { "stat": 123, "gzip": 45 } }
    ]
  },
  {
    "meta": { "revision": "b", "timestamp": 1700000600 },
    "artifacts": [
      { "name": "tacos", "hash": "abc", "sizes": { "stat": 123, "gzip": 45 } },
      { "name": "burritos", "hash": "def", "sizes": { "stat": 2048, "gzip": 93 } },
      { "name": "main.js.map", "hash": "map1", "sizes": { "stat": 5000, "gzip": 900 } }
    ]
  },
  {
    "meta": { "revision": "c", "timestamp": 1700001200 },
    "artifacts": [
      { "name": "burritos", "hash": "fed", "sizes": { "stat": 2100, "gzip": 100 } },
      { "name": "main.js.map", "hash": "map1", "sizes": { "stat": 5000, "gzip": 900 } }
    ]
  }
]"#;

/// Same builds as [`HISTORY_JSON`] with the last one listed first
pub const UNSORTED_HISTORY_JSON: &str = r#"[
  {
    "meta": { "revision": "c", "timestamp": 30 },
    "artifacts": [{ "name": "main.js", "hash": "3", "sizes": { "stat": 300 } }]
  },
  {
    "meta": { "revision": "a", "timestamp": 10 },
    "artifacts": [{ "name": "main.js", "hash": "1", "sizes": { "stat": 100 } }]
  },
  {
    "meta": { "revision": "b", "timestamp": 20 },
    "artifacts": [{ "name": "main.js", "hash": "2", "sizes": { "stat": 200 } }]
  }
]"#;

/// One build listing the same artifact twice
pub const DUPLICATE_ARTIFACT_JSON: &str = r#"[
  {
    "meta": { "revision": "dup", "timestamp": 1 },
    "artifacts": [
      { "name": "main.js", "hash": "1", "sizes": { "stat": 1 } },
      { "name": "main.js", "hash": "2", "sizes": { "stat": 2 } }
    ]
  }
]"#;

/// Write a history file into `dir`
pub fn write_history(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("builds.json");
    fs::write(&path, json).expect("Failed to write history fixture");
    path
}

/// Write `.build-tracker.toml` into `dir`
pub fn write_config(dir: &Path, toml: &str) -> PathBuf {
    let path = dir.join(".build-tracker.toml");
    fs::write(&path, toml).expect("Failed to write config fixture");
    path
}
