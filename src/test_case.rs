use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single command to run through both shells
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TestCase {
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub expected_error: String,
    #[serde(default)]
    pub expected_code: i32,
}

impl TestCase {
    pub fn has_expected_output(&self) -> bool {
        !self.expected_output.is_empty()
    }

    pub fn has_expected_error(&self) -> bool {
        !self.expected_error.is_empty()
    }

    // Zero doubles as "unspecified"
    pub fn has_expected_code(&self) -> bool {
        self.expected_code != 0
    }
}

// READ SUITE FILE

#[derive(Deserialize)]
struct TestSuite {
    #[serde(default)]
    test_cases: Vec<TestCase>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    FailedToReadFile { path: PathBuf, source: io::Error },

    #[error("failed to parse JSON in '{}': {source}", .path.display())]
    FailedToParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in '{}': {source}", .path.display())]
    FailedToParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load the whole suite from `path`
///
/// Files ending in `.toml` are read as TOML, everything else as JSON. Either
/// every test case parses or nothing is returned.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::FailedToReadFile {
        path: path.to_owned(),
        source,
    })?;

    let suite = if is_toml_file(path) {
        parse_toml_suite(&content).map_err(|source| LoadError::FailedToParseToml {
            path: path.to_owned(),
            source,
        })?
    } else {
        parse_json_suite(&content).map_err(|source| LoadError::FailedToParseJson {
            path: path.to_owned(),
            source,
        })?
    };

    tracing::debug!(
        path = %path.display(),
        count = suite.test_cases.len(),
        "loaded test cases"
    );

    Ok(suite.test_cases)
}

fn is_toml_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

fn parse_json_suite(content: &str) -> Result<TestSuite, serde_json::Error> {
    serde_json::from_str(content)
}

fn parse_toml_suite(content: &str) -> Result<TestSuite, toml::de::Error> {
    toml::from_str(content)
}

// TESTS
