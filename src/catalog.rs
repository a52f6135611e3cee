use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;

static SNIPPET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/snippets");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }

    fn file_name(self) -> String {
        format!("{self}.json")
    }
}

#[derive(Deserialize, Clone, Debug)]
struct SnippetFile {
    difficulty: Difficulty,
    snippets: Vec<String>,
}

/// Fixed mapping from difficulty to the ordered snippets shown for it
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    snippets: HashMap<Difficulty, Vec<String>>,
}

impl Catalog {
    /// Catalog built from the snippet documents compiled into the binary.
    /// A difficulty whose document is missing or unreadable ends up empty.
    pub fn embedded() -> Self {
        let mut snippets = HashMap::new();
        for difficulty in Difficulty::ALL {
            match read_snippets_from_file(&difficulty.file_name()) {
                Ok(file) if file.difficulty == difficulty => {
                    snippets.insert(difficulty, file.snippets);
                }
                Ok(file) => {
                    tracing::warn!(
                        "snippet file for {} declares difficulty {}",
                        difficulty,
                        file.difficulty
                    );
                }
                Err(e) => {
                    tracing::warn!("no snippets for {}: {}", difficulty, e);
                }
            }
        }
        Self { snippets }
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Difficulty, Vec<S>)>,
        S: Into<String>,
    {
        let snippets = entries
            .into_iter()
            .map(|(d, list)| (d, list.into_iter().map(Into::into).collect()))
            .collect();
        Self { snippets }
    }

    pub fn snippets(&self, difficulty: Difficulty) -> &[String] {
        self.snippets
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self, difficulty: Difficulty) -> usize {
        self.snippets(difficulty).len()
    }

    pub fn is_empty(&self, difficulty: Difficulty) -> bool {
        self.snippets(difficulty).is_empty()
    }

    /// Looks up a snippet with the index wrapped into the list.
    /// Returns the wrapped index alongside the text.
    pub fn get(&self, difficulty: Difficulty, index: usize) -> Option<(usize, &str)> {
        let list = self.snippets(difficulty);
        if list.is_empty() {
            return None;
        }
        let wrapped = index % list.len();
        Some((wrapped, list[wrapped].as_str()))
    }
}

fn read_snippets_from_file(file_name: &str) -> Result<SnippetFile, Box<dyn Error>> {
    let file = SNIPPET_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("snippet file {file_name} not found"))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| format!("snippet file {file_name} is not utf-8"))?;

    Ok(serde_json::from_str(file_as_str)?)
}
