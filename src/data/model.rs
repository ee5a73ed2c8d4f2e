use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Role – narrative role of a character
// ---------------------------------------------------------------------------

/// A character's narrative role. Anything that is neither protagonist nor
/// antagonist is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Protagonist,
    Antagonist,
    Other(String),
}

impl Role {
    /// Parse a role label from the source data (case-insensitive).
    pub fn parse(label: &str) -> Role {
        match label.trim().to_ascii_lowercase().as_str() {
            "protagonist" => Role::Protagonist,
            "antagonist" => Role::Antagonist,
            _ => Role::Other(label.trim().to_string()),
        }
    }

    /// Sort rank for matrix axes: protagonists first, then antagonists,
    /// then everything else in input order.
    pub fn display_rank(&self) -> u8 {
        match self {
            Role::Protagonist => 0,
            Role::Antagonist => 1,
            Role::Other(_) => 99,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Role::Protagonist => "protagonist",
            Role::Antagonist => "antagonist",
            Role::Other(s) => s,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Character – one row of the source dataset
// ---------------------------------------------------------------------------

/// A single character (one row of the source CSV).
#[derive(Debug, Clone)]
pub struct Character {
    /// Character name, unique per movie+character.
    pub name: String,
    pub movie_name: String,
    pub genre: String,
    pub role: Role,
    /// Movie rating on a 0–10 scale.
    pub rating: f64,
    /// Ranked values, highest priority first.
    pub value_list: Vec<String>,
    /// Positional rank weight per value – same length as `value_list`.
    pub value_rank: Vec<f64>,
    /// Embedding vector carried along from the source data.
    pub vec: Vec<f64>,
}

impl Character {
    /// The character's highest-priority value: the first entry of
    /// `value_list`, if any.
    pub fn top_value(&self) -> Option<&str> {
        self.value_list.first().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// CharacterDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category axes.
///
/// Built once at load time; characters are immutable afterwards and every
/// derived view (filtered subsets, matrices, count tables) is recomputed
/// from scratch on demand.
#[derive(Debug, Clone)]
pub struct CharacterDataset {
    /// All characters (rows), in source order.
    pub characters: Vec<Character>,
    /// Sorted distinct genres.
    pub genres: Vec<String>,
    /// Sorted distinct role labels as they appear in the source.
    pub roles: Vec<String>,
    /// Distinct top values in first-appearance order – the category axis
    /// shared by the bar-chart views.
    pub top_values: Vec<String>,
}

impl CharacterDataset {
    /// Build the category axes from the loaded characters.
    pub fn from_characters(characters: Vec<Character>) -> Self {
        let mut genre_set: BTreeSet<String> = BTreeSet::new();
        let mut role_set: BTreeSet<String> = BTreeSet::new();
        let mut top_values: Vec<String> = Vec::new();

        for ch in &characters {
            genre_set.insert(ch.genre.clone());
            role_set.insert(ch.role.label().to_string());
            if let Some(top) = ch.top_value() {
                if !top_values.iter().any(|v| v == top) {
                    top_values.push(top.to_string());
                }
            }
        }

        CharacterDataset {
            characters,
            genres: genre_set.into_iter().collect(),
            roles: role_set.into_iter().collect(),
            top_values,
        }
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
