use serde::{Deserialize, Serialize};

/// A catalog entry with its running rating aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    // count of ratings folded into `rating`, kept as a float like the stored documents
    #[serde(rename = "ratedBy", default)]
    pub rated_by: f64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Movie {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: 0.0,
            rated_by: 0.0,
            comments: Vec::new(),
        }
    }

    /// True if `fragment` occurs in the name, ignoring case.
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.to_lowercase().contains(&fragment.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rated: Vec<Rated>,
}

impl User {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            rated: Vec::new(),
        }
    }

    pub fn has_rated(&self, movie: &str) -> bool {
        self.rated.iter().any(|r| r.movie == movie)
    }
}

/// One rating a user gave to a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rated {
    pub movie: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "username", alias = "userName")]
    pub user_name: String,
    pub comment: String,
}
