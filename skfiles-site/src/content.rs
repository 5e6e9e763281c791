//! Posts, categories and other site copy.
//!
//! Pages never embed their content; they read it from the [`ContentProvider`]
//! held in the application state.

use std::{fs, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use skfiles_calendar::Event;

use crate::error::SiteError;

const SAMPLE: &str = include_str!("../content/sample.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMeta {
    pub title: String,
    pub tagline: String,
    pub intro: String,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: NaiveDate,
    pub category: String,
    pub image: String,
}

impl Post {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
    }
}

/// URL segment for a category, e.g. `Work-life Balance` -> `work-life-balance`.
pub fn category_slug(category: &str) -> String {
    category
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

pub trait ContentProvider: Send + Sync {
    fn site(&self) -> &SiteMeta;

    /// Newest first.
    fn posts(&self) -> &[Post];

    fn categories(&self) -> &[String];

    /// Events the calendar starts out with.
    fn seed_events(&self) -> &[Event];

    fn post(&self, id: &str) -> Option<&Post> {
        self.posts().iter().find(|post| post.id == id)
    }

    fn category(&self, slug: &str) -> Option<&str> {
        self.categories()
            .iter()
            .find(|category| category_slug(category) == slug)
            .map(String::as_str)
    }

    fn posts_in(&self, category: &str) -> Vec<&Post> {
        self.posts()
            .iter()
            .filter(|post| post.category.eq_ignore_ascii_case(category))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    site: SiteMeta,
    posts: Vec<Post>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    events: Vec<Event>,
}

impl Content {
    pub fn sample() -> Result<Self, SiteError> {
        Self::from_json(SAMPLE)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SiteError> {
        let raw = fs::read_to_string(path).map_err(|source| SiteError::ContentRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SiteError> {
        let mut content: Content = serde_json::from_str(raw)?;
        content.posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(content)
    }
}

impl ContentProvider for Content {
    fn site(&self) -> &SiteMeta {
        &self.site
    }

    fn posts(&self) -> &[Post] {
        &self.posts
    }

    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn seed_events(&self) -> &[Event] {
        &self.events
    }
}
