use chrono::NaiveDate;
use rand::Rng;
use serde::Deserialize;

/// A post as returned by the placeholder API (`GET /posts`).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// One row of the documents table.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub file_name: String,
    pub version: String,
    pub size: String,
    pub upload_date: String,
    pub description: String,
}

impl Document {
    /// Builds a document row from a post.
    ///
    /// Name and version derive from the post; size and upload date are
    /// synthetic and drawn from `rng`.
    pub fn from_post<R: Rng + ?Sized>(post: &Post, rng: &mut R) -> Self {
        let stem = post.title.split(' ').take(3).collect::<Vec<_>>().join("_");
        let size_kb: u32 = rng.gen_range(100..1000);
        let month: u32 = rng.gen_range(1..=12);
        let day: u32 = rng.gen_range(1..=28);
        // Day 28 exists in every month
        let upload_date = NaiveDate::from_ymd_opt(2024, month, day)
            .map(|date| date.format("%d.%m.%Y").to_string())
            .unwrap_or_default();

        Self {
            file_name: format!("{stem}.pdf"),
            version: format!("v{}.{}", post.user_id, post.id % 10),
            size: format!("{size_kb} KB"),
            upload_date,
            description: post.body.clone(),
        }
    }
}
