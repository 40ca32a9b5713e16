use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{Category, PostCategory};
use super::user::User;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub content: String,
    pub status: PostStatus,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
}

/// Denormalized read model: a post joined with one of its categories and its author.
///
/// A post filed under two categories yields two details; a post with no
/// category yields none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub content: String,
    pub status: PostStatus,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_description: String,
    pub category_slug: String,
    pub author_name: String,
    #[serde(skip)]
    category_order: i32,
}

impl PostDetail {
    fn new(post: &Post, category: &Category, author: &User) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            summary: post.summary.clone(),
            content: post.content.clone(),
            status: post.status,
            published_at: post.published_at,
            updated_at: post.updated_at,
            author_id: post.author_id,
            category_id: category.id,
            category_name: category.name.clone(),
            category_description: category.description.clone(),
            category_slug: category.slug.clone(),
            author_name: author.username.clone(),
            category_order: category.sort_order,
        }
    }

    fn display_order(&self, other: &Self) -> Ordering {
        other
            .published_at
            .cmp(&self.published_at)
            .then(self.category_order.cmp(&other.category_order))
            .then_with(|| self.category_name.cmp(&other.category_name))
            .then(self.id.cmp(&other.id))
    }
}

/// Inner-join posts, their category links, categories and authors.
///
/// Links whose post, category or author is missing from the inputs produce
/// no row. Rows are ordered newest post first, then by category sort order.
pub fn join_details(
    posts: &[Post],
    links: &[PostCategory],
    categories: &[Category],
    users: &[User],
) -> Vec<PostDetail> {
    let posts: HashMap<Uuid, &Post> = posts.iter().map(|p| (p.id, p)).collect();
    let categories: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let users: HashMap<Uuid, &User> = users.iter().map(|u| (u.id, u)).collect();

    let mut rows: Vec<PostDetail> = links
        .iter()
        .filter_map(|link| {
            let post = posts.get(&link.post_id)?;
            let category = categories.get(&link.category_id)?;
            let author = users.get(&post.author_id)?;
            Some(PostDetail::new(post, category, author))
        })
        .collect();

    rows.sort_by(PostDetail::display_order);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn user(name: &str) -> User {
        User::new(name.to_string(), format!("{name}@example.com"), "hash".to_string())
    }

    fn post(author: &User, slug: &str, published_at: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            summary: String::new(),
            content: String::new(),
            status: PostStatus::Published,
            published_at,
            updated_at: published_at,
            author_id: author.id,
        }
    }

    #[test]
    fn post_without_category_is_excluded() {
        let author = user("ada");
        let lonely = post(&author, "lonely", Utc::now());
        let rows = join_details(&[lonely], &[], &[], &[author]);
        assert!(rows.is_empty());
    }

    #[test]
    fn one_row_per_category_ordered_by_sort_order() {
        let author = user("ada");
        let p = post(&author, "multi", Utc::now());
        let news = Category::new("News".into(), "news".into(), "n".into(), 2);
        let tech = Category::new("Tech".into(), "tech".into(), "t".into(), 1);
        let links = [
            PostCategory::new(p.id, news.id),
            PostCategory::new(p.id, tech.id),
        ];

        let rows = join_details(&[p], &links, &[news, tech], &[author]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category_name, "Tech");
        assert_eq!(rows[1].category_name, "News");
        assert_eq!(rows[0].author_name, "ada");
    }

    #[test]
    fn newest_post_comes_first() {
        let author = user("ada");
        let now = Utc::now();
        let old = post(&author, "old", now - TimeDelta::days(3));
        let new = post(&author, "new", now);
        let cat = Category::new("News".into(), "news".into(), String::new(), 0);
        let links = [
            PostCategory::new(old.id, cat.id),
            PostCategory::new(new.id, cat.id),
        ];

        let rows = join_details(&[old, new], &links, &[cat], &[author]);

        let slugs: Vec<_> = rows.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "old"]);
    }

    #[test]
    fn missing_author_drops_the_row() {
        let author = user("ada");
        let p = post(&author, "ghost", Utc::now());
        let cat = Category::new("News".into(), "news".into(), String::new(), 0);
        let links = [PostCategory::new(p.id, cat.id)];

        assert!(join_details(&[p], &links, &[cat], &[]).is_empty());
    }
}
