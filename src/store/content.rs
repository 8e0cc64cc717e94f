//! Posts table access

use super::SiteStore;
use crate::error::Result;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// A content row as imported from the host site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub post_name: String,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    #[serde(default = "default_post_status")]
    pub post_status: String,
    #[serde(default)]
    pub post_content: String,
    /// Autosaves are stored like any revision but never mark content as changed
    #[serde(default)]
    pub is_autosave: bool,
}

fn default_post_type() -> String {
    "post".to_string()
}

fn default_post_status() -> String {
    "publish".to_string()
}

/// Number of matching published rows for one post type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub post_type: String,
    pub count: u64,
}

/// A published row whose content matched a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMatch {
    pub id: i64,
    pub title: String,
    pub name: String,
    pub post_type: String,
}

/// Read access to published content
pub trait ContentSource {
    /// Count published rows whose content matches the LIKE pattern
    fn count_matching(&self, like: &str) -> Result<u64>;

    /// Same count grouped by post type
    fn count_matching_by_type(&self, like: &str) -> Result<Vec<TypeCount>>;

    /// Matching rows ordered by post type then title, at most `limit`
    fn find_matching(&self, like: &str, limit: usize) -> Result<Vec<PostMatch>>;
}

/// Wrap a literal in `%...%`, escaping LIKE wildcards with a backslash
pub fn like_pattern(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len() + 2);
    escaped.push('%');
    for c in literal.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl SiteStore {
    /// Insert or replace a post row
    pub fn upsert_post(&self, post: &Post) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO {} (ID, post_title, post_name, post_type, post_status, post_content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(ID) DO UPDATE SET
                    post_title = excluded.post_title,
                    post_name = excluded.post_name,
                    post_type = excluded.post_type,
                    post_status = excluded.post_status,
                    post_content = excluded.post_content",
                self.table("posts")
            ),
            params![
                post.id,
                post.post_title,
                post.post_name,
                post.post_type,
                post.post_status,
                post.post_content
            ],
        )?;
        Ok(())
    }
}

impl ContentSource for SiteStore {
    fn count_matching(&self, like: &str) -> Result<u64> {
        let count: i64 = self.conn().query_row(
            &format!(
                "SELECT COUNT(ID) FROM {}
                 WHERE post_status = 'publish'
                 AND post_content LIKE ?1 ESCAPE '\\'",
                self.table("posts")
            ),
            [like],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn count_matching_by_type(&self, like: &str) -> Result<Vec<TypeCount>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT post_type, COUNT(*) FROM {}
             WHERE post_status = 'publish'
             AND post_content LIKE ?1 ESCAPE '\\'
             GROUP BY post_type
             ORDER BY post_type",
            self.table("posts")
        ))?;

        let rows = stmt.query_map([like], |row| {
            let count: i64 = row.get(1)?;
            Ok(TypeCount {
                post_type: row.get(0)?,
                count: count.max(0) as u64,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn find_matching(&self, like: &str, limit: usize) -> Result<Vec<PostMatch>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT ID, post_title, post_name, post_type FROM {}
             WHERE post_status = 'publish'
             AND post_content LIKE ?1 ESCAPE '\\'
             ORDER BY post_type, post_title
             LIMIT ?2",
            self.table("posts")
        ))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![like, limit], |row| {
            Ok(PostMatch {
                id: row.get(0)?,
                title: row.get(1)?,
                name: row.get(2)?,
                post_type: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, post_type: &str, status: &str, title: &str, content: &str) -> Post {
        Post {
            id,
            post_title: title.to_string(),
            post_name: String::new(),
            post_type: post_type.to_string(),
            post_status: status.to_string(),
            post_content: content.to_string(),
            is_autosave: false,
        }
    }

    fn seeded_store() -> SiteStore {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        let rows = [
            post(1, "post", "publish", "Hello", "<!-- wp:paragraph --><p>a</p>"),
            post(2, "page", "publish", "About", "<!-- wp:paragraph --><!-- wp:image /-->"),
            post(3, "post", "draft", "Draft", "<!-- wp:paragraph -->"),
            post(4, "page", "publish", "Contact", "<!-- wp:heading -->"),
            post(5, "post", "publish", "Another", "<!-- wp:paragraph -->"),
        ];
        for p in &rows {
            store.upsert_post(p).unwrap();
        }
        store
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("<!-- wp:image"), "%<!-- wp:image%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_count_only_published() {
        let store = seeded_store();
        let like = like_pattern("<!-- wp:paragraph");
        assert_eq!(store.count_matching(&like).unwrap(), 3);
    }

    #[test]
    fn test_count_by_type() {
        let store = seeded_store();
        let like = like_pattern("<!-- wp:paragraph");
        let breakdown = store.count_matching_by_type(&like).unwrap();
        assert_eq!(
            breakdown,
            vec![
                TypeCount {
                    post_type: "page".to_string(),
                    count: 1
                },
                TypeCount {
                    post_type: "post".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_underscore_is_literal() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        store
            .upsert_post(&post(1, "post", "publish", "A", "<!-- wp:acme/my-block -->"))
            .unwrap();
        // An unescaped '_' would match the '-' in the content
        let like = like_pattern("<!-- wp:acme/my_block");
        assert_eq!(store.count_matching(&like).unwrap(), 0);
    }

    #[test]
    fn test_find_ordered_and_limited() {
        let store = seeded_store();
        let like = like_pattern("<!-- wp:paragraph");

        let all = store.find_matching(&like, 50).unwrap();
        let ids: Vec<i64> = all.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 5, 1]);

        let limited = store.find_matching(&like, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let store = seeded_store();
        store
            .upsert_post(&post(4, "page", "publish", "Contact", "<!-- wp:paragraph -->"))
            .unwrap();
        let like = like_pattern("<!-- wp:paragraph");
        assert_eq!(store.count_matching(&like).unwrap(), 4);
        assert_eq!(
            store.count_matching(&like_pattern("<!-- wp:heading")).unwrap(),
            0
        );
    }

    #[test]
    fn test_post_deserialize_defaults() {
        let p: Post = serde_json::from_str(r#"{"ID": 9}"#).unwrap();
        assert_eq!(p.post_type, "post");
        assert_eq!(p.post_status, "publish");
        assert!(!p.is_autosave);
    }
}
