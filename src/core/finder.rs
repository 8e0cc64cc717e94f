//! Post finder: which published items contain a block

use crate::core::block::block_marker;
use crate::core::post_type::{is_template_type, PostTypeLabels};
use crate::store::{like_pattern, ContentSource, PostMatch};
use serde::Serialize;
use tracing::warn;

const NO_TITLE: &str = "(No Title)";

/// Separator between theme and template in a template slug
const THEME_SEPARATOR: &str = "//";

/// One item listed for a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundPost {
    #[serde(rename = "ID")]
    pub id: i64,
    pub title: String,
    pub edit_url: String,
    pub post_type: String,
    pub post_type_label: String,
}

/// Where edit links point
#[derive(Debug, Clone)]
pub struct EditLinks {
    /// Admin base URL ending in '/'
    pub admin_url: String,
    /// Active theme, used when a template slug names none
    pub theme: String,
}

impl EditLinks {
    /// Edit link for a matched row
    pub fn for_post(&self, post: &PostMatch) -> String {
        if !is_template_type(&post.post_type) {
            return format!("{}post.php?post={}&action=edit", self.admin_url, post.id);
        }

        let (theme, template) = match post.name.split_once(THEME_SEPARATOR) {
            Some((theme, template)) if !theme.is_empty() => (theme, template),
            Some((_, template)) => (self.theme.as_str(), template),
            None => (self.theme.as_str(), post.name.as_str()),
        };

        format!(
            "{}site-editor.php?postId={}%2F%2F{}&postType={}&canvas=edit",
            self.admin_url, theme, template, post.post_type
        )
    }
}

/// Finds published posts containing a block marker
pub struct PostFinder<'a, S> {
    source: &'a S,
    labels: &'a PostTypeLabels,
    links: &'a EditLinks,
    limit: usize,
}

impl<'a, S: ContentSource> PostFinder<'a, S> {
    pub fn new(
        source: &'a S,
        labels: &'a PostTypeLabels,
        links: &'a EditLinks,
        limit: usize,
    ) -> Self {
        Self {
            source,
            labels,
            links,
            limit,
        }
    }

    /// Up to `limit` matching items; an empty list on query failure
    pub fn find(&self, token: &str) -> Vec<FoundPost> {
        let like = like_pattern(&block_marker(token));
        let matches = match self.source.find_matching(&like, self.limit) {
            Ok(m) => m,
            Err(e) => {
                warn!(token, error = %e, "post lookup failed");
                return Vec::new();
            }
        };

        matches
            .iter()
            .map(|m| FoundPost {
                id: m.id,
                title: if m.title.is_empty() {
                    NO_TITLE.to_string()
                } else {
                    m.title.clone()
                },
                edit_url: self.links.for_post(m),
                post_type: m.post_type.clone(),
                post_type_label: self.labels.singular(&m.post_type),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Post, SiteStore};
    use pretty_assertions::assert_eq;

    fn links() -> EditLinks {
        EditLinks {
            admin_url: "/wp-admin/".to_string(),
            theme: "twentytwentyfour".to_string(),
        }
    }

    fn matched(id: i64, name: &str, post_type: &str) -> PostMatch {
        PostMatch {
            id,
            title: String::new(),
            name: name.to_string(),
            post_type: post_type.to_string(),
        }
    }

    #[test]
    fn test_regular_edit_link() {
        assert_eq!(
            links().for_post(&matched(42, "hello", "post")),
            "/wp-admin/post.php?post=42&action=edit"
        );
    }

    #[test]
    fn test_template_link_uses_slug_theme() {
        assert_eq!(
            links().for_post(&matched(7, "mytheme//single", "wp_template")),
            "/wp-admin/site-editor.php?postId=mytheme%2F%2Fsingle&postType=wp_template&canvas=edit"
        );
    }

    #[test]
    fn test_template_link_falls_back_to_active_theme() {
        assert_eq!(
            links().for_post(&matched(8, "header", "wp_template_part")),
            "/wp-admin/site-editor.php?postId=twentytwentyfour%2F%2Fheader&postType=wp_template_part&canvas=edit"
        );
        assert_eq!(
            links().for_post(&matched(9, "//footer", "wp_template_part")),
            "/wp-admin/site-editor.php?postId=twentytwentyfour%2F%2Ffooter&postType=wp_template_part&canvas=edit"
        );
    }

    #[test]
    fn test_find_labels_and_titles() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        let rows = [
            (1, "", "hello", "post", "<!-- wp:image /-->"),
            (2, "Home", "theme//home", "wp_template", "<!-- wp:image /-->"),
            (3, "Other", "other", "post", "<!-- wp:paragraph -->"),
        ];
        for (id, title, name, post_type, content) in rows {
            store
                .upsert_post(&Post {
                    id,
                    post_title: title.to_string(),
                    post_name: name.to_string(),
                    post_type: post_type.to_string(),
                    post_status: "publish".to_string(),
                    post_content: content.to_string(),
                    is_autosave: false,
                })
                .unwrap();
        }
        let labels = PostTypeLabels::default();
        let links = links();

        let found = PostFinder::new(&store, &labels, &links, 50).find("image");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, 1);
        assert_eq!(found[0].title, "(No Title)");
        assert_eq!(found[0].post_type_label, "Post");
        assert_eq!(found[1].post_type_label, "Template");
        assert!(found[1].edit_url.contains("postId=theme%2F%2Fhome"));
    }

    #[test]
    fn test_find_respects_limit() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        for id in 1..=5 {
            store
                .upsert_post(&Post {
                    id,
                    post_title: format!("T{}", id),
                    post_name: String::new(),
                    post_type: "post".to_string(),
                    post_status: "publish".to_string(),
                    post_content: "<!-- wp:gallery -->".to_string(),
                    is_autosave: false,
                })
                .unwrap();
        }
        let labels = PostTypeLabels::default();
        let links = links();

        let found = PostFinder::new(&store, &labels, &links, 3).find("gallery");
        assert_eq!(found.len(), 3);
    }
}
