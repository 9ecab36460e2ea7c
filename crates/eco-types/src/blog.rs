//! Ecological blog posts.

use crate::resource::{iso_timestamp, Resource, ResourceId};
use crate::validation::{require, ValidationIssue, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcologicalBlog {
    pub ecological_blog_id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub discover: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub post_date: String,
    #[serde(default)]
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEcologicalBlog {
    pub title: String,
    pub image: String,
    pub discover: String,
    pub description: String,
    pub post_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogForm {
    pub title: String,
    pub image: String,
    pub discover: String,
    pub description: String,
}

impl BlogForm {
    pub fn validate(&self) -> ValidationResult {
        let mut issues = Vec::new();
        require(&mut issues, "title", &self.title, "Please enter a title");
        ValidationIssue::into_result(issues)
    }
}

impl NewEcologicalBlog {
    pub fn stamped(form: BlogForm, owner: Option<i64>, now: DateTime<Utc>) -> Self {
        Self {
            title: form.title.trim().to_string(),
            image: form.image,
            discover: form.discover,
            description: form.description,
            post_date: iso_timestamp(now),
            user_id: owner,
        }
    }
}

impl EcologicalBlog {
    pub fn merged_with(&self, form: BlogForm) -> EcologicalBlog {
        EcologicalBlog {
            ecological_blog_id: self.ecological_blog_id,
            title: form.title.trim().to_string(),
            image: form.image,
            discover: form.discover,
            description: form.description,
            post_date: self.post_date.clone(),
            user_id: self.user_id,
        }
    }

    pub fn to_form(&self) -> BlogForm {
        BlogForm {
            title: self.title.clone(),
            image: self.image.clone(),
            discover: self.discover.clone(),
            description: self.description.clone(),
        }
    }
}

impl Resource for EcologicalBlog {
    type Draft = NewEcologicalBlog;

    const COLLECTION: &'static str = "EcologicalBlog";
    const LABEL: &'static str = "blogs";

    fn id(&self) -> ResourceId {
        self.ecological_blog_id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamped_blog_payload() {
        let now = Utc.with_ymd_and_hms(2025, 4, 22, 0, 0, 0).unwrap();
        let form = BlogForm {
            title: "Compost".to_string(),
            discover: "Reduce waste".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(NewEcologicalBlog::stamped(form, None, now)).unwrap();
        assert_eq!(json["postDate"], "2025-04-22T00:00:00.000Z");
        assert!(json.get("userId").is_none());
        assert!(json.get("ecologicalBlogId").is_none());
    }

    #[test]
    fn merged_blog_keeps_post_date() {
        let cached = EcologicalBlog {
            ecological_blog_id: 5,
            title: "Old".to_string(),
            image: String::new(),
            discover: String::new(),
            description: String::new(),
            post_date: "2024-12-01T00:00:00.000Z".to_string(),
            user_id: 1,
        };
        let merged = cached.merged_with(BlogForm {
            title: "New".to_string(),
            ..cached.to_form()
        });
        assert_eq!(merged.id(), 5);
        assert_eq!(merged.title, "New");
        assert_eq!(merged.post_date, "2024-12-01T00:00:00.000Z");
    }
}
