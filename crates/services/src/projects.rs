//! Project gallery loading and per-user completion tracking.

use std::sync::Arc;

use reqwest::Client;

use storage::repository::{RecordKind, RecordRepository};
use tutor_core::model::{CompletedProjects, Project, ProjectId, UserId};

use crate::error::{CourseDataError, ProjectError};
use crate::records::{read_or_default, write_json};

/// Fetches the project gallery and tracks which projects a user finished.
#[derive(Clone)]
pub struct ProjectService {
    client: Client,
    base_url: String,
    records: Arc<dyn RecordRepository>,
}

impl ProjectService {
    #[must_use]
    pub fn new(base_url: impl Into<String>, records: Arc<dyn RecordRepository>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            records,
        }
    }

    fn projects_url(&self) -> String {
        format!("{}/data/projects.json", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_once(&self) -> Result<Vec<Project>, CourseDataError> {
        let response = self.client.get(self.projects_url()).send().await?;
        if !response.status().is_success() {
            return Err(CourseDataError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Loads the gallery, retrying a failed fetch once before substituting
    /// the built-in projects.
    pub async fn load_projects(&self) -> Vec<Project> {
        for attempt in 0..2 {
            match self.fetch_once().await {
                Ok(projects) => return projects,
                Err(err) => {
                    tracing::warn!(attempt, %err, "project gallery fetch failed");
                }
            }
        }
        fallback_projects()
    }

    /// Marks a project complete for the user and persists the set.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError` if the record cannot be read or written.
    pub async fn mark_complete(&self, user: &UserId, project: ProjectId) -> Result<(), ProjectError> {
        let mut completed: CompletedProjects =
            read_or_default(&self.records, user, RecordKind::CompletedProjects).await?;
        completed.insert(project);
        write_json(&self.records, user, RecordKind::CompletedProjects, &completed).await?;
        Ok(())
    }

    /// Whether the user has completed a project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError` if the record cannot be read.
    pub async fn is_complete(&self, user: &UserId, project: ProjectId) -> Result<bool, ProjectError> {
        let completed: CompletedProjects =
            read_or_default(&self.records, user, RecordKind::CompletedProjects).await?;
        Ok(completed.contains(project))
    }

    /// The user's full completed-project set.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError` if the record cannot be read.
    pub async fn completed(&self, user: &UserId) -> Result<CompletedProjects, ProjectError> {
        Ok(read_or_default(&self.records, user, RecordKind::CompletedProjects).await?)
    }
}

/// Built-in gallery served when `projects.json` cannot be fetched.
#[must_use]
pub fn fallback_projects() -> Vec<Project> {
    vec![
        Project {
            id: ProjectId::new(1),
            title: "Personal Portfolio".into(),
            category: "Beginner".into(),
            description: "A responsive profile page using HTML/CSS with modern design principles."
                .into(),
            image: Some("assets/images/portfolio.png".into()),
            tags: vec!["HTML".into(), "CSS".into(), "Responsive".into()],
            difficulty: "Beginner".into(),
            html: "<div id='portfolio-app'><h1>Personal Portfolio</h1><p>A responsive profile page using HTML/CSS with modern design principles.</p></div>".into(),
            css: "#portfolio-app { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; } #portfolio-app h1 { color: #333; }".into(),
            js: "// Portfolio app loaded".into(),
        },
        Project {
            id: ProjectId::new(2),
            title: "Simple Calculator".into(),
            category: "Beginner".into(),
            description: "A basic calculator with math functions using HTML, CSS, and JavaScript."
                .into(),
            image: Some("assets/images/calculator.png".into()),
            tags: vec!["HTML".into(), "CSS".into(), "JavaScript".into()],
            difficulty: "Beginner".into(),
            html: "<div id='calculator-app'><h1>Simple Calculator</h1><p>A basic calculator with math functions.</p></div>".into(),
            css: "#calculator-app { font-family: Arial, sans-serif; max-width: 400px; margin: 0 auto; padding: 20px; }".into(),
            js: "// Calculator app loaded".into(),
        },
        Project {
            id: ProjectId::new(3),
            title: "To-Do List App".into(),
            category: "Intermediate".into(),
            description: "A CRUD-style app with localStorage for persistent task management."
                .into(),
            image: Some("assets/images/todo-app.png".into()),
            tags: vec![
                "HTML".into(),
                "CSS".into(),
                "JavaScript".into(),
                "LocalStorage".into(),
            ],
            difficulty: "Intermediate".into(),
            html: "<div id='todo-app'><h1>To-Do List App</h1><p>A CRUD-style app with localStorage for persistent task management.</p></div>".into(),
            css: "#todo-app { font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; }".into(),
            js: "// To-Do app loaded".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn user() -> UserId {
        UserId::new("user_projects1")
    }

    fn service() -> ProjectService {
        ProjectService::new("http://127.0.0.1:9", Arc::new(InMemoryRepository::new()))
    }

    #[test]
    fn fallback_gallery_has_three_projects() {
        let projects = fallback_projects();
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].title, "Personal Portfolio");
        assert_eq!(projects[2].id, ProjectId::new(3));
    }

    #[tokio::test]
    async fn unreachable_gallery_falls_back() {
        // Port 9 (discard) is assumed closed; both attempts fail.
        let projects = service().load_projects().await;
        assert_eq!(projects.len(), 3);
    }

    #[tokio::test]
    async fn completion_roundtrip() {
        let svc = service();
        assert!(!svc.is_complete(&user(), ProjectId::new(2)).await.unwrap());

        svc.mark_complete(&user(), ProjectId::new(2)).await.unwrap();
        svc.mark_complete(&user(), ProjectId::new(2)).await.unwrap();

        assert!(svc.is_complete(&user(), ProjectId::new(2)).await.unwrap());
        assert_eq!(svc.completed(&user()).await.unwrap().len(), 1);
    }
}
