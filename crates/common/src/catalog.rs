//! Built-in API catalogs
//!
//! Each service pairs a base URL with the descriptors used to pre-fill
//! requests. Two services ship with the tool; more can be merged in from a
//! YAML catalog file.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ApiDescriptor, HttpMethod};

pub const SEARCH_SERVICE: &str = "search";
pub const MOVIES_SERVICE: &str = "movies";

/// Endpoint every service exposes for obtaining a bearer token
pub const LOGIN_ENDPOINT: &str = "/login";

/// A backend the tool can target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub base_url: String,
    /// Shown next to the authorization controls
    #[serde(default)]
    pub auth_note: Option<String>,
    pub apis: Vec<ApiDescriptor>,
}

impl Service {
    /// Resolve a descriptor by 1-based index or by name.
    ///
    /// Names match case-insensitively, exact first, then by unique prefix.
    pub fn find(&self, selector: &str) -> Result<&ApiDescriptor> {
        let selector = selector.trim();

        if let Ok(index) = selector.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| self.apis.get(i))
                .ok_or_else(|| self.unknown(selector));
        }

        let wanted = selector.to_lowercase();
        if let Some(api) = self.apis.iter().find(|a| a.name.to_lowercase() == wanted) {
            return Ok(api);
        }

        let matches: Vec<&ApiDescriptor> = self
            .apis
            .iter()
            .filter(|a| a.name.to_lowercase().starts_with(&wanted))
            .collect();

        match matches.as_slice() {
            [api] => Ok(api),
            [] => Err(self.unknown(selector)),
            many => Err(Error::AmbiguousApi {
                selector: selector.to_string(),
                candidates: many
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    fn unknown(&self, selector: &str) -> Error {
        Error::UnknownApi {
            service: self.id.clone(),
            selector: selector.to_string(),
        }
    }
}

/// Ordered set of services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            services: vec![search_service(), movies_service()],
        }
    }

    pub fn service(&self, id: &str) -> Result<&Service> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::UnknownService(id.to_string()))
    }

    pub fn service_mut(&mut self, id: &str) -> Result<&mut Service> {
        self.services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::UnknownService(id.to_string()))
    }

    /// Point a service at a different deployment
    pub fn set_base_url(&mut self, id: &str, base_url: &str) -> Result<()> {
        self.service_mut(id)?.base_url = base_url.to_string();
        Ok(())
    }

    /// Merge services from a YAML catalog file.
    ///
    /// Entries with a known id append their descriptors; unknown ids become
    /// new services and must carry a `base_url`.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.merge_yaml(&content)
    }

    pub fn merge_yaml(&mut self, yaml: &str) -> Result<()> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;

        for entry in file.services {
            if let Ok(existing) = self.service_mut(&entry.id) {
                debug!(service = %entry.id, count = entry.apis.len(), "Extending service");
                if let Some(base_url) = entry.base_url {
                    existing.base_url = base_url;
                }
                existing.apis.extend(entry.apis);
                continue;
            }

            let base_url = entry.base_url.ok_or_else(|| {
                Error::InvalidConfig(format!("service '{}' has no base_url", entry.id))
            })?;
            debug!(service = %entry.id, count = entry.apis.len(), "Adding service");
            self.services.push(Service {
                title: entry.title.unwrap_or_else(|| entry.id.clone()),
                id: entry.id,
                base_url,
                auth_note: entry.auth_note,
                apis: entry.apis,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    services: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    title: Option<String>,
    base_url: Option<String>,
    auth_note: Option<String>,
    #[serde(default)]
    apis: Vec<ApiDescriptor>,
}

fn search_service() -> Service {
    Service {
        id: SEARCH_SERVICE.to_string(),
        title: "Search Index".to_string(),
        base_url: "https://algolia-search-backend-production.up.railway.app".to_string(),
        auth_note: Some("Not required".to_string()),
        apis: vec![
            ApiDescriptor::new(
                "Search Products",
                HttpMethod::Get,
                "/api/search?query=calvin",
                "Search for products in the Algolia index based on a query parameter.",
            )
            .with_payload(json!({ "query": "Product name or keyword" })),
            ApiDescriptor::new(
                "Add Product",
                HttpMethod::Post,
                "/api/add",
                "Adds a new product to the Algolia index.",
            )
            .with_payload(json!({
                "objectID": "123",
                "name": "Sample Product",
                "description": "Product description",
                "price": 100.0,
                "category": "Electronics",
            })),
            ApiDescriptor::new(
                "Test API",
                HttpMethod::Get,
                "/api/test",
                "Test API to check if the server is running properly.",
            )
            .with_payload(json!({})),
        ],
    }
}

fn movies_service() -> Service {
    Service {
        id: MOVIES_SERVICE.to_string(),
        title: "Movie Management".to_string(),
        base_url: "https://movie-management-system-production-3733.up.railway.app".to_string(),
        auth_note: None,
        apis: vec![
            ApiDescriptor::new(
                "Register User",
                HttpMethod::Post,
                "/register",
                "Registers a new user with username, email, password, and role.",
            )
            .with_payload(json!({
                "username": "testuser",
                "email": "testuser@example.com",
                "password": "password123",
                "role": "USER",
            })),
            ApiDescriptor::new(
                "Login User",
                HttpMethod::Post,
                LOGIN_ENDPOINT,
                "Logs in a user and returns a JWT token.",
            )
            .with_payload(json!({
                "email": "user@example.com",
                "password": "User@123",
            })),
            ApiDescriptor::new(
                "Get All Movies",
                HttpMethod::Get,
                "/movies",
                "Retrieves a list of all movies with their details and ratings.",
            ),
            ApiDescriptor::new(
                "Create Movie",
                HttpMethod::Post,
                "/movies",
                "Creates a new movie. Only authenticated users can perform this action.",
            )
            .with_payload(json!({
                "title": "Inception",
                "description": "A mind-bending thriller",
                "releasedAt": "2010-07-16",
                "duration": 148,
                "genre": "Sci-Fi",
                "language": "English",
            })),
            ApiDescriptor::new(
                "Update Movie",
                HttpMethod::Put,
                "/movies/:id",
                "Updates the details of a specific movie. Only the creator can perform this action.",
            )
            .with_payload(json!({
                "title": "Updated Movie Title",
                "description": "Updated description",
                "releasedAt": "2022-01-01",
                "duration": 150,
                "genre": "Drama",
                "language": "English",
            })),
            ApiDescriptor::new(
                "Rate Movie",
                HttpMethod::Post,
                "/movies/:id/rate",
                "Rates a specific movie. Ratings range from 1 to 5.",
            )
            .with_payload(json!({ "score": 4 })),
            ApiDescriptor::new(
                "Report Movie",
                HttpMethod::Post,
                "/movies/:id/report",
                "Reports a specific movie. Only authenticated users can perform this action.",
            )
            .with_payload(json!({ "reason": "Inappropriate content" })),
            ApiDescriptor::new(
                "Get All Reports (Admin Only)",
                HttpMethod::Get,
                "/admin/reports",
                "Retrieves all movie reports. Only accessible by admins.",
            ),
            // action is "approve" or "reject"
            ApiDescriptor::new(
                "Resolve Report (Admin Only)",
                HttpMethod::Post,
                "/admin/reports/:id/resolve",
                "Approves or rejects a movie report. Only accessible by admins.",
            )
            .with_payload(json!({ "action": "approve" })),
            ApiDescriptor::new(
                "Test Endpoint",
                HttpMethod::Get,
                "/test",
                "A simple test endpoint to verify API connectivity.",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_services() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.services.len(), 2);
        assert_eq!(catalog.service(SEARCH_SERVICE).unwrap().apis.len(), 3);
        assert_eq!(catalog.service(MOVIES_SERVICE).unwrap().apis.len(), 10);
        assert!(matches!(
            catalog.service("billing"),
            Err(Error::UnknownService(_))
        ));
    }

    #[test]
    fn test_find_by_index() {
        let catalog = Catalog::builtin();
        let movies = catalog.service(MOVIES_SERVICE).unwrap();
        assert_eq!(movies.find("1").unwrap().name, "Register User");
        assert_eq!(movies.find("10").unwrap().name, "Test Endpoint");
        assert!(movies.find("0").is_err());
        assert!(movies.find("11").is_err());
    }

    #[test]
    fn test_find_by_name() {
        let catalog = Catalog::builtin();
        let movies = catalog.service(MOVIES_SERVICE).unwrap();
        assert_eq!(movies.find("rate movie").unwrap().endpoint, "/movies/:id/rate");
        assert_eq!(movies.find("Resolve").unwrap().method, HttpMethod::Post);
        assert!(matches!(movies.find("nope"), Err(Error::UnknownApi { .. })));
    }

    #[test]
    fn test_find_ambiguous_prefix() {
        let catalog = Catalog::builtin();
        let movies = catalog.service(MOVIES_SERVICE).unwrap();
        match movies.find("get all") {
            Err(Error::AmbiguousApi { candidates, .. }) => {
                assert!(candidates.contains("Get All Movies"));
                assert!(candidates.contains("Get All Reports (Admin Only)"));
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_extends_and_adds() {
        let mut catalog = Catalog::builtin();
        catalog
            .merge_yaml(
                r#"
services:
  - id: movies
    apis:
      - name: Delete Movie
        method: DELETE
        endpoint: /movies/:id
  - id: local
    base_url: http://localhost:3000
    apis:
      - name: Health
        method: GET
        endpoint: /health
"#,
            )
            .unwrap();

        let movies = catalog.service(MOVIES_SERVICE).unwrap();
        assert_eq!(movies.apis.len(), 11);
        assert_eq!(movies.find("delete").unwrap().method, HttpMethod::Delete);

        let local = catalog.service("local").unwrap();
        assert_eq!(local.title, "local");
        assert_eq!(local.apis.len(), 1);
    }

    #[test]
    fn test_merge_lowercase_method() {
        let mut catalog = Catalog::builtin();
        catalog
            .merge_yaml(
                "services:\n  - id: movies\n    apis:\n      - name: Delete Movie\n        method: delete\n        endpoint: /movies/:id\n",
            )
            .unwrap();
        let api = catalog.service(MOVIES_SERVICE).unwrap().find("delete movie").unwrap();
        assert_eq!(api.method, HttpMethod::Delete);
    }

    #[test]
    fn test_merge_new_service_requires_base_url() {
        let mut catalog = Catalog::builtin();
        let err = catalog
            .merge_yaml("services:\n  - id: orphan\n    apis: []\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
