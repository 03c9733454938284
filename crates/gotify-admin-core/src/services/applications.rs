use serde::de::IgnoredAny;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Application, ApplicationParams, DEFAULT_APP_IMAGE};
use crate::request::RequestClient;
use crate::transport::{Body, FilePart, Method, Transport};

/// Local check made before an image upload: a named, non-empty file.
pub fn validate_image(file: &FilePart) -> Result<()> {
    if file.file_name.is_empty() || file.bytes.is_empty() {
        return Err(Error::validation("An image file is required"));
    }
    Ok(())
}

/// `/application` endpoints.
#[derive(Debug)]
pub struct Applications<'a, T> {
    api: &'a RequestClient<T>,
}

impl<'a, T: Transport> Applications<'a, T> {
    pub(crate) const fn new(api: &'a RequestClient<T>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Application>> {
        self.api.request(Method::Get, "/application", Body::Empty).await
    }

    pub async fn get(&self, id: u64) -> Result<Application> {
        self.api
            .request(Method::Get, &format!("/application/{id}"), Body::Empty)
            .await
    }

    pub async fn create(&self, name: &str, description: &str) -> Result<Application> {
        let app: Application = self
            .api
            .send_json(
                Method::Post,
                "/application",
                &ApplicationParams { name, description },
            )
            .await?;
        info!(id = app.id, name, "Created application");
        Ok(app)
    }

    pub async fn update(&self, id: u64, name: &str, description: &str) -> Result<Application> {
        self.api
            .send_json(
                Method::Put,
                &format!("/application/{id}"),
                &ApplicationParams { name, description },
            )
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        let _: IgnoredAny = self
            .api
            .request(Method::Delete, &format!("/application/{id}"), Body::Empty)
            .await?;
        info!(id, "Deleted application");
        Ok(())
    }

    /// Upload an icon as the multipart `file` field.
    pub async fn upload_image(&self, id: u64, file: FilePart) -> Result<Application> {
        validate_image(&file)?;
        self.api
            .request(
                Method::Post,
                &format!("/application/{id}/image"),
                Body::Multipart(file),
            )
            .await
    }

    pub async fn delete_image(&self, id: u64) -> Result<()> {
        let _: IgnoredAny = self
            .api
            .request(
                Method::Delete,
                &format!("/application/{id}/image"),
                Body::Empty,
            )
            .await?;
        Ok(())
    }
}

/// Absolute URL of an application icon, or `None` for the default icon.
pub fn image_url(base_url: &str, image: &str) -> Option<String> {
    if image.is_empty() || image == DEFAULT_APP_IMAGE {
        return None;
    }
    if image.starts_with("http://") || image.starts_with("https://") {
        return Some(image.to_string());
    }
    Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        image.trim_start_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::image_url;

    #[test]
    fn default_and_empty_images_have_no_url() {
        assert_eq!(image_url("https://push.example.com", ""), None);
        assert_eq!(
            image_url("https://push.example.com", "static/defaultapp.png"),
            None
        );
    }

    #[test]
    fn absolute_urls_are_kept() {
        assert_eq!(
            image_url("https://push.example.com", "https://cdn.example.com/a.png").as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn relative_paths_join_the_base() {
        assert_eq!(
            image_url("https://push.example.com/", "image/abc.png").as_deref(),
            Some("https://push.example.com/image/abc.png")
        );
    }
}
