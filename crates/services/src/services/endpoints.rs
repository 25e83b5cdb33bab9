//! Endpoint path builders for the backend REST API.

use domain::models::EntityKind;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://apiyuntas.yuntaspublicidad.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
        }
    }
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// API version each resource is served under.
    pub fn version(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::Blogs | EntityKind::Productos => "v2",
            EntityKind::Clientes | EntityKind::Users => "v1",
        }
    }

    pub fn login(&self) -> Url {
        self.url(&["api", "v1", "auth", "login"])
    }

    pub fn logout(&self) -> Url {
        self.url(&["api", "v1", "auth", "logout"])
    }

    pub fn collection(&self, kind: EntityKind) -> Url {
        let name = kind.to_string();
        self.url(&["api", Self::version(kind), &name])
    }

    pub fn item(&self, kind: EntityKind, id: i64) -> Url {
        let name = kind.to_string();
        let id = id.to_string();
        self.url(&["api", Self::version(kind), &name, &id])
    }

    pub fn producto_images(&self, producto_id: i64) -> Url {
        let id = producto_id.to_string();
        self.url(&["api", "v2", "productos", &id, "imagenes"])
    }

    pub fn producto_image(&self, producto_id: i64, image_id: i64) -> Url {
        let id = producto_id.to_string();
        let image_id = image_id.to_string();
        self.url(&["api", "v2", "productos", &id, "imagenes", &image_id])
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.collection(EntityKind::Blogs).as_str(),
            "https://apiyuntas.yuntaspublicidad.com/api/v2/blogs"
        );
        assert_eq!(
            endpoints.item(EntityKind::Clientes, 12).as_str(),
            "https://apiyuntas.yuntaspublicidad.com/api/v1/clientes/12"
        );
        assert_eq!(
            endpoints.producto_image(3, 9).as_str(),
            "https://apiyuntas.yuntaspublicidad.com/api/v2/productos/3/imagenes/9"
        );
        assert_eq!(
            endpoints.login().as_str(),
            "https://apiyuntas.yuntaspublicidad.com/api/v1/auth/login"
        );
    }

    #[test]
    fn test_base_with_path_prefix_is_kept() {
        let endpoints = Endpoints::new("http://localhost:8000/backend/").unwrap();
        assert_eq!(
            endpoints.collection(EntityKind::Users).as_str(),
            "http://localhost:8000/backend/api/v1/users"
        );
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(Endpoints::new("not a url").is_err());
        assert!(Endpoints::new("mailto:admin@yuntas.pe").is_err());
    }
}
