//! Per-entity access to the backend: the seam between the stores and HTTP.

use async_trait::async_trait;
use domain::models::{
    EntityKind,
    blog::Blog,
    cliente::Cliente,
    page::{ListPayload, Page},
    producto::{Producto, ProductoImage},
    user::User,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{
    api_client::{ApiClient, ApiError, Auth},
    forms::{
        BlogForm, ClienteForm, FormValue, ImageUpload, MultipartForm, ProductoForm, UserForm,
        build_multipart,
    },
    validation::{FormMode, Validate},
};

#[async_trait]
pub trait Resource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;
    type Form: Validate + Send + Sync;

    fn kind(&self) -> EntityKind;

    fn id_of(item: &Self::Item) -> i64;

    /// `page` is only meaningful for server-paged collections.
    async fn list(
        &self,
        page: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Page<Self::Item>, ApiError>;

    async fn get(&self, id: i64, cancel: &CancellationToken) -> Result<Self::Item, ApiError>;

    async fn create(&self, form: &Self::Form) -> Result<Self::Item, ApiError>;

    async fn update(&self, id: i64, form: &Self::Form) -> Result<Self::Item, ApiError>;

    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

async fn list_page<T: DeserializeOwned>(
    client: &ApiClient,
    kind: EntityKind,
    page: Option<u32>,
    auth: Auth,
    cancel: &CancellationToken,
) -> Result<Page<T>, ApiError> {
    let query: Vec<(&str, String)> = page.map(|p| ("page", p.to_string())).into_iter().collect();
    let payload: ListPayload<T> = client
        .get(client.endpoints().collection(kind), &query, auth, cancel)
        .await?;
    Ok(payload.into())
}

/// Validates, then posts the multipart body (`_method=PUT` on updates).
async fn submit_multipart<F: MultipartForm + Sync, T: DeserializeOwned>(
    client: &ApiClient,
    kind: EntityKind,
    id: Option<i64>,
    form: &F,
) -> Result<T, ApiError> {
    let (mode, url, method) = match id {
        None => (FormMode::Create, client.endpoints().collection(kind), None),
        Some(id) => (FormMode::Edit, client.endpoints().item(kind, id), Some("PUT")),
    };
    form.validate(mode)?;
    let body = build_multipart(form.fields(), method).await?;
    client.send_multipart(url, body).await
}

#[derive(Debug, Clone)]
pub struct BlogApi {
    client: ApiClient,
}

impl BlogApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for BlogApi {
    type Item = Blog;
    type Form = BlogForm;

    fn kind(&self) -> EntityKind {
        EntityKind::Blogs
    }

    fn id_of(item: &Blog) -> i64 {
        item.id
    }

    async fn list(&self, page: Option<u32>, cancel: &CancellationToken) -> Result<Page<Blog>, ApiError> {
        list_page(&self.client, EntityKind::Blogs, page, Auth::Optional, cancel).await
    }

    async fn get(&self, id: i64, cancel: &CancellationToken) -> Result<Blog, ApiError> {
        let url = self.client.endpoints().item(EntityKind::Blogs, id);
        self.client.get(url, &[], Auth::Optional, cancel).await
    }

    async fn create(&self, form: &BlogForm) -> Result<Blog, ApiError> {
        let blog: Blog = submit_multipart(&self.client, EntityKind::Blogs, None, form).await?;
        info!(blog_id = blog.id, "blog created");
        Ok(blog)
    }

    async fn update(&self, id: i64, form: &BlogForm) -> Result<Blog, ApiError> {
        submit_multipart(&self.client, EntityKind::Blogs, Some(id), form).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(self.client.endpoints().item(EntityKind::Blogs, id))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct ProductoApi {
    client: ApiClient,
}

impl ProductoApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Adds one image without touching the other product fields.
    pub async fn add_image(&self, producto_id: i64, image: &ImageUpload) -> Result<ProductoImage, ApiError> {
        let fields = vec![
            ("imagen".to_string(), FormValue::File(image.path.clone())),
            (
                "texto_alt".to_string(),
                FormValue::Text(image.alt.trim().to_string()),
            ),
        ];
        let body = build_multipart(fields, None).await?;
        self.client
            .send_multipart(self.client.endpoints().producto_images(producto_id), body)
            .await
    }

    pub async fn remove_image(&self, producto_id: i64, image_id: i64) -> Result<(), ApiError> {
        self.client
            .delete(self.client.endpoints().producto_image(producto_id, image_id))
            .await
    }
}

#[async_trait]
impl Resource for ProductoApi {
    type Item = Producto;
    type Form = ProductoForm;

    fn kind(&self) -> EntityKind {
        EntityKind::Productos
    }

    fn id_of(item: &Producto) -> i64 {
        item.id
    }

    async fn list(
        &self,
        page: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Page<Producto>, ApiError> {
        list_page(&self.client, EntityKind::Productos, page, Auth::Optional, cancel).await
    }

    async fn get(&self, id: i64, cancel: &CancellationToken) -> Result<Producto, ApiError> {
        let url = self.client.endpoints().item(EntityKind::Productos, id);
        self.client.get(url, &[], Auth::Optional, cancel).await
    }

    async fn create(&self, form: &ProductoForm) -> Result<Producto, ApiError> {
        submit_multipart(&self.client, EntityKind::Productos, None, form).await
    }

    async fn update(&self, id: i64, form: &ProductoForm) -> Result<Producto, ApiError> {
        submit_multipart(&self.client, EntityKind::Productos, Some(id), form).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(self.client.endpoints().item(EntityKind::Productos, id))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct ClienteApi {
    client: ApiClient,
}

impl ClienteApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ClienteApi {
    type Item = Cliente;
    type Form = ClienteForm;

    fn kind(&self) -> EntityKind {
        EntityKind::Clientes
    }

    fn id_of(item: &Cliente) -> i64 {
        item.id
    }

    async fn list(
        &self,
        _page: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<Page<Cliente>, ApiError> {
        list_page(&self.client, EntityKind::Clientes, None, Auth::Required, cancel).await
    }

    async fn get(&self, id: i64, cancel: &CancellationToken) -> Result<Cliente, ApiError> {
        let url = self.client.endpoints().item(EntityKind::Clientes, id);
        self.client.get(url, &[], Auth::Required, cancel).await
    }

    async fn create(&self, form: &ClienteForm) -> Result<Cliente, ApiError> {
        form.validate(FormMode::Create)?;
        let url = self.client.endpoints().collection(EntityKind::Clientes);
        self.client.send_json(Method::POST, url, &form.to_create()).await
    }

    async fn update(&self, id: i64, form: &ClienteForm) -> Result<Cliente, ApiError> {
        form.validate(FormMode::Edit)?;
        let url = self.client.endpoints().item(EntityKind::Clientes, id);
        self.client.send_json(Method::PUT, url, &form.to_update()).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(self.client.endpoints().item(EntityKind::Clientes, id))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for UserApi {
    type Item = User;
    type Form = UserForm;

    fn kind(&self) -> EntityKind {
        EntityKind::Users
    }

    fn id_of(item: &User) -> i64 {
        item.id
    }

    async fn list(&self, _page: Option<u32>, cancel: &CancellationToken) -> Result<Page<User>, ApiError> {
        list_page(&self.client, EntityKind::Users, None, Auth::Required, cancel).await
    }

    async fn get(&self, id: i64, cancel: &CancellationToken) -> Result<User, ApiError> {
        let url = self.client.endpoints().item(EntityKind::Users, id);
        self.client.get(url, &[], Auth::Required, cancel).await
    }

    async fn create(&self, form: &UserForm) -> Result<User, ApiError> {
        form.validate(FormMode::Create)?;
        let url = self.client.endpoints().collection(EntityKind::Users);
        self.client.send_json(Method::POST, url, &form.to_create()).await
    }

    async fn update(&self, id: i64, form: &UserForm) -> Result<User, ApiError> {
        form.validate(FormMode::Edit)?;
        let url = self.client.endpoints().item(EntityKind::Users, id);
        self.client.send_json(Method::PUT, url, &form.to_update()).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(self.client.endpoints().item(EntityKind::Users, id))
            .await
    }
}
