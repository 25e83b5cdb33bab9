//! Admin form models and their request payloads.
//!
//! Leads and users travel as JSON. Blogs and products carry image uploads and
//! are sent as `multipart/form-data`, with array fields flattened into
//! bracketed keys (`parrafos[0]`, `imagenes[1][texto_alt]`, ...).

use std::{collections::BTreeMap, path::PathBuf};

use domain::models::{
    blog::Blog,
    cliente::{Cliente, CreateCliente, UpdateCliente},
    producto::Producto,
    user::{CreateUser, UpdateUser, User},
};
use reqwest::multipart;

use super::{
    api_client::ApiError,
    validation::{FormMode, MIN_PASSWORD_LEN, Validate, ValidationErrors, digits_only},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClienteForm {
    pub name: String,
    pub celular: String,
    pub email: String,
    pub producto_id: Option<i64>,
}

impl ClienteForm {
    pub fn from_cliente(cliente: &Cliente) -> Self {
        Self {
            name: cliente.name.clone(),
            celular: cliente.celular.clone().unwrap_or_default(),
            email: cliente.email.clone().unwrap_or_default(),
            producto_id: cliente.producto_id,
        }
    }

    pub fn to_create(&self) -> CreateCliente {
        CreateCliente {
            name: self.name.trim().to_string(),
            celular: digits_only(&self.celular),
            email: self.email.trim().to_string(),
            producto_id: self.producto_id,
        }
    }

    pub fn to_update(&self) -> UpdateCliente {
        UpdateCliente {
            name: Some(self.name.trim().to_string()),
            celular: Some(digits_only(&self.celular)),
            email: Some(self.email.trim().to_string()),
            producto_id: self.producto_id,
        }
    }
}

impl Validate for ClienteForm {
    fn validate(&self, _mode: FormMode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.phone("celular", &self.celular);
        errors.email("email", &self.email);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub celular: Option<String>,
    pub password: Option<String>,
    pub roles: Vec<String>,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            celular: user.celular.clone(),
            password: None,
            roles: user.roles.clone(),
        }
    }

    fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    fn celular(&self) -> Option<String> {
        self.celular
            .as_deref()
            .map(digits_only)
            .filter(|c| !c.is_empty())
    }

    pub fn to_create(&self) -> CreateUser {
        CreateUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password().unwrap_or_default().to_string(),
            celular: self.celular(),
            roles: self.roles.clone(),
        }
    }

    /// An empty password keeps the current one.
    pub fn to_update(&self) -> UpdateUser {
        UpdateUser {
            name: Some(self.name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            password: self.password().map(str::to_string),
            celular: self.celular(),
            roles: (!self.roles.is_empty()).then(|| self.roles.clone()),
        }
    }
}

impl Validate for UserForm {
    fn validate(&self, mode: FormMode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        errors.email("email", &self.email);
        if let Some(celular) = self.celular.as_deref().filter(|c| !c.trim().is_empty()) {
            errors.phone("celular", celular);
        }
        match (mode, self.password()) {
            (FormMode::Create, None) => errors.add("password", "La contraseña es obligatoria"),
            (_, Some(password)) if password.chars().count() < MIN_PASSWORD_LEN => errors.add(
                "password",
                format!("La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"),
            ),
            _ => {}
        }
        errors.into_result()
    }
}

/// One value of a multipart payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub path: PathBuf,
    pub alt: String,
}

/// Forms that are submitted as `multipart/form-data`.
pub trait MultipartForm: Validate {
    fn fields(&self) -> Vec<(String, FormValue)>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogForm {
    pub producto_id: Option<i64>,
    pub subtitulo: String,
    /// Required when creating; keeps the current image when editing.
    pub imagen_principal: Option<PathBuf>,
    pub imagenes: Vec<ImageUpload>,
    pub parrafos: Vec<String>,
    pub meta_titulo: String,
    pub meta_descripcion: String,
}

impl BlogForm {
    /// Prefills an edit form; images are only re-sent when replaced.
    pub fn from_blog(blog: &Blog) -> Self {
        Self {
            producto_id: blog.producto_id,
            subtitulo: blog.subtitulo.clone().unwrap_or_default(),
            imagen_principal: None,
            imagenes: Vec::new(),
            parrafos: blog.parrafos.iter().map(|p| p.parrafo.clone()).collect(),
            meta_titulo: blog.meta_titulo().unwrap_or_default().to_string(),
            meta_descripcion: blog.meta_descripcion().unwrap_or_default().to_string(),
        }
    }
}

impl Validate for BlogForm {
    fn validate(&self, mode: FormMode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("subtitulo", &self.subtitulo);
        if mode == FormMode::Create && self.imagen_principal.is_none() {
            errors.add("imagen_principal", "La imagen principal es obligatoria");
        }
        if !self.parrafos.iter().any(|p| !p.trim().is_empty()) {
            errors.add("parrafos", "Agregue al menos un párrafo");
        }
        for (i, image) in self.imagenes.iter().enumerate() {
            if image.alt.trim().is_empty() {
                errors.add(format!("imagenes[{i}][texto_alt]"), "Ingrese el texto alternativo");
            }
        }
        errors.into_result()
    }
}

impl MultipartForm for BlogForm {
    fn fields(&self) -> Vec<(String, FormValue)> {
        let mut fields = Vec::new();
        if let Some(producto_id) = self.producto_id {
            fields.push(("producto_id".to_string(), text(producto_id.to_string())));
        }
        fields.push(("subtitulo".to_string(), text(self.subtitulo.trim())));
        if let Some(path) = &self.imagen_principal {
            fields.push(("imagen_principal".to_string(), FormValue::File(path.clone())));
        }
        for (i, image) in self.imagenes.iter().enumerate() {
            fields.push((format!("imagenes[{i}][imagen]"), FormValue::File(image.path.clone())));
            fields.push((format!("imagenes[{i}][texto_alt]"), text(image.alt.trim())));
        }
        for (i, parrafo) in self
            .parrafos
            .iter()
            .filter(|p| !p.trim().is_empty())
            .enumerate()
        {
            fields.push((format!("parrafos[{i}]"), text(parrafo)));
        }
        fields.push(("etiqueta[meta_titulo]".to_string(), text(self.meta_titulo.trim())));
        fields.push((
            "etiqueta[meta_descripcion]".to_string(),
            text(self.meta_descripcion.trim()),
        ));
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductoForm {
    pub nombre: String,
    pub titulo: String,
    pub subtitulo: String,
    pub lema: String,
    pub descripcion: String,
    pub seccion: String,
    pub precio: Option<f64>,
    pub stock: Option<i64>,
    /// `color`, `material` and numbered `spec_N` / `beneficio_N` entries.
    pub especificaciones: BTreeMap<String, String>,
    pub relacionados: Vec<i64>,
    pub imagenes: Vec<ImageUpload>,
}

impl ProductoForm {
    pub fn from_producto(producto: &Producto) -> Self {
        let specs = &producto.especificaciones;
        let mut especificaciones = BTreeMap::new();
        if let Some(color) = &specs.color {
            especificaciones.insert("color".to_string(), color.clone());
        }
        if let Some(material) = &specs.material {
            especificaciones.insert("material".to_string(), material.clone());
        }
        for (key, value) in specs.specs().into_iter().chain(specs.beneficios()) {
            especificaciones.insert(key.to_string(), value);
        }
        Self {
            nombre: producto.nombre.clone().unwrap_or_default(),
            titulo: producto.titulo.clone().unwrap_or_default(),
            subtitulo: producto.subtitulo.clone().unwrap_or_default(),
            lema: producto.lema.clone().unwrap_or_default(),
            descripcion: producto.descripcion.clone().unwrap_or_default(),
            seccion: producto.seccion.clone().unwrap_or_default(),
            precio: producto.precio,
            stock: producto.stock,
            especificaciones,
            relacionados: producto.relacionados.clone(),
            imagenes: Vec::new(),
        }
    }

    /// Appends the next numbered entry, e.g. `spec_3` after `spec_1`, `spec_2`.
    pub fn push_numbered(&mut self, prefix: &str, value: impl Into<String>) -> String {
        let next = self
            .especificaciones
            .keys()
            .filter_map(|k| k.strip_prefix(prefix)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let key = format!("{prefix}{next}");
        self.especificaciones.insert(key.clone(), value.into());
        key
    }
}

impl Validate for ProductoForm {
    fn validate(&self, _mode: FormMode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("nombre", &self.nombre);
        errors.require("titulo", &self.titulo);
        errors.require("seccion", &self.seccion);
        if self.precio.is_some_and(|p| !p.is_finite() || p < 0.0) {
            errors.add("precio", "El precio debe ser un número positivo");
        }
        if self.stock.is_some_and(|s| s < 0) {
            errors.add("stock", "El stock no puede ser negativo");
        }
        for (i, image) in self.imagenes.iter().enumerate() {
            if image.alt.trim().is_empty() {
                errors.add(format!("textos_alt[{i}]"), "Ingrese el texto alternativo");
            }
        }
        errors.into_result()
    }
}

impl MultipartForm for ProductoForm {
    fn fields(&self) -> Vec<(String, FormValue)> {
        let mut fields = vec![
            ("nombre".to_string(), text(self.nombre.trim())),
            ("titulo".to_string(), text(self.titulo.trim())),
            ("subtitulo".to_string(), text(self.subtitulo.trim())),
            ("lema".to_string(), text(self.lema.trim())),
            ("descripcion".to_string(), text(self.descripcion.trim())),
            ("seccion".to_string(), text(self.seccion.trim())),
        ];
        if let Some(precio) = self.precio {
            fields.push(("precio".to_string(), text(format!("{precio:.2}"))));
        }
        if let Some(stock) = self.stock {
            fields.push(("stock".to_string(), text(stock.to_string())));
        }
        for (key, value) in &self.especificaciones {
            if !value.trim().is_empty() {
                fields.push((format!("especificaciones[{key}]"), text(value.trim())));
            }
        }
        for (i, id) in self.relacionados.iter().enumerate() {
            fields.push((format!("relacionados[{i}]"), text(id.to_string())));
        }
        for (i, image) in self.imagenes.iter().enumerate() {
            fields.push((format!("imagenes[{i}]"), FormValue::File(image.path.clone())));
            fields.push((format!("textos_alt[{i}]"), text(image.alt.trim())));
        }
        fields
    }
}

fn text(value: impl Into<String>) -> FormValue {
    FormValue::Text(value.into())
}

/// Builds the multipart body, reading every referenced file. `method`
/// adds the `_method` override used for updates.
pub async fn build_multipart(
    fields: Vec<(String, FormValue)>,
    method: Option<&str>,
) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new();
    if let Some(method) = method {
        form = form.text("_method", method.to_string());
    }
    for (name, value) in fields {
        form = match value {
            FormValue::Text(value) => form.text(name, value),
            FormValue::File(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| ApiError::Upload(format!("{}: {}", path.display(), e)))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".to_string());
                let mime = mime_guess::from_path(&path).first_or_octet_stream();
                let part = multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(mime.as_ref())
                    .map_err(|e| ApiError::Upload(e.to_string()))?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cliente_form_validation() {
        let form = ClienteForm {
            name: "Ana".to_string(),
            celular: "98765432a".to_string(),
            email: "ana@example".to_string(),
            producto_id: None,
        };
        let errors = form.validate(FormMode::Create).unwrap_err();
        assert!(errors.get("celular").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn test_user_password_rules() {
        let mut form = UserForm {
            name: "Admin".to_string(),
            email: "admin@yuntas.pe".to_string(),
            ..Default::default()
        };
        assert!(form.validate(FormMode::Create).unwrap_err().get("password").is_some());
        assert!(form.validate(FormMode::Edit).is_ok());
        assert_eq!(form.to_update().password, None);

        form.password = Some("short".to_string());
        assert!(form.validate(FormMode::Edit).is_err());

        form.password = Some("suficiente123".to_string());
        assert!(form.validate(FormMode::Create).is_ok());
        assert_eq!(form.to_create().password, "suficiente123");
    }

    #[test]
    fn test_blog_form_requires_main_image_on_create_only() {
        let form = BlogForm {
            subtitulo: "Nuevo letrero".to_string(),
            parrafos: vec!["<p>Texto</p>".to_string()],
            ..Default::default()
        };
        let errors = form.validate(FormMode::Create).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["imagen_principal"]);
        assert!(form.validate(FormMode::Edit).is_ok());
    }

    #[test]
    fn test_blog_form_fields() {
        let form = BlogForm {
            producto_id: Some(4),
            subtitulo: " Sub ".to_string(),
            imagen_principal: Some(PathBuf::from("/tmp/main.jpg")),
            imagenes: vec![ImageUpload {
                path: PathBuf::from("/tmp/a.png"),
                alt: "Vista".to_string(),
            }],
            parrafos: vec!["uno".to_string(), " ".to_string(), "dos".to_string()],
            meta_titulo: "Meta".to_string(),
            meta_descripcion: String::new(),
        };
        let fields = form.fields();
        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "producto_id",
                "subtitulo",
                "imagen_principal",
                "imagenes[0][imagen]",
                "imagenes[0][texto_alt]",
                "parrafos[0]",
                "parrafos[1]",
                "etiqueta[meta_titulo]",
                "etiqueta[meta_descripcion]",
            ]
        );
        assert_eq!(fields[1].1, FormValue::Text("Sub".to_string()));
        assert_eq!(fields[6].1, FormValue::Text("dos".to_string()));
    }

    #[test]
    fn test_producto_numbered_specs() {
        let mut form = ProductoForm::default();
        assert_eq!(form.push_numbered("spec_", "220V"), "spec_1");
        assert_eq!(form.push_numbered("spec_", "IP65"), "spec_2");
        assert_eq!(form.push_numbered("beneficio_", "Ahorro"), "beneficio_1");
        let errors = form.validate(FormMode::Create).unwrap_err();
        assert!(errors.get("nombre").is_some());

        let names: Vec<String> = form.fields().into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"especificaciones[spec_2]".to_string()));
    }

    #[tokio::test]
    async fn test_build_multipart_reports_missing_file() {
        let fields = vec![(
            "imagen_principal".to_string(),
            FormValue::File(PathBuf::from("/definitely/missing.jpg")),
        )];
        let err = build_multipart(fields, Some("PUT")).await.unwrap_err();
        assert!(matches!(err, ApiError::Upload(_)));
    }

    #[tokio::test]
    async fn test_build_multipart_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        let fields = vec![
            ("subtitulo".to_string(), FormValue::Text("Sub".to_string())),
            ("imagen_principal".to_string(), FormValue::File(path)),
        ];
        assert!(build_multipart(fields, None).await.is_ok());
    }
}
