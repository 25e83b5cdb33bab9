use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogImage {
    #[serde(default)]
    pub ruta_imagen: Option<String>,
    #[serde(default)]
    pub texto_alt: Option<String>,
}

/// A rich-text paragraph; the content may hold HTML markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogParagraph {
    #[serde(default, alias = "contenido")]
    pub parrafo: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Etiqueta {
    #[serde(default)]
    pub meta_titulo: Option<String>,
    #[serde(default)]
    pub meta_descripcion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub producto_id: Option<i64>, // Foreign key to Producto
    #[serde(default)]
    pub nombre_producto: Option<String>,
    #[serde(default)]
    pub subtitulo: Option<String>,
    #[serde(default)]
    pub imagen_principal: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub imagenes: Vec<BlogImage>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub parrafos: Vec<BlogParagraph>,
    #[serde(default)]
    pub etiqueta: Option<Etiqueta>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Blog {
    pub fn title(&self) -> &str {
        self.nombre_producto.as_deref().unwrap_or_default()
    }

    pub fn first_paragraph(&self) -> Option<&str> {
        self.parrafos.first().map(|p| p.parrafo.as_str())
    }

    pub fn meta_titulo(&self) -> Option<&str> {
        self.etiqueta.as_ref().and_then(|e| e.meta_titulo.as_deref())
    }

    pub fn meta_descripcion(&self) -> Option<&str> {
        self.etiqueta
            .as_ref()
            .and_then(|e| e.meta_descripcion.as_deref())
    }
}
