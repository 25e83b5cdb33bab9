use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductoImage {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Product specifications. Besides `color` and `material`, the admin form
/// adds numbered `spec_N` / `beneficio_N` keys which are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Especificaciones {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Especificaciones {
    /// Dynamic entries whose key starts with `prefix`, ordered by their numeric suffix.
    pub fn numbered(&self, prefix: &str) -> Vec<(&str, String)> {
        let mut entries: Vec<(u32, &str, String)> = self
            .extra
            .iter()
            .filter_map(|(key, value)| {
                let n = key.strip_prefix(prefix)?.parse::<u32>().ok()?;
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => return None,
                    other => other.to_string(),
                };
                Some((n, key.as_str(), text))
            })
            .collect();
        entries.sort_by_key(|(n, _, _)| *n);
        entries.into_iter().map(|(_, k, v)| (k, v)).collect()
    }

    pub fn specs(&self) -> Vec<(&str, String)> {
        self.numbered("spec_")
    }

    pub fn beneficios(&self) -> Vec<(&str, String)> {
        self.numbered("beneficio_")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Producto {
    pub id: i64,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub subtitulo: Option<String>,
    #[serde(default)]
    pub lema: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub seccion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub precio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub especificaciones: Especificaciones,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub imagenes: Vec<ProductoImage>,
    #[serde(default, deserialize_with = "lenient::id_list")]
    pub relacionados: Vec<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Producto {
    pub fn title(&self) -> &str {
        self.nombre.as_deref().unwrap_or_default()
    }
}
