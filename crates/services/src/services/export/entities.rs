//! Export schemas of the four admin entities.

use domain::models::{blog::Blog, cliente::Cliente, producto::Producto, user::User};
use utils::{date::format_date, text::clean_html_text};

use super::schema::{Column, Exportable, text_or_empty};

fn precio(p: &Producto) -> String {
    p.precio.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn blog_content(b: &Blog) -> String {
    b.first_paragraph().map(clean_html_text).unwrap_or_default()
}

impl Exportable for Blog {
    const ENTITY: &'static str = "blogs";
    const TITLE: &'static str = "Reporte de Blogs";
    const TALLY_LABELS: [&'static str; 2] = ["Total de párrafos", "Total de imágenes"];

    fn csv_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |b: &Blog| b.id.to_string()),
            Column::new("nombre_producto", "Título", |b: &Blog| b.title().to_string()),
            Column::new("subtitulo", "Subtítulo", |b: &Blog| text_or_empty(b.subtitulo.as_deref())),
            Column::new("contenido", "Contenido", blog_content),
            Column::new("meta_titulo", "Meta título", |b: &Blog| text_or_empty(b.meta_titulo())),
            Column::new("meta_descripcion", "Meta descripción", |b: &Blog| {
                text_or_empty(b.meta_descripcion())
            }),
            Column::new("parrafos", "Párrafos", |b: &Blog| b.parrafos.len().to_string()),
            Column::new("imagenes", "Imágenes", |b: &Blog| b.imagenes.len().to_string()),
            Column::new("created_at", "Fecha de creación", |b: &Blog| {
                format_date(b.created_at.as_deref())
            }),
        ]
    }

    fn excel_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |b: &Blog| b.id.to_string()),
            Column::new("nombre_producto", "Título", |b: &Blog| b.title().to_string()),
            Column::new("subtitulo", "Subtítulo", |b: &Blog| text_or_empty(b.subtitulo.as_deref())),
            Column::new("parrafos", "Párrafos", |b: &Blog| b.parrafos.len().to_string()),
            Column::new("imagenes", "Imágenes", |b: &Blog| b.imagenes.len().to_string()),
            Column::new("created_at", "Fecha", |b: &Blog| format_date(b.created_at.as_deref())),
        ]
    }

    fn report_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |b: &Blog| b.id.to_string()),
            Column::new("nombre_producto", "Título", |b: &Blog| b.title().to_string()).truncated(40),
            Column::new("subtitulo", "Subtítulo", |b: &Blog| text_or_empty(b.subtitulo.as_deref()))
                .truncated(50),
            Column::new("contenido", "Contenido", blog_content).truncated(100),
            Column::new("parrafos", "Párrafos", |b: &Blog| b.parrafos.len().to_string()),
            Column::new("imagenes", "Imágenes", |b: &Blog| b.imagenes.len().to_string()),
            Column::new("created_at", "Fecha", |b: &Blog| format_date(b.created_at.as_deref())),
        ]
    }

    fn print_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |b: &Blog| b.id.to_string()),
            Column::new("nombre_producto", "Título", |b: &Blog| b.title().to_string()).truncated(30),
            Column::new("subtitulo", "Subtítulo", |b: &Blog| text_or_empty(b.subtitulo.as_deref()))
                .truncated(40),
            Column::new("created_at", "Fecha", |b: &Blog| format_date(b.created_at.as_deref())),
        ]
    }

    fn tallies(&self) -> [usize; 2] {
        [self.parrafos.len(), self.imagenes.len()]
    }
}

impl Exportable for Producto {
    const ENTITY: &'static str = "productos";
    const TITLE: &'static str = "Reporte de Productos";
    const TALLY_LABELS: [&'static str; 2] = ["Total de especificaciones", "Total de imágenes"];

    fn csv_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |p: &Producto| p.id.to_string()),
            Column::new("nombre", "Nombre", |p: &Producto| p.title().to_string()),
            Column::new("titulo", "Título", |p: &Producto| text_or_empty(p.titulo.as_deref())),
            Column::new("seccion", "Sección", |p: &Producto| text_or_empty(p.seccion.as_deref())),
            Column::new("precio", "Precio", precio),
            Column::new("stock", "Stock", |p: &Producto| p.stock.unwrap_or(0).to_string()),
            Column::new("color", "Color", |p: &Producto| {
                text_or_empty(p.especificaciones.color.as_deref())
            }),
            Column::new("material", "Material", |p: &Producto| {
                text_or_empty(p.especificaciones.material.as_deref())
            }),
            Column::new("descripcion", "Descripción", |p: &Producto| {
                clean_html_text(p.descripcion.as_deref().unwrap_or_default())
            }),
            Column::new("imagenes", "Imágenes", |p: &Producto| p.imagenes.len().to_string()),
            Column::new("created_at", "Fecha de creación", |p: &Producto| {
                format_date(p.created_at.as_deref())
            }),
        ]
    }

    fn excel_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |p: &Producto| p.id.to_string()),
            Column::new("nombre", "Nombre", |p: &Producto| p.title().to_string()),
            Column::new("seccion", "Sección", |p: &Producto| text_or_empty(p.seccion.as_deref())),
            Column::new("precio", "Precio", precio),
            Column::new("stock", "Stock", |p: &Producto| p.stock.unwrap_or(0).to_string()),
        ]
    }

    fn report_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |p: &Producto| p.id.to_string()),
            Column::new("nombre", "Nombre", |p: &Producto| p.title().to_string()).truncated(40),
            Column::new("seccion", "Sección", |p: &Producto| text_or_empty(p.seccion.as_deref())),
            Column::new("precio", "Precio", precio),
            Column::new("descripcion", "Descripción", |p: &Producto| {
                clean_html_text(p.descripcion.as_deref().unwrap_or_default())
            })
            .truncated(80),
            Column::new("imagenes", "Imágenes", |p: &Producto| p.imagenes.len().to_string()),
        ]
    }

    fn print_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |p: &Producto| p.id.to_string()),
            Column::new("nombre", "Nombre", |p: &Producto| p.title().to_string()).truncated(30),
            Column::new("seccion", "Sección", |p: &Producto| text_or_empty(p.seccion.as_deref())),
            Column::new("precio", "Precio", precio),
        ]
    }

    fn tallies(&self) -> [usize; 2] {
        let specs = self.especificaciones.specs().len() + self.especificaciones.beneficios().len();
        [specs, self.imagenes.len()]
    }
}

impl Exportable for Cliente {
    const ENTITY: &'static str = "clientes";
    const TITLE: &'static str = "Reporte de Clientes";
    const TALLY_LABELS: [&'static str; 2] = ["Con correo", "Con producto de interés"];

    fn csv_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |c: &Cliente| c.id.to_string()),
            Column::new("name", "Nombre", |c: &Cliente| c.name.trim().to_string()),
            Column::new("celular", "Celular", |c: &Cliente| text_or_empty(c.celular.as_deref())),
            Column::new("email", "Email", |c: &Cliente| text_or_empty(c.email.as_deref())),
            Column::new("producto_id", "Producto", |c: &Cliente| {
                c.producto_id.map(|id| id.to_string()).unwrap_or_default()
            }),
            Column::new("created_at", "Fecha de registro", |c: &Cliente| {
                format_date(c.created_at.as_deref())
            }),
        ]
    }

    fn excel_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |c: &Cliente| c.id.to_string()),
            Column::new("name", "Nombre", |c: &Cliente| c.name.trim().to_string()),
            Column::new("celular", "Celular", |c: &Cliente| text_or_empty(c.celular.as_deref())),
            Column::new("email", "Email", |c: &Cliente| text_or_empty(c.email.as_deref())),
            Column::new("created_at", "Fecha", |c: &Cliente| format_date(c.created_at.as_deref())),
        ]
    }

    fn report_columns() -> Vec<Column<Self>> {
        Self::csv_columns()
    }

    fn print_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |c: &Cliente| c.id.to_string()),
            Column::new("name", "Nombre", |c: &Cliente| c.name.trim().to_string()).truncated(30),
            Column::new("celular", "Celular", |c: &Cliente| text_or_empty(c.celular.as_deref())),
            Column::new("email", "Email", |c: &Cliente| text_or_empty(c.email.as_deref())),
        ]
    }

    fn tallies(&self) -> [usize; 2] {
        let has_email = self.email.as_deref().is_some_and(|e| !e.trim().is_empty());
        [usize::from(has_email), usize::from(self.producto_id.is_some())]
    }
}

impl Exportable for User {
    const ENTITY: &'static str = "users";
    const TITLE: &'static str = "Reporte de Usuarios";
    const TALLY_LABELS: [&'static str; 2] = ["Con celular", "Roles asignados"];

    fn csv_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |u: &User| u.id.to_string()),
            Column::new("name", "Nombre", |u: &User| u.name.trim().to_string()),
            Column::new("email", "Email", |u: &User| u.email.trim().to_string()),
            Column::new("celular", "Celular", |u: &User| text_or_empty(u.celular.as_deref())),
            Column::new("roles", "Roles", |u: &User| u.roles.join(", ")),
            Column::new("created_at", "Fecha de creación", |u: &User| {
                format_date(u.created_at.as_deref())
            }),
        ]
    }

    fn excel_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |u: &User| u.id.to_string()),
            Column::new("name", "Nombre", |u: &User| u.name.trim().to_string()),
            Column::new("email", "Email", |u: &User| u.email.trim().to_string()),
            Column::new("roles", "Roles", |u: &User| u.roles.join(", ")),
        ]
    }

    fn report_columns() -> Vec<Column<Self>> {
        Self::csv_columns()
    }

    fn print_columns() -> Vec<Column<Self>> {
        vec![
            Column::new("id", "ID", |u: &User| u.id.to_string()),
            Column::new("name", "Nombre", |u: &User| u.name.trim().to_string()).truncated(30),
            Column::new("email", "Email", |u: &User| u.email.trim().to_string()),
        ]
    }

    fn tallies(&self) -> [usize; 2] {
        [usize::from(self.celular.is_some()), self.roles.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_agree_on_keys() {
        fn keys<T>(columns: Vec<Column<T>>) -> Vec<&'static str> {
            columns.into_iter().map(|c| c.key).collect()
        }
        let csv = keys(Blog::csv_columns());
        for key in keys(Blog::excel_columns())
            .into_iter()
            .chain(keys(Blog::report_columns()))
            .chain(keys(Blog::print_columns()))
        {
            assert!(csv.contains(&key), "{key} missing from the csv schema");
        }
    }

    #[test]
    fn test_producto_cells() {
        let producto: Producto = serde_json::from_value(serde_json::json!({
            "id": 5,
            "nombre": "Letrero Neón",
            "precio": "1250.5",
            "descripcion": "<p>Acabado&nbsp;premium</p>",
            "especificaciones": {"color": "Rojo", "spec_1": "IP65", "beneficio_1": "Bajo consumo"},
            "imagenes": [{"id": 1, "url": "productos/5.webp"}]
        }))
        .unwrap();

        let cells: Vec<String> = Producto::csv_columns()
            .iter()
            .map(|c| c.render(&producto))
            .collect();
        assert_eq!(cells[1], "Letrero Neón");
        assert_eq!(cells[4], "1250.50");
        assert_eq!(cells[5], "0");
        assert_eq!(cells[6], "Rojo");
        assert_eq!(cells[8], "Acabado premium");
        assert_eq!(producto.tallies(), [2, 1]);
    }
}
