//! List/show/create/update/delete, shared by every entity.

use anyhow::Result;
use serde::Serialize;
use services::services::{
    export::Exportable,
    notification::Notification,
    pagination::Pagination,
    resource::Resource,
    search::{SearchState, Searchable},
    store::EntityStore,
    table,
};

use crate::{
    app::App,
    args::ListArgs,
    output::{page_footer, render_table},
};

/// Notifies the store's error, if any. Returns whether there was one.
pub fn surface_error<R: Resource>(app: &App, store: &EntityStore<R>) -> bool {
    match store.snapshot().error {
        Some(error) => {
            app.notifier.notify(Notification::error(error));
            true
        }
        None => false,
    }
}

/// Loads the collection; server-paged entities load `page`.
pub async fn load<R: Resource>(app: &App, store: &EntityStore<R>, page: u32) -> bool {
    let loaded = store.refetch().await;
    if loaded && page > 1 && store.pager().is_server() && !store.set_page(page).await {
        if store.snapshot().error.is_none() {
            let total = store.pager().total_pages();
            app.notifier.notify(Notification::warning(format!(
                "La página {page} no existe (hay {total})"
            )));
        }
    }
    !surface_error(app, store)
}

pub async fn list<R>(app: &App, resource: R, args: &ListArgs) -> Result<bool>
where
    R: Resource,
    R::Item: Searchable + Exportable,
{
    let page_size = app.config.page_size();
    let store = EntityStore::new(resource, page_size);
    if !load(app, &store, args.page).await {
        return Ok(false);
    }

    let items = store.all();
    let mut search = SearchState::new();
    if let Some(query) = &args.search {
        search.set_query(query.clone(), &items);
    }

    let (rows, page, total_pages, matched) = if store.pager().is_server() {
        let rows = search.apply(&items);
        let pager = store.pager();
        let matched = rows.len();
        (rows, pager.current_page(), pager.total_pages(), matched)
    } else {
        let view = table::view(&items, &search, args.page, page_size);
        (view.rows, view.page, view.total_pages, view.matched)
    };

    if rows.is_empty() {
        app.notifier.notify(Notification::info("No se encontraron registros"));
        return Ok(true);
    }
    print!("{}", render_table(&<R::Item as Exportable>::print_columns(), &rows));
    println!("{}", page_footer(page, total_pages, matched));
    Ok(true)
}

pub async fn show<R>(app: &App, resource: R, id: i64) -> Result<bool>
where
    R: Resource,
    R::Item: Serialize,
{
    let store = EntityStore::new(resource, app.config.page_size());
    match store.fetch_one(id).await {
        Some(item) => {
            println!("{}", serde_json::to_string_pretty(&item)?);
            Ok(true)
        }
        None => {
            surface_error(app, &store);
            Ok(false)
        }
    }
}

pub async fn create<R>(app: &App, resource: R, form: &R::Form) -> Result<bool>
where
    R: Resource,
    R::Item: Serialize,
{
    let store = EntityStore::new(resource, app.config.page_size());
    match store.create(form).await {
        Some(item) => {
            app.notifier
                .notify(Notification::success(format!("Registro creado (id {})", R::id_of(&item))));
            println!("{}", serde_json::to_string_pretty(&item)?);
            Ok(true)
        }
        None => {
            surface_error(app, &store);
            Ok(false)
        }
    }
}

pub async fn update<R>(app: &App, resource: R, id: i64, form: &R::Form) -> Result<bool>
where
    R: Resource,
    R::Item: Serialize,
{
    let store = EntityStore::new(resource, app.config.page_size());
    match store.update(id, form).await {
        Some(item) => {
            app.notifier
                .notify(Notification::success(format!("Registro {id} actualizado")));
            println!("{}", serde_json::to_string_pretty(&item)?);
            Ok(true)
        }
        None => {
            surface_error(app, &store);
            Ok(false)
        }
    }
}

pub async fn delete<R: Resource>(app: &App, resource: R, id: i64) -> Result<bool> {
    let store = EntityStore::new(resource, app.config.page_size());
    if store.delete(id).await {
        app.notifier
            .notify(Notification::success(format!("Registro {id} eliminado")));
        Ok(true)
    } else {
        surface_error(app, &store);
        Ok(false)
    }
}
