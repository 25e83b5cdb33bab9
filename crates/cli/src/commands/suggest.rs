use anyhow::Result;
use domain::models::EntityKind;
use services::services::{
    notification::Notification,
    resource::{BlogApi, ClienteApi, ProductoApi, Resource, UserApi},
    search::{SearchState, Searchable},
    store::EntityStore,
};

use super::entities::load;
use crate::app::App;

pub async fn run(app: &App, entity: EntityKind, query: &str) -> Result<bool> {
    let client = app.client()?;
    match entity {
        EntityKind::Blogs => suggest(app, BlogApi::new(client), query).await,
        EntityKind::Productos => suggest(app, ProductoApi::new(client), query).await,
        EntityKind::Clientes => suggest(app, ClienteApi::new(client), query).await,
        EntityKind::Users => suggest(app, UserApi::new(client), query).await,
    }
}

async fn suggest<R>(app: &App, resource: R, query: &str) -> Result<bool>
where
    R: Resource,
    R::Item: Searchable,
{
    let store = EntityStore::new(resource, app.config.page_size());
    if !load(app, &store, 1).await {
        return Ok(false);
    }
    let items = store.all();
    let mut search = SearchState::new();
    search.set_query(query, &items);

    if !search.is_open() {
        app.notifier
            .notify(Notification::info(format!("Sin sugerencias para \"{query}\"")));
        return Ok(true);
    }
    for (i, suggestion) in search.suggestions().iter().enumerate() {
        println!("{}. {suggestion}", i + 1);
    }
    Ok(true)
}
