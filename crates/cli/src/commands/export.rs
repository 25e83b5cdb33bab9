use anyhow::Result;
use domain::models::EntityKind;
use services::services::{
    export::{Exportable, Exporter},
    resource::{BlogApi, ClienteApi, ProductoApi, Resource, UserApi},
    store::EntityStore,
    table::TableActions,
};

use super::entities::load;
use crate::{app::App, args::ExportArgs};

pub async fn run(app: &App, args: ExportArgs) -> Result<bool> {
    let client = app.client()?;
    match args.entity {
        EntityKind::Blogs => export(app, BlogApi::new(client), &args).await,
        EntityKind::Productos => export(app, ProductoApi::new(client), &args).await,
        EntityKind::Clientes => export(app, ClienteApi::new(client), &args).await,
        EntityKind::Users => export(app, UserApi::new(client), &args).await,
    }
}

async fn export<R>(app: &App, resource: R, args: &ExportArgs) -> Result<bool>
where
    R: Resource,
    R::Item: Exportable,
{
    let store = EntityStore::new(resource, app.config.page_size());
    if !load(app, &store, args.page).await {
        return Ok(false);
    }
    let out_dir = args.out.clone().unwrap_or_else(|| app.config.output_dir());
    let actions = TableActions::new(Exporter::new(out_dir), app.notifier.clone());
    Ok(actions.export(&store.all(), args.format).is_some())
}
