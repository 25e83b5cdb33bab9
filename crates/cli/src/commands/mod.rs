pub mod entities;
pub mod export;
pub mod prefs;
pub mod session;
pub mod suggest;

use anyhow::Result;
use services::services::{
    forms::{BlogForm, ClienteForm, ImageUpload, UserForm},
    notification::Notification,
    resource::{BlogApi, ClienteApi, ProductoApi, UserApi},
};

use crate::{
    app::App,
    args::{
        BlogAction, BlogArgs, ClienteAction, ClienteArgs, Command, ProductoAction, UserAction,
        UserArgs,
    },
};

/// Runs one command. `Ok(false)` means it failed and the user was already told.
pub async fn run(app: &App, command: Command) -> Result<bool> {
    match command {
        Command::Blogs { action } => blogs(app, action).await,
        Command::Productos { action } => productos(app, action).await,
        Command::Clientes { action } => clientes(app, action).await,
        Command::Users { action } => users(app, action).await,
        Command::Suggest { entity, query } => suggest::run(app, entity, &query).await,
        Command::Export(args) => export::run(app, args).await,
        Command::Session { action } => session::run(app, action),
        Command::Prefs { action } => prefs::run(app, action),
    }
}

async fn blogs(app: &App, action: BlogAction) -> Result<bool> {
    let api = BlogApi::new(app.client()?);
    match action {
        BlogAction::List(args) => entities::list(app, api, &args).await,
        BlogAction::Show { id } => entities::show(app, api, id).await,
        BlogAction::Delete { id } => entities::delete(app, api, id).await,
        BlogAction::Create(args) => {
            let form = blog_form(args);
            entities::create(app, api, &form).await
        }
    }
}

async fn productos(app: &App, action: ProductoAction) -> Result<bool> {
    let api = ProductoApi::new(app.client()?);
    match action {
        ProductoAction::List(args) => entities::list(app, api, &args).await,
        ProductoAction::Show { id } => entities::show(app, api, id).await,
        ProductoAction::Delete { id } => entities::delete(app, api, id).await,
        ProductoAction::AddImage { id, file, alt } => {
            let upload = ImageUpload { path: file, alt };
            match api.add_image(id, &upload).await {
                Ok(image) => {
                    app.notifier.notify(Notification::success(format!(
                        "Imagen agregada al producto {id}"
                    )));
                    println!("{}", serde_json::to_string_pretty(&image)?);
                    Ok(true)
                }
                Err(e) => {
                    app.notifier.notify(Notification::error(e.to_string()));
                    Ok(false)
                }
            }
        }
        ProductoAction::RemoveImage { id, image_id } => {
            match api.remove_image(id, image_id).await {
                Ok(()) => {
                    app.notifier.notify(Notification::success(format!(
                        "Imagen {image_id} eliminada del producto {id}"
                    )));
                    Ok(true)
                }
                Err(e) => {
                    app.notifier.notify(Notification::error(e.to_string()));
                    Ok(false)
                }
            }
        }
    }
}

async fn clientes(app: &App, action: ClienteAction) -> Result<bool> {
    let api = ClienteApi::new(app.client()?);
    match action {
        ClienteAction::List(args) => entities::list(app, api, &args).await,
        ClienteAction::Show { id } => entities::show(app, api, id).await,
        ClienteAction::Delete { id } => entities::delete(app, api, id).await,
        ClienteAction::Create(args) => entities::create(app, api, &cliente_form(args)).await,
        ClienteAction::Update { id, fields } => {
            entities::update(app, api, id, &cliente_form(fields)).await
        }
    }
}

async fn users(app: &App, action: UserAction) -> Result<bool> {
    let api = UserApi::new(app.client()?);
    match action {
        UserAction::List(args) => entities::list(app, api, &args).await,
        UserAction::Show { id } => entities::show(app, api, id).await,
        UserAction::Delete { id } => entities::delete(app, api, id).await,
        UserAction::Create(args) => entities::create(app, api, &user_form(args)).await,
        UserAction::Update { id, fields } => {
            entities::update(app, api, id, &user_form(fields)).await
        }
    }
}

fn blog_form(args: BlogArgs) -> BlogForm {
    let mut alts = args.alts.into_iter();
    let imagenes = args
        .imagenes
        .into_iter()
        .map(|path| ImageUpload {
            path,
            alt: alts.next().unwrap_or_default(),
        })
        .collect();
    BlogForm {
        producto_id: args.producto_id,
        subtitulo: args.subtitulo,
        imagen_principal: Some(args.imagen_principal),
        imagenes,
        parrafos: args.parrafos,
        meta_titulo: args.meta_titulo,
        meta_descripcion: args.meta_descripcion,
    }
}

fn cliente_form(args: ClienteArgs) -> ClienteForm {
    ClienteForm {
        name: args.name,
        celular: args.celular,
        email: args.email,
        producto_id: args.producto_id,
    }
}

fn user_form(args: UserArgs) -> UserForm {
    UserForm {
        name: args.name,
        email: args.email,
        celular: args.celular,
        password: args.password,
        roles: args.roles,
    }
}
