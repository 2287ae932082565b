// SPDX-License-Identifier: MPL-2.0
//! Command line front-end.
//!
//! `run` wires the pieces together: it loads the configuration, builds the
//! HTTP client and the object URL registry, drives one [`Session`] through
//! the requested command, then prints the gallery and the toasts it produced.

mod command;
pub mod paths;

pub use command::{Command, Flags, USAGE};

use crate::application::blob::BlobHandle;
use crate::application::port::{GalleryApi, NotificationSink, ObjectUrlProvider, UploadFile};
use crate::application::session::Session;
use crate::config;
use crate::domain::blob::DEFAULT_CONTENT_TYPE;
use crate::domain::gallery::{Image, ImageId};
use crate::domain::notification::Notification;
use crate::domain::processing::FilterCommand;
use crate::error::{Error, Result};
use crate::i18n::fluent::I18n;
use crate::infrastructure::{LocalObjectUrls, RemoteClient};
use crate::ui::notifications::{Manager, Toast};
use std::path::Path;
use std::sync::Arc;

type CliSession = Session<RemoteClient, LocalObjectUrls, Manager>;

/// Runs one command against the image service.
///
/// # Errors
///
/// Returns the error of the failed step. Remote failures have already been
/// printed as toasts by then.
pub async fn run(flags: Flags, command: Command) -> Result<()> {
    paths::init_cli_overrides(flags.config_dir.clone(), flags.download_dir.clone());

    let (config, config_warning) = config::load();
    let i18n = I18n::new(flags.lang.clone(), &config);

    let mut server = config.server.clone();
    if let Some(url) = flags.server {
        server.base_url = Some(url);
    }
    let client = RemoteClient::new(&server.client_settings())?;
    let urls = LocalObjectUrls::new(config.downloads.directory());
    log::info!(
        "Using {} (downloads in {})",
        client.base_url(),
        urls.download_dir().display()
    );

    let mut notifications = Manager::with_toast_duration(config.notifications.toast_duration());
    if let Some(key) = config_warning {
        notifications.push(Notification::warning(key));
    }

    let mut session = Session::new(Arc::new(client), Arc::new(urls), notifications)
        .with_similarity_query(config.similarity.query());

    let result = execute(&mut session, command).await;
    for notification in session.notifications_mut().drain() {
        eprintln!("{}", Toast::line(&notification, &i18n));
    }
    result
}

async fn execute(session: &mut CliSession, command: Command) -> Result<()> {
    if command.needs_gallery() {
        session.fetch_gallery().await?;
    }

    match command {
        Command::List => {
            session.fetch_gallery().await?;
            print_images(session.gallery().images());
        }
        Command::Favorites => {
            session.toggle_favorites_view().await?;
            print_images(session.gallery().images());
        }
        Command::Search(tag) => {
            session.search(&tag).await?;
            print_images(session.gallery().images());
        }
        Command::Show(id) => {
            session.select_id(id)?;
            let selected = session.gallery().selection_or_placeholder().into_owned();
            let previous = session.previous();
            session.select_id(id)?;
            let next = session.next();
            print_image(&selected);
            println!("previous: {}", describe(previous));
            println!("next: {}", describe(next));
        }
        Command::Similar(id) => {
            session.select_id(id)?;
            let query = session.similarity_query();
            session.fetch_similar(query).await?;
            print_images(session.gallery().similar());
        }
        Command::Filter {
            image,
            filter,
            parameter,
        } => {
            session.select_id(image)?;
            session
                .apply_filter(FilterCommand { filter, parameter })
                .await?;
            let name = output_name(filter.name(), &display_name(session, image));
            let path = session.download_processed(&name)?;
            println!("{}", path.display());
        }
        Command::Objects(id) => {
            session.select_id(id)?;
            session.show_objects().await?;
            let name = output_name("objects", &display_name(session, id));
            let handle = displayed_overlay(session)?;
            let path = session.url_provider().save(handle.url(), &name)?;
            println!("{}", path.display());
        }
        Command::Favorite(id) => {
            session.toggle_favorite(id).await?;
        }
        Command::Delete(id) => {
            session.remove(id).await?;
        }
        Command::Upload(path) => {
            let file = read_upload(&path)?;
            session.upload(file).await?;
        }
        Command::Download(id) => {
            let path = session.download_image(id).await?;
            println!("{}", path.display());
        }
        Command::DownloadFavorites => {
            for path in session.download_favorites().await {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn display_name(session: &CliSession, id: ImageId) -> String {
    session
        .gallery()
        .find(id)
        .map_or_else(|| id.to_string(), |image| image.name.clone())
}

/// The overlay only disappears with the selection it belongs to.
fn displayed_overlay<A, U, N>(session: &Session<A, U, N>) -> Result<&BlobHandle>
where
    A: GalleryApi,
    U: ObjectUrlProvider,
    N: NotificationSink,
{
    session.objects_overlay().ok_or(Error::NoSelection)
}

/// `<prefix>-<name>`, lowercase prefix.
fn output_name(prefix: &str, name: &str) -> String {
    format!("{}-{name}", prefix.to_lowercase())
}

fn describe(id: Option<ImageId>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn print_images(images: &[Image]) {
    for image in images {
        print_image(image);
    }
}

fn print_image(image: &Image) {
    let favorite = if image.favorite { "*" } else { " " };
    let distance = if image.has_distance() {
        format!("\t{:.3}", image.distance)
    } else {
        String::new()
    };
    println!(
        "{}\t{favorite} {}\t{}{distance}",
        image.id,
        image.name,
        image.tags.join(",")
    );
}

fn read_upload(path: &Path) -> Result<UploadFile> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidParameter(format!("invalid file: {}", path.display())))?
        .to_string();
    let bytes = std::fs::read(path)?;
    Ok(UploadFile {
        content_type: content_type_for(path).to_string(),
        name,
        bytes,
    })
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
