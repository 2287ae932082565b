// SPDX-License-Identifier: MPL-2.0
//! Command line flags and sub-commands.

use crate::domain::gallery::ImageId;
use crate::domain::processing::FilterKind;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Usage text printed by `--help` and on argument errors.
pub const USAGE: &str = "\
Usage: gallery_lens [OPTIONS] <COMMAND> [ARGS]

Commands:
  list                          List every image
  favorites                     List favorite images
  search <TAG>                  List images carrying TAG
  show <ID>                     Show one image and its neighbours
  similar <ID>                  List images similar to ID
  filter <ID> <FILTER> [PARAM]  Apply a filter and save the result
  objects <ID>                  Save the detected objects overlay
  favorite <ID>                 Toggle the favorite flag of ID
  delete <ID>                   Delete ID from the gallery
  upload <FILE>                 Add FILE to the gallery
  download <ID>                 Save the original of ID
  download-favorites            Save the originals of every favorite

Filters: Gray, Color, Mean, Sobel, Histogram, Histogram2D

Options:
  --lang <LOCALE>         Message language (e.g. en-US, fr)
  --server <URL>          Address of the image service
  --config-dir <DIR>      Directory holding settings.toml
  --download-dir <DIR>    Directory downloads are written into
  -h, --help              Print this help
";

/// Startup options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional image service address.
    /// Takes precedence over `[server] base_url`.
    pub server: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `GALLERY_LENS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Optional download directory override.
    /// Takes precedence over `GALLERY_LENS_DOWNLOAD_DIR` environment variable.
    pub download_dir: Option<String>,
}

/// One invocation of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Favorites,
    Search(String),
    Show(ImageId),
    Similar(ImageId),
    Filter {
        image: ImageId,
        filter: FilterKind,
        parameter: Option<i64>,
    },
    Objects(ImageId),
    Favorite(ImageId),
    Delete(ImageId),
    Upload(PathBuf),
    Download(ImageId),
    DownloadFavorites,
}

impl Command {
    /// Parses the positional arguments left once the flags are consumed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for unknown commands, missing
    /// operands, or malformed numbers.
    pub fn parse(args: &[String]) -> Result<Self> {
        let (name, operands) = args
            .split_first()
            .ok_or_else(|| invalid("missing command"))?;
        let operands: Vec<&str> = operands.iter().map(String::as_str).collect();

        let command = match (name.as_str(), operands.as_slice()) {
            ("list", []) => Command::List,
            ("favorites", []) => Command::Favorites,
            ("search", [tag]) => Command::Search((*tag).to_string()),
            ("show", [id]) => Command::Show(parse_id(id)?),
            ("similar", [id]) => Command::Similar(parse_id(id)?),
            ("filter", [id, filter, rest @ ..]) if rest.len() <= 1 => Command::Filter {
                image: parse_id(id)?,
                filter: filter.parse::<FilterKind>()?,
                parameter: rest.first().map(|raw| parse_number(raw)).transpose()?,
            },
            ("objects", [id]) => Command::Objects(parse_id(id)?),
            ("favorite", [id]) => Command::Favorite(parse_id(id)?),
            ("delete", [id]) => Command::Delete(parse_id(id)?),
            ("upload", [path]) => Command::Upload(PathBuf::from(path)),
            ("download", [id]) => Command::Download(parse_id(id)?),
            ("download-favorites", []) => Command::DownloadFavorites,
            (other, _) => return Err(invalid(&format!("unexpected arguments for `{other}`"))),
        };
        Ok(command)
    }

    /// Whether the command needs the gallery list before it runs.
    #[must_use]
    pub fn needs_gallery(&self) -> bool {
        !matches!(
            self,
            Command::List | Command::Favorites | Command::Search(_) | Command::Upload(_)
        )
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidParameter(message.to_string())
}

fn parse_number(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| invalid(&format!("not a number: {raw}")))
}

fn parse_id(raw: &str) -> Result<ImageId> {
    parse_number(raw).map(ImageId::new)
}
