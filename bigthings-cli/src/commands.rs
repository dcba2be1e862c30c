//! Subcommand arguments and their execution against a catalog session.

use std::io::Write;

use bigthings_core::{
    BigThing, CatalogEntry, CatalogService, CatalogSession, LocalCache, SessionError, SortOrder,
    SqliteLocalCache, SubmissionBuilder,
};
use bigthings_data::HttpCatalogClient;
use camino::Utf8PathBuf;
use clap::Parser;
use log::info;

use crate::config::{SessionArgs, SessionConfig};
use crate::{CliError, fs};

/// Builds the session a command runs against.
pub(crate) trait SessionFactory {
    type Catalog: CatalogService;
    type Cache: LocalCache;

    fn build(
        &self,
        config: &SessionConfig,
    ) -> Result<CatalogSession<Self::Catalog, Self::Cache>, CliError>;
}

/// Talks to the configured HTTP catalog and opens the SQLite cache.
pub(crate) struct DefaultSessionFactory;

impl SessionFactory for DefaultSessionFactory {
    type Catalog = HttpCatalogClient;
    type Cache = SqliteLocalCache;

    fn build(
        &self,
        config: &SessionConfig,
    ) -> Result<CatalogSession<Self::Catalog, Self::Cache>, CliError> {
        let client = HttpCatalogClient::new(config.catalog_url.clone()).map_err(|source| {
            CliError::BuildClient {
                base_url: config.catalog_url.clone(),
                source,
            }
        })?;
        let cache = open_cache(config)?;
        Ok(CatalogSession::new(client, cache))
    }
}

/// Open the SQLite cache named by `config`, creating parent directories.
pub(crate) fn open_cache(config: &SessionConfig) -> Result<SqliteLocalCache, CliError> {
    fs::ensure_parent_dir(&config.cache_db).map_err(|source| CliError::PrepareCacheDir {
        path: config.cache_db.clone(),
        source,
    })?;
    SqliteLocalCache::open(config.cache_db.as_std_path()).map_err(|source| CliError::OpenCache {
        path: config.cache_db.clone(),
        source: Box::new(source),
    })
}

/// CLI arguments for the `list` subcommand.
#[derive(Debug, Clone, Parser)]
pub(crate) struct ListArgs {
    /// Only show records whose name or location contains this text.
    #[arg(long, value_name = "text")]
    pub(crate) query: Option<String>,
    /// Order by `name` (A to Z) or `rating` (highest first).
    #[arg(long, value_name = "order", default_value_t = SortOrder::Name)]
    pub(crate) sort: SortOrder,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

/// CLI arguments for commands that act on one record.
#[derive(Debug, Clone, Parser)]
pub(crate) struct RecordArgs {
    /// Identifier of the record.
    #[arg(value_name = "id")]
    pub(crate) id: String,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

/// CLI arguments for the `rate` subcommand.
#[derive(Debug, Clone, Parser)]
pub(crate) struct RateArgs {
    /// Identifier of the record.
    #[arg(value_name = "id")]
    pub(crate) id: String,
    /// Rating between 0 and 5.
    #[arg(value_name = "rating")]
    pub(crate) rating: f64,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

/// CLI arguments for the `submit` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(
    long_about = "Propose a new Big Thing. Either both --latitude and \
                 --longitude or an --address must be given; coordinates win \
                 when both are present."
)]
pub(crate) struct SubmitArgs {
    /// Display name.
    #[arg(long, value_name = "name")]
    pub(crate) name: String,
    /// Latitude in decimal degrees.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    pub(crate) latitude: Option<String>,
    /// Longitude in decimal degrees.
    #[arg(long, value_name = "degrees", allow_hyphen_values = true)]
    pub(crate) longitude: Option<String>,
    /// Street address, used when no coordinates are given.
    #[arg(long, value_name = "text")]
    pub(crate) address: Option<String>,
    /// Free-text description.
    #[arg(long, value_name = "text")]
    pub(crate) description: Option<String>,
    /// Photo to upload with the submission.
    #[arg(long, value_name = "path")]
    pub(crate) photo: Option<Utf8PathBuf>,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

/// CLI arguments for commands needing only the shared settings.
#[derive(Debug, Clone, Parser)]
pub(crate) struct CommonArgs {
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

pub(crate) fn list<F: SessionFactory>(
    args: ListArgs,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut session = factory.build(&args.session.into_config()?)?;
    let refreshed = session.refresh();
    checked(&mut session, refreshed)?;
    session.set_query(args.query.unwrap_or_default());
    session.set_sort_order(args.sort);
    for entry in session.entries()? {
        write_entry(writer, &entry)?;
    }
    Ok(())
}

pub(crate) fn show<F: SessionFactory>(
    args: RecordArgs,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut session = factory.build(&args.session.into_config()?)?;
    let downloaded = session.download_record(&args.id).map(<[BigThing]>::to_vec);
    let records = checked(&mut session, downloaded)?;
    let payload =
        serde_json::to_string_pretty(&records).map_err(CliError::SerialiseRecords)?;
    writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
}

pub(crate) fn favorite<F: SessionFactory>(
    args: RecordArgs,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut session = factory.build(&args.session.into_config()?)?;
    let refreshed = session.refresh();
    checked(&mut session, refreshed)?;
    let added = session.favorite(&args.id);
    checked(&mut session, added)?;
    write_notice(&mut session, writer)
}

pub(crate) fn favorites<F: SessionFactory>(
    args: CommonArgs,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let session = factory.build(&args.session.into_config()?)?;
    for record in session.favorites()? {
        writeln!(writer, "{}\t{}\t{}", record.id, record.name, record.location)
            .map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

pub(crate) fn rate<F: SessionFactory>(
    args: RateArgs,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut session = factory.build(&args.session.into_config()?)?;
    let refreshed = session.refresh();
    checked(&mut session, refreshed)?;
    let rated = session.rate(&args.id, args.rating);
    let outcome = checked(&mut session, rated)?;
    if !outcome.remote_accepted() {
        info!("rating for {} is stored locally only", args.id);
    }
    write_notice(&mut session, writer)
}

pub(crate) fn submit<F: SessionFactory>(
    args: SubmitArgs,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut builder = SubmissionBuilder::new(args.name);
    if let Some(latitude) = args.latitude {
        builder = builder.latitude(latitude);
    }
    if let Some(longitude) = args.longitude {
        builder = builder.longitude(longitude);
    }
    if let Some(address) = args.address {
        builder = builder.address(address);
    }
    if let Some(description) = args.description {
        builder = builder.description(description);
    }
    if let Some(path) = args.photo {
        let bytes = fs::read_utf8_file(&path)
            .map_err(|source| CliError::ReadPhoto { path, source })?;
        builder = builder.photo(bytes);
    }

    let mut session = factory.build(&args.session.into_config()?)?;
    let submitted = session.submit_form(builder).map(|record| record.id.clone());
    let id = checked(&mut session, submitted)?;
    write_notice(&mut session, writer)?;
    writeln!(writer, "local id: {id}").map_err(CliError::WriteOutput)
}

pub(crate) fn reset<F: SessionFactory>(
    args: CommonArgs,
    factory: &F,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut session = factory.build(&args.session.into_config()?)?;
    let cleared = session.reset_cache();
    checked(&mut session, cleared)?;
    write_notice(&mut session, writer)
}

/// Attach the session's pending notice to a failed operation.
fn checked<T, C, S>(
    session: &mut CatalogSession<C, S>,
    result: Result<T, SessionError>,
) -> Result<T, CliError>
where
    C: CatalogService,
    S: LocalCache,
{
    result.map_err(|source| match session.take_notice() {
        Some(notice) => CliError::Rejected {
            notice: notice.message().to_owned(),
            source,
        },
        None => CliError::Session(source),
    })
}

fn write_notice<C, S>(
    session: &mut CatalogSession<C, S>,
    writer: &mut dyn Write,
) -> Result<(), CliError>
where
    C: CatalogService,
    S: LocalCache,
{
    match session.take_notice() {
        Some(notice) => writeln!(writer, "{notice}").map_err(CliError::WriteOutput),
        None => Ok(()),
    }
}

fn write_entry(writer: &mut dyn Write, entry: &CatalogEntry) -> Result<(), CliError> {
    let record = &entry.record;
    let mut line = format!(
        "{}\t{}\t{}\t{:.1}",
        record.id,
        record.name,
        record.location,
        record.rating_value()
    );
    if entry.favorite {
        line.push_str("\tfavorite");
    }
    if let Some(rating) = entry.local_rating {
        line.push_str(&format!("\tyou rated {rating:.1}"));
    }
    writeln!(writer, "{line}").map_err(CliError::WriteOutput)
}
