// Rust guideline compliant 2026-10-12

//! Slotwise CLI Application
//!
//! Command-line interface for the Slotwise availability and booking core.

use clap::Parser;
use slotwise_app::{parse_actor, AppError, RepoContext};
use slotwise_cli::commands::{self, booking, search, slot};
use slotwise_cli::terminal::{print_error, should_use_color};
use slotwise_cli::{create_formatter, CommandContext};
use slotwise_core::OutputFormat as ConfigFormat;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "swt",
    version,
    about = "Slotwise: availability and booking scheduling",
    long_about = "Slotwise keeps provider availability slots, checks them for conflicts, searches bookable time by place and keyword, and moves bookings through their lifecycle.",
    after_help = "Examples:\n  swt init\n  swt provider add \"Andheri Electric\" --location 19.0760,72.8777 --radius 10\n  swt --as provider:prv-1a2b3c4d5e slot bulk --from 2030-03-04 --to 2030-03-31 --days mon,wed,fri --time 09:00-12:00\n  swt search --keyword electric --near 19.0596,72.8295 --radius 10\n  swt --as customer:cus-42 booking create --service svc-9f8e7d6c5b --at 2030-03-04T09:00\n"
)]
struct Cli {
    /// Enable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Repository root (defaults to the current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Acting identity as role:id, e.g. provider:prv-1a2b3c4d5e
    #[arg(long = "as", global = true, value_name = "ROLE:ID")]
    actor: Option<String>,

    /// Log debug events to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Table,
    Plain,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Initialize a new Slotwise repository
    Init,

    /// Manage providers
    Provider {
        #[command(subcommand)]
        action: ProviderAction,
    },

    /// Manage services
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// Manage availability slots
    Slot {
        #[command(subcommand)]
        action: SlotAction,
    },

    /// Search bookable slots
    Search {
        /// Service keyword (category or name)
        #[arg(long)]
        keyword: Option<String>,

        /// Earliest slot start (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        from: Option<String>,

        /// Latest slot end (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        to: Option<String>,

        /// Minimum slot length in minutes
        #[arg(long)]
        min_duration: Option<i64>,

        /// Customer location as lat,lon
        #[arg(long, allow_hyphen_values = true)]
        near: Option<String>,

        /// Search radius in km
        #[arg(long)]
        radius: Option<f64>,

        /// Only this provider
        #[arg(long)]
        provider: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Keep provider order instead of sorting by start
        #[arg(long)]
        unsorted: bool,
    },

    /// Manage bookings
    Booking {
        #[command(subcommand)]
        action: BookingAction,
    },

    /// Great-circle distance between two points
    #[command(allow_negative_numbers = true)]
    Distance {
        /// Latitude of the first point
        lat1: f64,
        /// Longitude of the first point
        lon1: f64,
        /// Latitude of the second point
        lat2: f64,
        /// Longitude of the second point
        lon2: f64,
    },

    /// Run the MCP server on stdio
    Mcp {
        /// Refuse mutating tools
        #[arg(long)]
        read_only: bool,

        /// Log level (error, warn, info, debug)
        #[arg(long, default_value = "info")]
        log_level: String,

        /// Write logs to this file instead of stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ProviderAction {
    /// Register a provider
    Add {
        /// Business name
        name: String,

        /// Location as lat,lon
        #[arg(long, allow_hyphen_values = true)]
        location: Option<String>,

        /// Service radius in km
        #[arg(long)]
        radius: Option<f64>,
    },

    /// List providers
    List,

    /// Show a provider
    Show {
        /// Provider ID
        id: String,
    },

    /// Booking counts of the acting provider
    Stats,

    /// Open or close the acting provider for bookings
    Available {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        available: bool,
    },

    /// Providers within a radius of a point
    Nearby {
        /// Point as lat,lon
        #[arg(allow_hyphen_values = true)]
        near: String,

        /// Radius in km (configured default when omitted)
        #[arg(long)]
        radius: Option<f64>,
    },

    /// Providers whose service radius covers a point
    Serving {
        /// Point as lat,lon
        #[arg(allow_hyphen_values = true)]
        at: String,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ServiceAction {
    /// Register a service for the acting provider
    Add {
        /// Service name
        name: String,

        /// Category keyword
        #[arg(long)]
        category: String,

        /// Price in cents
        #[arg(long, default_value_t = 0)]
        price_cents: u64,

        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,

        /// Service location as lat,lon
        #[arg(long, allow_hyphen_values = true)]
        location: Option<String>,
    },

    /// List services
    List {
        /// Only this provider
        #[arg(long)]
        provider: Option<String>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum SlotAction {
    /// Create one slot
    Add {
        /// Start (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        start: String,

        /// End (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        end: String,

        /// Repeat weekly on this weekday
        #[arg(long)]
        repeat: Option<String>,

        /// Note
        #[arg(long)]
        notes: Option<String>,
    },

    /// Create slots for weekdays across a date range
    Bulk {
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Weekdays, e.g. mon,wed,fri
        #[arg(long)]
        days: String,

        /// Time template HH:MM-HH:MM (repeatable)
        #[arg(long = "time", required = true)]
        times: Vec<String>,

        /// Note copied onto every slot
        #[arg(long)]
        notes: Option<String>,
    },

    /// List slots
    List {
        /// Provider ID (defaults to the acting provider)
        #[arg(long)]
        provider: Option<String>,

        /// Earliest start
        #[arg(long)]
        from: Option<String>,

        /// Latest end
        #[arg(long)]
        to: Option<String>,

        /// Hide booked slots
        #[arg(long, conflicts_with = "booked")]
        unbooked: bool,

        /// Only booked slots
        #[arg(long)]
        booked: bool,

        /// Minimum length in minutes
        #[arg(long)]
        min_duration: Option<i64>,
    },

    /// Unbooked slots in the upcoming window
    Upcoming {
        /// Provider ID (defaults to the acting provider)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Recurring slots on a weekday
    Recurring {
        /// Weekday
        day: String,

        /// Provider ID (defaults to the acting provider)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Mark a slot booked
    Book {
        /// Slot ID
        id: String,
    },

    /// Mark a slot available
    Release {
        /// Slot ID
        id: String,
    },

    /// Delete an unbooked slot
    Delete {
        /// Slot ID
        id: String,
    },
}

#[derive(Debug, clap::Subcommand)]
enum BookingAction {
    /// Book a service as the acting customer
    Create {
        /// Service ID
        #[arg(long)]
        service: String,

        /// Start (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: String,

        /// Slot to hold
        #[arg(long)]
        slot: Option<String>,

        /// Notes for the provider
        #[arg(long)]
        notes: Option<String>,

        /// Delivery address
        #[arg(long)]
        address: Option<String>,

        /// Customer location as lat,lon
        #[arg(long, allow_hyphen_values = true)]
        location: Option<String>,
    },

    /// Show a booking
    Show {
        /// Booking ID
        id: String,
    },

    /// List the acting identity's bookings
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by service
        #[arg(long)]
        service: Option<String>,

        /// Scheduled at or after
        #[arg(long)]
        after: Option<String>,

        /// Scheduled at or before
        #[arg(long)]
        before: Option<String>,

        /// Hide cancelled bookings
        #[arg(long)]
        active: bool,

        /// Sort by field
        #[arg(long, value_parser = ["id", "scheduled_at", "created_at", "updated_at", "status", "price"])]
        sort: Option<String>,
    },

    /// Open bookings that have not started yet
    Upcoming,

    /// Confirm a pending booking
    Confirm {
        /// Booking ID
        id: String,

        /// Replacement notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Start a confirmed booking
    Start {
        /// Booking ID
        id: String,

        /// Actual start (defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Replacement notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Complete a booking in progress
    Complete {
        /// Booking ID
        id: String,

        /// Actual start, if it was not recorded
        #[arg(long)]
        started: Option<String>,

        /// Actual end (defaults to now)
        #[arg(long)]
        ended: Option<String>,

        /// Replacement notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Cancel a booking
    Cancel {
        /// Booking ID
        id: String,

        /// Reason
        #[arg(long)]
        reason: String,
    },

    /// Move a booking to a new start
    Reschedule {
        /// Booking ID
        id: String,

        /// New start (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        to: String,
    },

    /// Completed bookings not yet rated
    Ratable {
        /// Booking IDs that already have a rating
        #[arg(long, value_delimiter = ',')]
        rated: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SLOTWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Output format from the repository configuration, or table when there is
/// no readable configuration.
fn configured_format(repo: Option<&Path>) -> &'static str {
    let config = RepoContext::discover(repo).and_then(|context| context.load_config());
    match config.map(|c| c.output_format) {
        Ok(ConfigFormat::Json) => "json",
        Ok(ConfigFormat::Plain) => "plain",
        _ => "table",
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Mcp {
        read_only,
        log_level,
        log_file,
    }) = &cli.command
    {
        slotwise_mcp::run(slotwise_mcp::McpOptions {
            repo: cli.repo.clone(),
            read_only: *read_only,
            log_level: log_level.clone(),
            log_file: log_file.clone(),
        })?;
        return Ok(());
    }

    init_logging(cli.verbose);

    let use_color = !cli.no_color && should_use_color();
    let format = match cli.format {
        Some(OutputFormat::Json) => "json",
        Some(OutputFormat::Table) => "table",
        Some(OutputFormat::Plain) => "plain",
        None if cli.json => "json",
        None => configured_format(cli.repo.as_deref()),
    };
    let formatter = create_formatter(format, use_color);

    let outcome = cli
        .actor
        .as_deref()
        .map(parse_actor)
        .transpose()
        .and_then(|actor| {
            let ctx = CommandContext {
                repo_root: cli.repo,
                actor,
                formatter: formatter.as_ref(),
            };
            dispatch(&ctx, cli.command)
        });

    match outcome {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }
        Err(err) => {
            tracing::debug!(code = ?err.code(), "command failed");
            if format == "json" {
                println!("{}", formatter.format_error(&err));
            } else {
                print_error(&err.to_string(), use_color);
            }
            std::process::exit(1);
        }
    }
}

fn dispatch(ctx: &CommandContext<'_>, command: Option<Commands>) -> Result<String, AppError> {
    let Some(command) = command else {
        return Ok("Use --help for usage information".to_string());
    };

    match command {
        Commands::Init => commands::init::execute(ctx),
        Commands::Provider { action } => match action {
            ProviderAction::Add {
                name,
                location,
                radius,
            } => commands::provider::add(ctx, name, location, radius),
            ProviderAction::List => commands::provider::list(ctx),
            ProviderAction::Show { id } => commands::provider::show(ctx, id),
            ProviderAction::Stats => commands::provider::stats(ctx),
            ProviderAction::Available { available } => {
                commands::provider::set_available(ctx, available)
            }
            ProviderAction::Nearby { near, radius } => commands::provider::nearby(ctx, near, radius),
            ProviderAction::Serving { at } => commands::provider::serving(ctx, at),
        },
        Commands::Service { action } => match action {
            ServiceAction::Add {
                name,
                category,
                price_cents,
                duration,
                location,
            } => commands::service::add(ctx, name, category, price_cents, duration, location),
            ServiceAction::List { provider } => commands::service::list(ctx, provider),
        },
        Commands::Slot { action } => match action {
            SlotAction::Add {
                start,
                end,
                repeat,
                notes,
            } => slot::add(ctx, start, end, repeat, notes),
            SlotAction::Bulk {
                from,
                to,
                days,
                times,
                notes,
            } => slot::bulk(ctx, from, to, days, times, notes),
            SlotAction::List {
                provider,
                from,
                to,
                unbooked,
                booked,
                min_duration,
            } => slot::list(
                ctx,
                slot::ListArgs {
                    provider,
                    from,
                    to,
                    unbooked,
                    booked,
                    min_duration,
                },
            ),
            SlotAction::Upcoming { provider } => slot::upcoming(ctx, provider),
            SlotAction::Recurring { day, provider } => slot::recurring(ctx, provider, day),
            SlotAction::Book { id } => slot::book(ctx, id),
            SlotAction::Release { id } => slot::release(ctx, id),
            SlotAction::Delete { id } => slot::delete(ctx, id),
        },
        Commands::Search {
            keyword,
            from,
            to,
            min_duration,
            near,
            radius,
            provider,
            limit,
            unsorted,
        } => search::execute(
            ctx,
            search::SearchArgs {
                keyword,
                from,
                to,
                min_duration,
                near,
                radius,
                provider,
                limit,
                unsorted,
            },
        ),
        Commands::Booking { action } => match action {
            BookingAction::Create {
                service,
                at,
                slot,
                notes,
                address,
                location,
            } => booking::create(
                ctx,
                booking::CreateArgs {
                    service,
                    at,
                    slot,
                    notes,
                    address,
                    location,
                },
            ),
            BookingAction::Show { id } => booking::show(ctx, id),
            BookingAction::List {
                status,
                service,
                after,
                before,
                active,
                sort,
            } => booking::list(
                ctx,
                booking::ListArgs {
                    status,
                    service,
                    after,
                    before,
                    active,
                    sort,
                },
            ),
            BookingAction::Upcoming => booking::upcoming(ctx),
            BookingAction::Confirm { id, notes } => booking::confirm(ctx, id, notes),
            BookingAction::Start { id, at, notes } => booking::start(
                ctx,
                id,
                booking::ProgressArgs {
                    started: at,
                    ended: None,
                    notes,
                },
            ),
            BookingAction::Complete {
                id,
                started,
                ended,
                notes,
            } => booking::complete(
                ctx,
                id,
                booking::ProgressArgs {
                    started,
                    ended,
                    notes,
                },
            ),
            BookingAction::Cancel { id, reason } => booking::cancel(ctx, id, reason),
            BookingAction::Reschedule { id, to } => booking::reschedule(ctx, id, to),
            BookingAction::Ratable { rated } => booking::ratable(ctx, rated),
        },
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::distance::execute(ctx, (lat1, lon1), (lat2, lon2)),
        Commands::Mcp { .. } => Ok(String::new()),
    }
}
