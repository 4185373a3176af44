//! # Command Line
//!
//! Argument parsing, dispatch to the commands, and the interactive shell.
//!
//! ## Invocation
//! ```text
//! nas-backoffice [--config FILE] [--role ROLE] [--latency-ms N] <COMMAND>
//!
//!   dashboard                          daily figures
//!   dining book 19:30 4 --table t4     book a table
//!   stock alerts --family restaurant   out and low items
//!   export invoices --format html      printable page
//!   shell                              one session, many commands
//! ```
//!
//! In the shell every line is parsed with the same grammar, so the
//! session's data and cache live across commands. Lines can be edited and
//! recalled from history. Ctrl-C or Ctrl-D leaves.
//!
//! ```text
//! nas> dining assign r3 t9
//! nas> role waiter
//! nas> floor --zone terrace
//! nas> exit
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Serialize;
use tracing::{debug, info};

use nas_core::rules::navigation::Role;
use nas_core::{
    EventStatus, EventType, InvoiceSource, InvoiceStatus, MovementKind, ReservationStatus,
    RoomStatus, StockFamily,
};
use nas_store::InvoiceFilter;

use crate::commands::export::{ExportFormat, ExportTarget};
use crate::commands::{
    clients, config, dashboard, events, export, invoices, menu, navigation, orders, reservations,
    rooms, stock, tables,
};
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Arguments
// =============================================================================

/// NAS Connect back-office
#[derive(Parser, Debug)]
#[command(name = "nas-backoffice")]
#[command(version)]
#[command(about = "Hotel and restaurant back-office for NAS Connect", long_about = None)]
pub struct Cli {
    /// Configuration file (default: platform config directory)
    #[arg(long = "config", env = "NAS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Role of the session, overrides the configuration
    #[arg(long = "role", global = true)]
    pub role: Option<Role>,

    /// Simulated latency of every call, overrides the configuration
    #[arg(long = "latency-ms", value_name = "MS", global = true)]
    pub latency_ms: Option<u64>,

    /// Start with an empty data set instead of the demo fixtures
    #[arg(long = "empty", global = true)]
    pub empty: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One shell line: the same commands without the binary name.
#[derive(Parser, Debug)]
#[command(name = "nas", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Daily figures and no-show candidates
    Dashboard,
    /// Menu of the current role
    Nav,
    /// Switches the session role
    Role {
        #[arg(value_name = "ROLE")]
        to: Role,
    },
    /// Shows or writes the configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// Lodging board, calendar, occupancy
    #[command(subcommand)]
    Rooms(RoomsCommand),
    /// Floor plan
    Floor {
        #[arg(long)]
        zone: Option<String>,
    },
    /// Dining reservations
    #[command(subcommand)]
    Dining(DiningCommand),
    /// Lodging stays
    #[command(subcommand)]
    Stays(StaysCommand),
    /// Status, edit and deletion of any reservation
    #[command(subcommand)]
    Reservation(ReservationCommand),
    #[command(subcommand)]
    Orders(OrdersCommand),
    #[command(subcommand)]
    Stock(StockCommand),
    #[command(subcommand)]
    Invoices(InvoicesCommand),
    #[command(subcommand)]
    Menu(MenuCommand),
    #[command(subcommand)]
    Events(EventsCommand),
    /// CSV or printable HTML export
    Export(ExportArgs),
    /// Drops every cached read
    Refresh,
    /// Interactive session
    Shell,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    Show,
    /// Writes the current configuration to a file
    Init { path: Option<PathBuf> },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClientsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        name: String,
        phone: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        diet: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum RoomsCommand {
    /// Room status over a period
    Board {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    Calendar {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    Occupancy {
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    /// Puts a room in maintenance, or back with --off
    Maintenance {
        room: String,
        #[arg(long)]
        off: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DiningCommand {
    List {
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    Book {
        /// HH:MM
        time: String,
        party_size: u32,
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        grace: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    Assign { reservation: String, table: String },
    /// Reservations past slot and grace without a table
    NoShows,
    NoShow { reservation: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum StaysCommand {
    List,
    Book {
        room: String,
        arrival: NaiveDate,
        #[arg(long)]
        departure: Option<NaiveDate>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        confirmed: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// New dates, and a new room with --room
    Move {
        reservation: String,
        arrival: NaiveDate,
        #[arg(long)]
        departure: Option<NaiveDate>,
        #[arg(long)]
        room: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReservationCommand {
    Status { id: String, status: ReservationStatus },
    Edit {
        id: String,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        party: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum OrdersCommand {
    Ticket { reservation: String },
    Add {
        reservation: String,
        item: String,
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    Send { reservation: String },
    Serve { reservation: String },
    Cancel {
        order: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// End of service
    Close,
}

#[derive(Subcommand, Debug, Clone)]
pub enum StockCommand {
    List {
        #[arg(long)]
        family: Option<StockFamily>,
    },
    Alerts {
        #[arg(long)]
        family: Option<StockFamily>,
    },
    Reorder {
        #[arg(long)]
        family: Option<StockFamily>,
    },
    Movements {
        #[arg(long)]
        product: Option<String>,
    },
    /// Purchase, consumption or signed adjustment
    Move {
        product: String,
        kind: MovementKind,
        #[arg(allow_hyphen_values = true)]
        quantity: f64,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum InvoicesCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        status: Option<InvoiceStatus>,
    },
    Create {
        client: String,
        #[arg(long, default_value = "restaurant")]
        source: InvoiceSource,
        /// description:quantity:unit_price
        #[arg(required = true, num_args = 1..)]
        lines: Vec<String>,
    },
    Status { id: String, status: InvoiceStatus },
    /// Revenue per source, dining trend, room occupancy
    Reports {
        /// YYYY-MM, the current month by default
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MenuCommand {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Enable { id: String },
    Disable { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EventsCommand {
    List {
        /// YYYY-MM
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },
    Add {
        name: String,
        date: NaiveDate,
        /// HH:MM-HH:MM
        hours: String,
        guests: u32,
        contact: String,
        #[arg(long = "type")]
        event_type: Option<EventType>,
        #[arg(long)]
        notes: Option<String>,
    },
    Status { id: String, status: EventStatus },
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub target: ExportTarget,
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
    /// Output file; printed to stdout when absent
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

fn parse_month(input: &str) -> Result<(i32, u32), String> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{}', expected YYYY-MM", input))?;
    Ok((chrono::Datelike::year(&date), chrono::Datelike::month(&date)))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Result of a command, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(serde_json::Value),
    Text(String),
}

impl Output {
    pub fn render(&self) -> String {
        match self {
            Output::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Output::Text(text) => text.clone(),
        }
    }
}

fn json<T: Serialize>(value: T) -> Result<Output, ApiError> {
    Ok(Output::Json(serde_json::to_value(value)?))
}

/// Runs one command against the session.
pub async fn execute(state: &AppState, command: Command) -> Result<Output, ApiError> {
    debug!(command = ?command, role = %state.session.role(), "Executing command");
    let today = state.api.today();

    match command {
        Command::Dashboard => json(dashboard::get_dashboard(state).await?),
        Command::Nav => json(navigation::get_menu(state)),
        Command::Role { to } => json(navigation::switch_role(state, to)?),

        Command::Config(ConfigCommand::Show) => json(config::get_config(state)?),
        Command::Config(ConfigCommand::Init { path }) => {
            let path = config::init_config(state, path)?;
            Ok(Output::Text(format!("Configuration written to {}", path.display())))
        }

        Command::Clients(ClientsCommand::List { search }) => {
            json(clients::list_clients(state, search.as_deref()).await?)
        }
        Command::Clients(ClientsCommand::Add { name, phone, email, diet }) => json(
            clients::add_client(
                state,
                clients::NewClient {
                    name,
                    phone,
                    email,
                    dietary_preferences: diet,
                },
            )
            .await?,
        ),

        Command::Rooms(RoomsCommand::Board { from, to }) => {
            json(rooms::room_board(state, from.unwrap_or(today), to).await?)
        }
        Command::Rooms(RoomsCommand::Calendar { from, days }) => {
            json(rooms::room_calendar(state, from.unwrap_or(today), days).await?)
        }
        Command::Rooms(RoomsCommand::Occupancy { day }) => {
            json(rooms::occupancy(state, day.unwrap_or(today)).await?)
        }
        Command::Rooms(RoomsCommand::Maintenance { room, off }) => {
            let status = if off { RoomStatus::Free } else { RoomStatus::Maintenance };
            json(rooms::set_room_status(state, &room, status).await?)
        }

        Command::Floor { zone } => json(tables::floor_plan(state, zone.as_deref()).await?),

        Command::Dining(DiningCommand::List { day }) => {
            json(reservations::list_dining(state, day).await?)
        }
        Command::Dining(DiningCommand::Book {
            time,
            party_size,
            table,
            client,
            date,
            grace,
            notes,
        }) => json(
            reservations::book_table(
                state,
                reservations::BookTableRequest {
                    client_id: client,
                    table_id: table,
                    date,
                    time,
                    party_size,
                    grace_minutes: grace,
                    notes,
                },
            )
            .await?,
        ),
        Command::Dining(DiningCommand::Assign { reservation, table }) => {
            json(reservations::assign_table(state, &reservation, &table).await?)
        }
        Command::Dining(DiningCommand::NoShows) => {
            json(reservations::no_show_candidates(state).await?)
        }
        Command::Dining(DiningCommand::NoShow { reservation }) => {
            json(reservations::mark_no_show(state, &reservation).await?)
        }

        Command::Stays(StaysCommand::List) => json(reservations::list_stays(state).await?),
        Command::Stays(StaysCommand::Book {
            room,
            arrival,
            departure,
            client,
            confirmed,
            notes,
        }) => json(
            reservations::book_stay(
                state,
                reservations::BookStayRequest {
                    client_id: client,
                    room_id: room,
                    arrival,
                    departure,
                    confirmed,
                    notes,
                },
            )
            .await?,
        ),
        Command::Stays(StaysCommand::Move {
            reservation,
            arrival,
            departure,
            room,
        }) => json(
            reservations::reschedule_stay(state, &reservation, room, arrival, departure).await?,
        ),

        Command::Reservation(ReservationCommand::Status { id, status }) => {
            json(reservations::set_status(state, &id, status).await?)
        }
        Command::Reservation(ReservationCommand::Edit {
            id,
            client,
            party,
            notes,
        }) => json(
            reservations::update(
                state,
                &id,
                reservations::ReservationPatch {
                    client_id: client,
                    party_size: party,
                    notes,
                },
            )
            .await?,
        ),
        Command::Reservation(ReservationCommand::Delete { id }) => {
            reservations::delete(state, &id).await?;
            Ok(Output::Text(format!("Reservation {} deleted", id)))
        }

        Command::Orders(OrdersCommand::Ticket { reservation }) => {
            json(orders::ticket(state, &reservation).await?)
        }
        Command::Orders(OrdersCommand::Add { reservation, item, qty }) => json(
            orders::add_order(
                state,
                orders::AddOrderRequest {
                    reservation_id: reservation,
                    menu_item_id: item,
                    quantity: qty,
                },
            )
            .await?,
        ),
        Command::Orders(OrdersCommand::Send { reservation }) => {
            json(orders::send_orders(state, &reservation).await?)
        }
        Command::Orders(OrdersCommand::Serve { reservation }) => {
            json(orders::serve_orders(state, &reservation).await?)
        }
        Command::Orders(OrdersCommand::Cancel { order, reason }) => {
            json(orders::cancel_order(state, &order, reason).await?)
        }
        Command::Orders(OrdersCommand::Close) => json(orders::end_of_service(state).await?),

        Command::Stock(StockCommand::List { family }) => {
            json(stock::list_stock(state, family).await?)
        }
        Command::Stock(StockCommand::Alerts { family }) => {
            json(stock::stock_alerts(state, family).await?)
        }
        Command::Stock(StockCommand::Reorder { family }) => {
            json(stock::reorder_suggestions(state, family).await?)
        }
        Command::Stock(StockCommand::Movements { product }) => {
            json(stock::movements(state, product.as_deref()).await?)
        }
        Command::Stock(StockCommand::Move {
            product,
            kind,
            quantity,
            note,
        }) => json(
            stock::record_movement(
                state,
                stock::MovementRequest {
                    product_id: product,
                    kind,
                    quantity,
                    note,
                },
            )
            .await?,
        ),

        Command::Invoices(InvoicesCommand::List { search, client, status }) => {
            json(invoices::finance(state, InvoiceFilter { search, client, status }).await?)
        }
        Command::Invoices(InvoicesCommand::Create { client, source, lines }) => {
            let lines = lines
                .iter()
                .map(|l| invoices::parse_line(l))
                .collect::<Result<Vec<_>, _>>()?;
            json(
                invoices::create_invoice(
                    state,
                    invoices::NewInvoiceRequest {
                        client_name: client,
                        source,
                        lines,
                    },
                )
                .await?,
            )
        }
        Command::Invoices(InvoicesCommand::Status { id, status }) => {
            json(invoices::set_invoice_status(state, &id, status).await?)
        }
        Command::Invoices(InvoicesCommand::Reports { month }) => {
            json(invoices::reports(state, month).await?)
        }

        Command::Menu(MenuCommand::List { category }) => {
            json(menu::list_menu(state, category.as_deref()).await?)
        }
        Command::Menu(MenuCommand::Enable { id }) => {
            json(menu::set_available(state, &id, true).await?)
        }
        Command::Menu(MenuCommand::Disable { id }) => {
            json(menu::set_available(state, &id, false).await?)
        }

        Command::Events(EventsCommand::List { month }) => {
            json(events::list_events(state, month).await?)
        }
        Command::Events(EventsCommand::Add {
            name,
            date,
            hours,
            guests,
            contact,
            event_type,
            notes,
        }) => json(
            events::add_event(
                state,
                events::NewEventRequest {
                    name,
                    date,
                    hours,
                    expected_guests: guests,
                    contact,
                    event_type,
                    notes,
                },
            )
            .await?,
        ),
        Command::Events(EventsCommand::Status { id, status }) => {
            json(events::set_event_status(state, &id, status).await?)
        }

        Command::Export(args) => {
            let document = export::export(state, args.target, args.format).await?;
            match args.output {
                Some(path) => {
                    let cwd = std::path::Path::new(".");
                    let path = export::write_document(&document, Some(path), cwd)?;
                    let rows = document.rows;
                    Ok(Output::Text(format!("{rows} rows written to {}", path.display())))
                }
                None => Ok(Output::Text(document.content)),
            }
        }

        Command::Refresh => {
            state.api.refresh();
            Ok(Output::Text("Cache cleared".to_string()))
        }
        Command::Shell => Ok(Output::Text("Already in the shell".to_string())),
    }
}

// =============================================================================
// Shell
// =============================================================================

const PROMPT: &str = "nas> ";

/// Splits a shell line into words. Single and double quotes group words;
/// a quote left open is an error.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// What the shell does with one input line.
#[derive(Debug)]
enum ShellAction {
    Skip,
    Exit,
    Help,
    Run(Command),
    Invalid(String),
}

fn parse_shell_line(line: &str) -> ShellAction {
    let words = match split_line(line) {
        Ok(words) => words,
        Err(e) => return ShellAction::Invalid(format!("error: {}", e)),
    };

    match words.first().map(String::as_str) {
        None => return ShellAction::Skip,
        Some("exit" | "quit") => return ShellAction::Exit,
        Some("help") => return ShellAction::Help,
        Some(_) => {}
    }

    match ShellLine::try_parse_from(&words) {
        Ok(parsed) => ShellAction::Run(parsed.command),
        Err(e) => ShellAction::Invalid(e.to_string()),
    }
}

/// Line-edited session over stdin until `exit`, `quit`, Ctrl-D or Ctrl-C.
///
/// Errors are printed and the session continues. History lives for the
/// session only.
pub async fn shell(state: &AppState) -> Result<(), ApiError> {
    info!(role = %state.session.role(), "Shell started");

    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        match parse_shell_line(&line) {
            ShellAction::Skip => {}
            ShellAction::Exit => break,
            ShellAction::Help => {
                let help = <ShellLine as clap::CommandFactory>::command().render_help();
                println!("{}", help);
            }
            ShellAction::Invalid(message) => eprintln!("{}", message),
            ShellAction::Run(command) => match execute(state, command).await {
                Ok(output) => println!("{}", output.render()),
                Err(e) => eprintln!("error {}", e),
            },
        }
    }

    info!("Shell closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::state;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_shell_definition() {
        ShellLine::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "nas-backoffice",
            "dining",
            "book",
            "19:30",
            "4",
            "--table",
            "t4",
            "--role",
            "head_waiter",
        ])
        .unwrap();
        assert_eq!(cli.role, Some(Role::HeadWaiter));
        match cli.command {
            Some(Command::Dining(DiningCommand::Book { time, party_size, table, .. })) => {
                assert_eq!(time, "19:30");
                assert_eq!(party_size, 4);
                assert_eq!(table.as_deref(), Some("t4"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_adjustment() {
        let line = ShellLine::try_parse_from(["stock", "move", "s1", "adjustment", "-3"]).unwrap();
        match line.command {
            Command::Stock(StockCommand::Move { kind, quantity, .. }) => {
                assert_eq!(kind, MovementKind::Adjustment);
                assert_eq!(quantity, -3.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_split_line() {
        assert_eq!(
            split_line(r#"clients add "Rakoto Jean" '034 12 345 67'"#).unwrap(),
            vec!["clients", "add", "Rakoto Jean", "034 12 345 67"]
        );
        assert_eq!(
            split_line("  floor   --zone terrace ").unwrap(),
            vec!["floor", "--zone", "terrace"]
        );
        assert_eq!(split_line(r#"notes """#).unwrap(), vec!["notes", ""]);
        assert!(split_line(r#"clients add "Rakoto"#).is_err());
    }

    #[test]
    fn test_shell_line_actions() {
        assert!(matches!(parse_shell_line("   "), ShellAction::Skip));
        assert!(matches!(parse_shell_line("quit"), ShellAction::Exit));
        assert!(matches!(parse_shell_line("help"), ShellAction::Help));
        assert!(matches!(
            parse_shell_line("floor --zone 'Terrace'"),
            ShellAction::Run(Command::Floor { zone: Some(z) }) if z == "Terrace"
        ));
        assert!(matches!(
            parse_shell_line("invoices reports --month 2025-01"),
            ShellAction::Run(Command::Invoices(InvoicesCommand::Reports { month: Some((2025, 1)) }))
        ));
        assert!(matches!(parse_shell_line("clients add \"Rakoto"), ShellAction::Invalid(_)));
        assert!(matches!(parse_shell_line("teleport"), ShellAction::Invalid(_)));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-03"), Ok((2025, 3)));
        assert!(parse_month("2025-13").is_err());
    }

    #[tokio::test]
    async fn test_execute_session_flow() {
        let state = state(Role::Admin);

        let parse = |words: &[&str]| ShellLine::try_parse_from(words).unwrap().command;

        let output = execute(&state, parse(&["dining", "assign", "r3", "t1"])).await.unwrap();
        match output {
            Output::Json(value) => assert_eq!(value["tableId"], "t1"),
            other => panic!("unexpected output: {:?}", other),
        }

        execute(&state, parse(&["role", "waiter"])).await.unwrap();
        let err = execute(&state, parse(&["invoices", "list"])).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ForbiddenRoute);

        let output = execute(&state, parse(&["export", "menu"])).await.unwrap();
        assert!(matches!(output, Output::Text(text) if text.contains("Ravitoto")));
    }
}
