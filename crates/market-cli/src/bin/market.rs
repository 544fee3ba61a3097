//! Main binary entry point for the marketplace CLI
//!
//! Handles argument parsing, logging setup and configuration loading, then
//! dispatches each command to the client services or operations.

use anyhow::{Context as _, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use clap::Parser;
use market_cli::cli::commands::{
	AuctionCommand, AuctionSubcommand, CompanyCommand, CompanySubcommand, DashboardArgs,
	EventCommand, EventSubcommand, LoginArgs, OfferCommand, OfferSubcommand, OrderCommand,
	OrderSubcommand, ProductCommand, ProductSubcommand, PublishArgs, RequirementCommand,
	RequirementSubcommand,
};
use market_cli::cli::output::{
	auction_badge, format_date, format_price, offer_badge, progress_badge, Display,
};
use market_cli::cli::{Cli, Commands};
use market_client::operations::{
	DashboardOps, OrderProgress, OrderRequestForm, PublishOps, RequirementForm, RequirementOps,
};
use market_client::Context;
use market_types::validation::{parse_event_date, positive_amount};
use market_types::{
	AcceptOfferRequest, Auction, CreateAuctionRequest, CreateCompanyRequest, CreateEventRequest,
	CreateOfferRequest, Event, LoginRequest, Offer, Order, Product, ProductDraft, ProductOptions,
	ProductType, Requirement,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
	// Load environment variables from .env file if it exists
	let _ = dotenvy::dotenv();

	init_logging();

	let cli = Cli::parse();

	if let Err(err) = run(cli).await {
		report(&err);
		std::process::exit(1);
	}
}

/// Initialize structured logging with configurable verbosity
///
/// Logs are controlled via the RUST_LOG environment variable.
fn init_logging() {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("market=info,market_cli=info,market_client=info,warn"));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.init();
}

async fn run(cli: Cli) -> Result<()> {
	let config = market_cli::load_config(cli.config.as_deref(), cli.api_url.as_deref()).await?;
	let ctx = Arc::new(Context::init(config).await?);

	match cli.command {
		Commands::Login(args) => handle_login(&ctx, args).await,
		Commands::Logout => handle_logout(&ctx).await,
		Commands::Whoami => handle_whoami(&ctx),
		Commands::Event(cmd) => handle_event(&ctx, cmd).await,
		Commands::Requirement(cmd) => handle_requirement(ctx, cmd).await,
		Commands::Auction(cmd) => handle_auction(&ctx, cmd).await,
		Commands::Offer(cmd) => handle_offer(&ctx, cmd).await,
		Commands::Order(cmd) => handle_order(&ctx, cmd).await,
		Commands::Company(cmd) => handle_company(&ctx, cmd).await,
		Commands::Product(cmd) => handle_product(&ctx, cmd).await,
		Commands::Publish(args) => handle_publish(ctx, args).await,
		Commands::Dashboard(args) => handle_dashboard(ctx, args).await,
	}
}

/// Prints a failed command. Client errors get their user-facing text.
fn report(err: &anyhow::Error) {
	match err.downcast_ref::<market_client::Error>() {
		Some(client_err) => {
			Display::error(&client_err.user_message());
			if client_err.requires_login() {
				Display::next_steps(&["Log in with 'market login <email>'"]);
			}
		},
		None => Display::error(&format!("{err:#}")),
	}
}

#[instrument(skip_all, fields(email = %args.email))]
async fn handle_login(ctx: &Context, args: LoginArgs) -> Result<()> {
	let user = ctx
		.auth
		.login(&LoginRequest::new(args.email, args.password))
		.await?;

	Display::success(&format!("Logged in as {} <{}>", user.name, user.email));
	Ok(())
}

async fn handle_logout(ctx: &Context) -> Result<()> {
	if !ctx.auth.is_authenticated() {
		Display::info("No active session");
	}
	ctx.auth.logout().await?;
	Display::success("Logged out");
	Ok(())
}

fn handle_whoami(ctx: &Context) -> Result<()> {
	Display::header("Current User");

	let user = match ctx.auth.current_user() {
		Some(user) if ctx.auth.is_authenticated() => user,
		_ => {
			Display::warning("Not logged in");
			Display::next_steps(&["Log in with 'market login <email>'"]);
			return Ok(());
		},
	};

	Display::kv("Id", &user.id);
	Display::kv("Name", &user.name);
	Display::kv("Email", &user.email);
	Display::kv("Role", &user.role_id);
	if let Some(expiry) = ctx.session.access_token_expiry() {
		let label = if expiry <= Utc::now() {
			format!("{} (expired, renewed on next request)", format_date(&expiry))
		} else {
			format_date(&expiry)
		};
		Display::kv("Token expires", &label);
	}
	Ok(())
}

#[instrument(skip_all)]
async fn handle_event(ctx: &Context, cmd: EventCommand) -> Result<()> {
	match cmd.command {
		EventSubcommand::List { all } => {
			let mut events = ctx.events.list_events().await?;
			if !all {
				let user = ctx.require_user()?;
				events.retain(|event| event.user_id == user.id);
			}

			Display::header("Events");
			if events.is_empty() {
				Display::info("No events found");
			}
			for event in &events {
				print_event(event);
			}
		},
		EventSubcommand::Show { id } => {
			let event = ctx.events.get_event(&id).await?;
			let requirements = ctx.events.list_requirements(&id).await?;

			Display::header(&event.name);
			Display::kv("Id", &event.id);
			Display::kv("Date", &format_date(&event.date));
			Display::kv("Location", &event.location);
			Display::kv("Owner", &event.user_id);

			Display::section("Requirements");
			if requirements.is_empty() {
				Display::info("No requirements yet");
			}
			for requirement in &requirements {
				print_requirement(requirement);
			}
		},
		EventSubcommand::Create {
			name,
			date,
			location,
		} => {
			let user = ctx.require_user()?;
			let date = parse_event_date("date", &date)?;

			let event = ctx
				.events
				.create_event(&CreateEventRequest {
					user_id: user.id,
					name,
					date,
					location,
				})
				.await?;
			info!(event_id = %event.id, "Event created");

			Display::success(&format!("Event created: {}", event.id));
			let add = format!(
				"Add requirements with 'market requirement add {} --product-type camisetas --description ... --quantity ...'",
				event.id
			);
			let auction = format!(
				"Open an auction with 'market auction create --event-id {} --end <date> --price <amount>'",
				event.id
			);
			Display::next_steps(&[&add, &auction]);
		},
		EventSubcommand::Delete { id } => {
			ctx.events.delete_event(&id).await?;
			Display::success(&format!("Event {id} deleted"));
		},
	}

	Ok(())
}

/// A requirement as written in a `--from-file` JSON list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirementEntry {
	product_type: ProductType,
	description: String,
	quantity: i64,
	#[serde(default)]
	specs: BTreeMap<String, String>,
	/// Base64 encoded images
	#[serde(default)]
	images: Vec<String>,
}

impl From<RequirementEntry> for RequirementForm {
	fn from(entry: RequirementEntry) -> Self {
		RequirementForm {
			product_type: entry.product_type,
			description: entry.description,
			quantity: entry.quantity,
			specs: entry.specs,
			images: entry.images,
		}
	}
}

async fn read_requirement_file(path: &Path) -> Result<Vec<RequirementForm>> {
	let content = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("Failed to read {}", path.display()))?;
	let entries: Vec<RequirementEntry> = serde_json::from_str(&content)
		.with_context(|| format!("Invalid requirements file {}", path.display()))?;
	Ok(entries.into_iter().map(RequirementForm::from).collect())
}

async fn encode_images(paths: &[PathBuf]) -> Result<Vec<String>> {
	let mut images = Vec::with_capacity(paths.len());
	for path in paths {
		let bytes = tokio::fs::read(path)
			.await
			.with_context(|| format!("Failed to read image {}", path.display()))?;
		images.push(STANDARD.encode(bytes));
	}
	Ok(images)
}

#[instrument(skip_all)]
async fn handle_requirement(ctx: Arc<Context>, cmd: RequirementCommand) -> Result<()> {
	match cmd.command {
		RequirementSubcommand::List { event_id } => {
			let requirements = ctx.events.list_requirements(&event_id).await?;

			Display::header("Requirements");
			if requirements.is_empty() {
				Display::info("No requirements for this event");
			}
			for requirement in &requirements {
				print_requirement(requirement);
			}
		},
		RequirementSubcommand::Add {
			event_id,
			from_file,
			product_type,
			description,
			quantity,
			specs,
			images,
		} => {
			let forms = match from_file {
				Some(path) => read_requirement_file(&path).await?,
				None => {
					let mut form = RequirementForm::new(
						product_type.context("--product-type is required")?,
						description.context("--description is required")?,
						quantity.context("--quantity is required")?,
					);
					form.specs.extend(specs);
					form.images = encode_images(&images).await?;
					vec![form]
				},
			};

			let created = RequirementOps::new(ctx).add(&event_id, &forms).await?;

			Display::success(&format!("{} requirement(s) added", created.len()));
			for requirement in &created {
				print_requirement(requirement);
			}
		},
	}

	Ok(())
}

#[instrument(skip_all)]
async fn handle_auction(ctx: &Context, cmd: AuctionCommand) -> Result<()> {
	match cmd.command {
		AuctionSubcommand::Create {
			event_id,
			end,
			start,
			price,
		} => {
			let start_at = match start {
				Some(start) => parse_event_date("start", &start)?,
				None => Utc::now(),
			};
			let end_at = parse_event_date("end", &end)?;
			let suggested_price = positive_amount("price", price)?;

			let auction = ctx
				.events
				.create_auction(&CreateAuctionRequest {
					event_id,
					start_at,
					end_at,
					suggested_price,
					company_id: None,
				})
				.await?;

			Display::success(&format!("Auction opened: {}", auction.id));
			print_auction(&auction);
		},
		AuctionSubcommand::Show { id } => {
			let auction = ctx.events.get_auction(&id).await?;
			let offers = ctx.orders.list_auction_offers(&id).await?;

			Display::header("Auction");
			print_auction(&auction);

			Display::section("Offers");
			if offers.is_empty() {
				Display::info("No offers yet");
			}
			for offer in &offers {
				print_offer(offer);
			}
		},
		AuctionSubcommand::Cancel { id } => {
			let auction = ctx.events.cancel_auction(&id).await?;
			Display::success(&format!("Auction {} is now {}", auction.id, auction.status));
		},
		AuctionSubcommand::End { id } => {
			let auction = ctx.events.end_auction(&id).await?;
			Display::success(&format!("Auction {} is now {}", auction.id, auction.status));
		},
	}

	Ok(())
}

#[instrument(skip_all)]
async fn handle_offer(ctx: &Context, cmd: OfferCommand) -> Result<()> {
	match cmd.command {
		OfferSubcommand::List { auction, company } => {
			let offers = match (auction, company) {
				(Some(auction), _) => ctx.orders.list_auction_offers(&auction).await?,
				(None, Some(company)) => ctx.orders.list_company_offers(&company).await?,
				(None, None) => anyhow::bail!("Pass --auction or --company"),
			};

			Display::header("Offers");
			if offers.is_empty() {
				Display::info("No offers found");
			}
			for offer in &offers {
				print_offer(offer);
			}
		},
		OfferSubcommand::Show { id } => {
			let offer = ctx.orders.get_offer(&id).await?;

			Display::header("Offer");
			Display::kv("Id", &offer.id);
			Display::kv("Auction", &offer.auction_id);
			Display::kv("Company", &offer.company_id);
			Display::kv("Price", &format_price(offer.price));
			Display::kv("Lead time", &format!("{} days", offer.lead_time_days));
			Display::kv("Status", &offer_badge(offer.status).to_string());
			Display::kv("Submitted", &format_date(&offer.created_at));
		},
		OfferSubcommand::Create {
			auction,
			company,
			price,
			lead_time_days,
		} => {
			let price = positive_amount("price", price)?;
			let offer = ctx
				.orders
				.create_offer(&CreateOfferRequest {
					auction_id: auction,
					company_id: company,
					price,
					lead_time_days,
					specs_json: None,
				})
				.await?;

			Display::success(&format!("Offer submitted: {}", offer.id));
		},
		OfferSubcommand::Accept { id } => {
			let user = ctx.require_user()?;
			let order = ctx
				.orders
				.accept_offer(&AcceptOfferRequest {
					offer_id: id,
					client_id: user.id,
				})
				.await?;
			info!(order_id = %order.id, "Offer accepted");

			Display::success(&format!("Offer accepted, order {} created", order.id));
			print_order(&order);
		},
		OfferSubcommand::Reject { id, reason } => {
			let response = ctx.orders.reject_offer(&id, reason.as_deref()).await?;
			let message = response
				.map(|r| r.message)
				.unwrap_or_else(|| format!("Offer {id} rejected"));
			Display::success(&message);
		},
	}

	Ok(())
}

#[instrument(skip_all)]
async fn handle_order(ctx: &Context, cmd: OrderCommand) -> Result<()> {
	match cmd.command {
		OrderSubcommand::List { client } => {
			let client_id = match client {
				Some(client) => client,
				None => ctx.require_user()?.id,
			};
			let orders = ctx.orders.list_client_orders(&client_id).await?;

			Display::header("Orders");
			if orders.is_empty() {
				Display::info("No orders found");
			}
			for order in &orders {
				print_order(order);
			}
		},
		OrderSubcommand::Show { id } => {
			let order = ctx.orders.get_order(&id).await?;

			Display::header("Order");
			Display::kv("Id", &order.id);
			Display::kv("Client", &order.client_id);
			Display::kv("Offer", &order.offer_id);
			Display::kv("Status", &order.status);
			Display::kv("Created", &format_date(&order.created_at));
		},
		OrderSubcommand::Status { id, status } => {
			let order = ctx.orders.update_order_status(&id, &status).await?;
			Display::success(&format!("Order {} is now {}", order.id, order.status));
		},
		OrderSubcommand::Cancel { id } => {
			let order = ctx.orders.cancel_order(&id).await?;
			Display::success(&format!("Order {} is now {}", order.id, order.status));
		},
	}

	Ok(())
}

#[instrument(skip_all)]
async fn handle_company(ctx: &Context, cmd: CompanyCommand) -> Result<()> {
	match cmd.command {
		CompanySubcommand::List => {
			let companies = ctx.companies.list_companies().await?;

			Display::header("Companies");
			if companies.is_empty() {
				Display::info("No companies registered");
			}
			for company in &companies {
				Display::item(&company.id, &format!("{} · {}", company.name, company.contact_email));
			}
		},
		CompanySubcommand::Create { name, email } => {
			let user = ctx.require_user()?;
			let company = ctx
				.companies
				.create_company(&CreateCompanyRequest {
					user_id: user.id,
					name,
					contact_email: email,
				})
				.await?;

			Display::success(&format!("Company registered: {}", company.id));
		},
	}

	Ok(())
}

#[instrument(skip_all)]
async fn handle_product(ctx: &Context, cmd: ProductCommand) -> Result<()> {
	match cmd.command {
		ProductSubcommand::List { company_id } => {
			let products = ctx.companies.list_products(&company_id).await?;

			Display::header("Products");
			if products.is_empty() {
				Display::info("No products in this catalogue");
			}
			for product in &products {
				print_product(product);
			}
		},
		ProductSubcommand::Create {
			company_id,
			name,
			price,
			colors,
			sizes,
			materials,
		} => {
			let base_price = positive_amount("price", price)?;
			let options = ProductOptions {
				colors: non_empty(colors),
				sizes: non_empty(sizes),
				materials: non_empty(materials),
				..Default::default()
			};
			let has_options =
				options.colors.is_some() || options.sizes.is_some() || options.materials.is_some();

			let product = ctx
				.companies
				.create_product(
					&company_id,
					&ProductDraft {
						name,
						base_price,
						options_json: has_options.then_some(options),
					},
				)
				.await?;

			Display::success(&format!("Product added: {}", product.id));
		},
	}

	Ok(())
}

#[instrument(skip_all, fields(event = %args.name))]
async fn handle_publish(ctx: Arc<Context>, args: PublishArgs) -> Result<()> {
	let form = OrderRequestForm {
		event_type: args.event_type,
		event_name: args.name,
		event_date: args.date,
		event_location: args.location,
		description: args.description,
		quantity: args.quantity,
		product_type: args.product_type,
		size: args.size,
		colors: args.colors,
		material: args.material,
		additional_info: args.info,
		budget: args.budget,
	};

	Display::header("Publishing Order Request");
	let published = PublishOps::new(ctx).publish(&form).await?;

	Display::success("Order request published");
	Display::kv("Event", &published.event.id);
	Display::kv("Requirement", &published.requirement.id);
	Display::kv("Auction", &published.auction.id);
	Display::kv("Bids close", &format_date(&published.auction.end_at));
	Display::next_steps(&[
		"Follow incoming offers with 'market auction show <auction-id>'",
		"Check your orders with 'market dashboard'",
	]);
	Ok(())
}

#[instrument(skip_all)]
async fn handle_dashboard(ctx: Arc<Context>, args: DashboardArgs) -> Result<()> {
	let dashboard = DashboardOps::new(ctx).load().await?;

	Display::header("My Orders");
	let counts = OrderProgress::ALL
		.iter()
		.map(|progress| format!("{}: {}", progress_badge(*progress), dashboard.count(*progress)))
		.collect::<Vec<_>>()
		.join("   ");
	println!("  {counts}");

	let filter = args.status.map(OrderProgress::from);
	let orders: Vec<_> = dashboard
		.orders
		.iter()
		.filter(|order| filter.map_or(true, |progress| order.progress == progress))
		.collect();

	Display::section("Orders");
	if orders.is_empty() {
		Display::info("Nothing to show");
		Display::next_steps(&["Publish an order request with 'market publish'"]);
	}
	for order in orders {
		Display::item(
			&order.event.id,
			&format!(
				"{} · {} units · {} · {}",
				order.event_type(),
				order.quantity(),
				format_date(&order.event.date),
				progress_badge(order.progress)
			),
		);
	}
	Ok(())
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
	let values: Vec<String> = values
		.into_iter()
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
		.collect();
	(!values.is_empty()).then_some(values)
}

fn print_event(event: &Event) {
	Display::item(
		&event.id,
		&format!(
			"{} · {} · {}",
			event.name,
			format_date(&event.date),
			event.location
		),
	);
}

fn print_requirement(requirement: &Requirement) {
	Display::item(
		&requirement.id,
		&format!("{} × {}", requirement.quantity, requirement.description),
	);
}

fn print_auction(auction: &Auction) {
	Display::kv("Id", &auction.id);
	Display::kv("Event", &auction.event_id);
	Display::kv("Status", &auction_badge(auction.status).to_string());
	Display::kv("Opens", &format_date(&auction.start_at));
	Display::kv("Closes", &format_date(&auction.end_at));
	Display::kv("Suggested price", &format_price(auction.suggested_price));
}

fn print_offer(offer: &Offer) {
	Display::item(
		&offer.id,
		&format!(
			"{} · {} days · company {} · {}",
			format_price(offer.price),
			offer.lead_time_days,
			offer.company_id,
			offer_badge(offer.status)
		),
	);
}

fn print_order(order: &Order) {
	Display::item(
		&order.id,
		&format!(
			"{} · offer {} · {}",
			order.status,
			order.offer_id,
			format_date(&order.created_at)
		),
	);
}

fn print_product(product: &Product) {
	let options = product
		.options_json
		.as_ref()
		.map(|options| {
			[&options.colors, &options.sizes, &options.materials]
				.into_iter()
				.flatten()
				.flat_map(|values| values.iter().map(String::as_str))
				.collect::<Vec<_>>()
				.join(", ")
		})
		.filter(|joined| !joined.is_empty())
		.map(|joined| format!(" · {joined}"))
		.unwrap_or_default();

	Display::item(
		&product.id,
		&format!("{} · {}{}", product.name, format_price(product.base_price), options),
	);
}
