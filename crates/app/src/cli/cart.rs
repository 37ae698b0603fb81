use std::{io, num::NonZeroU32};

use clap::{Args, Subcommand};
use jiff::civil::Date;
use tripcart::{
    cart::NewCartItem,
    catalog::AddOn,
    checkout::{Charges, PriceBreakdown},
    receipt,
};
use tripcart_app::context::AppContext;

use super::Pricing;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    Show(ShowArgs),
    Add(AddArgs),
    Remove(RemoveArgs),
    Update(UpdateArgs),
    Clear,
    Open,
    Close,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Fees and discounts to include in the breakdown
    #[arg(long, value_enum, default_value_t)]
    pricing: Pricing,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Service identifier
    id: String,

    /// Units to add
    #[arg(long, default_value = "1")]
    quantity: NonZeroU32,

    /// Booking date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<Date>,

    /// Booking time slot, e.g. "9:00 AM"
    #[arg(long)]
    time: Option<String>,

    /// Add-on name; repeat for several
    #[arg(long = "add-on")]
    add_ons: Vec<String>,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Service identifier; every line for it is removed
    id: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Service identifier; every line for it is updated
    id: String,

    /// New quantity; zero or less removes the lines
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn run(ctx: &mut AppContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => show(ctx, &args),
        CartSubcommand::Add(args) => add(ctx, args),
        CartSubcommand::Remove(args) => {
            let removed = ctx.storefront.remove_from_cart(&args.id);
            println!("removed {removed} line(s)");
            Ok(())
        }
        CartSubcommand::Update(args) => {
            let updated = ctx.storefront.update_quantity(&args.id, args.quantity);
            println!("updated {updated} line(s)");
            Ok(())
        }
        CartSubcommand::Clear => {
            ctx.storefront.clear_cart();
            Ok(())
        }
        CartSubcommand::Open => {
            ctx.storefront.set_cart_open(true);
            println!("cart sidebar: open");
            Ok(())
        }
        CartSubcommand::Close => {
            ctx.storefront.set_cart_open(false);
            println!("cart sidebar: closed");
            Ok(())
        }
    }
}

fn show(ctx: &AppContext, args: &ShowArgs) -> Result<(), String> {
    let cart = ctx.storefront.cart();
    let currency = cart
        .items()
        .first()
        .map_or("USD", |line| line.service.currency.as_str());

    if cart.is_empty() {
        return receipt::write_cart(io::stdout().lock(), cart.items(), cart.cart_total(), currency)
            .map_err(|error| error.to_string());
    }

    println!(
        "{} item(s), sidebar {}",
        cart.item_count(),
        if cart.is_cart_open() { "open" } else { "closed" }
    );
    println!("{}", receipt::cart_table(cart.items()));

    let breakdown = PriceBreakdown::new(cart.cart_total(), &Charges::from(args.pricing));

    receipt::write_breakdown(io::stdout().lock(), &breakdown, currency)
        .map_err(|error| error.to_string())
}

fn add(ctx: &mut AppContext, args: AddArgs) -> Result<(), String> {
    let service = ctx
        .storefront
        .service(&args.id)
        .map_err(|error| error.to_string())?
        .clone();

    let mut item = NewCartItem::new(service).quantity(args.quantity);

    if let Some(date) = args.date {
        item = item.booking_date(date);
    }

    if let Some(time) = args.time {
        item = item.booking_time(time);
    }

    if !args.add_ons.is_empty() {
        let add_ons = resolve_add_ons(&item, &args.add_ons)?;
        item = item.add_ons(add_ons);
    }

    let quantity = ctx.storefront.add_to_cart(item);

    println!("line quantity: {quantity}");

    Ok(())
}

fn resolve_add_ons(item: &NewCartItem, names: &[String]) -> Result<Vec<AddOn>, String> {
    let options = item
        .service
        .booking
        .as_ref()
        .ok_or_else(|| format!("service {} has no add-ons", item.service.id))?;

    names
        .iter()
        .map(|name| {
            options
                .add_on(name)
                .cloned()
                .ok_or_else(|| format!("unknown add-on: {name}"))
        })
        .collect()
}
