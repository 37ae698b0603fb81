use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tripcart::checkout::Charges;
use tripcart_app::context::AppContext;

mod book;
mod cart;
mod catalog;
mod checkout;
mod session;

#[derive(Debug, Parser)]
#[command(name = "tripcart-app", about = "Tripcart storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the persisted cart and session
    #[arg(long, global = true, env = "TRIPCART_DATA_DIR", default_value = ".tripcart")]
    data_dir: PathBuf,

    /// YAML catalog to use instead of the bundled one
    #[arg(long, global = true, env = "TRIPCART_CATALOG")]
    catalog: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `tripcart=debug`
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Cart(cart::CartCommand),
    Book(book::BookArgs),
    Checkout(checkout::CheckoutArgs),
    Session(session::SessionCommand),
}

/// Which fees and discounts to show with a price breakdown.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum Pricing {
    /// Flat service fee
    Checkout,

    /// Service fee plus taxes
    #[default]
    CartPage,

    /// Discount on large orders
    Sidebar,
}

impl From<Pricing> for Charges {
    fn from(pricing: Pricing) -> Self {
        match pricing {
            Pricing::Checkout => Charges::checkout(),
            Pricing::CartPage => Charges::cart_page(),
            Pricing::Sidebar => Charges::sidebar(),
        }
    }
}

impl Cli {
    pub(crate) fn log_level(&self) -> &str {
        &self.log_level
    }

    pub(crate) fn run(self) -> Result<(), String> {
        let mut ctx = AppContext::open(self.data_dir, self.catalog.as_deref())
            .map_err(|error| error.to_string())?;

        let result = match self.command {
            Commands::Catalog(command) => catalog::run(&ctx, command),
            Commands::Cart(command) => cart::run(&mut ctx, command),
            Commands::Book(args) => book::run(&mut ctx, args),
            Commands::Checkout(args) => checkout::run(&mut ctx, args),
            Commands::Session(command) => session::run(&mut ctx, command),
        };

        for notification in ctx.take_notifications() {
            println!("{}: {}", notification.title, notification.description);
        }

        result
    }
}
