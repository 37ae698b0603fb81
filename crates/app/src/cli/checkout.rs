use std::io;

use clap::Args;
use tripcart::checkout::{Charges, CheckoutDetails};
use tripcart_app::context::AppContext;

use super::Pricing;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Contact email
    #[arg(long)]
    email: String,

    /// Full name
    #[arg(long)]
    name: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Fees and discounts to charge
    #[arg(long, value_enum, default_value_t = Pricing::Checkout)]
    pricing: Pricing,
}

pub(crate) fn run(ctx: &mut AppContext, args: CheckoutArgs) -> Result<(), String> {
    let details = CheckoutDetails {
        email: args.email,
        name: args.name,
        address: args.address,
    };

    let confirmation = ctx
        .storefront
        .checkout(details, &Charges::from(args.pricing))
        .map_err(|error| error.to_string())?;

    confirmation
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print confirmation: {error}"))
}
