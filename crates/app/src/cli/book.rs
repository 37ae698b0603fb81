use clap::Args;
use jiff::civil::Date;
use rust_decimal::Decimal;
use tripcart::{booking::BookingRequest, money::format_amount};
use tripcart_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct BookArgs {
    /// Service identifier
    id: String,

    /// Booking date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<Date>,

    /// Time slot, e.g. "9:00 AM"
    #[arg(long)]
    time: Option<String>,

    /// Number of sessions (1 to 10)
    #[arg(long, default_value_t = 1)]
    sessions: u32,

    /// Add-on name; repeat for several
    #[arg(long = "add-on")]
    add_ons: Vec<String>,
}

pub(crate) fn run(ctx: &mut AppContext, args: BookArgs) -> Result<(), String> {
    let mut request = BookingRequest::new(args.id).sessions(args.sessions);

    if let Some(date) = args.date {
        request = request.date(date);
    }

    if let Some(time) = args.time {
        request = request.time(time);
    }

    for name in args.add_ons {
        request = request.add_on(name);
    }

    let quote = ctx
        .storefront
        .book(&request)
        .map_err(|error| error.to_string())?;

    let currency = ctx
        .storefront
        .service(&request.service_id)
        .map_or("USD", |service| service.currency.as_str());

    let amount = |value: Decimal| format_amount(value, currency);

    println!(
        "per session: {} + add-ons {}",
        amount(quote.per_session),
        amount(quote.add_ons)
    );
    println!("sessions:    {}", quote.sessions);
    println!("subtotal:    {}", amount(quote.subtotal));

    if !quote.discount.is_zero() {
        println!("discount:   -{}", amount(quote.discount));
    }

    println!("total:       {}", amount(quote.total));

    Ok(())
}
