use clap::{Args, Subcommand};
use tripcart::{catalog::Service, money::format_amount};
use tripcart_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    List(ListArgs),
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only list services in this category
    #[arg(long)]
    category: Option<String>,

    /// Only list featured services
    #[arg(long, conflicts_with_all = ["popular", "deals"])]
    featured: bool,

    /// Only list popular services
    #[arg(long, conflicts_with = "deals")]
    popular: bool,

    /// Only list this week's deals
    #[arg(long)]
    deals: bool,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Service identifier
    id: String,

    /// Number of related services to suggest
    #[arg(long, default_value_t = 3)]
    related: usize,
}

pub(crate) fn run(ctx: &AppContext, command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::List(args) => list(ctx, &args),
        CatalogSubcommand::Show(args) => show(ctx, &args),
    }
}

fn list(ctx: &AppContext, args: &ListArgs) -> Result<(), String> {
    let catalog = ctx.storefront.catalog();

    let mut services: Vec<&Service> = if args.featured {
        catalog.featured().collect()
    } else if args.popular {
        catalog.popular().collect()
    } else if args.deals {
        catalog.weekly_deals().collect()
    } else {
        catalog.services().iter().collect()
    };

    if let Some(category) = &args.category {
        services.retain(|service| &service.category == category);
    }

    if services.is_empty() {
        println!("no services found");
        return Ok(());
    }

    for service in services {
        println!("{}", summary(service));
    }

    Ok(())
}

fn show(ctx: &AppContext, args: &ShowArgs) -> Result<(), String> {
    let service = ctx
        .storefront
        .service(&args.id)
        .map_err(|error| error.to_string())?;

    println!("{}", service.name);
    println!("category: {}", service.category);
    println!("price: {}", format_amount(service.price, &service.currency));

    if let Some(label) = &service.price_description {
        println!("billing: {label}");
    }

    if let (Some(rating), Some(reviews)) = (service.rating, service.reviews) {
        println!("rating: {rating} ({reviews} reviews)");
    }

    println!();
    println!(
        "{}",
        service
            .long_description
            .as_deref()
            .unwrap_or(&service.description)
    );

    for feature in &service.features {
        println!("  - {feature}");
    }

    if let Some(booking) = &service.booking {
        println!();
        println!(
            "per session: {}",
            format_amount(booking.price_per_session, &service.currency)
        );

        if !booking.discount.is_zero() {
            println!("multi-session discount: {}", booking.discount);
        }

        for add_on in &booking.add_ons {
            println!(
                "  + {} {}",
                add_on.name,
                format_amount(add_on.price, &service.currency)
            );
        }
    }

    let related = ctx.storefront.catalog().related(&service.id, args.related);

    if !related.is_empty() {
        println!();
        println!("related:");

        for other in related {
            println!("{}", summary(other));
        }
    }

    Ok(())
}

fn summary(service: &Service) -> String {
    format!(
        "{:>5}  {:<40}  {:>10}  {}",
        service.id,
        service.name,
        format_amount(service.price, &service.currency),
        service.category
    )
}
