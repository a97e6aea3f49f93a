//! Product listing command.

use clap::Args;
use jiff::Timestamp;
use tabled::{builder::Builder, settings::Style};

use kiosk::{
    app::{App, Command, Outcome, Section},
    catalog::LoadState,
    pricing::{discounted, format_currency},
};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Category filter; "All" lists every category
    #[arg(long, default_value = "All")]
    category: String,

    /// Case-insensitive text filter on title, description and category
    #[arg(long, default_value = "")]
    search: String,
}

pub(crate) fn run(app: &mut App, args: ProductsArgs) -> Result<(), String> {
    let now = Timestamp::now();

    app.handle(Command::Navigate(Section::Products), now)
        .map_err(|err| err.to_string())?;

    if app.catalog().state() == LoadState::Failed {
        return Err("Could not load products.".to_owned());
    }

    app.handle(
        Command::SelectCategory {
            category: args.category,
        },
        now,
    )
    .map_err(|err| err.to_string())?;

    let outcome = app
        .handle(Command::Search { query: args.search }, now)
        .map_err(|err| err.to_string())?;

    let Outcome::ProductList(products) = outcome else {
        return Err("unexpected outcome for product listing".to_owned());
    };

    if products.is_empty() {
        println!("No products match.");

        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Title", "Category", "Price", "Offer"]);

    for product in &products {
        let (price, offer) = if product.discount > 0 {
            (
                format_currency(discounted(product.price, product.discount)),
                format!(
                    "{}% off, was {}",
                    product.discount,
                    format_currency(product.price)
                ),
            )
        } else {
            (format_currency(product.price), String::new())
        };

        builder.push_record([
            product.id.clone(),
            product.title.clone(),
            product.category.clone(),
            price,
            offer,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");

    Ok(())
}
