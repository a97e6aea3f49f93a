//! Cart and checkout commands.

use clap::{Args, Subcommand};
use jiff::Timestamp;
use tabled::{builder::Builder, settings::Style};

use kiosk::{
    app::{App, Command, Outcome, Section},
    cart::Totals,
    checkout::CustomerDetails,
    pricing::format_currency,
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add one unit of a product
    Add {
        /// Product id from the catalog feed
        product_id: String,
    },

    /// Set a line's quantity (minimum 1)
    Set {
        /// Product id of the line
        product_id: String,

        /// New quantity
        quantity: u32,
    },

    /// Remove a line entirely
    Remove {
        /// Product id of the line
        product_id: String,
    },

    /// Show priced cart contents
    Show,
}

pub(crate) fn run(app: &mut App, command: CartCommand) -> Result<(), String> {
    let now = Timestamp::now();

    match command.command {
        CartSubcommand::Add { product_id } => {
            app.handle(Command::AddToCart { product_id }, now)
                .map_err(|err| err.to_string())?;

            println!("Added. Cart holds {} item(s).", app.cart_count());

            Ok(())
        }
        CartSubcommand::Set {
            product_id,
            quantity,
        } => {
            app.handle(
                Command::SetQuantity {
                    product_id,
                    quantity,
                },
                now,
            )
            .map_err(|err| err.to_string())?;

            println!("Updated. Cart holds {} item(s).", app.cart_count());

            Ok(())
        }
        CartSubcommand::Remove { product_id } => {
            app.handle(Command::RemoveFromCart { product_id }, now)
                .map_err(|err| err.to_string())?;

            println!("Removed. Cart holds {} item(s).", app.cart_count());

            Ok(())
        }
        CartSubcommand::Show => {
            let outcome = app
                .handle(Command::Navigate(Section::Cart), now)
                .map_err(|err| err.to_string())?;

            let Outcome::CartView(totals) = outcome else {
                return Err("unexpected outcome for cart view".to_owned());
            };

            render_totals(&totals);

            Ok(())
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name; falls back to the last order's details
    #[arg(long)]
    name: Option<String>,

    /// Contact email
    #[arg(long)]
    email: Option<String>,

    /// First address line
    #[arg(long)]
    address1: Option<String>,

    /// Second address line
    #[arg(long)]
    address2: Option<String>,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// Postal code
    #[arg(long)]
    zip: Option<String>,

    /// Delivery notes
    #[arg(long)]
    notes: Option<String>,
}

impl CheckoutArgs {
    /// Merge the flags over the stored last-customer prefill, as the
    /// original order form prefills its fields.
    fn form(self, prefill: CustomerDetails) -> CustomerDetails {
        CustomerDetails {
            name: self.name.unwrap_or(prefill.name),
            email: self.email.unwrap_or(prefill.email),
            address1: self.address1.unwrap_or(prefill.address1),
            address2: self.address2.unwrap_or(prefill.address2),
            city: self.city.unwrap_or(prefill.city),
            zip: self.zip.unwrap_or(prefill.zip),
            notes: self.notes.unwrap_or(prefill.notes),
        }
    }
}

pub(crate) fn checkout(app: &mut App, args: CheckoutArgs) -> Result<(), String> {
    let now = Timestamp::now();

    let outcome = app
        .handle(Command::Navigate(Section::Order), now)
        .map_err(|err| err.to_string())?;

    if let Outcome::CartView(totals) = &outcome {
        render_totals(totals);
    }

    let form = args.form(app.last_customer().unwrap_or_default());

    let outcome = app
        .handle(Command::SubmitCheckout { form }, now)
        .map_err(|err| err.to_string())?;

    let Outcome::OrderPlaced { order_id } = outcome else {
        return Err("unexpected outcome for checkout".to_owned());
    };

    println!("Order placed: {order_id}");

    Ok(())
}

fn render_totals(totals: &Totals) {
    if totals.lines.is_empty() {
        println!("Your cart is empty.");

        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Title", "Unit", "Qty", "Line"]);

    for line in &totals.lines {
        let line_total = line.unit_price * rust_decimal::Decimal::from(line.quantity);

        builder.push_record([
            line.product_id.clone(),
            line.title.clone(),
            format_currency(line.unit_price),
            line.quantity.to_string(),
            format_currency(line_total),
        ]);
    }

    builder.push_record([
        String::new(),
        String::new(),
        String::new(),
        "Subtotal".to_owned(),
        format_currency(totals.subtotal),
    ]);
    builder.push_record([
        String::new(),
        String::new(),
        String::new(),
        "Tax".to_owned(),
        format_currency(totals.tax),
    ]);
    builder.push_record([
        String::new(),
        String::new(),
        String::new(),
        "Total".to_owned(),
        format_currency(totals.total),
    ]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");
}
