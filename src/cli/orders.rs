//! Order history command.

use jiff::Timestamp;
use tabled::{builder::Builder, settings::Style};

use kiosk::app::{App, Command, Outcome, Section};

pub(crate) fn run(app: &mut App) -> Result<(), String> {
    let outcome = app
        .handle(Command::Navigate(Section::Orders), Timestamp::now())
        .map_err(|err| err.to_string())?;

    let Outcome::OrderHistory(orders) = outcome else {
        return Err("unexpected outcome for order history".to_owned());
    };

    if orders.is_empty() {
        println!("No orders yet.");

        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Placed", "Lines", "Units", "Customer"]);

    for order in &orders {
        let units: u64 = order.items.values().map(|quantity| u64::from(*quantity)).sum();

        builder.push_record([
            order.id.clone(),
            order.created.to_string(),
            order.items.len().to_string(),
            units.to_string(),
            order.customer.name.clone(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");

    Ok(())
}
